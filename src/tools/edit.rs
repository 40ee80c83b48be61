//! Edit tool — search/replace edits that survive whitespace drift.
//!
//! The agent supplies `old_string` and `new_string`; the [`Resolver`] finds the
//! intended location even when indentation or token spacing differ from the
//! file, and refuses anything ambiguous or empty. This tool owns everything
//! around it: argument validation, per-file locking, reading, writing, and
//! recording the change.

use crate::fs::{FileSystem, LocalFileSystem, PathLocks};
use crate::resolve::{EditRequest, Resolver};
use crate::tracker::{ChangeMetadata, ChangeRecorder, ChangeType, FileChange};
use crate::types::*;
use crate::SelfCorrector;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Refuse to edit files (or match search strings) larger than this.
const DEFAULT_MAX_BYTES: usize = 1024 * 1024;

const DESCRIPTION: &str = "Replaces text within a file. By default replaces a single occurrence; set expected_occurrences to replace every exact occurrence. Always read the file first. old_string should be the literal text to replace, including enough surrounding context (ideally 3 lines before and after) to identify one location. Small indentation or spacing differences are tolerated, but if old_string matches the wrong number of locations the edit fails. To create a new file, pass an empty old_string.";

/// Whitespace-tolerant search/replace on files.
pub struct EditFileTool {
    fs: Arc<dyn FileSystem>,
    resolver: Resolver,
    tracker: Option<Arc<dyn ChangeRecorder>>,
    locks: PathLocks,
    /// Max file size to edit (prevents OOM and runaway regex construction)
    pub max_bytes: usize,
}

impl Default for EditFileTool {
    fn default() -> Self {
        Self::new()
    }
}

impl EditFileTool {
    pub fn new() -> Self {
        Self {
            fs: Arc::new(LocalFileSystem),
            resolver: Resolver::new(),
            tracker: None,
            locks: PathLocks::new(),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_tracker(mut self, tracker: Arc<dyn ChangeRecorder>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn with_corrector(mut self, corrector: impl SelfCorrector + 'static) -> Self {
        self.resolver = self.resolver.with_corrector(corrector);
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

fn validate_path(path: &str) -> Result<(), ToolError> {
    if path.trim().is_empty() {
        return Err(ToolError::InvalidArgs("File path cannot be empty".into()));
    }
    if path.contains("..") {
        return Err(ToolError::InvalidArgs(format!(
            "Path traversal not allowed: {}",
            path
        )));
    }
    Ok(())
}

fn parse_expected_occurrences(params: &serde_json::Value) -> Result<usize, ToolError> {
    match params.get("expected_occurrences") {
        None | Some(serde_json::Value::Null) => Ok(1),
        Some(value) => value
            .as_u64()
            .filter(|n| *n >= 1)
            .map(|n| n as usize)
            .ok_or_else(|| {
                ToolError::InvalidArgs(format!(
                    "expected_occurrences must be at least 1, got: {}",
                    value
                ))
            }),
    }
}

#[async_trait]
impl AgentTool for EditFileTool {
    fn name(&self) -> &str {
        "smart_edit"
    }

    fn label(&self) -> &str {
        "Smart Edit"
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path of the file to modify"
                },
                "old_string": {
                    "type": "string",
                    "description": "Literal text to replace, with at least 3 lines of context before and after. Empty to create a new file."
                },
                "new_string": {
                    "type": "string",
                    "description": "Literal text to replace old_string with"
                },
                "expected_occurrences": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Number of occurrences to replace (default 1). Values above 1 require exact matches."
                }
            },
            "required": ["path", "old_string", "new_string"]
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let path = params["path"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArgs("missing 'path' parameter".into()))?;
        let old_string = params["old_string"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArgs("missing 'old_string' parameter".into()))?;
        let new_string = params["new_string"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArgs("missing 'new_string' parameter".into()))?;
        let expected = parse_expected_occurrences(&params)?;
        validate_path(path)?;

        if old_string.len() > self.max_bytes {
            return Err(ToolError::InvalidArgs(format!(
                "old_string too large ({} bytes, max {})",
                old_string.len(),
                self.max_bytes
            )));
        }

        if ctx.cancel.is_cancelled() {
            return Err(ToolError::Cancelled);
        }

        let request =
            EditRequest::new(path, old_string, new_string).with_expected_occurrences(expected);
        debug!(
            "{} [{} {}]",
            request.describe(),
            ctx.tool_name,
            ctx.tool_call_id
        );

        // Held until the write and change record are done
        let _guard = self.locks.lock(path).await;

        let current = self
            .fs
            .read_to_string(path)
            .await
            .map_err(|e| ToolError::Failed(format!("Cannot read {}: {}", path, e)))?;

        if let Some(content) = &current {
            if content.len() > self.max_bytes {
                return Err(ToolError::Failed(format!(
                    "File too large ({} bytes, max {})",
                    content.len(),
                    self.max_bytes
                )));
            }
        }

        let resolved = self.resolver.resolve(&request, current.as_deref())?;

        if ctx.cancel.is_cancelled() {
            return Err(ToolError::Cancelled);
        }

        self.fs
            .write(path, &resolved.new_body)
            .await
            .map_err(|e| ToolError::Failed(format!("Cannot write {}: {}", path, e)))?;

        let change_type = if resolved.is_new_file {
            ChangeType::Create
        } else {
            ChangeType::Edit
        };
        let change = FileChange::new(
            path,
            change_type,
            current.unwrap_or_default(),
            resolved.new_body,
            ChangeMetadata {
                tool: self.name().to_string(),
                replacements: resolved.occurrences,
                strategy: resolved.strategy,
            },
        );
        let change_id = change.id;
        if let Some(tracker) = &self.tracker {
            tracker.record(change);
        }

        let text = if resolved.is_new_file {
            format!("Created new file: {} with provided content.", path)
        } else {
            format!(
                "Successfully modified file: {} ({} replacement{}).",
                path,
                resolved.occurrences,
                if resolved.occurrences == 1 { "" } else { "s" }
            )
        };

        Ok(ToolResult {
            content: vec![Content::Text { text }],
            details: serde_json::json!({
                "path": path,
                "occurrences": resolved.occurrences,
                "strategy": resolved.strategy,
                "change_type": change_type,
                "change_id": change_id.to_string(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_traversal() {
        assert!(validate_path("../etc/passwd").is_err());
        assert!(validate_path("src/../../x").is_err());
        assert!(validate_path("   ").is_err());
        assert!(validate_path("/project/src/main.rs").is_ok());
    }

    #[test]
    fn expected_occurrences_parsing() {
        let parse = |v: serde_json::Value| parse_expected_occurrences(&v);
        assert_eq!(parse(serde_json::json!({})).unwrap(), 1);
        assert_eq!(
            parse(serde_json::json!({"expected_occurrences": null})).unwrap(),
            1
        );
        assert_eq!(
            parse(serde_json::json!({"expected_occurrences": 3})).unwrap(),
            3
        );
        assert!(parse(serde_json::json!({"expected_occurrences": 0})).is_err());
        assert!(parse(serde_json::json!({"expected_occurrences": -2})).is_err());
        assert!(parse(serde_json::json!({"expected_occurrences": "two"})).is_err());
    }

    #[test]
    fn schema_requires_core_fields() {
        let schema = EditFileTool::new().parameters_schema();
        assert_eq!(
            schema["required"],
            serde_json::json!(["path", "old_string", "new_string"])
        );
    }
}
