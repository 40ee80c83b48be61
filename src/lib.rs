pub mod config;
pub mod correction;
pub mod error;
pub mod fs;
pub mod normalize;
pub mod resolve;
pub mod strategy;
pub mod tools;
pub mod tracker;
pub mod types;

pub use config::{AmbiguityPolicy, ResolverConfig};
pub use correction::SelfCorrector;
pub use error::{EditError, EditErrorKind};
pub use fs::{FileSystem, LocalFileSystem, MemoryFileSystem, PathLocks};
pub use normalize::{LineEnding, NormalizedContent};
pub use resolve::{resolve_edit, EditOutcome, EditRequest, ResolvedEdit, Resolver};
pub use strategy::{MatchAttempt, MatchStrategy, Strategy};
pub use tools::EditFileTool;
pub use tracker::{ChangeLog, ChangeMetadata, ChangeRecorder, ChangeType, FileChange};
pub use types::*;
