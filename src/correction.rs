//! Self-correction hook for failed edits.
//!
//! When a request fails with a correctable error (no match, or the wrong
//! number of matches), the resolver offers the failure to a
//! [`SelfCorrector`] exactly once. The corrector may return a revised request,
//! for example one produced by asking an LLM to fix `old_string`, which is then
//! resolved against the same content. A second failure is final.

use crate::error::EditError;
use crate::resolve::EditRequest;
use tracing::warn;

/// Proposes a revised request after a correctable failure.
pub trait SelfCorrector: Send + Sync {
    /// Return `None` to give up and surface `error` unchanged.
    fn correct(&self, request: &EditRequest, error: &EditError) -> Option<EditRequest>;
}

impl<F> SelfCorrector for F
where
    F: Fn(&EditRequest, &EditError) -> Option<EditRequest> + Send + Sync,
{
    fn correct(&self, request: &EditRequest, error: &EditError) -> Option<EditRequest> {
        self(request, error)
    }
}

/// Log a correction attempt.
pub(crate) fn log_correction(request: &EditRequest, error: &EditError) {
    warn!(
        "Edit of {} failed ({:?}), retrying once with corrected request",
        request.file_path,
        error.kind()
    );
}
