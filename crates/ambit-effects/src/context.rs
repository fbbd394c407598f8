//! Ambient scope propagation
//!
//! Binds the active [`Scope`] to the currently polled computation through
//! Tokio's task-local storage. The binding covers the wrapped future and
//! everything it awaits, nests across inner `handle` calls, and is invisible
//! to unrelated tasks, which is what keeps concurrently running scopes
//! isolated from each other.
//!
//! Work moved onto another task with `tokio::spawn` does not inherit the
//! binding on its own; the perform path re-wraps spawned handler work in the
//! performing scope explicitly.

use std::future::Future;
use std::sync::Arc;

use crate::scope::Scope;

tokio::task_local! {
    /// Scope ambient for the currently polled computation
    static CURRENT_SCOPE: Arc<Scope>;
}

/// Run `fut` with `scope` ambient for its entire logical execution,
/// including every future it awaits. Nested calls shadow the outer scope
/// for the inner future and restore it afterwards.
pub(crate) async fn with_scope<F>(scope: Arc<Scope>, fut: F) -> F::Output
where
    F: Future,
{
    CURRENT_SCOPE.scope(scope, fut).await
}

/// The nearest ambient scope, or `None` when no `handle` is active.
pub(crate) fn current_scope() -> Option<Arc<Scope>> {
    CURRENT_SCOPE.try_with(Arc::clone).ok()
}
