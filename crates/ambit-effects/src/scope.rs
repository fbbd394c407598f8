//! Effect scopes and their completion futures
//!
//! A [`Scope`] is created for each `handle` invocation and shared by
//! reference across the wrapped computation and everything it derives. It
//! carries the composed handler chain and the [`Completion`] future that
//! settles with the computation's outcome.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::error::EffectError;
use crate::handler::EffectHandler;

/// Identifier for one effect scope, used in trace output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(Uuid);

impl ScopeId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Settled outcome of a wrapped computation, as observed by handlers
pub type Outcome = Result<Value, EffectError>;

type SharedOutcome = Shared<BoxFuture<'static, Outcome>>;

/// Future settling with the enclosing scope's outcome.
///
/// Returned by [`Resume::resume`]; awaiting it suspends the handler until
/// the wrapped computation settles, delivering the computation's result
/// value on success and its error on failure. Clones all observe the same
/// outcome. If the scope is dropped before settling, observers receive
/// [`EffectError::ScopeClosed`].
///
/// [`Resume::resume`]: crate::Resume::resume
#[derive(Clone)]
pub struct Completion {
    inner: SharedOutcome,
}

impl Completion {
    /// Create a completion and the sender that settles it.
    pub(crate) fn channel() -> (oneshot::Sender<Outcome>, Completion) {
        let (settle, settled) = oneshot::channel();
        let inner = settled
            .map(|outcome| match outcome {
                Ok(outcome) => outcome,
                Err(_) => Err(EffectError::ScopeClosed),
            })
            .boxed()
            .shared();
        (settle, Completion { inner })
    }
}

impl Future for Completion {
    type Output = Outcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion").finish_non_exhaustive()
    }
}

/// Handler chain and completion ambient for one `handle` invocation
pub(crate) struct Scope {
    id: ScopeId,
    chain: Vec<Arc<EffectHandler>>,
    completion: Completion,
}

impl Scope {
    pub(crate) fn new(chain: Vec<Arc<EffectHandler>>, completion: Completion) -> Self {
        Self {
            id: ScopeId::new(),
            chain,
            completion,
        }
    }

    pub(crate) fn id(&self) -> ScopeId {
        self.id
    }

    /// Handler units tried in order; the innermost handler comes first.
    pub(crate) fn chain(&self) -> &[Arc<EffectHandler>] {
        &self.chain
    }

    pub(crate) fn completion(&self) -> Completion {
        self.completion.clone()
    }
}
