//! Effect performance and one-shot resumption
//!
//! [`perform`] suspends the calling computation until the ambient scope's
//! handler chain decides the effect's result. Handlers run on their own
//! task, re-wrapped in the performing scope, so the computation resumes the
//! moment a handler calls [`Resume::resume`] while the handler is still free
//! to do post-resume work (for instance awaiting the scope's
//! [`Completion`](crate::Completion) to react to the final outcome).

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::context;
use crate::error::EffectError;
use crate::handler::{self, EffectCall};
use crate::scope::{Completion, Outcome};

/// Terminal disposition of one performed effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectState {
    /// Waiting for a handler decision
    Pending,
    /// A handler resolved it via [`Resume::resume`]
    Resolved,
    /// The handler chain finished, or failed, without resolving it
    Unhandled,
}

struct ResumeSlot {
    state: EffectState,
    performer: Option<oneshot::Sender<Outcome>>,
}

struct ResumeInner {
    effect: String,
    slot: Mutex<ResumeSlot>,
    completion: Completion,
}

/// One-shot resumption bound to a single performed effect.
///
/// Cloning shares the underlying effect: resolving through any clone
/// resolves them all. Each performed effect transitions exactly once, from
/// [`EffectState::Pending`] to either [`EffectState::Resolved`] or
/// [`EffectState::Unhandled`].
#[derive(Clone)]
pub struct Resume {
    inner: Arc<ResumeInner>,
}

impl Resume {
    pub(crate) fn new(
        effect: impl Into<String>,
        performer: oneshot::Sender<Outcome>,
        completion: Completion,
    ) -> Self {
        Self {
            inner: Arc::new(ResumeInner {
                effect: effect.into(),
                slot: Mutex::new(ResumeSlot {
                    state: EffectState::Pending,
                    performer: Some(performer),
                }),
                completion,
            }),
        }
    }

    /// Current state of the performed effect
    pub fn state(&self) -> EffectState {
        self.inner.slot.lock().state
    }

    /// Whether a handler has already resolved this effect
    pub fn is_resolved(&self) -> bool {
        self.state() == EffectState::Resolved
    }

    /// Resolve the effect with `value`, unblocking the suspended performer.
    ///
    /// Returns the scope's [`Completion`]; awaiting it suspends the handler
    /// until the wrapped computation settles, so post-resume logic can
    /// observe the final outcome. Only the first call transitions the
    /// effect; later calls are no-ops that still hand back the completion.
    pub fn resume(&self, value: Value) -> Completion {
        self.settle(EffectState::Resolved, Ok(value));
        self.inner.completion.clone()
    }

    /// Resolve the effect with no value, `Value::Null`
    pub fn resume_unit(&self) -> Completion {
        self.resume(Value::Null)
    }

    /// Terminate the effect without a value.
    pub(crate) fn fail(&self, error: EffectError) {
        self.settle(EffectState::Unhandled, Err(error));
    }

    fn settle(&self, state: EffectState, outcome: Outcome) {
        let performer = {
            let mut slot = self.inner.slot.lock();
            if slot.state != EffectState::Pending {
                tracing::trace!(
                    effect = %self.inner.effect,
                    state = ?slot.state,
                    "ignoring repeated resume"
                );
                return;
            }
            slot.state = state;
            slot.performer.take()
        };
        if let Some(performer) = performer {
            // A send error means the performer was cancelled; the handler
            // may still await the completion.
            let _ = performer.send(outcome);
        }
    }
}

impl fmt::Debug for Resume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resume")
            .field("effect", &self.inner.effect)
            .field("state", &self.state())
            .finish()
    }
}

/// Perform a named effect inside a `handle`-wrapped computation.
///
/// Suspends until the ambient handler chain resolves the effect and yields
/// the value the handler resumed with. Fails with
/// [`EffectError::NoActiveScope`] outside any `handle`, and with
/// [`EffectError::Unhandled`] when the chain finishes without resuming.
///
/// The [`perform!`](crate::perform!) macro converts plain Rust arguments
/// into the `Vec<Value>` this function takes.
pub async fn perform(name: impl Into<String>, args: Vec<Value>) -> Result<Value, EffectError> {
    let name = name.into();
    let Some(scope) = context::current_scope() else {
        tracing::debug!(effect = %name, "perform called outside any effect scope");
        return Err(EffectError::NoActiveScope);
    };

    let call = EffectCall::new(name, args);
    let (performer, performed) = oneshot::channel();
    let resume = Resume::new(call.name(), performer, scope.completion());

    tracing::trace!(scope = %scope.id(), effect = %call.name(), "dispatching effect");

    let dispatch = {
        let resume = resume.clone();
        let scope = Arc::clone(&scope);
        async move {
            match handler::dispatch(scope.chain(), resume.clone(), call.clone()).await {
                Ok(()) => {
                    if !resume.is_resolved() {
                        resume.fail(EffectError::unhandled(call.name()));
                    }
                }
                Err(error) => {
                    if resume.is_resolved() {
                        tracing::warn!(
                            effect = %call.name(),
                            %error,
                            "handler failed after resuming"
                        );
                    } else {
                        resume.fail(error);
                    }
                }
            }
        }
    };

    // The chain runs on its own task so the computation continues as soon
    // as a handler resumes, while the handler finishes any post-resume
    // work. Re-wrapping in the scope lets handlers perform effects and
    // install nested handles of their own.
    tokio::spawn(context::with_scope(scope, dispatch));

    match performed.await {
        Ok(outcome) => outcome,
        // The handler task died before deciding the effect.
        Err(_) => Err(EffectError::ScopeClosed),
    }
}
