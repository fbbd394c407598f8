//! Effect scope establishment
//!
//! [`handle`] wraps a computation in a fresh effect scope: the supplied
//! handler gets first refusal on every effect the computation performs, and
//! anything it leaves unresolved falls through to enclosing scopes.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::context;
use crate::error::EffectError;
use crate::handler::IntoHandler;
use crate::scope::{Completion, Scope};

/// Run `computation` inside a fresh effect scope.
///
/// `spec` is either a [`Handlers`](crate::Handlers) registry or a generic
/// handler built with [`EffectHandler::from_fn`](crate::EffectHandler::from_fn).
/// Nested `handle` calls compose: the new handler is tried first and
/// unresolved effects fall through to the enclosing scope.
///
/// Resolves with the computation's own outcome. The computation's failure,
/// or an unresolved effect surfacing inside it, rejects the returned future
/// unless the computation catches it first.
///
/// ```
/// use ambit_effects::{handle, perform, EffectError, Handlers, json};
///
/// # async fn demo() -> Result<(), EffectError> {
/// let greeting = handle(
///     async {
///         let name = perform("ask_name", Vec::new()).await?;
///         Ok(format!("hello, {}", name.as_str().unwrap_or("stranger")))
///     },
///     Handlers::new().value("ask_name", json!("Arya")),
/// )
/// .await?;
/// assert_eq!(greeting, "hello, Arya");
/// # Ok(())
/// # }
/// ```
pub async fn handle<T, F, H>(computation: F, spec: H) -> Result<T, EffectError>
where
    T: Serialize,
    F: Future<Output = Result<T, EffectError>>,
    H: IntoHandler,
{
    let unit = Arc::new(spec.into_handler());

    // Nested handles put the new handler in front of the enclosing chain,
    // so inner scopes get first refusal and unresolved effects fall
    // through outward.
    let chain = match context::current_scope() {
        Some(outer) => {
            let mut chain = Vec::with_capacity(outer.chain().len() + 1);
            chain.push(unit);
            chain.extend(outer.chain().iter().cloned());
            chain
        }
        None => vec![unit],
    };

    let (settle, completion) = Completion::channel();
    let scope = Arc::new(Scope::new(chain, completion));
    let id = scope.id();

    tracing::debug!(scope = %id, "entering effect scope");
    let outcome = context::with_scope(scope, computation).await;

    // Settle the completion with the same outcome before returning it, so
    // handlers awaiting a resume see the result no later than our caller.
    match &outcome {
        Ok(value) => {
            let settled = serde_json::to_value(value).unwrap_or_else(|error| {
                tracing::warn!(
                    scope = %id,
                    %error,
                    "result not representable for completion observers"
                );
                Value::Null
            });
            let _ = settle.send(Ok(settled));
            tracing::debug!(scope = %id, "effect scope settled");
        }
        Err(error) => {
            let _ = settle.send(Err(error.clone()));
            tracing::debug!(scope = %id, %error, "effect scope failed");
        }
    }

    outcome
}
