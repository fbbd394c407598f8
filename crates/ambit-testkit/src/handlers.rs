//! Canned handlers for exercising the effect contract

use ambit_effects::{EffectError, EffectHandler, Handlers, Value};

/// Registry resolving each listed effect with a constant value
pub fn static_handlers<I, N>(entries: I) -> Handlers
where
    I: IntoIterator<Item = (N, Value)>,
    N: Into<String>,
{
    entries
        .into_iter()
        .fold(Handlers::new(), |handlers, (name, value)| {
            handlers.value(name, value)
        })
}

/// Handler that never resumes, so every effect surfaces as unhandled
pub fn ignoring_handler() -> EffectHandler {
    EffectHandler::from_fn(|_resume, _call| async { Ok(()) })
}

/// Handler that fails every effect with the given message
pub fn failing_handler(message: impl Into<String>) -> EffectHandler {
    let message = message.into();
    EffectHandler::from_fn(move |_resume, _call| {
        let message = message.clone();
        async move { Err(EffectError::failure(message)) }
    })
}
