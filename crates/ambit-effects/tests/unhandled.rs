//! Failure surfacing: unresolved effects, performs outside any scope, and
//! handlers that fail instead of deciding.

use ambit_effects::{handle, json, perform, EffectError, Handlers, Value};
use ambit_testkit::{failing_handler, ignoring_handler, static_handlers, RecordingHandler};

#[tokio::test]
async fn unresolved_effects_identify_themselves() {
    let result: Result<Value, EffectError> =
        handle(async { perform!("x").await }, Handlers::new()).await;

    assert_eq!(result, Err(EffectError::unhandled("x")));
}

#[tokio::test]
async fn handlers_that_ignore_everything_leave_effects_unhandled() {
    let result: Result<Value, EffectError> =
        handle(async { perform!("ping").await }, ignoring_handler()).await;

    assert_eq!(result, Err(EffectError::unhandled("ping")));
}

#[tokio::test]
async fn perform_outside_any_scope_is_refused() {
    let result = perform!("x").await;

    assert_eq!(result, Err(EffectError::NoActiveScope));
}

#[tokio::test]
async fn handler_failures_become_the_performs_failure() {
    let result: Result<Value, EffectError> = handle(
        async { perform!("anything").await },
        failing_handler("backend offline"),
    )
    .await;

    assert_eq!(result, Err(EffectError::failure("backend offline")));
}

#[tokio::test]
async fn computations_may_catch_unhandled_effects() {
    let result = handle(
        async {
            match perform!("optional").await {
                Ok(value) => Ok(value),
                Err(EffectError::Unhandled { .. }) => Ok(json!("fallback")),
                Err(other) => Err(other),
            }
        },
        Handlers::new(),
    )
    .await;

    assert_eq!(result, Ok(json!("fallback")));
}

#[tokio::test]
async fn recorded_effects_show_what_was_asked_for() {
    let recorder = RecordingHandler::new(static_handlers([("known", json!(1))]));
    let observer = recorder.clone();

    let result: Result<Value, EffectError> = handle(
        async {
            perform!("known").await?;
            perform!("unknown", "why").await
        },
        recorder,
    )
    .await;

    assert_eq!(result, Err(EffectError::unhandled("unknown")));
    assert_eq!(
        observer.names(),
        vec!["known".to_string(), "unknown".to_string()]
    );
    assert_eq!(observer.records()[1].args, vec![json!("why")]);
}
