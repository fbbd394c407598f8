//! Basic contract: computations resolve to their own value, and performed
//! effects round-trip through synchronous and asynchronous handlers.

use std::time::Duration;

use ambit_effects::{handle, json, perform, EffectError, Handlers, Value};
use ambit_testkit::static_handlers;

#[tokio::test]
async fn effectless_computation_resolves_to_its_own_value() {
    ambit_testkit::init_tracing();

    let result = handle(async { Ok(json!("foo")) }, Handlers::new()).await;

    assert_eq!(result, Ok(json!("foo")));
}

#[tokio::test]
async fn typed_results_pass_through_unchanged() {
    let result = handle(async { Ok(vec![1_u64, 2, 3]) }, Handlers::new()).await;

    assert_eq!(result, Ok(vec![1, 2, 3]));
}

#[tokio::test]
async fn performs_the_simplest_tasks() {
    let result = handle(
        async {
            let number = perform!("get_two").await?;
            perform!("add_two", number).await
        },
        Handlers::new()
            .value("get_two", json!(2))
            .on("add_two", |args| async move {
                let n = args.first().and_then(Value::as_i64).unwrap_or(0);
                Ok(json!(n + 2))
            }),
    )
    .await;

    assert_eq!(result, Ok(json!(4)));
}

#[tokio::test]
async fn performs_with_async_handlers() {
    let expected = json!({ "foo": "bar" });
    let user = expected.clone();

    let result = handle(
        async {
            let params = perform!("request_params").await?;
            let user_id = params["user_id"].clone();
            perform!("get_user", user_id).await
        },
        Handlers::new()
            .value("request_params", json!({ "user_id": 1000 }))
            .on("get_user", move |args| {
                let user = user.clone();
                async move {
                    let delay = args.first().and_then(Value::as_u64).unwrap_or(0);
                    tokio::time::sleep(Duration::from_millis(delay.min(50))).await;
                    Ok(user)
                }
            }),
    )
    .await;

    assert_eq!(result, Ok(expected));
}

#[tokio::test]
async fn static_handlers_resolve_constants() {
    let result = handle(
        async {
            let a = perform!("a").await?;
            let b = perform!("b").await?;
            Ok(json!([a, b]))
        },
        static_handlers([("a", json!(1)), ("b", json!("two"))]),
    )
    .await;

    assert_eq!(result, Ok(json!([1, "two"])));
}

#[tokio::test]
async fn computation_failures_reject_the_handle() {
    let result: Result<Value, EffectError> = handle(
        async { Err(EffectError::failure("broken computation")) },
        Handlers::new(),
    )
    .await;

    assert_eq!(result, Err(EffectError::failure("broken computation")));
}

mod identity_properties {
    use super::*;
    use proptest::prelude::*;

    fn run_identity(value: Value) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .expect("runtime");
        let value_in = value.clone();
        let result = runtime.block_on(handle(async move { Ok(value_in) }, Handlers::new()));
        assert_eq!(result, Ok(value));
    }

    proptest! {
        #[test]
        fn any_integer_survives_an_empty_scope(n in any::<i64>()) {
            run_identity(json!(n));
        }

        #[test]
        fn any_string_survives_an_empty_scope(s in ".*") {
            run_identity(json!(s));
        }

        #[test]
        fn any_string_round_trips_through_a_handler(s in ".*") {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .expect("runtime");
            let expected = json!(s);
            let result = runtime.block_on(handle(
                async { perform!("echo").await },
                Handlers::new().value("echo", expected.clone()),
            ));
            prop_assert_eq!(result, Ok(expected));
        }
    }
}
