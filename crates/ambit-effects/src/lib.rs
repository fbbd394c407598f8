//! Ambit - resumable algebraic effects for async Rust
//!
//! Computations [`perform`] named effects and suspend; dynamically scoped
//! handlers installed with [`handle`] intercept each effect and decide its
//! result through a one-shot [`Resume`], possibly after further
//! asynchronous work. Effectful operations (I/O, randomness, external
//! calls) stay decoupled from the logic that uses them, and callers can
//! substitute alternate handlers, such as mocks in tests, around unmodified
//! computations.
//!
//! # Model
//!
//! - [`handle`] establishes a scope: a handler plus a [`Completion`] future
//!   that settles with the wrapped computation's outcome. Nested scopes
//!   compose; inner handlers get first refusal and unresolved effects fall
//!   through outward.
//! - [`perform`] delivers a named, parameterized effect to the ambient
//!   scope's handler chain and suspends until a handler resumes it.
//! - [`Resume`] resolves exactly one performed effect and hands the handler
//!   the scope's [`Completion`], so post-resume logic can observe whether
//!   the computation ultimately succeeded or failed.
//!
//! Scope propagation rides on Tokio's task-local storage: the binding
//! covers the wrapped future and everything it awaits, and concurrently
//! running scopes never observe each other.
//!
//! # Example
//!
//! ```
//! use ambit_effects::{handle, perform, EffectError, Handlers, Value, json};
//!
//! async fn visible_name(name: Option<&str>) -> Result<Value, EffectError> {
//!     match name {
//!         Some(name) => Ok(json!(name)),
//!         None => perform("ask_name", Vec::new()).await,
//!     }
//! }
//!
//! # async fn demo() -> Result<(), EffectError> {
//! let name = handle(
//!     visible_name(None),
//!     Handlers::new().value("ask_name", json!("Gendry")),
//! )
//! .await?;
//! assert_eq!(name, json!("Gendry"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod context;
mod error;
mod handle;
mod handler;
mod perform;
mod scope;

pub use error::EffectError;
pub use handle::handle;
pub use handler::{DynamicHandler, EffectCall, EffectHandler, Handlers, IntoHandler};
pub use perform::{perform, EffectState, Resume};
pub use scope::{Completion, Outcome, ScopeId};

// Effect payloads are plain JSON values; re-exported so callers need no
// direct serde_json dependency.
pub use serde_json::{json, Value};

/// Perform a named effect with plain Rust arguments.
///
/// Converts each argument through [`json!`] and calls [`perform`]:
///
/// ```
/// use ambit_effects::{handle, perform, EffectError, Handlers, Value, json};
///
/// # async fn demo() -> Result<(), EffectError> {
/// let sum = handle(
///     async {
///         let n = perform!("get_two").await?;
///         perform!("add_two", n).await
///     },
///     Handlers::new().value("get_two", json!(2)).on("add_two", |args| async move {
///         Ok(json!(args.first().and_then(Value::as_i64).unwrap_or(0) + 2))
///     }),
/// )
/// .await?;
/// assert_eq!(sum, json!(4));
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! perform {
    ($name:expr $(, $arg:expr)* $(,)?) => {
        $crate::perform($name, ::std::vec![$($crate::json!($arg)),*])
    };
}
