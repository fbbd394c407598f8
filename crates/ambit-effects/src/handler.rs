//! Handler shapes, normalization, and chain dispatch
//!
//! `handle` accepts two handler shapes: a name-keyed registry
//! ([`Handlers`]) and a generic handler deciding arbitrary effects (a
//! [`DynamicHandler`] implementation, usually built from a closure with
//! [`EffectHandler::from_fn`]). Both normalize once, at handle entry, into
//! the canonical [`EffectHandler`] form; nested scopes then compose
//! canonical units into an ordered chain where the first handler to resume
//! an effect wins.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;

use crate::error::EffectError;
use crate::perform::Resume;

/// One performed effect, as presented to handlers
#[derive(Debug, Clone)]
pub struct EffectCall {
    name: String,
    args: Vec<Value>,
}

impl EffectCall {
    pub(crate) fn new(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Name of the performed effect
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arguments the performer supplied
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Argument at `index`, or `Value::Null` when absent
    pub fn arg(&self, index: usize) -> Value {
        self.args.get(index).cloned().unwrap_or(Value::Null)
    }
}

type NamedFn = Arc<dyn Fn(Vec<Value>) -> BoxFuture<'static, Result<Value, EffectError>> + Send + Sync>;

/// Name-keyed effect handler registry.
///
/// Each registered function implements one named effect: when the effect is
/// performed, the function's result resolves it. Effects with no entry fall
/// through to the next handler in the chain (and surface as unhandled when
/// no enclosing scope implements them either).
///
/// ```
/// use ambit_effects::{json, Handlers, Value};
///
/// let handlers = Handlers::new()
///     .value("two", json!(2))
///     .on("add_two", |args| async move {
///         let n = args.first().and_then(Value::as_i64).unwrap_or(0);
///         Ok(json!(n + 2))
///     });
/// # drop(handlers);
/// ```
#[derive(Clone, Default)]
pub struct Handlers {
    entries: HashMap<String, NamedFn>,
}

impl Handlers {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an implementation for the effect `name`.
    ///
    /// The function receives the performer's arguments and its result
    /// resolves the effect. It may do arbitrary asynchronous work first.
    pub fn on<F, Fut>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, EffectError>> + Send + 'static,
    {
        self.entries
            .insert(name.into(), Arc::new(move |args| f(args).boxed()));
        self
    }

    /// Register a constant result for the effect `name`
    pub fn value(self, name: impl Into<String>, value: Value) -> Self {
        self.on(name, move |_args| {
            let value = value.clone();
            async move { Ok(value) }
        })
    }

    fn get(&self, name: &str) -> Option<&NamedFn> {
        self.entries.get(name)
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Handlers").field("effects", &names).finish()
    }
}

/// Generic effect handler: inspect the call, optionally resume it.
///
/// This is the seam for custom handler types. The handler may resolve the
/// effect with [`Resume::resume`], possibly after asynchronous work, or
/// return without resuming to let the effect fall through to the next
/// handler in the chain. For each call, resume at most once.
#[async_trait]
pub trait DynamicHandler: Send + Sync {
    /// Intercept one performed effect
    async fn on_effect(&self, resume: Resume, call: EffectCall) -> Result<(), EffectError>;
}

struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> DynamicHandler for FnHandler<F>
where
    F: Fn(Resume, EffectCall) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), EffectError>> + Send,
{
    async fn on_effect(&self, resume: Resume, call: EffectCall) -> Result<(), EffectError> {
        (self.0)(resume, call).await
    }
}

/// Canonical handler form: one of the two accepted shapes, normalized once
/// at handle entry
pub enum EffectHandler {
    /// Name-keyed registry; unknown effects fall through
    Named(Handlers),
    /// Generic handler deciding arbitrary effects
    Generic(Arc<dyn DynamicHandler>),
}

impl EffectHandler {
    /// Wrap a generic `(resume, call)` closure.
    ///
    /// ```
    /// use ambit_effects::{EffectHandler, Value};
    ///
    /// let handler = EffectHandler::from_fn(|resume, call| async move {
    ///     if call.name() == "answer" {
    ///         resume.resume(Value::from(42));
    ///     }
    ///     Ok(())
    /// });
    /// # drop(handler);
    /// ```
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(Resume, EffectCall) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), EffectError>> + Send + 'static,
    {
        Self::Generic(Arc::new(FnHandler(f)))
    }

    /// Invoke this handler unit for one performed effect.
    ///
    /// Registry units look the effect up by name, await the registered
    /// function, and resume with its value; a missing entry returns without
    /// resuming. Generic units run the wrapped handler as given.
    pub async fn invoke(&self, resume: Resume, call: &EffectCall) -> Result<(), EffectError> {
        match self {
            Self::Named(handlers) => {
                let Some(implementation) = handlers.get(call.name()) else {
                    return Ok(());
                };
                let value = implementation(call.args().to_vec()).await?;
                resume.resume(value);
                Ok(())
            }
            Self::Generic(handler) => handler.on_effect(resume, call.clone()).await,
        }
    }
}

impl fmt::Debug for EffectHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(handlers) => f.debug_tuple("Named").field(handlers).finish(),
            Self::Generic(_) => f.debug_tuple("Generic").finish(),
        }
    }
}

/// Conversion of user-facing handler shapes into the canonical form
pub trait IntoHandler {
    /// Normalize into the canonical [`EffectHandler`]
    fn into_handler(self) -> EffectHandler;
}

impl IntoHandler for EffectHandler {
    fn into_handler(self) -> EffectHandler {
        self
    }
}

impl IntoHandler for Handlers {
    fn into_handler(self) -> EffectHandler {
        EffectHandler::Named(self)
    }
}

impl IntoHandler for Arc<dyn DynamicHandler> {
    fn into_handler(self) -> EffectHandler {
        EffectHandler::Generic(self)
    }
}

/// Try each handler unit in order, awaiting each fully, until one resolves
/// the effect. Units that return without resuming fall through to the next.
pub(crate) async fn dispatch(
    chain: &[Arc<EffectHandler>],
    resume: Resume,
    call: EffectCall,
) -> Result<(), EffectError> {
    for unit in chain {
        unit.invoke(resume.clone(), &call).await?;
        if resume.is_resolved() {
            return Ok(());
        }
    }
    Ok(())
}
