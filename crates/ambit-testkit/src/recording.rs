//! Recording handler for effect assertions

use std::sync::Arc;

use ambit_effects::{
    DynamicHandler, EffectCall, EffectError, EffectHandler, EffectState, IntoHandler, Resume,
    Value,
};
use async_trait::async_trait;
use parking_lot::Mutex;

/// One captured effect performance
#[derive(Debug, Clone)]
pub struct RecordedEffect {
    /// Name of the performed effect
    pub name: String,
    /// Arguments the performer supplied
    pub args: Vec<Value>,
    /// Effect state as the wrapped handler left it; `Pending` means the
    /// effect fell through this handler
    pub state: EffectState,
}

/// Handler wrapper that records every performed effect.
///
/// Delegates each effect to the wrapped handler spec and captures the call
/// alongside the state the wrapped handler left it in. Clones share the
/// same records, so tests keep one clone and pass the other to `handle`.
/// A record becomes visible once the wrapped handler finishes deciding the
/// effect, so a handler that suspends on post-resume work delays its
/// record.
///
/// ```
/// use ambit_effects::{handle, perform, EffectError, Handlers, json};
/// use ambit_testkit::RecordingHandler;
///
/// # async fn demo() -> Result<(), EffectError> {
/// let recorder = RecordingHandler::new(Handlers::new().value("two", json!(2)));
/// let observer = recorder.clone();
///
/// handle(async { perform("two", Vec::new()).await }, recorder).await?;
///
/// assert_eq!(observer.names(), vec!["two".to_string()]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RecordingHandler {
    inner: Arc<EffectHandler>,
    records: Arc<Mutex<Vec<RecordedEffect>>>,
}

impl RecordingHandler {
    /// Record effects around `inner`
    pub fn new(inner: impl IntoHandler) -> Self {
        Self {
            inner: Arc::new(inner.into_handler()),
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Record effects without handling any of them
    pub fn observing() -> Self {
        Self::new(EffectHandler::from_fn(|_resume, _call| async { Ok(()) }))
    }

    /// All captured effects, in performance order
    pub fn records(&self) -> Vec<RecordedEffect> {
        self.records.lock().clone()
    }

    /// Names of the captured effects, in performance order
    pub fn names(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.name.clone()).collect()
    }

    /// Number of captured effects
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether nothing was performed
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl DynamicHandler for RecordingHandler {
    async fn on_effect(&self, resume: Resume, call: EffectCall) -> Result<(), EffectError> {
        let result = self.inner.invoke(resume.clone(), &call).await;
        self.records.lock().push(RecordedEffect {
            name: call.name().to_string(),
            args: call.args().to_vec(),
            state: resume.state(),
        });
        result
    }
}

impl IntoHandler for RecordingHandler {
    fn into_handler(self) -> EffectHandler {
        EffectHandler::Generic(Arc::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ambit_effects::{handle, perform, json, Handlers};

    #[tokio::test]
    async fn records_resolved_effects_with_arguments() {
        let recorder = RecordingHandler::new(Handlers::new().value("greet", json!("hi")));
        let observer = recorder.clone();

        let result = handle(
            async { perform("greet", vec![json!("Bran")]).await },
            recorder,
        )
        .await;

        assert_eq!(result, Ok(json!("hi")));
        let records = observer.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "greet");
        assert_eq!(records[0].args, vec![json!("Bran")]);
        assert_eq!(records[0].state, EffectState::Resolved);
    }

    #[tokio::test]
    async fn observing_recorder_leaves_effects_pending() {
        let observer = RecordingHandler::observing();
        let recorder = observer.clone();

        let result = handle(async { perform("lost", Vec::new()).await }, recorder).await;

        assert_eq!(result, Err(EffectError::unhandled("lost")));
        assert_eq!(observer.records()[0].state, EffectState::Pending);
    }

    #[tokio::test]
    async fn empty_until_something_is_performed() {
        let observer = RecordingHandler::observing();
        assert!(observer.is_empty());
        assert_eq!(observer.len(), 0);
    }
}
