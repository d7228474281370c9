use crate::AsyncState;
use tokio::sync::oneshot;


pub type Outcome = Result<String, String>;

/// An operation whose outcome is delivered through the argument, so a test
/// decides when and how each invocation settles.
pub fn gated_state() -> AsyncState<oneshot::Receiver<Outcome>, String, String> {
    AsyncState::new(|gate: oneshot::Receiver<Outcome>| async move {
        gate.await.unwrap_or_else(|_| Err("gate dropped".to_string()))
    })
}

pub fn gate() -> (oneshot::Sender<Outcome>, oneshot::Receiver<Outcome>) {
    oneshot::channel()
}
