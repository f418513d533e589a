//! Parallel fan-out over independent turns.
//!
//! Generalizes the thread-pool pattern of running one agent per subtask:
//! each input gets its own future (and, typically, its own session and
//! accumulator), failures stay isolated per input, and results come back in
//! the original input order regardless of completion order.

use tokio::task::JoinSet;

use crate::error::StackError;

/// Run one future per input concurrently and collect results in input order.
///
/// Each future runs on its own tokio task. A panic or cancellation in one
/// task yields [`StackError::Task`] for that input only; the other inputs
/// are unaffected.
pub async fn fan_out<I, T, F, Fut>(inputs: Vec<I>, run: F) -> Vec<(I, Result<T, StackError>)>
where
    I: Clone + Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T, StackError>> + Send + 'static,
{
    let mut set = JoinSet::new();
    for (index, input) in inputs.iter().enumerate() {
        let fut = run(input.clone());
        set.spawn(async move { (index, fut.await) });
    }

    let mut slots: Vec<Option<Result<T, StackError>>> =
        (0..inputs.len()).map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        // A JoinError loses the task's index; the slot stays empty and is
        // reported below.
        if let Ok((index, result)) = joined {
            slots[index] = Some(result);
        }
    }

    inputs
        .into_iter()
        .zip(slots)
        .map(|(input, slot)| {
            let result = slot.unwrap_or_else(|| {
                Err(StackError::Task("task panicked or was cancelled".into()))
            });
            (input, result)
        })
        .collect()
}
