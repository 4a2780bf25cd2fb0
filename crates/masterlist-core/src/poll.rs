//! Fixed-cadence refresh loop
//!
//! Runtime-agnostic: the host supplies the fetch and sleep futures. The next
//! fetch starts only after the previous one settled and the interval
//! elapsed, so at most one request is ever in flight. There is no backoff.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use crate::error::FetchError;
use crate::model::Snapshot;

/// Run fetch → apply → sleep until `apply` breaks.
pub async fn poll<F, FFut, S, SFut, A>(interval: Duration, mut fetch: F, mut sleep: S, mut apply: A)
where
    F: FnMut() -> FFut,
    FFut: Future<Output = Result<Snapshot, FetchError>>,
    S: FnMut(Duration) -> SFut,
    SFut: Future<Output = ()>,
    A: FnMut(Result<Snapshot, FetchError>) -> ControlFlow<()>,
{
    let mut cycle: u64 = 0;
    loop {
        cycle += 1;
        let result = fetch().await;
        match &result {
            Ok(snapshot) => {
                tracing::debug!("Refresh cycle {} fetched {} entries", cycle, snapshot.len())
            }
            Err(e) => tracing::warn!("Refresh cycle {} failed: {}", cycle, e),
        }

        if apply(result).is_break() {
            tracing::debug!("Refresh loop stopped after {} cycles", cycle);
            break;
        }

        sleep(interval).await;
    }
}
