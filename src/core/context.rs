//! Per-call deadline and cancellation
//!
//! Every repository and audit operation takes an [`OperationContext`]. The
//! context carries an optional deadline and an optional shutdown receiver
//! (the same `watch` channel `main` flips on Ctrl+C / SIGTERM). Futures run
//! through [`OperationContext::run`] resolve to [`StoreFault::Timeout`] or
//! [`StoreFault::Cancelled`] instead of blocking past either signal.

use crate::domain::StoreFault;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Deadline and shutdown signal for a single operation
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    deadline: Option<Instant>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl OperationContext {
    /// Context with no deadline and no shutdown signal
    pub fn background() -> Self {
        Self::default()
    }

    /// Context that expires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            shutdown: None,
        }
    }

    /// Replaces the deadline
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Attaches a shutdown receiver; a `true` value cancels the operation
    pub fn shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Time left before the deadline, `None` when unbounded
    ///
    /// Saturates at zero once the deadline has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Whether shutdown has already been signalled
    pub fn is_cancelled(&self) -> bool {
        self.shutdown.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    /// Drives `fut` to completion unless the deadline passes or shutdown is
    /// signalled first
    ///
    /// A context that is already cancelled or expired fails without polling
    /// `fut` at all.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, StoreFault>
    where
        F: Future<Output = Result<T, StoreFault>>,
    {
        if self.is_cancelled() {
            return Err(StoreFault::Cancelled);
        }
        if self.remaining() == Some(Duration::ZERO) {
            return Err(StoreFault::Timeout("deadline already elapsed".to_string()));
        }

        let shutdown = self.shutdown.clone();
        let cancelled = async move {
            match shutdown {
                Some(mut rx) => loop {
                    if rx.changed().await.is_err() {
                        // Sender gone: shutdown can no longer be signalled.
                        std::future::pending::<()>().await;
                    }
                    if *rx.borrow() {
                        break;
                    }
                },
                None => std::future::pending::<()>().await,
            }
        };

        let deadline = self.deadline;
        let expired = async move {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Err(StoreFault::Cancelled),
            _ = expired => Err(StoreFault::Timeout(format!(
                "deadline elapsed after {:?}",
                deadline.map(|d| d.elapsed()).unwrap_or_default()
            ))),
            result = fut => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_background_runs_to_completion() {
        let ctx = OperationContext::background();
        let result = ctx.run(async { Ok::<_, StoreFault>(7) }).await;
        assert_eq!(result, Ok(7));
        assert!(ctx.remaining().is_none());
    }

    #[tokio::test]
    async fn test_inner_fault_passes_through() {
        let ctx = OperationContext::with_timeout(Duration::from_secs(5));
        let result: Result<(), _> = ctx
            .run(async { Err(StoreFault::Network("refused".to_string())) })
            .await;
        assert_eq!(result, Err(StoreFault::Network("refused".to_string())));
    }

    #[tokio::test]
    async fn test_deadline_elapses() {
        let ctx = OperationContext::with_timeout(Duration::from_millis(50));
        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok::<_, StoreFault>(())
            })
            .await;
        assert!(matches!(result, Err(StoreFault::Timeout(_))));
    }

    #[tokio::test]
    async fn test_expired_context_fails_fast() {
        let ctx = OperationContext::background().deadline(Instant::now());
        let result = ctx.run(async { Ok::<_, StoreFault>(1) }).await;
        assert!(matches!(result, Err(StoreFault::Timeout(_))));
    }

    #[tokio::test]
    async fn test_shutdown_cancels_in_flight_operation() {
        let (tx, rx) = watch::channel(false);
        let ctx = OperationContext::background().shutdown(rx);

        let handle = tokio::spawn(async move {
            ctx.run(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, StoreFault>(())
            })
            .await
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        tx.send(true).unwrap();

        let result = handle.await.unwrap();
        assert_eq!(result, Err(StoreFault::Cancelled));
    }

    #[tokio::test]
    async fn test_already_cancelled() {
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let ctx = OperationContext::background().shutdown(rx);
        assert!(ctx.is_cancelled());
        let result = ctx.run(async { Ok::<_, StoreFault>(()) }).await;
        assert_eq!(result, Err(StoreFault::Cancelled));
    }

    #[tokio::test]
    async fn test_dropped_sender_does_not_cancel() {
        let (tx, rx) = watch::channel(false);
        drop(tx);
        let ctx = OperationContext::background().shutdown(rx);
        let result = ctx.run(async { Ok::<_, StoreFault>(3) }).await;
        assert_eq!(result, Ok(3));
    }
}
