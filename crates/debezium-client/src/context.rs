use crate::error::TransportError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Per-call deadline and cancellation, passed into every client operation.
///
/// A context with neither set never interrupts the call; the transport's own
/// request timeout still applies.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancellation: Option<CancellationToken>,
}

impl CallContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().timeout(timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self::background().deadline(deadline)
    }

    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self::background().cancel_on(token)
    }

    /// Tighten the deadline to at most `timeout` from now.
    pub fn timeout(self, timeout: Duration) -> Self {
        self.deadline(Instant::now() + timeout)
    }

    /// Tighten the deadline. An earlier existing deadline is kept.
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancellation_token(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Drive `fut` to completion unless the deadline passes or the token
    /// fires first. Cancellation wins over a result that is ready at the same
    /// time.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, TransportError>
    where
        F: Future<Output = Result<T, TransportError>>,
    {
        if self.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        if self.is_expired() {
            return Err(TransportError::Timeout);
        }

        let bounded = async {
            match self.deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, fut)
                    .await
                    .map_err(|_| TransportError::Timeout)?,
                None => fut.await,
            }
        };

        match &self.cancellation {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(TransportError::Cancelled),
                    result = bounded => result,
                }
            }
            None => bounded.await,
        }
    }
}
