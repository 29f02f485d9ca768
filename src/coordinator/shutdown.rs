//! Shutdown Coordinator
//!
//! Owns the join handles of the gate and worker tasks. Cancelling the shared token
//! wakes every wait inside both loops at once; `shutdown` then joins them, aborting
//! whatever is still running once the grace period is over.

use std::time::Duration;
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("coordinator tasks did not stop within {0:?}")]
    Timeout(Duration),
    #[error("coordinator task failed: {0}")]
    Join(#[from] JoinError),
}

pub struct ShutdownCoordinator {
    token: CancellationToken,
    gate: JoinHandle<()>,
    worker: JoinHandle<()>,
}

impl ShutdownCoordinator {
    pub(super) fn new(token: CancellationToken, gate: JoinHandle<()>, worker: JoinHandle<()>) -> Self {
        Self {
            token,
            gate,
            worker,
        }
    }

    /// A clone of the shutdown token, e.g. for the HTTP server's graceful shutdown.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Sets the shutdown signal and waits up to `grace` for both loops to exit.
    pub async fn shutdown(self, grace: Duration) -> Result<(), ShutdownError> {
        tracing::info!("Stopping rebuild coordinator");
        self.token.cancel();

        let mut gate = self.gate;
        let mut worker = self.worker;

        let joined = tokio::time::timeout(grace, async {
            (&mut gate).await?;
            (&mut worker).await?;
            Ok::<(), JoinError>(())
        })
        .await;

        match joined {
            Ok(Ok(())) => {
                tracing::info!("Rebuild coordinator stopped");
                Ok(())
            }
            Ok(Err(e)) => {
                gate.abort();
                worker.abort();
                Err(ShutdownError::Join(e))
            }
            Err(_) => {
                tracing::warn!("Coordinator tasks still running after {:?}, aborting", grace);
                gate.abort();
                worker.abort();
                Err(ShutdownError::Timeout(grace))
            }
        }
    }
}
