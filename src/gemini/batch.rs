use async_trait::async_trait;
use tokio::sync::watch;

use crate::{
    error::Result,
    models::{BackgroundEditRequest, BatchOutcome, GeneratedImage},
};

/// Upper bound on the fan-out size. The UI exposes 1-4 attempts; anything
/// outside that range is clamped rather than rejected.
pub const MAX_BATCH_SIZE: usize = 4;

/// Seam between the batch driver and the remote model, so tests can swap in
/// a scripted generator.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: &BackgroundEditRequest) -> Result<Option<GeneratedImage>>;
}

/// Create a linked cancellation pair for one batch. Dropping the handle
/// without cancelling leaves the batch running to completion.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                // Handle dropped without cancelling: this batch can no
                // longer be cancelled.
                futures::future::pending::<()>().await;
            }
        }
    }
}

/// Issue `count` independent generation calls concurrently and wait for all
/// of them to settle. One failing call never cancels its siblings; images
/// are collected in issue order. Cancelling the batch abandons every
/// in-flight call and returns an outcome marked cancelled, so stale results
/// are never applied.
pub async fn generate_batch<G: ImageGenerator>(
    generator: &G,
    request: &BackgroundEditRequest,
    count: usize,
    token: &CancelToken,
) -> BatchOutcome {
    let attempts = count.clamp(1, MAX_BATCH_SIZE);
    if attempts != count {
        log::warn!(
            "Requested batch size {} is out of range, clamping to {}",
            count,
            attempts
        );
    }

    if token.is_cancelled() {
        return BatchOutcome {
            cancelled: true,
            ..BatchOutcome::default()
        };
    }

    log::info!("Dispatching generation batch of {}", attempts);

    let calls = (0..attempts).map(|_| generator.generate(request));
    let settled = futures::future::join_all(calls);

    let results = tokio::select! {
        results = settled => results,
        _ = token.cancelled() => {
            log::info!("Generation batch cancelled, discarding in-flight calls");
            return BatchOutcome {
                cancelled: true,
                ..BatchOutcome::default()
            };
        }
    };

    let mut outcome = BatchOutcome::default();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(Some(image)) => outcome.images.push(image),
            Ok(None) => {
                log::warn!("Generation call {} returned no image", index);
                outcome.empty += 1;
            }
            Err(e) => {
                log::error!("Generation call {} failed: {}", index, e);
                outcome.failed += 1;
            }
        }
    }

    log::info!(
        "Batch settled: {} image(s), {} empty, {} failed",
        outcome.images.len(),
        outcome.empty,
        outcome.failed
    );

    outcome
}
