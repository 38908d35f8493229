use async_trait::async_trait;

use crate::{
    config::RetryPolicy,
    error::{BgSwapError, Result},
    gemini::batch::ImageGenerator,
    models::{BackgroundEditRequest, GeneratedImage},
};

/// Retry layer over any generator. Only remote-call failures are retried;
/// an empty result is a final answer and validation errors are not
/// recoverable by repeating the call.
pub struct Retrying<G> {
    inner: G,
    policy: RetryPolicy,
}

impl<G> Retrying<G> {
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<G: ImageGenerator> ImageGenerator for Retrying<G> {
    async fn generate(&self, request: &BackgroundEditRequest) -> Result<Option<GeneratedImage>> {
        let mut attempt = 1;
        loop {
            match self.inner.generate(request).await {
                Err(BgSwapError::GenerationError(msg)) if attempt < self.policy.max_attempts => {
                    log::warn!(
                        "Generation attempt {}/{} failed, retrying: {}",
                        attempt,
                        self.policy.max_attempts,
                        msg
                    );
                    tokio::time::sleep(self.policy.backoff).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenerativePart;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FlakyGenerator {
        calls: AtomicUsize,
        succeed_on: usize,
        empty: bool,
    }

    #[async_trait]
    impl ImageGenerator for FlakyGenerator {
        async fn generate(
            &self,
            _request: &BackgroundEditRequest,
        ) -> Result<Option<GeneratedImage>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.empty {
                return Ok(None);
            }
            if call < self.succeed_on {
                return Err(BgSwapError::GenerationError("transient".into()));
            }
            Ok(Some(GeneratedImage {
                mime_type: "image/png".to_string(),
                data: "QUJD".to_string(),
            }))
        }
    }

    fn request() -> BackgroundEditRequest {
        BackgroundEditRequest::new(GenerativePart::inline("image/png", "QUJD"))
            .with_prompt("a lake")
    }

    fn policy(attempts: u32) -> RetryPolicy {
        RetryPolicy::new()
            .with_max_attempts(attempts)
            .with_backoff(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn transient_failures_are_retried_up_to_the_limit() {
        let generator = Retrying::new(
            FlakyGenerator {
                calls: AtomicUsize::new(0),
                succeed_on: 3,
                empty: false,
            },
            policy(3),
        );

        let result = generator.generate(&request()).await.unwrap();
        assert!(result.is_some());
        assert_eq!(generator.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_attempts_surface_the_last_error() {
        let generator = Retrying::new(
            FlakyGenerator {
                calls: AtomicUsize::new(0),
                succeed_on: 10,
                empty: false,
            },
            policy(2),
        );

        let result = generator.generate(&request()).await;
        assert!(matches!(result, Err(BgSwapError::GenerationError(_))));
        assert_eq!(generator.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_results_are_never_retried() {
        let generator = Retrying::new(
            FlakyGenerator {
                calls: AtomicUsize::new(0),
                succeed_on: 1,
                empty: true,
            },
            policy(5),
        );

        let result = generator.generate(&request()).await.unwrap();
        assert!(result.is_none());
        assert_eq!(generator.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn default_policy_makes_a_single_attempt() {
        let generator = Retrying::new(
            FlakyGenerator {
                calls: AtomicUsize::new(0),
                succeed_on: 2,
                empty: false,
            },
            RetryPolicy::default(),
        );

        let result = generator.generate(&request()).await;
        assert!(result.is_err());
        assert_eq!(generator.inner.calls.load(Ordering::SeqCst), 1);
    }
}
