//! Evaluation callback with bounded retry

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use hosting_models::EvaluationPayload;
use tracing::{error, info, info_span, warn, Instrument};

use crate::errors::DeployError;
use crate::http::evaluation::EvaluationTransport;
use crate::models::deployment::{notification_payload, DeployResult};
use crate::models::request::DeployRequest;
use crate::utils::{calc_exp_backoff, CooldownOptions};

/// Notifier options
#[derive(Debug, Clone)]
pub struct NotifierOptions {
    /// Total POSTs before giving up, first one included
    pub max_attempts: u32,

    /// Delay schedule between attempts
    pub cooldown: CooldownOptions,
}

impl Default for NotifierOptions {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            cooldown: CooldownOptions::default(),
        }
    }
}

/// POST `payload` to `url` until it answers 200 or the attempts run out.
///
/// Transport errors and non-200 statuses are treated alike. After attempt
/// `n` fails the delay is `calc_exp_backoff(n)`; no delay follows the last
/// attempt. Returns the number of attempts used.
pub async fn deliver<S, F>(
    options: &NotifierOptions,
    transport: &dyn EvaluationTransport,
    url: &str,
    payload: &EvaluationPayload,
    sleep_fn: S,
) -> Result<u32, DeployError>
where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    let mut last_error = "no attempts made".to_string();

    for attempt in 0..options.max_attempts {
        match transport.post(url, payload).await {
            Ok(200) => {
                info!("Evaluation accepted on attempt {}", attempt + 1);
                return Ok(attempt + 1);
            }
            Ok(status) => {
                last_error = format!("evaluator answered {}", status);
            }
            Err(e) => {
                last_error = e.to_string();
            }
        }

        if attempt + 1 < options.max_attempts {
            let delay = calc_exp_backoff(&options.cooldown, attempt);
            warn!(
                "Evaluation attempt {}/{} failed ({}), retrying in {:?}",
                attempt + 1,
                options.max_attempts,
                last_error,
                delay
            );
            sleep_fn(delay).await;
        }
    }

    error!(
        "Giving up on evaluation after {} attempts: {}",
        options.max_attempts, last_error
    );
    Err(DeployError::DeliveryExhausted {
        attempts: options.max_attempts,
        last_error,
    })
}

/// Reports deploy results to the evaluator named in each request
pub struct Notifier {
    transport: Arc<dyn EvaluationTransport>,
    options: NotifierOptions,
}

impl Notifier {
    pub fn new(transport: Arc<dyn EvaluationTransport>, options: NotifierOptions) -> Self {
        Self { transport, options }
    }

    /// Deliver the result of `request`, sleeping for real between attempts
    pub async fn notify(
        &self,
        request: &DeployRequest,
        result: &DeployResult,
    ) -> Result<u32, DeployError> {
        self.notify_with(request, result, tokio::time::sleep).await
    }

    /// Same as [`Notifier::notify`] with a caller supplied sleep
    pub async fn notify_with<S, F>(
        &self,
        request: &DeployRequest,
        result: &DeployResult,
        sleep_fn: S,
    ) -> Result<u32, DeployError>
    where
        S: Fn(Duration) -> F,
        F: Future<Output = ()>,
    {
        let payload = notification_payload(request, result);
        let span = info_span!("notify", task = %request.task, round = request.round);

        deliver(
            &self.options,
            self.transport.as_ref(),
            &request.evaluation_url,
            &payload,
            sleep_fn,
        )
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedTransport, SleepRecorder};

    fn payload() -> EvaluationPayload {
        EvaluationPayload {
            email: "student@example.com".to_string(),
            task: "demo".to_string(),
            round: 1,
            nonce: "n".to_string(),
            repo_url: "https://github.com/octocat/demo".to_string(),
            commit_sha: "main".to_string(),
            pages_url: "https://octocat.github.io/demo/".to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_attempt_success_does_not_sleep() {
        let transport = ScriptedTransport::new(vec![Ok(200)], Ok(500));
        let sleeper = SleepRecorder::new();

        let attempts = deliver(
            &NotifierOptions::default(),
            &transport,
            "https://eval.example.com",
            &payload(),
            |d| sleeper.sleep(d),
        )
        .await
        .unwrap();

        assert_eq!(attempts, 1);
        assert!(sleeper.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_non_200_success_codes_are_retried() {
        let transport = ScriptedTransport::new(vec![Ok(201), Ok(204)], Ok(200));
        let sleeper = SleepRecorder::new();

        let attempts = deliver(
            &NotifierOptions::default(),
            &transport,
            "https://eval.example.com",
            &payload(),
            |d| sleeper.sleep(d),
        )
        .await
        .unwrap();

        assert_eq!(attempts, 3);
        assert_eq!(
            sleeper.recorded(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn test_zero_attempts_gives_up_immediately() {
        let transport = ScriptedTransport::always_failing();
        let options = NotifierOptions {
            max_attempts: 0,
            ..Default::default()
        };

        let err = deliver(&options, &transport, "u", &payload(), |_| async {})
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::DeliveryExhausted { attempts: 0, .. }));
        assert_eq!(transport.call_count(), 0);
    }
}
