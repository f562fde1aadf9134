//! Natural-language solving
//!
//! The calculator hands free text to a [`SolveAdapter`] and gets back a
//! result plus a short explanation. [`SmartSolver`] allows one request in
//! flight at a time.
//!
//! Adapters never panic past their boundary: every failure is a
//! [`SolverError`], and the calculator state is only touched on success.

mod gemini;

pub use gemini::{build_prompt, response_schema, GeminiSolver, SYSTEM_INSTRUCTION};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Message shown to the user when a solve attempt fails
pub const RETRY_MESSAGE: &str = "Failed to solve. Please try again.";

/// Result type for solver operations
pub type SolveResult<T> = Result<T, SolverError>;

/// A successful answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiResponse {
    /// The numerical or algebraic result
    pub result: String,
    /// Short step-by-step explanation
    pub explanation: String,
}

impl AiResponse {
    /// Parses and validates the two-field answer payload.
    ///
    /// Both `result` and `explanation` must be strings and `result` must not
    /// be blank.
    pub fn from_json(text: &str) -> SolveResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SolverError::EmptyResponse);
        }
        let response: Self = serde_json::from_str(text)?;
        if response.result.trim().is_empty() {
            return Err(SolverError::Malformed("result field is empty".to_string()));
        }
        Ok(response)
    }
}

/// Errors at the solver boundary
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// Nothing to solve
    #[error("prompt is empty")]
    EmptyPrompt,
    /// No API key configured
    #[error("no API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,
    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Server returned an error status
    #[error("API error {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },
    /// The model produced no text
    #[error("empty response from AI")]
    EmptyResponse,
    /// The payload did not match the expected schema
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for SolverError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

impl SolverError {
    /// Short, retry-suggesting text for the user
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        RETRY_MESSAGE
    }
}

/// Something that can answer a natural-language math prompt
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait SolveAdapter: fmt::Debug + Send + Sync {
    /// Solves `input`, returning a result and explanation
    async fn solve(&self, input: &str) -> SolveResult<AiResponse>;

    /// Human-readable adapter name for logs
    fn name(&self) -> &str {
        "adapter"
    }
}

/// Why a submission was not sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The prompt was blank
    EmptyPrompt,
    /// Another request is still in flight
    Busy,
}

/// What happened to a submission
#[derive(Debug)]
pub enum SolveOutcome {
    /// The adapter answered
    Solved {
        /// The trimmed prompt that was sent
        prompt: String,
        /// The validated answer
        response: AiResponse,
    },
    /// The adapter failed
    Failed(SolverError),
    /// Nothing was sent
    Rejected(Rejection),
}

impl SolveOutcome {
    /// True for [`SolveOutcome::Solved`]
    #[must_use]
    pub const fn is_solved(&self) -> bool {
        matches!(self, Self::Solved { .. })
    }
}

/// Single-flight gate around a [`SolveAdapter`]
#[derive(Debug, Clone)]
pub struct SmartSolver {
    adapter: Arc<dyn SolveAdapter>,
    busy: Arc<AtomicBool>,
}

impl SmartSolver {
    /// Wraps an adapter
    #[must_use]
    pub fn new(adapter: Arc<dyn SolveAdapter>) -> Self {
        Self {
            adapter,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// True while a request is in flight; the view disables submit
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Returns the wrapped adapter
    #[must_use]
    pub fn adapter(&self) -> &dyn SolveAdapter {
        self.adapter.as_ref()
    }

    /// Sends `prompt` unless it is blank or a request is already running
    pub async fn submit(&self, prompt: &str) -> SolveOutcome {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return SolveOutcome::Rejected(Rejection::EmptyPrompt);
        }
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            return SolveOutcome::Rejected(Rejection::Busy);
        };

        info!(adapter = self.adapter.name(), prompt, "solving prompt");
        match self.adapter.solve(prompt).await {
            Ok(response) => SolveOutcome::Solved {
                prompt: prompt.to_string(),
                response,
            },
            Err(err) => {
                warn!(adapter = self.adapter.name(), error = %err, "solve failed");
                SolveOutcome::Failed(err)
            }
        }
    }
}

/// Clears the busy flag when dropped, including on early return
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct EchoAdapter {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SolveAdapter for EchoAdapter {
        async fn solve(&self, input: &str) -> SolveResult<AiResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AiResponse {
                result: "42".to_string(),
                explanation: format!("echo: {input}"),
            })
        }
    }

    #[derive(Debug)]
    struct FailingAdapter;

    #[async_trait]
    impl SolveAdapter for FailingAdapter {
        async fn solve(&self, _input: &str) -> SolveResult<AiResponse> {
            Err(SolverError::EmptyResponse)
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[derive(Debug)]
    struct SlowAdapter;

    #[async_trait]
    impl SolveAdapter for SlowAdapter {
        async fn solve(&self, _input: &str) -> SolveResult<AiResponse> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(AiResponse {
                result: "1".to_string(),
                explanation: "slow".to_string(),
            })
        }
    }

    // ===== AiResponse tests =====

    #[test]
    fn test_ai_response_from_json() {
        let response =
            AiResponse::from_json(r#"{"result":"17.1","explanation":"20% of 85.5"}"#).unwrap();
        assert_eq!(response.result, "17.1");
        assert_eq!(response.explanation, "20% of 85.5");
    }

    #[test]
    fn test_ai_response_tolerates_extra_fields() {
        let response =
            AiResponse::from_json(r#"{"result":"2","explanation":"1+1","confidence":0.9}"#)
                .unwrap();
        assert_eq!(response.result, "2");
    }

    #[test]
    fn test_ai_response_empty_payload() {
        assert!(matches!(
            AiResponse::from_json("   "),
            Err(SolverError::EmptyResponse)
        ));
    }

    #[test]
    fn test_ai_response_missing_field() {
        assert!(matches!(
            AiResponse::from_json(r#"{"result":"2"}"#),
            Err(SolverError::Malformed(_))
        ));
    }

    #[test]
    fn test_ai_response_wrong_type() {
        assert!(matches!(
            AiResponse::from_json(r#"{"result":2,"explanation":"x"}"#),
            Err(SolverError::Malformed(_))
        ));
    }

    #[test]
    fn test_ai_response_blank_result() {
        assert!(matches!(
            AiResponse::from_json(r#"{"result":" ","explanation":"x"}"#),
            Err(SolverError::Malformed(_))
        ));
    }

    #[test]
    fn test_ai_response_not_json() {
        assert!(matches!(
            AiResponse::from_json("the answer is 4"),
            Err(SolverError::Malformed(_))
        ));
    }

    // ===== SolverError tests =====

    #[test]
    fn test_solver_error_display() {
        let err = SolverError::Api {
            status: 429,
            body: "quota".to_string(),
        };
        assert_eq!(err.to_string(), "API error 429: quota");
        assert_eq!(SolverError::EmptyResponse.to_string(), "empty response from AI");
    }

    #[test]
    fn test_solver_error_user_message() {
        assert_eq!(SolverError::MissingApiKey.user_message(), RETRY_MESSAGE);
        assert_eq!(
            SolverError::Malformed("x".into()).user_message(),
            "Failed to solve. Please try again."
        );
    }

    // ===== SmartSolver tests =====

    #[tokio::test]
    async fn test_submit_solved() {
        let adapter = Arc::new(EchoAdapter::default());
        let solver = SmartSolver::new(adapter.clone());
        let outcome = solver.submit("  six times seven ").await;
        match outcome {
            SolveOutcome::Solved { prompt, response } => {
                assert_eq!(prompt, "six times seven");
                assert_eq!(response.explanation, "echo: six times seven");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 1);
        assert!(!solver.is_busy());
    }

    #[tokio::test]
    async fn test_submit_blank_prompt_not_sent() {
        let adapter = Arc::new(EchoAdapter::default());
        let solver = SmartSolver::new(adapter.clone());
        let outcome = solver.submit("   ").await;
        assert!(matches!(
            outcome,
            SolveOutcome::Rejected(Rejection::EmptyPrompt)
        ));
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_failure_clears_busy() {
        let solver = SmartSolver::new(Arc::new(FailingAdapter));
        let outcome = solver.submit("2 + 2").await;
        assert!(matches!(
            outcome,
            SolveOutcome::Failed(SolverError::EmptyResponse)
        ));
        assert!(!outcome.is_solved());
        assert!(!solver.is_busy());
    }

    #[tokio::test]
    async fn test_second_submit_rejected_while_busy() {
        let solver = SmartSolver::new(Arc::new(SlowAdapter));
        let (first, second) = tokio::join!(solver.submit("first"), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let busy = solver.is_busy();
            (busy, solver.submit("second").await)
        });

        assert!(first.is_solved());
        let (was_busy, second) = second;
        assert!(was_busy);
        assert!(matches!(second, SolveOutcome::Rejected(Rejection::Busy)));
        assert!(!solver.is_busy());
    }

    #[tokio::test]
    async fn test_clones_share_busy_flag() {
        let solver = SmartSolver::new(Arc::new(SlowAdapter));
        let clone = solver.clone();
        let (first, second) = tokio::join!(solver.submit("a"), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            clone.submit("b").await
        });
        assert!(first.is_solved());
        assert!(matches!(second, SolveOutcome::Rejected(Rejection::Busy)));
    }

    #[test]
    fn test_adapter_default_name() {
        let solver = SmartSolver::new(Arc::new(EchoAdapter::default()));
        assert_eq!(solver.adapter().name(), "adapter");
    }
}
