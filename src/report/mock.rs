use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ReportError, ReportGenerator};

/// Generator returning a canned report and recording the context it received.
#[derive(Debug, Default)]
pub struct MockReportGenerator {
    response: Option<String>,
    calls: AtomicUsize,
    last_context: Mutex<Option<String>>,
}

impl MockReportGenerator {
    /// Answers every claim with a short report carrying `verdict`.
    pub fn with_verdict(verdict: &str) -> Self {
        Self {
            response: Some(format!(
                "**Summary of Findings:**\n- Mock finding.\n\n**Verdict:**\n{verdict}\n\n**References:**\n- [Mock source](https://mock.example)"
            )),
            ..Default::default()
        }
    }

    /// Fails every call.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_context(&self) -> Option<String> {
        self.last_context.lock().clone()
    }
}

#[async_trait]
impl ReportGenerator for MockReportGenerator {
    async fn generate_report(&self, _claim: &str, context: &str) -> Result<String, ReportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_context.lock() = Some(context.to_string());

        self.response
            .clone()
            .ok_or_else(|| ReportError::GenerationFailed {
                reason: "mock generator configured to fail".to_string(),
            })
    }
}
