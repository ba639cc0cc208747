//! Report generation from ranked context.
//!
//! The generator is a pluggable capability: the pipeline only needs
//! `generate_report(claim, context) -> text`. [`GenaiReportGenerator`] is the LLM-backed
//! implementation; [`parse_report`] turns its markdown into a [`FactCheckReport`].

pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod parse;
pub mod prompt;

pub use error::ReportError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockReportGenerator;
pub use parse::{FactCheckReport, ReportSection, Verdict, parse_report};

use std::time::Duration;

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::{debug, info};

use prompt::{ANALYST_INSTRUCTIONS, build_user_prompt};

#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate_report(&self, claim: &str, context: &str) -> Result<String, ReportError>;
}

/// Chat-completion generator; provider and credentials are resolved by `genai` from the
/// model name and the environment.
#[derive(Clone)]
pub struct GenaiReportGenerator {
    client: Client,
    model: String,
    timeout: Duration,
}

impl std::fmt::Debug for GenaiReportGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiReportGenerator")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GenaiReportGenerator {
    pub fn new(model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ReportGenerator for GenaiReportGenerator {
    async fn generate_report(&self, claim: &str, context: &str) -> Result<String, ReportError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(ANALYST_INSTRUCTIONS),
            ChatMessage::user(build_user_prompt(claim, context)),
        ]);

        debug!(model = %self.model, context_len = context.len(), "Requesting fact-check report");

        let response = tokio::time::timeout(
            self.timeout,
            self.client.exec_chat(&self.model, request, None),
        )
        .await
        .map_err(|_| ReportError::Timeout {
            secs: self.timeout.as_secs(),
        })?
        .map_err(|e| ReportError::GenerationFailed {
            reason: e.to_string(),
        })?;

        let text = response
            .first_text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ReportError::EmptyResponse)?
            .to_string();

        info!(model = %self.model, report_len = text.len(), "Report generated");
        Ok(text)
    }
}
