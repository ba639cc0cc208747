use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report generation failed: {reason}")]
    GenerationFailed { reason: String },

    #[error("report generation timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("report model returned no text")]
    EmptyResponse,
}
