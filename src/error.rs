use thiserror::Error;

/// Everything that can stop a single link from being replaced.
///
/// These never escape a link's pipeline: the integrator logs them and leaves the link as-is.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("malformed link address \"{href}\" ({segments} segment(s), at least 4 required)")]
    InvalidLinkAddress { href: String, segments: usize },
    #[error("content type \"{0}\" is not supported by the active render mode")]
    UnsupportedContentType(String),
    #[error("failed to fetch {url}: {reason}")]
    FetchFailure { url: String, reason: String },
    #[error("failed to render response body: {0}")]
    RenderFailure(String),
}

impl PipelineError {
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::FetchFailure {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn render(reason: impl ToString) -> Self {
        Self::RenderFailure(reason.to_string())
    }
}
