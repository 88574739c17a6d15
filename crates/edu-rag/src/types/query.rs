//! QA request type

use serde::{Deserialize, Serialize};

use super::generation::Metadata;

/// One question for the QA pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaRequest {
    /// Natural-language question
    pub question: String,
    /// Optional subject for prompt selection
    pub subject: Option<String>,
    /// Learner profile, open key-value
    #[serde(default)]
    pub user_context: Metadata,
    /// Optional provider override
    pub provider: Option<String>,
}

impl QaRequest {
    /// Create a request with no subject, profile, or provider override
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            subject: None,
            user_context: Metadata::new(),
            provider: None,
        }
    }

    /// Set the subject
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Attach a learner profile
    pub fn with_user_context(mut self, user_context: Metadata) -> Self {
        self.user_context = user_context;
        self
    }

    /// Pin a specific provider
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }
}
