//! Pictag vision crate - AI backend client for image analysis.
//!
//! Provides the VisionService trait for deriving text from images, a
//! MockVisionService for testing, and a GeminiVisionService that calls the
//! generateContent REST endpoint. Each ingest runs two analyses (tags and
//! description) as independent fallible operations.

pub mod gemini;

use pictag_core::error::PictagError;

pub use gemini::GeminiVisionService;

/// The two fixed analyses performed per ingest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PromptKind {
    /// 5-10 comma-separated English keywords.
    Tags,
    /// 2-3 sentences of descriptive prose.
    Description,
}

impl PromptKind {
    /// The fixed prompt sent to the backend for this analysis.
    pub fn prompt(&self) -> &'static str {
        match self {
            PromptKind::Tags => {
                "Generate tags for this image. Consider the main subjects, \
                 background, mood, and colors, and respond with only 5-10 \
                 comma-separated English keywords. Do not add any other text. \
                 Example: cat, tabby cat, sitting on a couch, warm light, \
                 indoor, brown, cozy"
            }
            PromptKind::Description => {
                "Look at this image and write a concise, evocative description \
                 of it in English, no longer than 2-3 sentences."
            }
        }
    }
}

/// Service for deriving text from an image via a vision model.
///
/// Implementations wrap a concrete backend behind a uniform async
/// interface so tests can use the mock.
pub trait VisionService: Send + Sync {
    /// Analyze raw image bytes with the fixed prompt for `kind`.
    ///
    /// # Arguments
    /// * `image` - Raw image bytes as uploaded.
    /// * `mime_type` - The declared MIME type of the image.
    /// * `kind` - Which of the two fixed analyses to run.
    ///
    /// # Returns
    /// The generated text, trimmed of surrounding whitespace.
    fn analyze(
        &self,
        image: &[u8],
        mime_type: &str,
        kind: PromptKind,
    ) -> impl std::future::Future<Output = Result<String, PictagError>> + Send;
}

/// Mock vision service for testing.
///
/// Returns deterministic text per prompt kind without any network access.
#[derive(Debug, Clone)]
pub struct MockVisionService {
    tags: String,
    description: String,
    /// When set, every call fails with this error kind.
    failure: Option<MockFailure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MockFailure {
    Backend,
    EmptyResponse,
}

impl MockVisionService {
    /// Create a mock with default tag and description responses.
    pub fn new() -> Self {
        Self {
            tags: "cat, sofa, warm light".to_string(),
            description: "A cat dozing on a sofa in warm light.".to_string(),
            failure: None,
        }
    }

    /// Create a mock returning the given texts for tags and description.
    pub fn with_responses(tags: &str, description: &str) -> Self {
        Self {
            tags: tags.to_string(),
            description: description.to_string(),
            failure: None,
        }
    }

    /// Create a mock whose every call fails with a transport error.
    pub fn failing() -> Self {
        Self {
            failure: Some(MockFailure::Backend),
            ..Self::new()
        }
    }

    /// Create a mock simulating a backend that answers with no candidates.
    pub fn empty() -> Self {
        Self {
            failure: Some(MockFailure::EmptyResponse),
            ..Self::new()
        }
    }
}

impl Default for MockVisionService {
    fn default() -> Self {
        Self::new()
    }
}

impl VisionService for MockVisionService {
    async fn analyze(
        &self,
        image: &[u8],
        _mime_type: &str,
        kind: PromptKind,
    ) -> Result<String, PictagError> {
        if image.is_empty() {
            return Err(PictagError::Backend("Empty image data".to_string()));
        }
        match self.failure {
            Some(MockFailure::Backend) => {
                Err(PictagError::Backend("Simulated transport failure".to_string()))
            }
            Some(MockFailure::EmptyResponse) => Err(PictagError::EmptyResponse),
            None => Ok(match kind {
                PromptKind::Tags => self.tags.clone(),
                PromptKind::Description => self.description.clone(),
            }),
        }
    }
}
