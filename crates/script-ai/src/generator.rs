//! The scene-generator contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vidprompt_common::error::{VidpromptError, VidpromptResult};
use vidprompt_scene_model::SceneDraft;

/// Narration language selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    English,
    Telugu,
    /// Narration mixing English and Telugu.
    Mixed,
}

impl Language {
    /// Label used inside the instruction text.
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Telugu => "Telugu",
            Language::Mixed => "Mixed",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

/// A validated request for scene suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The user's editing instructions.
    pub prompt: String,

    /// Language the narration should be written in.
    pub language: Language,

    /// Display name of the uploaded source file.
    pub source_name: String,
}

impl GenerationRequest {
    /// Reject unusable input before any generation is attempted.
    pub fn validate(&self) -> VidpromptResult<()> {
        if self.source_name.trim().is_empty() {
            return Err(VidpromptError::generation(
                "No source video selected. Upload a video before generating scenes.",
            ));
        }
        if self.prompt.trim().is_empty() {
            return Err(VidpromptError::generation(
                "Please enter a prompt describing the video you want to create.",
            ));
        }
        Ok(())
    }
}

/// A collaborator that turns an editing prompt into suggested scene cuts
/// with narration.
#[async_trait]
pub trait SceneGenerator: Send + Sync {
    /// Generate a scene list for the request. Implementations validate the
    /// request, assemble the instruction text, call the model, and run the
    /// response through [`crate::parse_scene_payload`].
    async fn generate(&self, request: &GenerationRequest) -> VidpromptResult<Vec<SceneDraft>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str, source_name: &str) -> GenerationRequest {
        GenerationRequest {
            prompt: prompt.to_string(),
            language: Language::English,
            source_name: source_name.to_string(),
        }
    }

    #[test]
    fn accepts_complete_request() {
        assert!(request("make a highlight reel", "trip.mp4").validate().is_ok());
    }

    #[test]
    fn rejects_blank_prompt() {
        let err = request("   ", "trip.mp4").validate().unwrap_err();
        assert!(err.to_string().contains("prompt"));
    }

    #[test]
    fn rejects_missing_source_name() {
        let err = request("make a highlight reel", "").validate().unwrap_err();
        assert!(err.to_string().contains("Upload a video"));
    }

    #[test]
    fn language_serializes_as_plain_name() {
        assert_eq!(
            serde_json::to_string(&Language::Telugu).unwrap(),
            "\"Telugu\""
        );
    }

    /// Generator returning a fixed payload, standing in for a model call.
    struct CannedGenerator {
        payload: &'static str,
    }

    #[async_trait]
    impl SceneGenerator for CannedGenerator {
        async fn generate(&self, request: &GenerationRequest) -> VidpromptResult<Vec<SceneDraft>> {
            request.validate()?;
            let _prompt = crate::build_generation_prompt(request);
            crate::parse_scene_payload(self.payload)
        }
    }

    #[tokio::test]
    async fn generator_validates_then_parses() {
        let generator = CannedGenerator {
            payload: r#"[{"startTime": "00:00:00", "endTime": "00:00:05", "narration": "Intro."}]"#,
        };

        let drafts = generator
            .generate(&request("make an intro", "trip.mp4"))
            .await
            .unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].narration, "Intro.");

        let err = generator.generate(&request("", "trip.mp4")).await.unwrap_err();
        assert!(matches!(err, VidpromptError::Generation { .. }));
    }
}
