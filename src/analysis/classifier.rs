// Emotion classifier — reads an unsent message and names the feeling in it

use anyhow::{Context, Result};
use serde::Deserialize;

use super::strip_code_fences;
use crate::claude::{ClaudeClient, MessageRequest};
use crate::emotion::Emotion;

/// What the classifier hands back to the entry flow.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub emotion: Emotion,
    /// 1 (faint) to 10 (overwhelming).
    pub intensity: u8,
    /// One warm, validating sentence to show right after saving.
    pub comfort: String,
}

impl Classification {
    /// Used whenever the model is unreachable or answers off-script.
    pub fn fallback() -> Self {
        Self {
            emotion: Emotion::Peace,
            intensity: 5,
            comfort: "Your feelings are valid. Sharing them is an important step in healing."
                .to_string(),
        }
    }
}

/// The reply shape the prompt asks for.
#[derive(Debug, Deserialize)]
struct RawClassification {
    emotion: Emotion,
    intensity: u8,
    comfort: String,
}

pub struct EmotionClassifier {
    client: ClaudeClient,
    model: String,
    max_tokens: u32,
}

impl EmotionClassifier {
    pub fn new(client: ClaudeClient, model: String, max_tokens: u32) -> Self {
        Self {
            client,
            model,
            max_tokens,
        }
    }

    /// Classify an unsent message.
    ///
    /// Never errors: any failure (network, HTTP, off-script reply) collapses
    /// into the gentle fallback so the writer is not interrupted.
    pub async fn classify(&self, content: &str) -> Classification {
        match self.classify_once(content).await {
            Ok(classification) => classification,
            Err(e) => {
                tracing::warn!("Emotion classification failed, using fallback: {:#}", e);
                Classification::fallback()
            }
        }
    }

    async fn classify_once(&self, content: &str) -> Result<Classification> {
        let prompt = build_classification_prompt(content);
        let request = MessageRequest::one_shot(&self.model, self.max_tokens, &prompt);
        let response = self.client.send_message(&request).await?;
        parse_classification(&response.text())
    }
}

fn build_classification_prompt(content: &str) -> String {
    format!(
        "A person wrote: \"{}\"\n\n\
         Analyze with empathy. Respond with ONLY valid JSON (no markdown):\n\
         {{\n  \"emotion\": \"one of: Longing, Grief, Anger, Love, Regret, Hope, Peace, Gratitude, Joy, Fear, Anxiety, Relief\",\n  \
         \"intensity\": 1-10,\n  \
         \"comfort\": \"A warm, validating sentence (15-20 words)\"\n}}",
        content
    )
}

fn parse_classification(text: &str) -> Result<Classification> {
    let cleaned = strip_code_fences(text);
    let raw: RawClassification = serde_json::from_str(&cleaned)
        .context("Classifier reply is not the expected JSON shape")?;

    if !(1..=10).contains(&raw.intensity) {
        anyhow::bail!("Classifier intensity {} is out of range", raw.intensity);
    }
    if raw.comfort.trim().is_empty() {
        anyhow::bail!("Classifier reply has an empty comfort line");
    }

    Ok(Classification {
        emotion: raw.emotion,
        intensity: raw.intensity,
        comfort: raw.comfort,
    })
}
