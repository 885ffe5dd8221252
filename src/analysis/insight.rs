// Growth insight generator — compares then and now, returns one warm sentence

use anyhow::{Context, Result};
use serde::Deserialize;

use super::strip_code_fences;
use crate::claude::{ClaudeClient, MessageRequest};
use crate::emotion::Emotion;

pub const FALLBACK_INSIGHT: &str =
    "Your journey shows beautiful growth. The weight you carried has transformed into wisdom.";

/// The distance between how an entry felt when written and how it feels now.
#[derive(Debug, Clone)]
pub struct EmotionJourney {
    pub minutes_since: i64,
    pub then_feeling: Emotion,
    pub then_warmth: u8,
    pub now_feeling: Emotion,
    pub now_warmth: u8,
}

#[derive(Debug, Deserialize)]
struct RawInsight {
    insight: String,
}

pub struct InsightGenerator {
    client: ClaudeClient,
    model: String,
    max_tokens: u32,
}

impl InsightGenerator {
    pub fn new(client: ClaudeClient, model: String, max_tokens: u32) -> Self {
        Self {
            client,
            model,
            max_tokens,
        }
    }

    /// Generate a growth insight for the journey.
    ///
    /// Never errors: any failure collapses into the fallback line so the
    /// reflection can always be saved.
    pub async fn generate(&self, journey: &EmotionJourney) -> String {
        match self.generate_once(journey).await {
            Ok(insight) => insight,
            Err(e) => {
                tracing::warn!("Insight generation failed, using fallback: {:#}", e);
                FALLBACK_INSIGHT.to_string()
            }
        }
    }

    async fn generate_once(&self, journey: &EmotionJourney) -> Result<String> {
        let prompt = build_insight_prompt(journey);
        let request = MessageRequest::one_shot(&self.model, self.max_tokens, &prompt);
        let response = self.client.send_message(&request).await?;
        parse_insight(&response.text())
    }
}

fn build_insight_prompt(journey: &EmotionJourney) -> String {
    format!(
        "{} minutes ago: {} ({}/10)\n\
         Today: {} ({}/10)\n\
         Write a warm insight (20-30 words) about their growth. \
         Respond with ONLY JSON: {{\"insight\": \"your message\"}}",
        journey.minutes_since,
        journey.then_feeling,
        journey.then_warmth,
        journey.now_feeling,
        journey.now_warmth
    )
}

fn parse_insight(text: &str) -> Result<String> {
    let cleaned = strip_code_fences(text);
    let raw: RawInsight = serde_json::from_str(&cleaned)
        .context("Insight reply is not the expected JSON shape")?;
    if raw.insight.trim().is_empty() {
        anyhow::bail!("Insight reply is empty");
    }
    Ok(raw.insight)
}
