// Journal record types

use crate::emotion::Emotion;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

const ID_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// Millisecond timestamp plus a short random base36 suffix.
///
/// Collision-safe enough for a single person's journal, and the ids sort
/// roughly by creation time.
pub fn new_record_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_CHARSET[rng.gen_range(0..ID_CHARSET.len())] as char)
        .collect();
    format!("{}_{}", Utc::now().timestamp_millis(), suffix)
}

/// The signed-in person. Local only, no credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub joined_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            joined_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Written and resting, not yet revisited.
    Incubating,
    /// Revisited at least once.
    Reflected,
    /// Let go. Kept out of every listing and count.
    Released,
}

/// One unsent message, with the feelings the classifier read in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub recipient: String,
    pub content: String,
    pub dominant_feeling: Emotion,
    /// Intensity of the feeling, 1 (faint) to 10 (overwhelming).
    pub warmth_level: u8,
    /// The comfort line returned alongside the classification.
    pub supportive_prompt: String,
    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// A blank recipient means the message was written to oneself.
    pub fn new(
        recipient: &str,
        content: impl Into<String>,
        feeling: Emotion,
        warmth: u8,
        supportive_prompt: impl Into<String>,
    ) -> Self {
        let recipient = recipient.trim();
        Self {
            id: new_record_id(),
            recipient: if recipient.is_empty() {
                "myself".to_string()
            } else {
                recipient.to_string()
            },
            content: content.into(),
            dominant_feeling: feeling,
            warmth_level: warmth,
            supportive_prompt: supportive_prompt.into(),
            status: EntryStatus::Incubating,
            created_at: Utc::now(),
        }
    }

    /// Whole minutes since the entry was written, never negative.
    pub fn minutes_since(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_minutes().max(0)
    }

    /// An entry can be revisited once it has rested for `delay_minutes`,
    /// unless it was released.
    pub fn is_reflectable(&self, delay_minutes: i64, now: DateTime<Utc>) -> bool {
        self.status != EntryStatus::Released && self.minutes_since(now) >= delay_minutes
    }
}

/// A single revisit of an entry: how it felt then, how it feels now,
/// and the insight generated from the distance between the two.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reflection {
    pub id: String,
    pub entry_id: String,
    pub then_feeling: Emotion,
    pub then_warmth: u8,
    pub now_feeling: Emotion,
    pub now_warmth: u8,
    /// What the writer said about rereading the entry. May be empty.
    pub reflection_note: String,
    pub growth_insight: String,
    // Early journals measured the rest period in days; the field name stuck.
    #[serde(rename = "days_since_original")]
    pub minutes_since_original: i64,
    pub created_at: DateTime<Utc>,
}

impl Reflection {
    pub fn new(
        entry: &Entry,
        now_feeling: Emotion,
        now_warmth: u8,
        reflection_note: impl Into<String>,
        growth_insight: impl Into<String>,
        minutes_since_original: i64,
    ) -> Self {
        Self {
            id: new_record_id(),
            entry_id: entry.id.clone(),
            then_feeling: entry.dominant_feeling,
            then_warmth: entry.warmth_level,
            now_feeling,
            now_warmth,
            reflection_note: reflection_note.into(),
            growth_insight: growth_insight.into(),
            minutes_since_original,
            created_at: Utc::now(),
        }
    }
}

/// Fields that `update_entry` may change. `None` leaves the field alone.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub status: Option<EntryStatus>,
}

impl EntryPatch {
    pub fn status(status: EntryStatus) -> Self {
        Self {
            status: Some(status),
        }
    }
}
