// Emotion vocabulary shared by entries, reflections, and the classifier

use crossterm::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The twelve feelings an entry or reflection can carry.
///
/// Serialized by capitalized label ("Longing", "Grief", ...) — the same tokens
/// the classification prompt asks the model to choose from, so stored data and
/// wire data share one vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    Longing,
    Grief,
    Anger,
    Love,
    Regret,
    Hope,
    Peace,
    Gratitude,
    Joy,
    Fear,
    Anxiety,
    Relief,
}

impl Emotion {
    /// Every label, in the order the self-report picker lists them.
    pub const ALL: [Emotion; 12] = [
        Emotion::Peace,
        Emotion::Gratitude,
        Emotion::Hope,
        Emotion::Relief,
        Emotion::Joy,
        Emotion::Love,
        Emotion::Longing,
        Emotion::Grief,
        Emotion::Anger,
        Emotion::Fear,
        Emotion::Anxiety,
        Emotion::Regret,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Longing => "Longing",
            Emotion::Grief => "Grief",
            Emotion::Anger => "Anger",
            Emotion::Love => "Love",
            Emotion::Regret => "Regret",
            Emotion::Hope => "Hope",
            Emotion::Peace => "Peace",
            Emotion::Gratitude => "Gratitude",
            Emotion::Joy => "Joy",
            Emotion::Fear => "Fear",
            Emotion::Anxiety => "Anxiety",
            Emotion::Relief => "Relief",
        }
    }

    /// Case-insensitive lookup, used by the self-report picker.
    pub fn from_name(name: &str) -> Option<Emotion> {
        let name = name.trim();
        Emotion::ALL
            .iter()
            .copied()
            .find(|e| e.as_str().eq_ignore_ascii_case(name))
    }

    /// Glyph shown next to the label on every screen.
    pub fn glyph(&self) -> &'static str {
        match self {
            Emotion::Joy => "✨",
            Emotion::Grief => "〰",
            Emotion::Anger => "⚡",
            Emotion::Love => "♡",
            Emotion::Hope => "☀",
            Emotion::Fear => "◐",
            Emotion::Peace => "◯",
            Emotion::Longing => "⋯",
            Emotion::Regret => "◈",
            Emotion::Gratitude => "❋",
            Emotion::Anxiety => "≋",
            Emotion::Relief => "◡",
        }
    }

    /// Terminal color for the label and the journey bars.
    pub fn color(&self) -> Color {
        match self {
            Emotion::Joy => Color::Rgb { r: 251, g: 191, b: 36 }, // amber
            Emotion::Grief => Color::Rgb { r: 96, g: 165, b: 250 }, // blue
            Emotion::Anger => Color::Rgb { r: 239, g: 68, b: 68 }, // red
            Emotion::Love => Color::Rgb { r: 236, g: 72, b: 153 }, // pink
            Emotion::Hope => Color::Rgb { r: 245, g: 158, b: 11 }, // gold
            Emotion::Fear => Color::Rgb { r: 99, g: 102, b: 241 }, // indigo
            Emotion::Peace => Color::Rgb { r: 16, g: 185, b: 129 }, // emerald
            Emotion::Longing => Color::Rgb { r: 139, g: 92, b: 246 }, // violet
            Emotion::Regret => Color::Rgb { r: 249, g: 115, b: 22 }, // orange
            Emotion::Gratitude => Color::Rgb { r: 20, g: 184, b: 166 }, // teal
            Emotion::Anxiety => Color::Rgb { r: 244, g: 63, b: 94 }, // rose
            Emotion::Relief => Color::Rgb { r: 132, g: 204, b: 22 }, // lime
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
