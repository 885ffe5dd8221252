// Keystroke parsing for the shell screens

use crate::emotion::Emotion;

/// Self-reported warmth when the writer just presses Enter.
pub const DEFAULT_NOW_WARMTH: u8 = 5;

/// What the home screen prompt accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeAction {
    Write,
    Reflections,
    SignOut,
    Quit,
}

impl HomeAction {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "w" | "write" => Some(HomeAction::Write),
            "r" | "reflect" | "reflections" => Some(HomeAction::Reflections),
            "s" | "sign out" | "signout" => Some(HomeAction::SignOut),
            "q" | "quit" | "exit" => Some(HomeAction::Quit),
            _ => None,
        }
    }
}

/// A feeling, picked by list number or by name.
pub fn parse_emotion_choice(input: &str) -> Option<Emotion> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        if (1..=Emotion::ALL.len()).contains(&n) {
            return Some(Emotion::ALL[n - 1]);
        }
        return None;
    }
    Emotion::from_name(input)
}

/// Warmth 1-10; an empty answer means the middle of the scale.
pub fn parse_warmth_choice(input: &str) -> Option<u8> {
    let input = input.trim();
    if input.is_empty() {
        return Some(DEFAULT_NOW_WARMTH);
    }
    input.parse::<u8>().ok().filter(|w| (1..=10).contains(w))
}
