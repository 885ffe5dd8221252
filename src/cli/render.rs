// Plain-text formatting helpers for the shell screens

/// Ten-slot warmth bar, e.g. `●●●●●●●○○○` for 7.
pub fn warmth_bar(warmth: u8) -> String {
    let filled = usize::from(warmth.min(10));
    let mut bar = String::new();
    for _ in 0..filled {
        bar.push('●');
    }
    for _ in filled..10 {
        bar.push('○');
    }
    bar
}

/// Count bar for the emotion journey panel, scaled against the most
/// frequent feeling. A nonzero count always shows at least one block.
pub fn emotion_bar(count: usize, max_count: usize, width: usize) -> String {
    if count == 0 || max_count == 0 || width == 0 {
        return String::new();
    }
    let filled = ((count as f64 / max_count as f64) * width as f64).round() as usize;
    "█".repeat(filled.clamp(1, width))
}

/// `1 entry`, `3 entries`.
pub fn count_noun(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, plural)
    }
}

/// Elapsed time since an entry was written, in the journal's minute units.
pub fn age_label(minutes: i64) -> String {
    if minutes < 1 {
        "just now".to_string()
    } else {
        format!("{}m ago", minutes)
    }
}

/// First `max_chars` characters of the message, on a single line.
pub fn content_preview(content: &str, max_chars: usize) -> String {
    let flattened = content.replace('\n', " ");
    let flattened = flattened.trim();
    if flattened.chars().count() <= max_chars {
        return flattened.to_string();
    }
    let truncated: String = flattened.chars().take(max_chars).collect();
    format!("{}...", truncated.trim_end())
}
