// Home screen statistics over the visible journal

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

use crate::emotion::Emotion;
use crate::journal::{Entry, EntryStatus, Reflection};

/// One feeling's presence across the journal.
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionStat {
    pub emotion: Emotion,
    pub count: usize,
    /// Mean warmth across this feeling's entries.
    pub mean_warmth: f64,
}

/// Aggregates shown on the home screen.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalStats {
    /// Entries still in the journal (released ones excluded)
    pub total_entries: usize,
    /// Per-feeling presence, most frequent first
    pub feelings: Vec<EmotionStat>,
    /// Entries rested long enough to revisit and not yet revisited
    pub ready_to_revisit: usize,
    /// Reflections written so far
    pub total_reflections: usize,
}

impl JournalStats {
    pub fn compute(
        entries: &[Entry],
        reflections: &[Reflection],
        delay_minutes: i64,
        now: DateTime<Utc>,
    ) -> Self {
        let visible: Vec<&Entry> = entries
            .iter()
            .filter(|e| e.status != EntryStatus::Released)
            .collect();

        let mut tallies: HashMap<Emotion, (usize, u64)> = HashMap::new();
        for entry in &visible {
            let tally = tallies.entry(entry.dominant_feeling).or_insert((0, 0));
            tally.0 += 1;
            tally.1 += entry.warmth_level as u64;
        }
        let mut feelings: Vec<EmotionStat> = tallies
            .into_iter()
            .map(|(emotion, (count, warmth_total))| EmotionStat {
                emotion,
                count,
                mean_warmth: warmth_total as f64 / count as f64,
            })
            .collect();
        // Ties break alphabetically so the listing is stable between renders
        feelings.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.emotion.as_str().cmp(b.emotion.as_str()))
        });

        let reflected: HashSet<&str> = reflections.iter().map(|r| r.entry_id.as_str()).collect();
        let ready_to_revisit = visible
            .iter()
            .filter(|e| e.is_reflectable(delay_minutes, now) && !reflected.contains(e.id.as_str()))
            .count();

        Self {
            total_entries: visible.len(),
            feelings,
            ready_to_revisit,
            total_reflections: reflections.len(),
        }
    }

    /// The feeling that appears most often, if the journal has any entries.
    pub fn most_frequent(&self) -> Option<&EmotionStat> {
        self.feelings.first()
    }

    /// The largest per-feeling count. Bar widths scale against this.
    pub fn max_count(&self) -> usize {
        self.feelings.first().map(|s| s.count).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(feeling: Emotion, warmth: u8, minutes_ago: i64, status: EntryStatus) -> Entry {
        let mut entry = Entry::new("", "words", feeling, warmth, "comfort");
        entry.created_at = Utc::now() - Duration::minutes(minutes_ago);
        entry.status = status;
        entry
    }

    #[test]
    fn test_empty_journal_yields_zeroes() {
        let stats = JournalStats::compute(&[], &[], 1, Utc::now());
        assert_eq!(stats.total_entries, 0);
        assert!(stats.feelings.is_empty());
        assert_eq!(stats.ready_to_revisit, 0);
        assert_eq!(stats.max_count(), 0);
        assert!(stats.most_frequent().is_none());
    }

    #[test]
    fn test_released_entries_are_invisible() {
        let entries = vec![
            entry(Emotion::Grief, 8, 5, EntryStatus::Incubating),
            entry(Emotion::Anger, 9, 5, EntryStatus::Released),
        ];
        let stats = JournalStats::compute(&entries, &[], 1, Utc::now());
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.feelings.len(), 1);
        assert_eq!(stats.feelings[0].emotion, Emotion::Grief);
        assert_eq!(stats.feelings[0].count, 1);
    }

    #[test]
    fn test_feelings_sorted_by_count_then_name() {
        let entries = vec![
            entry(Emotion::Longing, 5, 0, EntryStatus::Incubating),
            entry(Emotion::Longing, 7, 0, EntryStatus::Incubating),
            entry(Emotion::Grief, 8, 0, EntryStatus::Incubating),
            entry(Emotion::Anger, 6, 0, EntryStatus::Incubating),
        ];
        let stats = JournalStats::compute(&entries, &[], 1, Utc::now());
        let order: Vec<(Emotion, usize)> =
            stats.feelings.iter().map(|s| (s.emotion, s.count)).collect();
        assert_eq!(
            order,
            vec![
                (Emotion::Longing, 2),
                (Emotion::Anger, 1),
                (Emotion::Grief, 1),
            ]
        );
        assert_eq!(stats.most_frequent().unwrap().emotion, Emotion::Longing);
        assert_eq!(stats.max_count(), 2);
    }

    #[test]
    fn test_mean_warmth_is_per_feeling() {
        let entries = vec![
            entry(Emotion::Joy, 4, 0, EntryStatus::Incubating),
            entry(Emotion::Joy, 7, 0, EntryStatus::Incubating),
            entry(Emotion::Grief, 9, 0, EntryStatus::Incubating),
        ];
        let stats = JournalStats::compute(&entries, &[], 1, Utc::now());

        let joy = stats
            .feelings
            .iter()
            .find(|s| s.emotion == Emotion::Joy)
            .unwrap();
        assert!((joy.mean_warmth - 5.5).abs() < f64::EPSILON);

        let grief = stats
            .feelings
            .iter()
            .find(|s| s.emotion == Emotion::Grief)
            .unwrap();
        assert!((grief.mean_warmth - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ready_count_excludes_young_released_and_revisited() {
        let rested = entry(Emotion::Grief, 8, 5, EntryStatus::Incubating);
        let young = entry(Emotion::Joy, 5, 0, EntryStatus::Incubating);
        let released = entry(Emotion::Anger, 9, 10, EntryStatus::Released);
        let revisited = entry(Emotion::Fear, 7, 10, EntryStatus::Reflected);
        let reflection = Reflection::new(&revisited, Emotion::Peace, 2, "", "insight", 10);

        let entries = vec![rested, young, released, revisited];
        let stats = JournalStats::compute(&entries, &[reflection], 1, Utc::now());

        assert_eq!(stats.ready_to_revisit, 1);
        assert_eq!(stats.total_reflections, 1);
    }
}
