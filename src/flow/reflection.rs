// Reflection flow — revisit a rested entry and record how it feels now

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::analysis::{EmotionJourney, InsightGenerator, FALLBACK_INSIGHT};
use crate::emotion::Emotion;
use crate::journal::{Entry, EntryPatch, EntryStatus, JournalStore, Reflection};

/// How the writer reports feeling at revisit time.
#[derive(Debug, Clone)]
pub struct SelfReport {
    pub now_feeling: Emotion,
    pub now_warmth: u8,
    /// Free-form note about rereading the entry. May be empty.
    pub note: String,
}

/// Lists entries ready to revisit and records one reflection per entry.
pub struct ReflectionFlow<'a> {
    store: &'a JournalStore,
    insight: &'a InsightGenerator,
    /// Minutes an entry must rest before it can be revisited.
    delay_minutes: i64,
    /// Hard ceiling on one insight call; the HTTP client has its own timeout.
    call_timeout: Duration,
    /// Set while a reflection is being recorded, so a double submit
    /// cannot write twice.
    in_flight: AtomicBool,
}

impl<'a> ReflectionFlow<'a> {
    pub fn new(
        store: &'a JournalStore,
        insight: &'a InsightGenerator,
        delay_minutes: i64,
        call_timeout: Duration,
    ) -> Self {
        Self {
            store,
            insight,
            delay_minutes,
            call_timeout,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Entries old enough to revisit, in journal order.
    ///
    /// Released entries never appear. Already-reflected ones do: they can be
    /// reread, they just cannot take a second reflection.
    pub fn eligible_entries(&self, now: DateTime<Utc>) -> Result<Vec<Entry>> {
        Ok(self
            .store
            .list_entries()?
            .into_iter()
            .filter(|e| e.is_reflectable(self.delay_minutes, now))
            .collect())
    }

    /// Records one revisit of `entry_id`: generates the growth insight,
    /// appends the reflection, and marks the entry reflected.
    pub async fn reflect(
        &self,
        entry_id: &str,
        report: &SelfReport,
        now: DateTime<Utc>,
    ) -> Result<Reflection> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            bail!("A reflection is already being saved");
        }
        let result = self.record(entry_id, report, now).await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn record(
        &self,
        entry_id: &str,
        report: &SelfReport,
        now: DateTime<Utc>,
    ) -> Result<Reflection> {
        if !(1..=10).contains(&report.now_warmth) {
            bail!("Warmth must be between 1 and 10");
        }
        let entry = self
            .store
            .list_entries()?
            .into_iter()
            .find(|e| e.id == entry_id)
            .with_context(|| format!("No entry with id {entry_id}"))?;
        if !entry.is_reflectable(self.delay_minutes, now) {
            bail!("This entry is still resting");
        }
        if self.store.has_reflection(&entry.id)? {
            bail!("This entry has already been revisited");
        }

        let minutes = entry.minutes_since(now);
        let journey = EmotionJourney {
            minutes_since: minutes,
            then_feeling: entry.dominant_feeling,
            then_warmth: entry.warmth_level,
            now_feeling: report.now_feeling,
            now_warmth: report.now_warmth,
        };
        let insight = match tokio::time::timeout(
            self.call_timeout,
            self.insight.generate(&journey),
        )
        .await
        {
            Ok(insight) => insight,
            Err(_) => {
                tracing::warn!("Insight generation timed out, using fallback");
                FALLBACK_INSIGHT.to_string()
            }
        };

        let reflection = Reflection::new(
            &entry,
            report.now_feeling,
            report.now_warmth,
            report.note.trim(),
            insight,
            minutes,
        );
        self.store.append_reflection(&reflection)?;
        self.store
            .update_entry(&entry.id, &EntryPatch::status(EntryStatus::Reflected))?;
        tracing::info!("Entry {} reflected after {} minutes", entry.id, minutes);
        Ok(reflection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claude::ClaudeClient;
    use chrono::Duration as ChronoDuration;
    use tempfile::TempDir;

    fn insight_body(insight: &str) -> String {
        let reply = serde_json::json!({ "insight": insight }).to_string();
        serde_json::json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": reply}],
            "model": "claude-sonnet-4-20250514",
            "stop_reason": "end_turn"
        })
        .to_string()
    }

    fn services(server: &mockito::Server) -> (TempDir, JournalStore, InsightGenerator) {
        let dir = TempDir::new().unwrap();
        let store = JournalStore::open(dir.path().join("journal")).unwrap();
        let client = ClaudeClient::new("test-key".to_string(), 5)
            .unwrap()
            .with_base_url(server.url());
        let insight = InsightGenerator::new(client, "claude-sonnet-4-20250514".to_string(), 1000);
        (dir, store, insight)
    }

    fn rested_entry(store: &JournalStore, minutes_ago: i64) -> Entry {
        let mut entry = Entry::new("Dad", "I never said goodbye", Emotion::Longing, 7, "comfort");
        entry.created_at = Utc::now() - ChronoDuration::minutes(minutes_ago);
        store.append_entry(&entry).unwrap();
        entry
    }

    fn calm_report() -> SelfReport {
        SelfReport {
            now_feeling: Emotion::Peace,
            now_warmth: 3,
            note: "calmer now".to_string(),
        }
    }

    // ── eligibility ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_eligible_entries_respects_the_rest_period() {
        let server = mockito::Server::new_async().await;
        let (_dir, store, insight) = services(&server);
        let flow = ReflectionFlow::new(&store, &insight, 1, Duration::from_secs(5));

        rested_entry(&store, 5);
        let mut young = Entry::new("", "fresh words", Emotion::Joy, 6, "comfort");
        young.created_at = Utc::now();
        store.append_entry(&young).unwrap();

        let eligible = flow.eligible_entries(Utc::now()).unwrap();
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].content, "I never said goodbye");
    }

    #[tokio::test]
    async fn test_eligible_entries_includes_already_reflected_ones() {
        let server = mockito::Server::new_async().await;
        let (_dir, store, insight) = services(&server);
        let flow = ReflectionFlow::new(&store, &insight, 1, Duration::from_secs(5));

        let entry = rested_entry(&store, 5);
        store
            .update_entry(&entry.id, &EntryPatch::status(EntryStatus::Reflected))
            .unwrap();

        let eligible = flow.eligible_entries(Utc::now()).unwrap();
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].status, EntryStatus::Reflected);
    }

    #[tokio::test]
    async fn test_eligible_entries_skips_released_ones() {
        let server = mockito::Server::new_async().await;
        let (_dir, store, insight) = services(&server);
        let flow = ReflectionFlow::new(&store, &insight, 1, Duration::from_secs(5));

        let entry = rested_entry(&store, 5);
        store
            .update_entry(&entry.id, &EntryPatch::status(EntryStatus::Released))
            .unwrap();

        assert!(flow.eligible_entries(Utc::now()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_eligible_entries_preserves_journal_order() {
        let server = mockito::Server::new_async().await;
        let (_dir, store, insight) = services(&server);
        let flow = ReflectionFlow::new(&store, &insight, 1, Duration::from_secs(5));

        let mut older = Entry::new("", "older", Emotion::Grief, 8, "comfort");
        older.created_at = Utc::now() - ChronoDuration::minutes(30);
        store.append_entry(&older).unwrap();
        let mut newer = Entry::new("", "newer", Emotion::Hope, 4, "comfort");
        newer.created_at = Utc::now() - ChronoDuration::minutes(10);
        store.append_entry(&newer).unwrap();

        let eligible = flow.eligible_entries(Utc::now()).unwrap();
        assert_eq!(eligible[0].content, "older");
        assert_eq!(eligible[1].content, "newer");
    }

    // ── recording ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_reflect_records_and_marks_the_entry() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(insight_body("The ache has softened into tenderness."))
            .create_async()
            .await;

        let (_dir, store, insight) = services(&server);
        let flow = ReflectionFlow::new(&store, &insight, 1, Duration::from_secs(5));
        let entry = rested_entry(&store, 5);

        let reflection = flow
            .reflect(&entry.id, &calm_report(), Utc::now())
            .await
            .unwrap();

        assert_eq!(reflection.entry_id, entry.id);
        assert_eq!(reflection.then_feeling, Emotion::Longing);
        assert_eq!(reflection.then_warmth, 7);
        assert_eq!(reflection.now_feeling, Emotion::Peace);
        assert_eq!(reflection.minutes_since_original, 5);
        assert_eq!(
            reflection.growth_insight,
            "The ache has softened into tenderness."
        );

        let stored = store.list_entries().unwrap();
        assert_eq!(stored[0].status, EntryStatus::Reflected);
        assert_eq!(store.list_reflections().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reflect_on_resting_entry_is_refused() {
        let server = mockito::Server::new_async().await;
        let (_dir, store, insight) = services(&server);
        let flow = ReflectionFlow::new(&store, &insight, 10, Duration::from_secs(5));
        let entry = rested_entry(&store, 5);

        let err = flow
            .reflect(&entry.id, &calm_report(), Utc::now())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("resting"));
        assert!(store.list_reflections().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reflect_twice_is_refused() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(insight_body("An insight."))
            .create_async()
            .await;

        let (_dir, store, insight) = services(&server);
        let flow = ReflectionFlow::new(&store, &insight, 1, Duration::from_secs(5));
        let entry = rested_entry(&store, 5);

        flow.reflect(&entry.id, &calm_report(), Utc::now())
            .await
            .unwrap();
        let err = flow
            .reflect(&entry.id, &calm_report(), Utc::now())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already been revisited"));
        assert_eq!(store.list_reflections().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reflect_on_unknown_entry_is_refused() {
        let server = mockito::Server::new_async().await;
        let (_dir, store, insight) = services(&server);
        let flow = ReflectionFlow::new(&store, &insight, 1, Duration::from_secs(5));

        assert!(flow
            .reflect("missing", &calm_report(), Utc::now())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_reflect_rejects_out_of_range_warmth() {
        let server = mockito::Server::new_async().await;
        let (_dir, store, insight) = services(&server);
        let flow = ReflectionFlow::new(&store, &insight, 1, Duration::from_secs(5));
        let entry = rested_entry(&store, 5);

        let mut report = calm_report();
        report.now_warmth = 0;
        assert!(flow.reflect(&entry.id, &report, Utc::now()).await.is_err());
        report.now_warmth = 11;
        assert!(flow.reflect(&entry.id, &report, Utc::now()).await.is_err());
        assert!(store.list_reflections().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reflect_falls_back_when_insight_call_fails() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(500)
            .with_body("down")
            .create_async()
            .await;

        let (_dir, store, insight) = services(&server);
        let flow = ReflectionFlow::new(&store, &insight, 1, Duration::from_secs(5));
        let entry = rested_entry(&store, 5);

        let reflection = flow
            .reflect(&entry.id, &calm_report(), Utc::now())
            .await
            .unwrap();
        // The revisit still lands, carried by the fallback insight
        assert_eq!(reflection.growth_insight, FALLBACK_INSIGHT);
        assert_eq!(
            store.list_entries().unwrap()[0].status,
            EntryStatus::Reflected
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reflect_falls_back_when_insight_call_times_out() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(insight_body("Too slow to matter."))
            .create_async()
            .await;

        let (_dir, store, insight) = services(&server);
        let flow = ReflectionFlow::new(&store, &insight, 1, Duration::ZERO);
        let entry = rested_entry(&store, 5);

        let reflection = flow
            .reflect(&entry.id, &calm_report(), Utc::now())
            .await
            .unwrap();
        assert_eq!(reflection.growth_insight, FALLBACK_INSIGHT);
    }

    #[tokio::test]
    async fn test_reflection_note_is_trimmed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(insight_body("An insight."))
            .create_async()
            .await;

        let (_dir, store, insight) = services(&server);
        let flow = ReflectionFlow::new(&store, &insight, 1, Duration::from_secs(5));
        let entry = rested_entry(&store, 5);

        let report = SelfReport {
            now_feeling: Emotion::Relief,
            now_warmth: 2,
            note: "  lighter now  \n".to_string(),
        };
        let reflection = flow.reflect(&entry.id, &report, Utc::now()).await.unwrap();
        assert_eq!(reflection.reflection_note, "lighter now");
    }
}
