// Entry flow — write one unsent message, hear it read, keep it or let it go

use anyhow::{bail, Result};
use std::time::Duration;

use crate::analysis::{Classification, EmotionClassifier};
use crate::journal::{Entry, JournalStore};

/// How long the farewell line lingers before the flow returns home.
pub const FADEOUT_DWELL: Duration = Duration::from_secs(2);

/// Where one pass through the sanctuary currently stands.
///
/// The draft travels inside the state: nothing touches the store until
/// `keep`, so abandoning the flow at any point leaves no trace.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryState {
    /// Writing; nothing classified or stored yet.
    Input,
    /// Classification in flight.
    Processing { recipient: String, content: String },
    /// The reading is in; waiting on keep-or-release.
    Comfort {
        recipient: String,
        content: String,
        classification: Classification,
    },
    /// Terminal. The screen lingers here for [`FADEOUT_DWELL`] before going home.
    Fadeout,
}

/// One sanctuary visit. Constructed per visit, borrowing the long-lived
/// store and classifier; dropped when the screen returns home.
pub struct EntryFlow<'a> {
    store: &'a JournalStore,
    classifier: &'a EmotionClassifier,
    /// Hard ceiling on one classification call. The HTTP client has its own
    /// timeout; this bound holds even if that one misbehaves.
    call_timeout: Duration,
    state: EntryState,
}

impl<'a> EntryFlow<'a> {
    pub fn new(
        store: &'a JournalStore,
        classifier: &'a EmotionClassifier,
        call_timeout: Duration,
    ) -> Self {
        Self {
            store,
            classifier,
            call_timeout,
            state: EntryState::Input,
        }
    }

    pub fn state(&self) -> &EntryState {
        &self.state
    }

    /// Submit the draft for classification.
    ///
    /// An empty message is refused before any API call. Classification
    /// failures never stall the flow: a timeout or error lands the
    /// fallback reading, and the flow reaches `Comfort` either way.
    pub async fn submit(&mut self, recipient: &str, content: &str) -> Result<Classification> {
        if self.state != EntryState::Input {
            bail!("This message has already been read");
        }
        let content = content.trim().to_string();
        if content.is_empty() {
            bail!("Nothing to read: the message is empty");
        }
        let recipient = recipient.trim().to_string();

        self.state = EntryState::Processing {
            recipient: recipient.clone(),
            content: content.clone(),
        };

        let classification = match tokio::time::timeout(
            self.call_timeout,
            self.classifier.classify(&content),
        )
        .await
        {
            Ok(classification) => classification,
            Err(_) => {
                tracing::warn!("Emotion classification timed out, using fallback");
                Classification::fallback()
            }
        };

        self.state = EntryState::Comfort {
            recipient,
            content,
            classification: classification.clone(),
        };
        Ok(classification)
    }

    /// Keep the classified message: append it to the journal, then fade out.
    ///
    /// A store failure propagates after the flow has moved on; the caller
    /// prints it and goes home, the same place a success lands.
    pub fn keep(&mut self) -> Result<Entry> {
        match std::mem::replace(&mut self.state, EntryState::Fadeout) {
            EntryState::Comfort {
                recipient,
                content,
                classification,
            } => {
                let entry = Entry::new(
                    &recipient,
                    content,
                    classification.emotion,
                    classification.intensity,
                    classification.comfort,
                );
                self.store.append_entry(&entry)?;
                tracing::info!("Entry {} kept ({})", entry.id, entry.dominant_feeling);
                Ok(entry)
            }
            other => {
                self.state = other;
                bail!("No classified message to keep");
            }
        }
    }

    /// Let the message go. Nothing is stored; that is the point of the gesture.
    pub fn release(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, EntryState::Fadeout) {
            EntryState::Comfort { .. } => {
                tracing::debug!("Message released unsaved");
                Ok(())
            }
            other => {
                self.state = other;
                bail!("No classified message to release");
            }
        }
    }

    /// Abandon the flow from the writing step. Nothing was classified or stored.
    pub fn cancel(self) -> Result<()> {
        match self.state {
            EntryState::Input => Ok(()),
            _ => bail!("Too late to cancel: the message has been read"),
        }
    }
}
