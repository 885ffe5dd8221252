// Journal module
// Public interface for journal records and their on-disk store

mod store;
mod types;

pub use store::{JournalStore, StoreError, StoreResult, ENTRIES_FILE, REFLECTIONS_FILE, USER_FILE};
pub use types::{new_record_id, Entry, EntryPatch, EntryStatus, Reflection, User};
