// Flow module
// Public interface for the two journal lifecycles: writing and revisiting

mod entry;
mod reflection;

pub use entry::{EntryFlow, EntryState, FADEOUT_DWELL};
pub use reflection::{ReflectionFlow, SelfReport};
