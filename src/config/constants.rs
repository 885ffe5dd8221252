// Project-wide constants
//
// Centralised here so model names and other magic values have one
// source of truth. Import via `use crate::config::constants::*;`.

/// Model used for classification and insight requests.
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";

/// Default maximum tokens for Claude API requests.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Default HTTP timeout for Claude API requests.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// How long an entry rests before it can be revisited.
pub const DEFAULT_REFLECTION_DELAY_MINUTES: i64 = 1;

/// Directory under the home directory holding config and journal data.
pub const APP_DIR: &str = ".unsent";

/// Config file name inside the app directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Journal directory name inside the app directory.
pub const JOURNAL_DIR: &str = "journal";
