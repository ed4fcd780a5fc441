//! Types, functions, constants and other items that are globally relevant throughout the codebase.

mod args;
mod config;
mod context;

pub use args::*;
pub use config::*;
pub use context::*;

pub const CONFIG_FILENAME: &str = "wiki-gh.toml";
pub const PREFERENCE_STORE_PATH: &str = ".wiki-gh/preferences.toml";

/// First path segment of every link we pick up, e.g. `wiki-gh/owner/repo/wiki/Page`.
pub const DEFAULT_LINK_PREFIX: &str = "wiki-gh";
/// Prefix applied to every preference key, keeping us clear of anything else in the store.
pub const DEFAULT_NAMESPACE: &str = "GHWSGI";
/// Preference key holding the active render mode.
pub const MODE_KEY: &str = "mode";

pub const CONTENT_BLOCK_CLASS: &str = "wiki-gh-content";
pub const TOGGLE_CLASS: &str = "wiki-gh-toggle";
pub const TOGGLE_MODE_ATTRIBUTE: &str = "data-wiki-gh-mode";

/// Origin used for pages read from the local filesystem.
pub const FILE_ORIGIN: &str = "file://";
