//! Masterlist Core - server list synchronization and presentation engine
//!
//! Polls a list endpoint, keeps the latest snapshot, and derives a filtered,
//! sorted and windowed view of it. Hosts provide the network, timers,
//! storage and painting.

pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod model;
pub mod poll;
pub mod prefs;
pub mod sort;
pub mod window;

pub use config::Config;
pub use controller::{Controller, FetchStatus, HeaderCell, ListStats, ListView, RowView};
pub use error::{ConfigError, DecodeError, FetchError, PreferenceError};
pub use filter::{apply_filters, FilterState};
pub use model::{ServerEntry, Snapshot, VersionDisplay};
pub use poll::poll;
pub use prefs::{
    FileBackend, MemoryBackend, PreferenceBackend, PreferenceStore, PreferenceToggle,
    ViewPreferences,
};
pub use sort::{apply_sort, SortColumn, SortDirection, SortState};
pub use window::{ColumnLayout, ListColumn, Viewport, WindowGeometry, WindowRange};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::model::{is_connectable_version, ServerEntry};

    pub fn entry(name: &str, players: u32, max_players: u32) -> ServerEntry {
        ServerEntry {
            address: "127.0.0.1".to_string(),
            port: 22003,
            name: name.to_string(),
            player_count: players,
            max_players,
            password_protected: false,
            version_tag: "1.6".to_string(),
            connectable: true,
        }
    }

    /// Alpha (10/20, open, 1.5), an unnamed entry, Beta (20/20, locked, 1.5n)
    pub fn scenario() -> Vec<ServerEntry> {
        let mut alpha = entry("Alpha", 10, 20);
        alpha.version_tag = "1.5".to_string();

        let unnamed = entry("", 5, 10);

        let mut beta = entry("Beta", 20, 20);
        beta.password_protected = true;
        beta.version_tag = "1.5n".to_string();
        beta.connectable = is_connectable_version(&beta.version_tag);

        vec![alpha, unnamed, beta]
    }
}
