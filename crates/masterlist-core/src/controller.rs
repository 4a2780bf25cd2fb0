//! Presentation controller
//!
//! Owns the current snapshot and all interaction state. Every event handler
//! mutates its piece of state and then rebuilds the filtered + sorted order
//! synchronously; scroll and resize only move the window.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::error::FetchError;
use crate::filter::{self, FilterState};
use crate::model::{ServerEntry, Snapshot};
use crate::prefs::{PreferenceBackend, PreferenceStore, PreferenceToggle, ViewPreferences};
use crate::sort::{self, SortColumn, SortState};
use crate::window::{ListColumn, Viewport, WindowGeometry, WindowRange};

/// Outcome of the fetch cycles seen so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchStatus {
    /// True until the first cycle settles
    pub loading: bool,
    pub cycles: u64,
    pub consecutive_failures: u32,
    /// Kept for diagnostics only, never shown as an alert
    pub last_error: Option<String>,
}

/// Toolbar counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListStats {
    /// Named entries in the current snapshot
    pub servers: usize,
    /// Players across those entries
    pub online: u64,
    /// Entries left after filtering
    pub shown: usize,
}

/// One table header cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub label: &'static str,
    pub sort_column: Option<SortColumn>,
    pub active: bool,
    pub ascending: bool,
    #[serde(skip)]
    pub column: ListColumn,
}

/// One materialized row, ready for the host to paint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    /// Position in the filtered + sorted list
    pub index: usize,
    /// Offset from the top of the content, in pixels
    pub top: u64,
    pub name: String,
    pub connect_url: Option<String>,
    pub locked: bool,
    pub players: u32,
    pub max_players: u32,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListView {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<RowView>,
    pub content_height: u64,
    #[serde(skip)]
    pub window: WindowRange,
    pub stats: ListStats,
    pub filter_valid: bool,
    pub updated_at: Option<DateTime<Utc>>,
    pub loading: bool,
}

#[derive(Debug)]
pub struct Controller<B> {
    config: Config,
    geometry: WindowGeometry,
    snapshot: Option<Snapshot>,
    filter: FilterState,
    sort: SortState,
    prefs: PreferenceStore<B>,
    viewport: Viewport,
    /// Indices into the snapshot, filtered and sorted
    order: Vec<usize>,
    /// Counters kept alongside `order`; viewport changes never touch them
    stats: ListStats,
    /// Bumped whenever the controller moves the list back to the top
    scroll_resets: u64,
    status: FetchStatus,
}

impl<B: PreferenceBackend> Controller<B> {
    /// Preferences are loaded here, once.
    pub fn new(config: Config, backend: B) -> Self {
        let prefs = PreferenceStore::load(backend, config.storage_key.clone());
        Self {
            geometry: config.geometry(),
            config,
            snapshot: None,
            filter: FilterState::default(),
            sort: SortState::default(),
            prefs,
            viewport: Viewport::default(),
            order: Vec::new(),
            stats: ListStats::default(),
            scroll_resets: 0,
            status: FetchStatus {
                loading: true,
                ..FetchStatus::default()
            },
        }
    }

    /// Settle one fetch cycle. A failure leaves the displayed list untouched.
    pub fn apply_fetch(&mut self, result: Result<Snapshot, FetchError>) {
        self.status.cycles += 1;
        self.status.loading = false;

        match result {
            Ok(snapshot) => {
                self.status.consecutive_failures = 0;
                self.status.last_error = None;
                self.apply_snapshot(snapshot);
            }
            Err(e) => {
                self.status.consecutive_failures += 1;
                tracing::warn!(
                    "Keeping previous list after fetch failure ({} in a row): {}",
                    self.status.consecutive_failures,
                    e
                );
                self.status.last_error = Some(e.to_string());
            }
        }
    }

    /// Replace the snapshot wholesale.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        tracing::info!("Applying snapshot with {} entries", snapshot.len());
        self.status.loading = false;

        let (servers, online) = snapshot
            .entries()
            .iter()
            .filter(|entry| entry.is_listed())
            .fold((0, 0u64), |(servers, online), entry| {
                (servers + 1, online + u64::from(entry.player_count))
            });
        self.stats.servers = servers;
        self.stats.online = online;

        self.snapshot = Some(snapshot);
        self.recompute();
    }

    pub fn set_filter_text(&mut self, text: &str) {
        if self.filter.text() == text {
            return;
        }
        self.filter.set_text(text);
        self.viewport.scroll_offset = 0;
        self.scroll_resets += 1;
        self.recompute();
    }

    pub fn click_sort(&mut self, column: SortColumn) {
        self.sort.click(column);
        self.recompute();
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
        self.recompute();
    }

    /// Persists synchronously; a failed write is logged and the new value
    /// still applies for this session.
    pub fn set_toggle(&mut self, toggle: PreferenceToggle, value: bool) {
        if let Err(e) = self.prefs.set(toggle, value) {
            tracing::warn!("Failed to save preferences: {}", e);
        }
        self.recompute();
    }

    pub fn toggle(&mut self, toggle: PreferenceToggle) {
        let current = self.prefs.preferences().get(toggle);
        self.set_toggle(toggle, !current);
    }

    pub fn scroll(&mut self, offset: u32) {
        self.viewport.scroll_offset = offset;
    }

    pub fn resize(&mut self, height: u32) {
        self.viewport.height = height;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn recompute(&mut self) {
        let Some(snapshot) = &self.snapshot else {
            self.order.clear();
            self.stats.shown = 0;
            return;
        };

        let entries = snapshot.entries();
        let prefs = self.prefs.preferences();
        let mut order: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| filter::passes(entry, &self.filter, prefs))
            .map(|(index, _)| index)
            .collect();

        let state = self.sort;
        order.sort_by(|a, b| match (entries.get(*a), entries.get(*b)) {
            (Some(a), Some(b)) => sort::compare(a, b, state),
            _ => a.cmp(b),
        });

        tracing::debug!("Showing {} of {} entries", order.len(), entries.len());
        self.stats.shown = order.len();
        self.order = order;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn preferences(&self) -> ViewPreferences {
        self.prefs.preferences()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn visible_len(&self) -> usize {
        self.order.len()
    }

    /// Filtered + sorted entries in display order.
    pub fn visible_entries(&self) -> impl Iterator<Item = &ServerEntry> + '_ {
        let entries = self.snapshot.as_ref().map(Snapshot::entries).unwrap_or_default();
        self.order.iter().filter_map(move |index| entries.get(*index))
    }

    /// Totals are taken when a snapshot lands, so this is free to call on
    /// every scroll.
    pub fn stats(&self) -> ListStats {
        self.stats
    }

    /// Counts the times the controller reset the scroll offset to zero. Hosts
    /// that own a real scroll position compare it against the last value they
    /// saw and move their own scroller to the top when it changes.
    pub fn scroll_resets(&self) -> u64 {
        self.scroll_resets
    }

    pub fn window(&self) -> WindowRange {
        self.geometry.range(self.order.len(), self.viewport)
    }

    pub fn content_height(&self) -> u64 {
        self.geometry.content_height(self.order.len())
    }

    pub fn headers(&self) -> Vec<HeaderCell> {
        ListColumn::ALL
            .iter()
            .map(|&column| {
                let sort_column = column.sort_column();
                let active = sort_column.is_some_and(|c| self.sort.is_active(c));
                HeaderCell {
                    label: column.label(),
                    sort_column,
                    active,
                    ascending: active && self.sort.direction.is_ascending(),
                    column,
                }
            })
            .collect()
    }

    /// Row descriptors for the current window only.
    pub fn rows(&self) -> Vec<RowView> {
        let Some(snapshot) = &self.snapshot else {
            return Vec::new();
        };
        let entries = snapshot.entries();
        let range = self.window();

        self.order
            .get(range.indices())
            .unwrap_or_default()
            .iter()
            .zip(range.indices())
            .filter_map(|(entry_index, index)| {
                let entry = entries.get(*entry_index)?;
                Some(RowView {
                    index,
                    top: self.geometry.row_top(index),
                    name: entry.name.clone(),
                    connect_url: entry.connect_url(&self.config.connect_scheme),
                    locked: entry.password_protected,
                    players: entry.player_count,
                    max_players: entry.max_players,
                    version: entry.version_display().to_string(),
                })
            })
            .collect()
    }

    pub fn view(&self) -> ListView {
        ListView {
            headers: self.headers(),
            rows: self.rows(),
            content_height: self.content_height(),
            window: self.window(),
            stats: self.stats(),
            filter_valid: self.filter.is_valid(),
            updated_at: self.snapshot.as_ref().map(Snapshot::fetched_at),
            loading: self.status.loading,
        }
    }
}
