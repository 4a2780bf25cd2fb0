//! Column ordering of the filtered list

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::ServerEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Name,
    Online,
}

impl SortColumn {
    pub const ALL: [Self; 2] = [Self::Name, Self::Online];

    /// Direction a column starts with when it becomes active.
    pub fn default_direction(self) -> SortDirection {
        match self {
            Self::Name => SortDirection::Ascending,
            Self::Online => SortDirection::Descending,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Online => "online",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "online" | "players" => Ok(Self::Online),
            other => Err(format!("unknown sort column '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn is_ascending(self) -> bool {
        self == Self::Ascending
    }
}

/// Active sort column and direction, online/descending by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self::new(SortColumn::Online, SortDirection::Descending)
    }
}

impl SortState {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Header click: the active column flips direction, another column
    /// becomes active with its own default direction.
    pub fn click(&mut self, column: SortColumn) {
        if self.column == column {
            self.direction = self.direction.reversed();
        } else {
            self.column = column;
            self.direction = column.default_direction();
        }
    }

    pub fn is_active(&self, column: SortColumn) -> bool {
        self.column == column
    }
}

/// Ascending comparison for a column.
///
/// Names compare as whole strings, case-insensitively.
fn compare_column(a: &ServerEntry, b: &ServerEntry, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Online => a.player_count.cmp(&b.player_count),
        SortColumn::Name => a
            .name
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(b.name.chars().flat_map(char::to_lowercase)),
    }
}

pub fn compare(a: &ServerEntry, b: &ServerEntry, state: SortState) -> Ordering {
    let ordering = compare_column(a, b, state.column);
    match state.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Stable sort: entries that compare equal keep their input order.
pub fn apply_sort<T: Borrow<ServerEntry>>(mut entries: Vec<T>, state: SortState) -> Vec<T> {
    entries.sort_by(|a, b| compare(a.borrow(), b.borrow(), state));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{apply_filters, FilterState};
    use crate::prefs::ViewPreferences;
    use crate::test_support::{entry, scenario};

    fn names<T: Borrow<ServerEntry>>(entries: &[T]) -> Vec<String> {
        entries.iter().map(|e| e.borrow().name.clone()).collect()
    }

    #[test]
    fn test_default_is_online_descending() {
        let state = SortState::default();
        assert_eq!(state.column, SortColumn::Online);
        assert_eq!(state.direction, SortDirection::Descending);
    }

    #[test]
    fn test_click_toggles_and_switches() {
        let mut state = SortState::default();

        state.click(SortColumn::Online);
        assert_eq!(state, SortState::new(SortColumn::Online, SortDirection::Ascending));

        state.click(SortColumn::Name);
        assert_eq!(state, SortState::new(SortColumn::Name, SortDirection::Ascending));

        state.click(SortColumn::Name);
        assert_eq!(state, SortState::new(SortColumn::Name, SortDirection::Descending));

        // Coming back to online starts busiest-first again instead of carrying
        // over the ascending direction the name column was using
        state.click(SortColumn::Online);
        assert_eq!(state, SortState::new(SortColumn::Online, SortDirection::Descending));
    }

    #[test]
    fn test_scenario_default_sort_puts_beta_first() {
        let entries = scenario();
        let filtered = apply_filters(&entries, &FilterState::default(), ViewPreferences::default());
        let sorted = apply_sort(filtered, SortState::default());
        assert_eq!(names(&sorted), vec!["Beta", "Alpha"]);
    }

    #[test]
    fn test_online_direction_reverses_distinct_counts() {
        let entries = vec![
            entry("a", 5, 50),
            entry("b", 1, 50),
            entry("c", 9, 50),
            entry("d", 3, 50),
        ];

        let desc = SortState::new(SortColumn::Online, SortDirection::Descending);
        let asc = SortState::new(SortColumn::Online, SortDirection::Ascending);
        let desc = apply_sort(entries.clone(), desc);
        let asc = apply_sort(entries, asc);

        let mut reversed = names(&desc);
        reversed.reverse();
        assert_eq!(names(&asc), reversed);
        assert_eq!(names(&desc), vec!["c", "a", "d", "b"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let entries = vec![
            entry("first", 4, 10),
            entry("top", 8, 10),
            entry("second", 4, 10),
            entry("third", 4, 10),
        ];

        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let sorted = apply_sort(entries.clone(), SortState::new(SortColumn::Online, direction));
            let tied: Vec<String> = names(&sorted).into_iter().filter(|n| n != "top").collect();
            assert_eq!(tied, vec!["first", "second", "third"]);
        }
    }

    #[test]
    fn test_name_sort_uses_whole_name_case_insensitively() {
        let entries = vec![
            entry("bravo", 0, 1),
            entry("Alpha two", 0, 1),
            entry("alpha one", 0, 1),
            entry("Charlie", 0, 1),
        ];

        let asc = SortState::new(SortColumn::Name, SortDirection::Ascending);
        let asc = apply_sort(entries.clone(), asc);
        assert_eq!(names(&asc), vec!["alpha one", "Alpha two", "bravo", "Charlie"]);

        let desc = SortState::new(SortColumn::Name, SortDirection::Descending);
        let desc = apply_sort(entries, desc);
        assert_eq!(names(&desc), vec!["Charlie", "bravo", "Alpha two", "alpha one"]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let entries = scenario();
        let state = SortState::new(SortColumn::Name, SortDirection::Descending);
        let once = apply_sort(entries.clone(), state);
        let twice = apply_sort(once.clone(), state);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_column_from_str() {
        assert_eq!("name".parse::<SortColumn>(), Ok(SortColumn::Name));
        assert_eq!("Online".parse::<SortColumn>(), Ok(SortColumn::Online));
        assert!("version".parse::<SortColumn>().is_err());
    }
}
