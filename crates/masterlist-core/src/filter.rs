//! Free-text pattern and category toggle filtering

use regex::{Regex, RegexBuilder};

use crate::model::ServerEntry;
use crate::prefs::ViewPreferences;

/// Compiled patterns above this size are treated as invalid.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

#[derive(Debug, Clone, Default)]
enum Matcher {
    #[default]
    All,
    Pattern(Regex),
    /// A pattern that failed to compile matches nothing.
    Invalid,
}

/// Search box text plus its case-insensitive matcher.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    text: String,
    matcher: Matcher,
}

impl FilterState {
    pub fn new(text: &str) -> Self {
        let mut state = Self::default();
        state.set_text(text);
        state
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.matcher = compile(text);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// False while the current text is not a valid pattern.
    pub fn is_valid(&self) -> bool {
        !matches!(self.matcher, Matcher::Invalid)
    }

    pub fn matches(&self, name: &str) -> bool {
        match &self.matcher {
            Matcher::All => true,
            Matcher::Pattern(regex) => regex.is_match(name),
            Matcher::Invalid => false,
        }
    }
}

fn compile(text: &str) -> Matcher {
    if text.is_empty() {
        return Matcher::All;
    }

    match RegexBuilder::new(text)
        .case_insensitive(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
    {
        Ok(regex) => Matcher::Pattern(regex),
        Err(e) => {
            tracing::debug!("Invalid filter pattern {:?}: {}", text, e);
            Matcher::Invalid
        }
    }
}

/// Whether an entry survives every filtering stage.
pub fn passes(entry: &ServerEntry, filter: &FilterState, prefs: ViewPreferences) -> bool {
    if !entry.is_listed() || !filter.matches(&entry.name) {
        return false;
    }

    (prefs.show_locked || !entry.password_protected)
        && (prefs.show_empty || !entry.has_no_players())
        && (prefs.show_full || !entry.is_full())
}

/// Unnamed entries are dropped, then the text filter, then the toggles.
/// Surviving entries keep their input order.
pub fn apply_filters<'a>(
    entries: &'a [ServerEntry],
    filter: &FilterState,
    prefs: ViewPreferences,
) -> Vec<&'a ServerEntry> {
    entries
        .iter()
        .filter(|entry| passes(entry, filter, prefs))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{entry, scenario};

    fn names<'a>(entries: &[&'a ServerEntry]) -> Vec<&'a str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_empty_names_never_pass() {
        let entries = scenario();
        let filters = [FilterState::default(), FilterState::new(""), FilterState::new(".*")];
        for filter in &filters {
            let out = apply_filters(&entries, filter, ViewPreferences::default());
            assert!(out.iter().all(|e| !e.name.is_empty()));
        }
    }

    #[test]
    fn test_empty_pattern_keeps_named_entries_in_order() {
        let entries = vec![
            entry("Zulu", 1, 10),
            entry("", 5, 10),
            entry("Alpha", 3, 10),
            entry("Mike", 0, 10),
        ];
        let out = apply_filters(&entries, &FilterState::new(""), ViewPreferences::default());
        assert_eq!(names(&out), vec!["Zulu", "Alpha", "Mike"]);
    }

    #[test]
    fn test_text_filter_is_case_insensitive_substring() {
        let entries = scenario();
        let out = apply_filters(&entries, &FilterState::new("alp"), ViewPreferences::default());
        assert_eq!(names(&out), vec!["Alpha"]);

        let out = apply_filters(&entries, &FilterState::new("BETA"), ViewPreferences::default());
        assert_eq!(names(&out), vec!["Beta"]);
    }

    #[test]
    fn test_text_filter_accepts_regex() {
        let entries = vec![
            entry("[DM] Deathmatch", 1, 2),
            entry("Race", 1, 2),
            entry("Freeroam", 1, 2),
        ];
        let filter = FilterState::new("^r|roam$");
        let out = apply_filters(&entries, &filter, ViewPreferences::default());
        assert_eq!(names(&out), vec!["Race", "Freeroam"]);
    }

    #[test]
    fn test_invalid_pattern_matches_nothing() {
        let entries = scenario();
        let filter = FilterState::new("(alpha");
        assert!(!filter.is_valid());
        assert!(apply_filters(&entries, &filter, ViewPreferences::default()).is_empty());

        let mut filter = filter;
        filter.set_text("alpha");
        assert!(filter.is_valid());
        let out = apply_filters(&entries, &filter, ViewPreferences::default());
        assert_eq!(names(&out), vec!["Alpha"]);
    }

    #[test]
    fn test_hide_locked_removes_exactly_locked_entries() {
        let mut entries = vec![
            entry("a", 1, 10),
            entry("b", 2, 10),
            entry("c", 3, 10),
            entry("d", 4, 10),
        ];
        entries[1].password_protected = true;
        entries[3].password_protected = true;

        let hidden = ViewPreferences {
            show_locked: false,
            ..ViewPreferences::default()
        };
        let out = apply_filters(&entries, &FilterState::default(), hidden);
        assert_eq!(names(&out), vec!["a", "c"]);

        let restored = apply_filters(&entries, &FilterState::default(), ViewPreferences::default());
        assert_eq!(names(&restored), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_hide_empty_and_full() {
        let entries = vec![entry("empty", 0, 10), entry("some", 5, 10), entry("full", 10, 10)];

        let no_empty = ViewPreferences {
            show_empty: false,
            ..ViewPreferences::default()
        };
        assert_eq!(
            names(&apply_filters(&entries, &FilterState::default(), no_empty)),
            vec!["some", "full"]
        );

        let no_full = ViewPreferences {
            show_full: false,
            ..ViewPreferences::default()
        };
        assert_eq!(
            names(&apply_filters(&entries, &FilterState::default(), no_full)),
            vec!["empty", "some"]
        );
    }

    #[test]
    fn test_toggles_compose_conjunctively() {
        let mut entries = vec![
            entry("locked", 3, 10),
            entry("empty", 0, 10),
            entry("full", 10, 10),
            entry("open", 4, 10),
        ];
        entries[0].password_protected = true;

        let prefs = ViewPreferences {
            show_locked: false,
            show_empty: false,
            show_full: false,
        };
        let out = apply_filters(&entries, &FilterState::new("o"), prefs);
        assert_eq!(names(&out), vec!["open"]);
    }

    #[test]
    fn test_scenario_hide_full_drops_beta() {
        let entries = scenario();
        let prefs = ViewPreferences {
            show_full: false,
            ..ViewPreferences::default()
        };
        assert_eq!(names(&apply_filters(&entries, &FilterState::default(), prefs)), vec!["Alpha"]);
    }
}
