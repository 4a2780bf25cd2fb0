//! Server entries and snapshots as delivered by the list endpoint

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{DecodeError, FetchError};

/// Substring of a version tag that marks a build nobody can join.
pub const NOT_CONNECTABLE_MARKER: &str = "n";

/// One discovered game server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerEntry {
    #[serde(rename = "ip")]
    pub address: String,
    pub port: u16,
    pub name: String,
    #[serde(rename = "players")]
    pub player_count: u32,
    #[serde(rename = "maxplayers")]
    pub max_players: u32,
    #[serde(rename = "password")]
    pub password_protected: bool,
    #[serde(rename = "version")]
    pub version_tag: String,
    pub connectable: bool,
}

/// Shape of one element of the feed before validation.
#[derive(Debug, Deserialize)]
struct WireEntry {
    #[serde(rename = "ip", alias = "address")]
    address: String,
    port: u64,
    #[serde(default)]
    name: String,
    #[serde(rename = "players", alias = "playerCount")]
    player_count: u32,
    #[serde(rename = "maxplayers", alias = "maxPlayers")]
    max_players: u32,
    #[serde(
        rename = "password",
        alias = "passwordProtected",
        default,
        deserialize_with = "flag"
    )]
    password_protected: bool,
    #[serde(rename = "version", alias = "versionTag", default)]
    version_tag: String,
    #[serde(default)]
    connectable: Option<bool>,
}

/// The producer sends `password` as 0/1; newer feeds send a boolean.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(u64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Number(value) => value != 0,
    })
}

impl ServerEntry {
    /// Decode one feed element, validating the port range and deriving
    /// `connectable` from the version tag when the feed omits it.
    pub fn decode(value: Value) -> Result<Self, DecodeError> {
        let wire: WireEntry = serde_json::from_value(value)?;

        let port = u16::try_from(wire.port)
            .ok()
            .filter(|port| *port != 0)
            .ok_or(DecodeError::PortOutOfRange(wire.port))?;

        let connectable = wire
            .connectable
            .unwrap_or_else(|| is_connectable_version(&wire.version_tag));

        Ok(Self {
            address: wire.address,
            port,
            name: wire.name,
            player_count: wire.player_count,
            max_players: wire.max_players,
            password_protected: wire.password_protected,
            version_tag: wire.version_tag,
            connectable,
        })
    }

    /// Entries without a name never reach the visible set.
    pub fn is_listed(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn has_no_players(&self) -> bool {
        self.player_count == 0
    }

    pub fn is_full(&self) -> bool {
        self.player_count == self.max_players
    }

    /// Deep link for the connect action, `None` for non-joinable builds.
    pub fn connect_url(&self, scheme: &str) -> Option<String> {
        self.connectable
            .then(|| format!("{}://{}:{}", scheme, self.address, self.port))
    }

    pub fn version_display(&self) -> VersionDisplay {
        VersionDisplay::parse(&self.version_tag)
    }
}

pub fn is_connectable_version(version_tag: &str) -> bool {
    !version_tag.contains(NOT_CONNECTABLE_MARKER)
}

/// Numeric version shown in the version column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VersionDisplay {
    Number(f64),
    NotANumber,
}

impl VersionDisplay {
    /// Reads the numeric-leading portion of a tag, so `"1.5n"` shows as `1.5`.
    pub fn parse(tag: &str) -> Self {
        leading_float(tag).map_or(Self::NotANumber, Self::Number)
    }
}

impl fmt::Display for VersionDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) if value.is_infinite() => {
                f.write_str(if value.is_sign_negative() { "-Infinity" } else { "Infinity" })
            }
            Self::Number(value) => write!(f, "{}", value),
            Self::NotANumber => f.write_str("NaN"),
        }
    }
}

fn leading_float(tag: &str) -> Option<f64> {
    let text = tag.trim_start();
    let bytes = text.as_bytes();
    let is_digit = |at: usize| bytes.get(at).is_some_and(u8::is_ascii_digit);

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if text.get(end..).is_some_and(|rest| rest.starts_with("Infinity")) {
        let negative = bytes.first() == Some(&b'-');
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }
    let int_start = end;
    while is_digit(end) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let mut frac_end = end + 1;
        while is_digit(frac_end) {
            frac_end += 1;
        }
        digits += frac_end - (end + 1);
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while is_digit(exp_end) {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    text.get(..end)?.parse().ok()
}

/// One complete fetch result. Replaced wholesale by the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    entries: Vec<ServerEntry>,
    fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(entries: Vec<ServerEntry>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            entries,
            fetched_at,
        }
    }

    /// Decode a list body. Elements that fail to decode are logged and
    /// skipped; only a body that is not a JSON array fails the cycle.
    pub fn decode(body: &str, fetched_at: DateTime<Utc>) -> Result<Self, FetchError> {
        let elements: Vec<Value> =
            serde_json::from_str(body).map_err(|e| FetchError::Body(e.to_string()))?;

        let total = elements.len();
        let entries: Vec<ServerEntry> = elements
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match ServerEntry::decode(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping malformed entry #{}: {}", index, e);
                    None
                }
            })
            .collect();

        tracing::debug!("Decoded {} of {} entries", entries.len(), total);
        Ok(Self::new(entries, fetched_at))
    }

    pub fn entries(&self) -> &[ServerEntry] {
        &self.entries
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_producer_format() {
        let entry = ServerEntry::decode(json!({
            "ip": "1.2.3.4",
            "port": 22003,
            "name": "Alpha",
            "players": 10,
            "maxplayers": 20,
            "password": 0,
            "version": "1.5"
        }))
        .unwrap();

        assert_eq!(entry.address, "1.2.3.4");
        assert_eq!(entry.port, 22003);
        assert_eq!(entry.player_count, 10);
        assert_eq!(entry.max_players, 20);
        assert!(!entry.password_protected);
        assert!(entry.connectable);
    }

    #[test]
    fn test_decode_spec_names_and_bool_password() {
        let entry = ServerEntry::decode(json!({
            "address": "example.org",
            "port": 1,
            "name": "Beta",
            "playerCount": 3,
            "maxPlayers": 4,
            "passwordProtected": true,
            "versionTag": "1.6",
            "connectable": false
        }))
        .unwrap();

        assert!(entry.password_protected);
        assert!(!entry.connectable);
    }

    #[test]
    fn test_connectable_derived_from_version_marker() {
        let entry = ServerEntry::decode(json!({
            "ip": "1.2.3.4", "port": 22003, "name": "Beta",
            "players": 20, "maxplayers": 20, "password": 1, "version": "1.5n"
        }))
        .unwrap();

        assert!(!entry.connectable);
        assert_eq!(entry.connect_url("mtasa"), None);
    }

    #[test]
    fn test_port_out_of_range_is_malformed() {
        for port in [0, 65536] {
            let result = ServerEntry::decode(json!({
                "ip": "1.2.3.4", "port": port, "name": "x",
                "players": 0, "maxplayers": 0
            }));
            assert!(matches!(result, Err(DecodeError::PortOutOfRange(p)) if p == port));
        }
    }

    #[test]
    fn test_snapshot_skips_malformed_entries() {
        let body = r#"[
            {"ip": "1.1.1.1", "port": 1, "name": "good", "players": 1, "maxplayers": 2},
            {"ip": "1.1.1.1", "port": "oops", "name": "bad", "players": 1, "maxplayers": 2},
            {"name": "missing address"},
            {"ip": "2.2.2.2", "port": 2, "name": "also good", "players": 0, "maxplayers": 2}
        ]"#;

        let snapshot = Snapshot::decode(body, Utc::now()).unwrap();
        let names: Vec<&str> = snapshot.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["good", "also good"]);
    }

    #[test]
    fn test_snapshot_rejects_non_array_body() {
        assert!(matches!(
            Snapshot::decode(r#"{"servers": []}"#, Utc::now()),
            Err(FetchError::Body(_))
        ));
        assert!(matches!(
            Snapshot::decode("<html>", Utc::now()),
            Err(FetchError::Body(_))
        ));
    }

    #[test]
    fn test_connect_url() {
        let entry = ServerEntry::decode(json!({
            "ip": "10.0.0.1", "port": 22003, "name": "x",
            "players": 0, "maxplayers": 0, "version": "1.6"
        }))
        .unwrap();

        assert_eq!(
            entry.connect_url("mtasa").as_deref(),
            Some("mtasa://10.0.0.1:22003")
        );
    }

    #[test]
    fn test_version_display() {
        assert_eq!(VersionDisplay::parse("1.5"), VersionDisplay::Number(1.5));
        assert_eq!(VersionDisplay::parse("1.5n"), VersionDisplay::Number(1.5));
        assert_eq!(VersionDisplay::parse("1.6.0-9.21"), VersionDisplay::Number(1.6));
        assert_eq!(VersionDisplay::parse("  2e1x"), VersionDisplay::Number(20.0));
        assert_eq!(VersionDisplay::parse(".5"), VersionDisplay::Number(0.5));
        assert_eq!(VersionDisplay::parse("n1.5"), VersionDisplay::NotANumber);
        assert_eq!(VersionDisplay::parse(""), VersionDisplay::NotANumber);
        assert_eq!(VersionDisplay::parse("-"), VersionDisplay::NotANumber);
        assert_eq!(VersionDisplay::parse("1.50").to_string(), "1.5");
        assert_eq!(VersionDisplay::parse("1.0").to_string(), "1");
        assert_eq!(VersionDisplay::NotANumber.to_string(), "NaN");
    }

    #[test]
    fn test_version_display_infinity() {
        assert_eq!(VersionDisplay::parse("Infinity").to_string(), "Infinity");
        assert_eq!(VersionDisplay::parse("-Infinityx").to_string(), "-Infinity");
        assert_eq!(VersionDisplay::parse("+Infinity").to_string(), "Infinity");
        assert_eq!(VersionDisplay::parse("1e999").to_string(), "Infinity");
        assert_eq!(VersionDisplay::parse("infinity"), VersionDisplay::NotANumber);
    }

    #[test]
    fn test_empty_and_full() {
        let mut entry = ServerEntry::decode(json!({
            "ip": "1.1.1.1", "port": 1, "name": "x", "players": 0, "maxplayers": 0
        }))
        .unwrap();
        assert!(entry.has_no_players());
        assert!(entry.is_full());

        entry.player_count = 5;
        entry.max_players = 10;
        assert!(!entry.has_no_players());
        assert!(!entry.is_full());
    }
}
