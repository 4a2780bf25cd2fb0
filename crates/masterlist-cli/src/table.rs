//! Plain-text rendering of list views

use chrono::{DateTime, Local, Utc};
use masterlist_core::{HeaderCell, ListColumn, ListStats, RowView};

const NAME_WIDTH: usize = 48;
const CONNECT_WIDTH: usize = 28;
const CELL_WIDTH: usize = 9;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn column_width(column: ListColumn) -> usize {
    match column {
        ListColumn::Name => NAME_WIDTH,
        ListColumn::Public => CONNECT_WIDTH,
        ListColumn::Password | ListColumn::Online | ListColumn::Version => CELL_WIDTH,
    }
}

pub fn header_line(headers: &[HeaderCell]) -> String {
    headers
        .iter()
        .map(|header| {
            let arrow = match (header.active, header.ascending) {
                (true, true) => " ▲",
                (true, false) => " ▼",
                _ => "",
            };
            let label = format!("{}{}", header.label, arrow);
            format!("{:<width$}", label, width = column_width(header.column))
        })
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end()
        .to_string()
}

pub fn row_line(row: &RowView) -> String {
    let connect = row.connect_url.as_deref().unwrap_or("-");
    let locked = if row.locked { "locked" } else { "" };
    let online = format!("{}/{}", row.players, row.max_players);

    format!(
        "{:<name$} {:<connect_w$} {:<cell$} {:<cell$} {}",
        truncate(&row.name, NAME_WIDTH),
        truncate(connect, CONNECT_WIDTH),
        locked,
        online,
        row.version,
        name = NAME_WIDTH,
        connect_w = CONNECT_WIDTH,
        cell = CELL_WIDTH,
    )
    .trim_end()
    .to_string()
}

pub fn stats_line(stats: &ListStats, updated_at: Option<DateTime<Utc>>) -> String {
    let mut line = format!(
        "servers: {}  online: {}  shown: {}",
        stats.servers, stats.online, stats.shown
    );
    if let Some(updated_at) = updated_at {
        line.push_str(&format!(
            "  updated {}",
            updated_at.with_timezone(&Local).format("%H:%M:%S")
        ));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use masterlist_core::SortColumn;

    fn header(column: ListColumn, active: bool, ascending: bool) -> HeaderCell {
        HeaderCell {
            label: column.label(),
            sort_column: column.sort_column(),
            active,
            ascending,
            column,
        }
    }

    #[test]
    fn test_header_marks_active_sort() {
        let headers = vec![
            header(ListColumn::Name, false, false),
            header(ListColumn::Online, true, false),
            header(ListColumn::Version, false, false),
        ];
        let line = header_line(&headers);
        assert!(line.contains("online ▼"));
        assert!(!line.contains("name ▲"));
        assert_eq!(headers[1].sort_column, Some(SortColumn::Online));
    }

    #[test]
    fn test_row_line() {
        let row = RowView {
            index: 0,
            top: 0,
            name: "Alpha".to_string(),
            connect_url: None,
            locked: true,
            players: 10,
            max_players: 20,
            version: "1.5".to_string(),
        };
        let line = row_line(&row);
        assert!(line.starts_with("Alpha "));
        assert!(line.contains(" - "));
        assert!(line.contains("locked"));
        assert!(line.contains("10/20"));
        assert!(line.ends_with("1.5"));
    }

    #[test]
    fn test_truncate_long_names() {
        let long = "x".repeat(100);
        let cut = truncate(&long, NAME_WIDTH);
        assert_eq!(cut.chars().count(), NAME_WIDTH);
        assert!(cut.ends_with('…'));
        assert_eq!(truncate("short", NAME_WIDTH), "short");
    }

    #[test]
    fn test_stats_line() {
        let stats = ListStats {
            servers: 2,
            online: 30,
            shown: 1,
        };
        assert_eq!(stats_line(&stats, None), "servers: 2  online: 30  shown: 1");
    }
}
