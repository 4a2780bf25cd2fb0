//! Masterlist CLI - browse the game server list from a terminal

mod fetch;
mod logging;
mod table;

use std::io::{self, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use masterlist_core::{
    poll, Config, Controller, FileBackend, ListView, PreferenceBackend, PreferenceStore,
    PreferenceToggle, SortColumn, SortDirection, SortState, Viewport,
};

use fetch::HttpFetcher;

#[derive(Parser, Debug)]
#[command(name = "masterlist-cli")]
#[command(author, version, about = "Game server list browser", long_about = None)]
struct Cli {
    /// List endpoint URL
    #[arg(
        long,
        global = true,
        env = "MASTERLIST_ENDPOINT",
        default_value = "http://127.0.0.1:8080/api/list"
    )]
    endpoint: String,

    /// Seconds between the end of one refresh and the start of the next
    #[arg(long, global = true, env = "MASTERLIST_INTERVAL", default_value_t = 30)]
    interval: u64,

    /// Scheme of connect links
    #[arg(long, global = true, env = "MASTERLIST_SCHEME", default_value = "mtasa")]
    scheme: String,

    /// Directory for preferences and logs (defaults to the OS data directory)
    #[arg(long, global = true, env = "MASTERLIST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct ViewArgs {
    /// Case-insensitive name pattern (regular expression)
    #[arg(short, long, default_value = "")]
    filter: String,

    /// Column to sort by: name or online
    #[arg(short, long, default_value = "online")]
    sort: SortColumn,

    /// Sort ascending
    #[arg(long, conflicts_with = "desc")]
    asc: bool,

    /// Sort descending
    #[arg(long)]
    desc: bool,
}

impl ViewArgs {
    fn sort_state(&self) -> SortState {
        let direction = if self.asc {
            SortDirection::Ascending
        } else if self.desc {
            SortDirection::Descending
        } else {
            self.sort.default_direction()
        };
        SortState::new(self.sort, direction)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the list once and print it
    List {
        #[command(flatten)]
        view: ViewArgs,

        /// Print at most this many rows
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Keep refreshing and redraw one page of the list after every cycle
    Watch {
        #[command(flatten)]
        view: ViewArgs,

        /// Rows per page
        #[arg(long, default_value_t = 20)]
        rows: u32,

        /// First row of the page
        #[arg(long, default_value_t = 0)]
        offset: u32,

        /// Use the 5 second cadence
        #[arg(long)]
        fast: bool,

        /// Stop after this many refresh cycles
        #[arg(long)]
        cycles: Option<u64>,
    },

    /// Show or edit the persisted view preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand, Debug)]
enum PrefsAction {
    /// Print the current preference record
    Show,

    /// Change one or more toggles
    Set {
        /// Show password protected servers
        #[arg(long)]
        locked: Option<bool>,

        /// Show servers without players
        #[arg(long)]
        empty: Option<bool>,

        /// Show full servers
        #[arg(long)]
        full: Option<bool>,
    },
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let config = Config {
            endpoint: self.endpoint.clone(),
            refresh_interval: Duration::from_secs(self.interval),
            connect_scheme: self.scheme.clone(),
            // The terminal prints exactly the requested page
            overscan: 0,
            ..Config::default()
        };
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            directories::ProjectDirs::from("", "", "masterlist")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = cli.data_dir();

    // Watch redraws stdout, so its logs go to a file
    let _guard = match cli.command {
        Commands::Watch { .. } => Some(logging::init_file_logging(&data_dir)),
        _ => {
            logging::init_console_logging();
            None
        }
    };

    let mut config = cli.config()?;
    let backend = FileBackend::new(&data_dir);

    match cli.command {
        Commands::List { view, limit, json } => {
            cmd_list(config, backend, &view, limit, json).await?;
        }
        Commands::Watch {
            view,
            rows,
            offset,
            fast,
            cycles,
        } => {
            if fast {
                config.refresh_interval = Config::FAST_REFRESH;
            }
            cmd_watch(config, backend, &view, rows, offset, cycles).await?;
        }
        Commands::Prefs { action } => {
            cmd_prefs(&config, backend, action)?;
        }
    }

    Ok(())
}

fn new_controller(
    config: Config,
    backend: FileBackend,
    view: &ViewArgs,
) -> Controller<FileBackend> {
    let mut controller = Controller::new(config, backend);
    controller.set_filter_text(&view.filter);
    controller.set_sort(view.sort_state());
    if !controller.filter().is_valid() {
        tracing::warn!("Filter {:?} is not a valid pattern; nothing will match", view.filter);
    }
    controller
}

async fn cmd_list(
    config: Config,
    backend: FileBackend,
    view: &ViewArgs,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let fetcher = HttpFetcher::new(&config.endpoint)?;
    let row_height = config.row_height;
    let mut controller = new_controller(config, backend, view);

    let snapshot = fetcher
        .fetch()
        .await
        .with_context(|| format!("Failed to fetch server list from {}", fetcher.endpoint()))?;
    controller.apply_snapshot(snapshot);

    let count = limit.unwrap_or(controller.visible_len()).min(controller.visible_len());
    let height = u32::try_from(count).unwrap_or(u32::MAX).saturating_mul(row_height);
    controller.set_viewport(Viewport::new(0, height));

    let list = controller.view();
    let rows: Vec<_> = list.rows.iter().take(count).collect();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &rows).context("Failed to write JSON")?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", table::stats_line(&list.stats, list.updated_at))?;
        writeln!(out, "{}", table::header_line(&list.headers))?;
        for row in rows {
            writeln!(out, "{}", table::row_line(row))?;
        }
    }

    Ok(())
}

async fn cmd_watch(
    config: Config,
    backend: FileBackend,
    view: &ViewArgs,
    rows: u32,
    offset: u32,
    cycles: Option<u64>,
) -> Result<()> {
    let fetcher = HttpFetcher::new(&config.endpoint)?;
    let interval = config.refresh_interval;
    let row_height = config.row_height;
    let mut controller = new_controller(config, backend, view);
    controller.set_viewport(Viewport::new(
        offset.saturating_mul(row_height),
        rows.saturating_mul(row_height),
    ));

    tracing::info!(
        "Watching {} every {}s",
        fetcher.endpoint(),
        interval.as_secs()
    );

    let fetcher = &fetcher;
    let mut completed = 0u64;
    let refresh = poll(
        interval,
        move || fetcher.fetch(),
        tokio::time::sleep,
        |result| {
            controller.apply_fetch(result);
            if let Err(e) = redraw(&controller.view(), rows) {
                tracing::error!("Failed to draw list: {}", e);
            }

            completed += 1;
            match cycles {
                Some(limit) if completed >= limit => ControlFlow::Break(()),
                _ => ControlFlow::Continue(()),
            }
        },
    );

    tokio::select! {
        _ = refresh => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
        }
    }

    Ok(())
}

fn redraw(list: &ListView, rows: u32) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // Clear screen, cursor home
    write!(out, "\x1b[2J\x1b[H")?;
    writeln!(out, "{}", table::stats_line(&list.stats, list.updated_at))?;
    writeln!(out, "{}", table::header_line(&list.headers))?;

    let visible = list.window.visible();
    for row in list
        .rows
        .iter()
        .filter(|row| visible.contains(&row.index))
        .take(rows as usize)
    {
        writeln!(out, "{}", table::row_line(row))?;
    }

    if list.rows.is_empty() && !list.loading {
        writeln!(out, "(no servers match the current filters)")?;
    }
    out.flush()
}

fn cmd_prefs(config: &Config, backend: FileBackend, action: PrefsAction) -> Result<()> {
    let path = backend.path_for(&config.storage_key);
    let mut store = PreferenceStore::load(backend, config.storage_key.clone());

    if let PrefsAction::Set { locked, empty, full } = action {
        let changes = [
            (PreferenceToggle::Locked, locked),
            (PreferenceToggle::Empty, empty),
            (PreferenceToggle::Full, full),
        ];
        let mut prefs = store.preferences();
        for (toggle, value) in changes {
            if let Some(value) = value {
                prefs.set(toggle, value);
            }
        }
        store
            .save(prefs)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Saved preferences to {}", path.display());
    }

    let raw = store
        .backend()
        .read(store.key())
        .context("Failed to read preferences")?;
    println!("{}", path.display());
    match raw {
        Some(_) => println!("{}", serde_json::to_string_pretty(&store.preferences())?),
        None => println!(
            "(not saved yet, defaults apply)\n{}",
            serde_json::to_string_pretty(&store.preferences())?
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_arguments() {
        let cli = Cli::try_parse_from([
            "masterlist-cli", "list", "--filter", "alp", "--sort", "name", "--desc", "--limit", "5",
        ])
        .unwrap();

        match cli.command {
            Commands::List { view, limit, json } => {
                assert_eq!(view.filter, "alp");
                assert_eq!(
                    view.sort_state(),
                    SortState::new(SortColumn::Name, SortDirection::Descending)
                );
                assert_eq!(limit, Some(5));
                assert!(!json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_sort_defaults_follow_column() {
        let cli = Cli::try_parse_from(["masterlist-cli", "list", "--sort", "name"]).unwrap();
        let Commands::List { view, .. } = cli.command else {
            panic!("expected list");
        };
        assert_eq!(view.sort_state(), SortState::new(SortColumn::Name, SortDirection::Ascending));

        let cli = Cli::try_parse_from(["masterlist-cli", "list"]).unwrap();
        let Commands::List { view, .. } = cli.command else {
            panic!("expected list");
        };
        assert_eq!(view.sort_state(), SortState::default());
    }

    #[test]
    fn test_asc_and_desc_conflict() {
        assert!(Cli::try_parse_from(["masterlist-cli", "list", "--asc", "--desc"]).is_err());
    }

    #[test]
    fn test_config_from_arguments() {
        let cli = Cli::try_parse_from([
            "masterlist-cli",
            "--interval",
            "5",
            "--endpoint",
            "http://example.org/api/list",
            "watch",
        ])
        .unwrap();
        let config = cli.config().unwrap();
        assert_eq!(config.refresh_interval, Config::FAST_REFRESH);
        assert_eq!(config.endpoint, "http://example.org/api/list");
        assert_eq!(config.overscan, 0);

        let cli =
            Cli::try_parse_from(["masterlist-cli", "--interval", "0", "prefs", "show"]).unwrap();
        assert!(cli.config().is_err());
    }

    #[test]
    fn test_prefs_set_arguments() {
        let cli =
            Cli::try_parse_from(["masterlist-cli", "prefs", "set", "--locked", "false"]).unwrap();
        match cli.command {
            Commands::Prefs {
                action: PrefsAction::Set { locked, empty, full },
            } => {
                assert_eq!(locked, Some(false));
                assert_eq!(empty, None);
                assert_eq!(full, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
