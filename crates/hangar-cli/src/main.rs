use clap::{Parser, Subcommand};
use hangar_core::addon::Addon;
use hangar_core::airport::{parse_airports_csv, Airport};
use hangar_core::config::Config;
use hangar_core::discover::scan_community_dir;
use hangar_core::format::format_size;
use hangar_db::addons::{load_addons, save_addons};
use hangar_db::airports::{
    airports_by_icao_codes, airports_refreshed_at, has_airport_data, save_airports,
};
use hangar_db::connection::{close_cache, open_cache};
use hangar_db::migrate::{migrate_legacy_addons, MigrationOutcome};
use reqwest::blocking::Client;
use rusqlite::Connection;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(
    name = "hangar",
    version,
    about = "Catalog simulator addon packages and airport reference data"
)]
struct Cli {
    #[arg(
        long = "db",
        value_name = "PATH",
        help = "Override the cache database path"
    )]
    db: Option<PathBuf>,
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Increase verbosity",
        conflicts_with = "quiet"
    )]
    verbose: bool,
    #[arg(short = 'q', long = "quiet", help = "Suppress non-error output")]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Scan the community directory and rebuild the addon cache")]
    Scan {
        #[arg(help = "Community directory (defaults to the configured path)")]
        path: Option<PathBuf>,
    },
    #[command(about = "List cached addons")]
    List,
    #[command(about = "Manage the airport reference data")]
    Airports {
        #[command(subcommand)]
        command: AirportsCommand,
    },
    #[command(about = "Manage configuration")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
enum AirportsCommand {
    #[command(about = "Download the airport dataset and rebuild the reference table")]
    Fetch {
        #[arg(long, help = "Override the dataset URL")]
        url: Option<String>,
    },
    #[command(about = "Show reference data availability")]
    Status,
    #[command(about = "Look up airports by ICAO code")]
    Lookup {
        #[arg(required = true, help = "ICAO codes to look up")]
        codes: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    #[command(about = "Set the community directory path")]
    SetPath { path: PathBuf },
    #[command(about = "Show the current configuration")]
    Show,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing home directory in environment")]
    MissingHome,
    #[error("no community path configured, run `hangar config set-path` first")]
    MissingCommunityPath,
    #[error("community directory is not accessible: {0}")]
    CommunityPathInaccessible(PathBuf),
    #[error("config error: {0}")]
    Config(#[from] hangar_core::config::ConfigError),
    #[error("scan error: {0}")]
    Scan(#[from] hangar_core::discover::ScanError),
    #[error("cache error: {0}")]
    Cache(#[from] hangar_db::connection::CacheError),
    #[error("airport dataset fetch failed ({0})")]
    DatasetFetchFailed(reqwest::StatusCode),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to create directory: {0}")]
    CreateDir(std::io::Error),
}

#[derive(Debug, Clone, Copy)]
struct Output {
    quiet: bool,
    verbose: bool,
}

impl Output {
    fn info(&self, message: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", message.as_ref());
        }
    }

    fn status(&self, message: impl AsRef<str>) {
        if !self.quiet {
            eprintln!("{}", message.as_ref());
        }
    }

    fn warn(&self, message: impl AsRef<str>) {
        if !self.quiet {
            eprintln!("{}", message.as_ref());
        }
    }

    fn verbose(&self, message: impl AsRef<str>) {
        if self.verbose && !self.quiet {
            eprintln!("{}", message.as_ref());
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let output = Output {
        quiet: cli.quiet,
        verbose: cli.verbose,
    };
    let db_override = cli.db.as_deref();

    match cli.command {
        Command::Scan { path } => cmd_scan(&output, db_override, path),
        Command::List => cmd_list(&output, db_override),
        Command::Airports { command } => match command {
            AirportsCommand::Fetch { url } => cmd_airports_fetch(&output, db_override, url),
            AirportsCommand::Status => cmd_airports_status(&output, db_override),
            AirportsCommand::Lookup { codes } => cmd_airports_lookup(&output, db_override, codes),
        },
        Command::Config { command } => match command {
            ConfigCommand::SetPath { path } => cmd_config_set_path(&output, path),
            ConfigCommand::Show => cmd_config_show(&output),
        },
    }
}

fn cmd_scan(output: &Output, db: Option<&Path>, path: Option<PathBuf>) -> Result<(), CliError> {
    let root = match path {
        Some(path) => path,
        None => configured_community_path()?,
    };
    // The root itself must be accessible; anything less is fatal to the scan.
    let accessible = std::fs::metadata(&root)
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false);
    if !accessible {
        return Err(CliError::CommunityPathInaccessible(root));
    }

    output.status(format!("scanning {}", root.display()));
    let report = run_with_spinner(output, "discovering addons", || {
        scan_community_dir(&root).map_err(CliError::from)
    })?;
    for failure in &report.failures {
        output.warn(format!(
            "skipped {}: {}",
            failure.directory.display(),
            failure.reason
        ));
    }

    let mut conn = open_cache_at(output, db)?;
    save_addons(&mut conn, &report.addons)?;
    let total_items: usize = report.addons.iter().map(|addon| addon.items.len()).sum();
    output.info(format!(
        "cached {} addons ({} items), {} skipped",
        report.addons.len(),
        total_items,
        report.failures.len()
    ));
    close_cache(conn)?;
    Ok(())
}

fn cmd_list(output: &Output, db: Option<&Path>) -> Result<(), CliError> {
    let conn = open_cache_at(output, db)?;
    match load_addons(&conn)? {
        None => output.info("addon cache is empty, run `hangar scan` first"),
        Some(addons) => {
            for addon in &addons {
                output.info(render_addon(addon));
            }
            output.status(format!("{} addons cached", addons.len()));
        }
    }
    close_cache(conn)?;
    Ok(())
}

fn cmd_airports_fetch(
    output: &Output,
    db: Option<&Path>,
    url_override: Option<String>,
) -> Result<(), CliError> {
    let url = match url_override {
        Some(url) => url,
        None => load_config()?.airports.dataset_url,
    };
    output.verbose(format!("dataset url: {}", url));

    let csv = run_with_spinner(output, "downloading airport data", || {
        fetch_airports_csv(&url)
    })?;
    let airports = parse_airports_csv(&csv);
    output.verbose(format!("parsed {} airports from csv", airports.len()));

    let mut conn = open_cache_at(output, db)?;
    run_with_spinner(output, "saving airport data", || {
        save_airports(&mut conn, &airports).map_err(CliError::from)
    })?;
    match airports_refreshed_at(&conn)? {
        Some(stamp) => output.info(format!(
            "loaded {} airports, refreshed {}",
            airports.len(),
            stamp.to_rfc3339()
        )),
        None => output.info(format!("loaded {} airports", airports.len())),
    }
    close_cache(conn)?;
    Ok(())
}

fn cmd_airports_status(output: &Output, db: Option<&Path>) -> Result<(), CliError> {
    let conn = open_cache_at(output, db)?;
    if has_airport_data(&conn)? {
        match airports_refreshed_at(&conn)? {
            Some(stamp) => output.info(format!(
                "airport data available, refreshed {}",
                stamp.to_rfc3339()
            )),
            None => output.info("airport data available"),
        }
    } else {
        output.info("no airport data, run `hangar airports fetch` first");
    }
    close_cache(conn)?;
    Ok(())
}

fn cmd_airports_lookup(
    output: &Output,
    db: Option<&Path>,
    codes: Vec<String>,
) -> Result<(), CliError> {
    let codes: Vec<String> = codes
        .into_iter()
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty())
        .collect();

    let conn = open_cache_at(output, db)?;
    let matches = airports_by_icao_codes(&conn, &codes)?;
    if matches.is_empty() {
        output.info("no matching airports");
    } else {
        for airport in &matches {
            output.info(render_airport(airport));
        }
    }
    let unmatched = codes
        .iter()
        .filter(|code| {
            !matches
                .iter()
                .any(|airport| airport.icao_code.as_deref() == Some(code.as_str()))
        })
        .count();
    if unmatched > 0 {
        output.status(format!("{} of {} codes had no match", unmatched, codes.len()));
    }
    close_cache(conn)?;
    Ok(())
}

fn cmd_config_set_path(output: &Output, path: PathBuf) -> Result<(), CliError> {
    let is_dir = std::fs::metadata(&path)
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(CliError::CommunityPathInaccessible(path));
    }

    let mut config = load_config()?;
    config.community.path = Some(path.to_string_lossy().into_owned());

    let config_path = config_path()?;
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(CliError::CreateDir)?;
    }
    config.save_to_path(&config_path)?;
    output.info(format!("community path set to {}", path.display()));
    Ok(())
}

fn cmd_config_show(output: &Output) -> Result<(), CliError> {
    let config = load_config()?;
    match &config.community.path {
        Some(path) => output.info(format!("community path: {}", path)),
        None => output.info("community path: (not set)"),
    }
    output.info(format!("airports dataset url: {}", config.airports.dataset_url));
    Ok(())
}

fn render_addon(addon: &Addon) -> String {
    let mut lines = vec![
        format!("{} ({})", addon.title, addon.package_name),
        format!("  creator: {}", addon.creator),
        format!(
            "  version: {} (requires game {})",
            addon.package_version, addon.minimum_game_version
        ),
        format!("  size: {}", format_size(addon.size)),
    ];
    if let Some(notes) = &addon.release_notes {
        lines.push(format!("  last update: {}", notes.neutral.last_update));
    }
    if !addon.items.is_empty() {
        lines.push("  items:".to_string());
        for item in &addon.items {
            lines.push(format!(
                "    - {}: {} (rev {})",
                item.item_type, item.content, item.revision
            ));
        }
    }
    lines.join("\n")
}

fn render_airport(airport: &Airport) -> String {
    let mut label = format!(
        "{} - {}",
        airport.icao_code.as_deref().unwrap_or(&airport.ident),
        airport.name
    );
    if let Some(city) = &airport.municipality {
        label.push_str(&format!(" ({})", city));
    }
    if let Some(country) = &airport.iso_country {
        label.push_str(&format!(" [{}]", country));
    }
    if let Some(elevation) = airport.elevation_ft {
        label.push_str(&format!(" elev {} ft", elevation));
    }
    label
}

fn fetch_airports_csv(url: &str) -> Result<String, CliError> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::DatasetFetchFailed(status));
    }
    Ok(response.text()?)
}

fn open_cache_at(output: &Output, db_override: Option<&Path>) -> Result<Connection, CliError> {
    let path = match db_override {
        Some(path) => path.to_path_buf(),
        None => {
            let dir = cache_dir()?;
            std::fs::create_dir_all(&dir).map_err(CliError::CreateDir)?;
            dir.join("addons.db")
        }
    };
    let mut conn = open_cache(&path)?;
    output.verbose(format!("cache opened at {}", path.display()));
    run_legacy_migration(output, &mut conn);
    Ok(conn)
}

/// Best-effort import of the pre-SQLite addons.json cache. Failures are
/// reported and swallowed; startup never blocks on this path.
fn run_legacy_migration(output: &Output, conn: &mut Connection) {
    let Ok(path) = legacy_addons_path() else {
        return;
    };
    match migrate_legacy_addons(conn, &path) {
        Ok(MigrationOutcome::NotPresent) => {}
        Ok(MigrationOutcome::Migrated(count)) => {
            output.status(format!("migrated {} addons from legacy cache", count));
        }
        Ok(MigrationOutcome::Discarded(reason)) => {
            output.warn(format!("legacy cache discarded: {}", reason));
        }
        Err(err) => output.warn(format!("legacy cache migration failed: {}", err)),
    }
}

fn configured_community_path() -> Result<PathBuf, CliError> {
    let config = load_config()?;
    config
        .community
        .path
        .map(PathBuf::from)
        .ok_or(CliError::MissingCommunityPath)
}

fn load_config() -> Result<Config, CliError> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(Config::default());
    }
    Ok(Config::load_from_path(&path)?)
}

fn run_with_spinner<T>(
    output: &Output,
    message: &str,
    action: impl FnOnce() -> Result<T, CliError>,
) -> Result<T, CliError> {
    if output.quiet || !io::stderr().is_terminal() {
        return action();
    }

    let done = Arc::new(AtomicBool::new(false));
    let done_handle = done.clone();
    let message = message.to_string();
    let message_thread = message.clone();
    let handle = thread::spawn(move || {
        let frames = ['|', '/', '-', '\\'];
        let mut index = 0usize;
        while !done_handle.load(Ordering::Relaxed) {
            eprint!("\r{} {}", message_thread, frames[index % frames.len()]);
            let _ = io::stderr().flush();
            index = index.wrapping_add(1);
            thread::sleep(Duration::from_millis(120));
        }
    });

    let result = action();
    done.store(true, Ordering::Relaxed);
    let _ = handle.join();
    match &result {
        Ok(_) => output.status(format!("\r{} done", message)),
        Err(err) => {
            output.status(format!("\r{} failed", message));
            output.warn(format!("{} error: {}", message, err));
        }
    }
    result
}

fn home_dir() -> Result<PathBuf, CliError> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or(CliError::MissingHome)
}

fn config_dir() -> Result<PathBuf, CliError> {
    home_dir().map(|home| home.join(".config").join("hangar"))
}

fn cache_dir() -> Result<PathBuf, CliError> {
    Ok(config_dir()?.join("cache"))
}

fn config_path() -> Result<PathBuf, CliError> {
    Ok(config_dir()?.join("config.toml"))
}

fn legacy_addons_path() -> Result<PathBuf, CliError> {
    Ok(config_dir()?.join("addons.json"))
}
