//! # Koyomi Archive CLI
//!
//! Terminal front end for the encounter archive. Loads the feed once,
//! then prints the requested view, or runs an interactive browser that
//! reads commands from stdin.

mod args;
mod render;
mod shell;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use archive_core::{Archive, ArchiveEngine, ArchiveError, Config, FeedLoader, FeedSource, Settings};
use clap::Parser;
use is_terminal::IsTerminal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use args::{Cli, Commands};
use render::Style;
use shell::{parse_command, screen, Action, Command, Screen, View, ViewState};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {:#}", e);
        if cli.json {
            if let Some(archive_error) = e.downcast_ref::<ArchiveError>() {
                if let Ok(json) = serde_json::to_string_pretty(archive_error) {
                    eprintln!("{}", json);
                }
            }
        }
        std::process::exit(1);
    }
}

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref(), level))
        .with_writer(io::stderr)
        .init();
}

/// `RUST_LOG` wins over `--log-level` when set and valid.
fn log_filter(rust_log: Option<&str>, level: &str) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

async fn run(cli: &Cli) -> Result<()> {
    let config = Config::discover(cli.config.as_deref())?;
    let mut settings = Settings::from_config(config)?;
    if let Some(feed) = &cli.feed {
        settings = settings.with_feed(feed.as_str());
    }

    let loader = FeedLoader::new(&settings)?;
    let source = FeedSource::parse(&settings.feed);
    let archive = loader.load(&source).await?;
    let engine = ArchiveEngine::new(settings.birth_order.clone());

    let style = Style {
        birth_order: engine.birth_order(),
        unknown_location: &settings.unknown_location,
        color: !cli.no_color && !cli.json && io::stdout().is_terminal(),
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::List { filters, date, limit } => {
            let criteria = filters.to_criteria(&settings.wildcard);
            let mut rows = engine.visible(archive.records(), &criteria);
            if let Some(date) = date {
                rows.retain(|e| &e.date == date);
            }
            if let Some(limit) = limit {
                rows.truncate(*limit);
            }

            if cli.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
            } else {
                render::title(&mut out, &style, archive.len(), &archive.source)?;
                writeln!(out)?;
                render::rows(&mut out, &style, &rows)?;
            }
        }
        Commands::Latest { date, filters } => {
            let day = date.as_deref().or_else(|| archive.latest_date());
            let criteria = filters.to_criteria(&settings.wildcard);
            let groups = match day {
                Some(d) => engine.group_by_member(engine.filter(archive.records(), &criteria), d),
                None => Vec::new(),
            };

            if cli.json {
                let body = serde_json::json!({ "date": day, "groups": groups });
                writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
            } else {
                render::day(&mut out, &style, day, &groups, |_| true)?;
            }
        }
        Commands::Dates => {
            let index = archive.date_index();
            if cli.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&index)?)?;
            } else {
                render::dates(&mut out, &index)?;
            }
        }
        Commands::Members => {
            let counts = engine.member_counts(archive.records());
            if cli.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&counts)?)?;
            } else {
                render::members(&mut out, &style, &counts)?;
            }
        }
        Commands::Browse => {
            drop(out);
            browse(&loader, &source, archive, &engine, &style, &settings.wildcard).await?;
        }
    }

    Ok(())
}

/// Interactive loop. The archive is replaced wholesale on `reload`.
async fn browse(
    loader: &FeedLoader,
    source: &FeedSource,
    mut archive: Archive,
    engine: &ArchiveEngine,
    style: &Style<'_>,
    wildcard: &str,
) -> Result<()> {
    let mut state = ViewState::default();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    render::title(&mut stdout, style, archive.len(), &archive.source)?;
    draw(&mut stdout, engine, &archive, &state, style)?;

    loop {
        write!(stdout, "\n{} > ", view_name(state.view))?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match parse_command(&line, wildcard) {
            Ok(Command::Apply(action)) => {
                let expanding = matches!(action, Action::Toggle(_));
                state = state.apply(action);
                if expanding && state.view != View::Day {
                    state = state.apply(Action::Show(View::Day));
                }
            }
            Ok(Command::Reload) => match loader.load(source).await {
                Ok(fresh) => {
                    info!(rows = fresh.len(), "archive reloaded");
                    archive = fresh;
                }
                Err(e) => {
                    warn!(error = %e, code = e.error_code(), "reload failed, keeping previous archive");
                    writeln!(stdout, "{}", reload_failure(&e))?;
                    continue;
                }
            },
            Ok(Command::Help) => {
                writeln!(stdout, "{}", shell::HELP)?;
                continue;
            }
            Ok(Command::Quit) => break,
            Err(message) => {
                if !message.is_empty() {
                    writeln!(stdout, "{}", message)?;
                }
                continue;
            }
        }

        writeln!(stdout)?;
        draw(&mut stdout, engine, &archive, &state, style)?;
    }
    Ok(())
}

fn draw(out: &mut impl Write, engine: &ArchiveEngine, archive: &Archive, state: &ViewState, style: &Style) -> io::Result<()> {
    match screen(engine, archive, state) {
        Screen::Day { date, groups, expanded } => {
            render::day(out, style, date.as_deref(), &groups, |m| expanded.as_deref() == Some(m))
        }
        Screen::List(rows) => render::rows(out, style, &rows),
        Screen::Dates(index) => render::dates(out, &index),
        Screen::Members(counts) => render::members(out, style, &counts),
    }
}

fn reload_failure(error: &ArchiveError) -> String {
    if error.is_recoverable() {
        format!("Reload failed: {}. Showing the previous data; try 'reload' again.", error)
    } else {
        format!("Reload failed: {}. Showing the previous data.", error)
    }
}

fn view_name(view: View) -> &'static str {
    match view {
        View::Day => "latest",
        View::List => "list",
        View::Dates => "dates",
        View::Members => "members",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_reload_failure_suggests_retry_for_network_errors() {
        let network = ArchiveError::HttpStatus { feed: "x".into(), status: 503 };
        assert!(reload_failure(&network).contains("try 'reload' again"));

        let broken = ArchiveError::Parse { line: 2, reason: "bad".into() };
        assert!(!reload_failure(&broken).contains("again"));
    }

    #[test]
    fn test_rust_log_overrides_flag() {
        let filter = log_filter(Some("debug"), "warn");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_flag_used_without_rust_log() {
        assert_eq!(log_filter(None, "info").max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(Some("  "), "error").max_level_hint(), Some(LevelFilter::ERROR));
    }
}
