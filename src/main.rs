//! Entry point: parse CLI and dispatch to command handlers.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use cricbuzz_stats::{
    cli::{Cli, Commands},
    commands::{
        analytics::handle_query,
        crud::{handle_match, handle_player},
        feed::{handle_live, handle_players},
        overview::handle_overview,
        seed::handle_seed,
        MatchFeedKind,
    },
    Config, CricketDatabase,
};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    // RUST_LOG controls the level, e.g. RUST_LOG=cricbuzz_stats=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Run the CLI.
#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let app = Cli::parse();
    let config = Config::from_env().context("reading configuration")?;
    debug!(?config, "configuration loaded");

    let mut db = CricketDatabase::open(&config.database_url)
        .with_context(|| format!("opening {}", config.database_url))?;
    let json = app.json;

    match app.command {
        Commands::Overview => handle_overview(&config, &db, json).await?,

        Commands::Live { upcoming, recent } => {
            let kind = if upcoming {
                MatchFeedKind::Upcoming
            } else if recent {
                MatchFeedKind::Recent
            } else {
                MatchFeedKind::Live
            };
            handle_live(&config.api, &db, kind, json).await?
        }

        Commands::Players { category, format } => {
            handle_players(&config.api, &db, category, format, json).await?
        }

        Commands::Query { cmd } => handle_query(&db, cmd, json)?,

        Commands::Player { cmd } => handle_player(&mut db, cmd, json)?,

        Commands::Match { cmd } => handle_match(&mut db, cmd, json)?,

        Commands::Seed {
            live,
            from,
            format,
            clear,
        } => {
            handle_seed(
                &mut db,
                &config.api,
                live,
                from.as_deref(),
                format,
                clear,
                json,
            )
            .await?
        }
    }

    Ok(())
}
