//! Status summary: API reachability and what the store holds.

use serde::Serialize;
use tracing::debug;

use crate::{
    config::Config,
    cricbuzz::CricbuzzClient,
    storage::{schema::TABLES, CricketDatabase},
    Result,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub rows: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub api_configured: bool,
    pub api_reachable: bool,
    /// Why the API could not be used, if it could not
    pub api_error: Option<String>,
    pub database: String,
    pub tables: Vec<TableSummary>,
}

/// Probe the API and count rows in every table
pub async fn overview(config: &Config, db: &CricketDatabase) -> Result<Overview> {
    db.ping()?;

    let probe = match CricbuzzClient::new(&config.api) {
        Ok(client) => client.verify_connection().await,
        Err(e) => Err(e),
    };
    debug!(reachable = probe.is_ok(), "API probe finished");

    let mut tables = Vec::with_capacity(TABLES.len());
    for name in TABLES {
        tables.push(TableSummary {
            name: name.to_string(),
            rows: db.row_count(name)?,
        });
    }

    Ok(Overview {
        api_configured: config.api.api_key.is_some(),
        api_reachable: probe.is_ok(),
        api_error: probe.err().map(|e| e.to_string()),
        database: config.database_url.to_string(),
        tables,
    })
}

pub async fn handle_overview(config: &Config, db: &CricketDatabase, as_json: bool) -> Result<()> {
    let summary = overview(config, db).await?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&summary)?); // tarpaulin::skip
        return Ok(());
    }

    println!("Database: {}", summary.database); // tarpaulin::skip
    for table in &summary.tables {
        println!("  {:<14} {:>6} rows", table.name, table.rows); // tarpaulin::skip
    }
    match (summary.api_reachable, &summary.api_error) {
        (true, _) => println!("API: reachable"), // tarpaulin::skip
        (false, Some(err)) => println!("API: unavailable ({err})"), // tarpaulin::skip
        (false, None) => println!("API: unavailable"), // tarpaulin::skip
    }
    Ok(())
}
