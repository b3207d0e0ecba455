//! Query catalog listing and execution from the command line.

use crate::{
    cli::QueryCmd,
    storage::{catalog, CricketDatabase, QueryCatalog},
    Result,
};

use super::output::{render_table, result_set_table};

/// Text listing of the catalog grouped by category
pub fn catalog_listing() -> String {
    let columns: Vec<String> = ["#", "Category", "Query", "Parameters"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    let rows: Vec<Vec<String>> = catalog()
        .iter()
        .map(|q| {
            let params = q
                .params
                .iter()
                .map(|p| format!("{}={}", p.name, p.default))
                .collect::<Vec<_>>()
                .join(" ");
            vec![
                q.id.to_string(),
                q.category.to_string(),
                q.title.to_string(),
                params,
            ]
        })
        .collect();
    render_table(&columns, &rows)
}

pub fn handle_query(db: &CricketDatabase, cmd: QueryCmd, as_json: bool) -> Result<()> {
    let runner = QueryCatalog::new(db);
    let result = match cmd {
        QueryCmd::List => {
            if as_json {
                println!("{}", serde_json::to_string_pretty(catalog())?); // tarpaulin::skip
            } else {
                print!("{}", catalog_listing()); // tarpaulin::skip
            }
            return Ok(());
        }
        QueryCmd::Run { id, args } => runner.run(id, &args)?,
        QueryCmd::Sql { sql } => runner.run_custom(&sql)?,
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&result)?); // tarpaulin::skip
    } else {
        print!("{}", result_set_table(&result)); // tarpaulin::skip
        println!("{} row(s)", result.len()); // tarpaulin::skip
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_listing_has_every_query() {
        let listing = catalog_listing();
        // header, rule, one line per query
        assert_eq!(listing.lines().count(), catalog().len() + 2);
        assert!(listing.contains("country=India"));
    }
}
