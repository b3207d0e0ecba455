//! Plain-text rendering for terminal output.
//!
//! Every listing command can also print JSON; these helpers cover the
//! human-readable form.

use crate::{
    cricbuzz::RankedPlayer,
    storage::{Match, Player, ResultSet},
};

/// Left-aligned columns separated by two spaces, with a dashed rule under the header
pub fn render_table(columns: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(idx) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(columns));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

pub fn result_set_table(result: &ResultSet) -> String {
    if result.is_empty() {
        return "(no rows)\n".to_string();
    }
    let rows: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect();
    render_table(&result.columns, &rows)
}

/// One-line summary of a match
pub fn match_line(m: &Match) -> String {
    let mut line = format!("[{}] {} vs {}", m.id, m.teams[0], m.teams[1]);
    if let Some(format) = m.format {
        line.push_str(&format!(" ({format})"));
    }
    line.push_str(&format!(" - {}", m.status));
    if let Some(venue) = &m.venue {
        line.push_str(&format!(" @ {venue}"));
    }
    if let Some(date) = m.start_date {
        line.push_str(&format!(" on {date}"));
    }
    match (&m.winner, m.victory_margin, m.victory_type) {
        (Some(winner), Some(margin), Some(kind)) => {
            line.push_str(&format!(" | {winner} won by {margin} {kind}"))
        }
        _ => {
            if let Some(score) = &m.score_summary {
                line.push_str(&format!(" | {score}"));
            }
        }
    }
    line
}

pub fn players_table(players: &[Player]) -> String {
    let columns: Vec<String> = ["ID", "Name", "Role", "Country", "M", "Runs", "Wkts", "Avg", "SR"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    let rows: Vec<Vec<String>> = players
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.name.clone(),
                p.role.to_string(),
                p.country.clone(),
                p.stats.matches.to_string(),
                p.stats.runs.to_string(),
                p.stats.wickets.to_string(),
                format!("{:.2}", p.stats.average),
                format!("{:.2}", p.stats.strike_rate),
            ]
        })
        .collect();
    render_table(&columns, &rows)
}

pub fn rankings_table(players: &[RankedPlayer]) -> String {
    let columns: Vec<String> = ["Rank", "Name", "Country", "Rating"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    let rows: Vec<Vec<String>> = players
        .iter()
        .map(|p| {
            vec![
                p.rank.clone(),
                p.name.clone(),
                p.country.clone().unwrap_or_default(),
                p.rating.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    render_table(&columns, &rows)
}
