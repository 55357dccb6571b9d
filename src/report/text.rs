//! Plain text rendering of a dashboard report for terminals

use crate::report::dashboard::{DashboardReport, TrendView};
use crate::utils::{format_points, format_rank_change};
use std::fmt::Write;

/// Render the leaderboard, notices and trend as aligned text
pub fn render_text(report: &DashboardReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", report.title);
    let _ = writeln!(out, "{}", "=".repeat(report.title.chars().count()));
    let _ = writeln!(out, "{} games from {}", report.games.len(), report.source);

    for notice in &report.notices {
        let _ = writeln!(out, "! {}", notice.message);
    }

    if let Some(entries) = &report.leaderboard {
        let name_width = entries
            .iter()
            .map(|e| e.name.chars().count())
            .max()
            .unwrap_or(4)
            .max(4);

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:>4}  {:2}  {:<width$}  {:>8}  {:>5}",
            "Rank",
            "",
            "Name",
            "Total",
            "Move",
            width = name_width
        );
        for entry in entries {
            let medal = entry.medal.map(|m| m.emoji()).unwrap_or("");
            let _ = writeln!(
                out,
                "{:>4}  {:2}  {:<width$}  {:>8}  {:>5}",
                entry.rank,
                medal,
                entry.name,
                format_points(entry.total),
                format_rank_change(entry.rank_change),
                width = name_width
            );
        }
    }

    match &report.trend {
        Some(TrendView::Chart(window)) => {
            let _ = writeln!(out);
            let _ = writeln!(out, "Title race, last {} games", window.games.len());
            for series in &window.series {
                let points: Vec<String> = series.points.iter().map(|p| format_points(*p)).collect();
                let _ = writeln!(out, "  {}: {}", series.name, points.join(" → "));
            }
        }
        Some(TrendView::Static { leaders }) => {
            let _ = writeln!(out);
            let _ = writeln!(out, "Title race (not enough games for a trend)");
            for entry in leaders {
                let _ = writeln!(out, "  {}: {}", entry.name, format_points(entry.total));
            }
        }
        None => {}
    }

    out
}
