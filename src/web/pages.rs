//! Server-rendered HTML pages

use crate::error::{BoardError, Severity};
use crate::report::{DashboardReport, Notice, Section, TrendView};
use crate::trend::TrendWindow;
use crate::types::{GamePoint, Points, RankedEntry};
use crate::utils::{format_points, format_rank_change};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use rust_decimal::prelude::ToPrimitive;

const STYLE: &str = "
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 960px; color: #1f2937; }
table { border-collapse: collapse; width: 100%; margin-bottom: 1.5rem; }
th { background: #1f2937; color: white; padding: 6px 10px; }
td { padding: 6px 10px; text-align: center; border-bottom: 1px solid #e5e7eb; }
td.name { text-align: left; }
.up { color: #15803d; } .down { color: #b91c1c; }
.notice { background: #fef3c7; border-left: 4px solid #d97706; padding: 8px 12px; margin: 8px 0; }
.error { background: #fee2e2; border-left: 4px solid #b91c1c; padding: 12px 16px; }
.inline { color: #b91c1c; }
";

const PALETTE: [&str; 7] = [
    "#2563eb", "#dc2626", "#16a34a", "#d97706", "#7c3aed", "#0891b2", "#db2777",
];

/// Result of a single player lookup requested with the page
pub struct PlayerLookup<'a> {
    pub name: &'a str,
    pub result: Result<Vec<GamePoint>, BoardError>,
}

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                h1 { "🏏 " (title) }
                (body)
            }
        }
    }
}

fn notices<'a>(items: impl Iterator<Item = &'a Notice>) -> Markup {
    html! {
        @for notice in items {
            div class="notice" { (notice.message) }
        }
    }
}

fn rank_change_cell(change: Option<i64>) -> Markup {
    let class = match change {
        Some(delta) if delta > 0 => "up",
        Some(delta) if delta < 0 => "down",
        _ => "",
    };
    html! { td class=(class) { (format_rank_change(change)) } }
}

fn leaderboard_table(entries: &[RankedEntry]) -> Markup {
    let show_changes = entries.iter().any(|e| e.rank_change.is_some());

    html! {
        table {
            thead {
                tr {
                    th { "Rank" }
                    th { "Medal" }
                    th { "Name" }
                    th { "Total Points" }
                    @if show_changes { th { "Move" } }
                }
            }
            tbody {
                @for entry in entries {
                    tr {
                        td { (entry.rank) }
                        td { (entry.medal.map(|m| m.emoji()).unwrap_or("")) }
                        td class="name" { (entry.name) }
                        td { (format_points(entry.total)) }
                        @if show_changes { (rank_change_cell(entry.rank_change)) }
                    }
                }
            }
        }
    }
}

/// Inline SVG line chart of the cumulative series
fn trend_chart(window: &TrendWindow) -> Markup {
    const WIDTH: f64 = 720.0;
    const HEIGHT: f64 = 320.0;
    const PAD: f64 = 40.0;

    // Screen coordinates only; the plotted values stay exact elsewhere
    let plot = |v: Points| v.to_f64().unwrap_or(0.0);

    let values = || window.series.iter().flat_map(|s| s.points.iter().copied());
    let max = values().max().map(plot).unwrap_or(0.0).max(0.0);
    let min = values().min().map(plot).unwrap_or(0.0).min(0.0);
    let span = if max > min { max - min } else { 1.0 };
    let steps = window.games.len().saturating_sub(1).max(1) as f64;

    let x = |i: usize| PAD + (WIDTH - 2.0 * PAD) * i as f64 / steps;
    let y = |v: Points| HEIGHT - PAD - (HEIGHT - 2.0 * PAD) * (plot(v) - min) / span;

    html! {
        svg width=(WIDTH) height=(HEIGHT) viewBox={ "0 0 " (WIDTH) " " (HEIGHT) } role="img" {
            @for (i, game) in window.games.iter().enumerate() {
                text x=(x(i)) y=(HEIGHT - 10.0) text-anchor="middle" font-size="11" { (game) }
            }
            @for (n, series) in window.series.iter().enumerate() {
                @let colour = PALETTE[n % PALETTE.len()];
                @let points = series
                    .points
                    .iter()
                    .enumerate()
                    .map(|(i, v)| format!("{:.1},{:.1}", x(i), y(*v)))
                    .collect::<Vec<_>>()
                    .join(" ");
                polyline points=(points) fill="none" stroke=(colour) stroke-width="2" {
                    title { (series.name) }
                }
                @if let Some(last) = series.points.last() {
                    text x=(x(series.points.len() - 1) + 6.0) y=(y(*last)) font-size="11" fill=(colour) {
                        (series.name)
                    }
                }
            }
        }
    }
}

fn trend_table(window: &TrendWindow) -> Markup {
    html! {
        table {
            thead {
                tr {
                    th { "Name" }
                    @for game in &window.games { th { (game) } }
                }
            }
            tbody {
                @for series in &window.series {
                    tr {
                        td class="name" { (series.name) }
                        @for value in &series.points { td { (format_points(*value)) } }
                    }
                }
            }
        }
    }
}

fn trend_section(report: &DashboardReport) -> Markup {
    html! {
        @match &report.trend {
            Some(TrendView::Chart(window)) => {
                h2 { "📈 Title Race – Top " (window.series.len()) " (Last " (window.games.len()) " Games)" }
                (notices(report.notices_for(Section::Trend)))
                (trend_chart(window))
                (trend_table(window))
            }
            Some(TrendView::Static { leaders }) => {
                h2 { "📈 Title Race" }
                (notices(report.notices_for(Section::Trend)))
                (leaderboard_table(leaders))
            }
            None => {
                h2 { "📈 Title Race" }
                (notices(report.notices_for(Section::Trend)))
            }
        }
    }
}

fn lookup_section(report: &DashboardReport, lookup: Option<&PlayerLookup<'_>>) -> Markup {
    html! {
        h2 { "🔎 Player Lookup" }
        form method="get" action="/" {
            select name="player" {
                @for name in report.players.keys() {
                    @let selected = lookup.map(|l| l.name == name.as_str()).unwrap_or(false);
                    option value=(name) selected[selected] { (name) }
                }
            }
            " "
            button type="submit" { "Show" }
        }
        @if let Some(lookup) = lookup {
            @match &lookup.result {
                Ok(series) => {
                    table {
                        thead { tr { th { "Game" } th { "Points" } } }
                        tbody {
                            @for point in series {
                                tr { td class="name" { (point.game) } td { (format_points(point.points)) } }
                            }
                        }
                    }
                }
                Err(e) => { p class="inline" { (e.to_string()) } }
            }
        }
    }
}

/// The full dashboard
pub fn dashboard_page(report: &DashboardReport, lookup: Option<&PlayerLookup<'_>>) -> Markup {
    let body = html! {
        p { (report.games.len()) " games · updated " (report.generated_at.format("%Y-%m-%d %H:%M UTC").to_string()) }
        h2 { "🏆 Overall Leaderboard" }
        (notices(report.notices_for(Section::Leaderboard)))
        (notices(report.notices_for(Section::RankChanges)))
        @if let Some(entries) = &report.leaderboard {
            (leaderboard_table(entries))
        }
        (trend_section(report))
        (lookup_section(report, lookup))
    };

    layout(&report.title, body)
}

/// Page shown when a blocking error stops the render
pub fn error_page(title: &str, error: &BoardError) -> Markup {
    let heading = match error.severity() {
        Severity::Blocking => "The leaderboard cannot be shown",
        Severity::Warning | Severity::Inline => "The leaderboard is incomplete",
    };

    let body = html! {
        div class="error" {
            strong { (heading) }
            p { (error.to_string()) }
        }
    };

    layout(title, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::InMemorySnapshotSource;
    use crate::report::Dashboard;
    use crate::trend::WindowSettings;
    use crate::types::{PlayerRecord, Snapshot};
    use rust_decimal_macros::dec;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn report() -> DashboardReport {
        let snapshot = Snapshot::new(
            vec!["G1".to_string(), "G2".to_string(), "G3".to_string()],
            vec![
                PlayerRecord::new("Asha", vec![dec!(10), dec!(20), dec!(5)]),
                PlayerRecord::new("Ben", vec![dec!(5), dec!(0), dec!(30)]),
                PlayerRecord::new("Cy", vec![dec!(1), dec!(1), dec!(1)]),
            ],
        )
        .unwrap();

        Dashboard::new(
            "T20 Prediction Leaderboard",
            Arc::new(InMemorySnapshotSource::new(snapshot)),
            None,
            WindowSettings::default(),
        )
        .build()
        .unwrap()
    }

    #[test]
    fn test_dashboard_page_contents() {
        let page = dashboard_page(&report(), None).into_string();

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("T20 Prediction Leaderboard"));
        assert!(page.contains("🥇"));
        assert!(page.contains("polyline"));
        assert!(page.contains("Player Lookup"));
    }

    #[test]
    fn test_lookup_results() {
        let report = report();

        let found = PlayerLookup {
            name: "Ben",
            result: report.player_series("Ben"),
        };
        let page = dashboard_page(&report, Some(&found)).into_string();
        assert!(page.contains("<td>30</td>"));

        let missing = PlayerLookup {
            name: "Zed",
            result: report.player_series("Zed"),
        };
        let page = dashboard_page(&report, Some(&missing)).into_string();
        assert!(page.contains("Player not found: Zed"));
        assert!(page.contains("Overall Leaderboard"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let error = BoardError::FileNotFound {
            path: PathBuf::from("<points>.csv"),
        };
        let page = error_page("Board", &error).into_string();

        assert!(page.contains("cannot be shown"));
        assert!(page.contains("&lt;points&gt;.csv"));
    }
}
