//! Score sheet parsing
//!
//! A score sheet has a header row followed by one row per player. The
//! first column holds the player name whatever its header says; every
//! further column is one game, oldest first.

use crate::error::BoardError;
use crate::types::{PlayerRecord, Points, Snapshot};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Parsing options for a score sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableOptions {
    /// Field delimiter, `b','` for CSV and `b'\t'` for TSV
    pub delimiter: u8,
    /// Read empty score cells as zero instead of rejecting them
    pub blank_as_zero: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            blank_as_zero: false,
        }
    }
}

impl TableOptions {
    /// Options matching a file's extension (`.tsv` and `.tab` are tab separated)
    pub fn for_path(path: &Path, blank_as_zero: bool) -> Self {
        let delimiter = match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("tab") => {
                b'\t'
            }
            _ => b',',
        };

        Self {
            delimiter,
            blank_as_zero,
        }
    }
}

/// Largest magnitude a single score cell may hold. Keeps any realistic
/// column count far from decimal overflow when totals are summed.
pub const MAX_CELL_POINTS: i64 = 1_000_000_000_000_000;

/// Coerce a score cell to exact decimal points. Plain and scientific
/// notation are accepted; NaN, infinities and oversized values are not.
pub fn parse_points(raw: &str, blank_as_zero: bool) -> Option<Points> {
    let cell = raw.trim();
    if cell.is_empty() {
        return blank_as_zero.then_some(Points::ZERO);
    }

    Points::from_str(cell)
        .or_else(|_| Points::from_scientific(cell))
        .ok()
        .filter(|value| value.abs() <= Points::from(MAX_CELL_POINTS))
}

/// Parse a score sheet from any reader
pub fn parse_table<R: Read>(reader: R, options: &TableOptions) -> Result<Snapshot, BoardError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(options.delimiter)
        .from_reader(reader);

    let header = reader
        .headers()
        .map_err(|e| BoardError::MalformedTable {
            message: e.to_string(),
        })?
        .clone();

    let games: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
    let mut players = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| BoardError::MalformedTable {
            message: e.to_string(),
        })?;
        // Header is line 1
        let line = index + 2;

        if record.iter().all(|cell| cell.is_empty()) {
            debug!("Skipping blank row on line {}", line);
            continue;
        }

        if record.len() != header.len() {
            return Err(BoardError::MalformedTable {
                message: format!(
                    "line {} has {} cells, expected {}",
                    line,
                    record.len(),
                    header.len()
                ),
            });
        }

        let name = record.get(0).unwrap_or_default();
        if name.is_empty() {
            return Err(BoardError::MalformedTable {
                message: format!("line {} has no player name", line),
            });
        }

        let mut scores = Vec::with_capacity(games.len());
        for (game, cell) in games.iter().zip(record.iter().skip(1)) {
            let points = parse_points(cell, options.blank_as_zero).ok_or_else(|| {
                BoardError::MalformedScore {
                    player: name.to_string(),
                    game: game.clone(),
                    value: cell.to_string(),
                }
            })?;
            scores.push(points);
        }

        players.push(PlayerRecord::new(name, scores));
    }

    debug!(
        "Parsed score table with {} players and {} games",
        players.len(),
        games.len()
    );

    Snapshot::new(games, players)
}

/// Load a score sheet from disk
pub fn load_table(path: &Path, options: &TableOptions) -> Result<Snapshot, BoardError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => BoardError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => {
            warn!("Cannot open score file {}: {}", path.display(), e);
            BoardError::MalformedTable {
                message: format!("{}: {}", path.display(), e),
            }
        }
    })?;

    parse_table(file, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(text: &str) -> Result<Snapshot, BoardError> {
        parse_table(text.as_bytes(), &TableOptions::default())
    }

    #[test]
    fn test_parse_points() {
        assert_eq!(parse_points("12", false), Some(dec!(12)));
        assert_eq!(parse_points(" 2.5 ", false), Some(dec!(2.5)));
        assert_eq!(parse_points("-3", false), Some(dec!(-3)));
        assert_eq!(parse_points("", false), None);
        assert_eq!(parse_points("  ", true), Some(dec!(0)));
        assert_eq!(parse_points("ten", true), None);
        assert_eq!(parse_points("NaN", false), None);
        assert_eq!(parse_points("inf", false), None);
        assert_eq!(parse_points("1e3", false), Some(dec!(1000)));
        assert_eq!(parse_points("1e30", false), None);
    }

    #[test]
    fn test_decimal_cells_sum_exactly() {
        let snapshot = parse("Name,G1,G2,G3\nAsha,0.1,0.2,0.3\nBen,0.3,0.2,0.1\n").unwrap();

        let asha = snapshot.player("Asha").unwrap();
        let ben = snapshot.player("Ben").unwrap();
        assert_eq!(asha.total(), ben.total());
        assert_eq!(asha.total(), dec!(0.6));
    }

    #[test]
    fn test_first_column_is_name_whatever_the_header() {
        let snapshot = parse("Participant,Match 1,Match 2\nAsha,10,20\nBen,5,0\n").unwrap();

        assert_eq!(snapshot.games(), &["Match 1", "Match 2"]);
        assert_eq!(snapshot.players().len(), 2);
        assert_eq!(snapshot.players()[0].name, "Asha");
        assert_eq!(snapshot.players()[0].scores, vec![dec!(10), dec!(20)]);
    }

    #[test]
    fn test_malformed_score_is_not_zeroed() {
        let err = parse("Name,G1,G2\nAsha,10,abc\n").unwrap_err();
        assert_eq!(
            err,
            BoardError::MalformedScore {
                player: "Asha".to_string(),
                game: "G2".to_string(),
                value: "abc".to_string(),
            }
        );
    }

    #[test]
    fn test_blank_cells() {
        let text = "Name,G1,G2\nAsha,10,\n";

        assert!(matches!(
            parse(text),
            Err(BoardError::MalformedScore { .. })
        ));

        let lenient = TableOptions {
            blank_as_zero: true,
            ..TableOptions::default()
        };
        let snapshot = parse_table(text.as_bytes(), &lenient).unwrap();
        assert_eq!(snapshot.players()[0].scores, vec![dec!(10), dec!(0)]);
    }

    #[test]
    fn test_name_only_table_has_no_games() {
        let snapshot = parse("Name\nAsha\nBen\n").unwrap();
        assert!(snapshot.games().is_empty());
        assert_eq!(snapshot.ensure_rankable(), Err(BoardError::NoGameData));
    }

    #[test]
    fn test_empty_input() {
        let snapshot = parse("").unwrap();
        assert_eq!(snapshot.ensure_rankable(), Err(BoardError::EmptySnapshot));
    }

    #[test]
    fn test_ragged_row_rejected() {
        let err = parse("Name,G1,G2\nAsha,1\n").unwrap_err();
        assert!(matches!(err, BoardError::MalformedTable { .. }));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_blank_rows_skipped() {
        let snapshot = parse("Name,G1\nAsha,1\n,\nBen,2\n").unwrap();
        assert_eq!(snapshot.players().len(), 2);
    }

    #[test]
    fn test_duplicate_player_rejected() {
        let err = parse("Name,G1\nAsha,1\nAsha,2\n").unwrap_err();
        assert_eq!(
            err,
            BoardError::DuplicatePlayer {
                name: "Asha".to_string()
            }
        );
    }

    #[test]
    fn test_tab_separated() {
        let options = TableOptions::for_path(Path::new("points.tsv"), false);
        assert_eq!(options.delimiter, b'\t');

        let snapshot = parse_table("Name\tG1\nAsha\t4\n".as_bytes(), &options).unwrap();
        assert_eq!(snapshot.players()[0].scores, vec![dec!(4)]);
    }

    #[test]
    fn test_missing_file() {
        let err = load_table(Path::new("/nonexistent/points.csv"), &TableOptions::default())
            .unwrap_err();
        assert!(matches!(err, BoardError::FileNotFound { .. }));
    }
}
