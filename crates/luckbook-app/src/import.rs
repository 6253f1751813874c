// Matchup history import.
//
// Reads a flat CSV export of final head-to-head results, one game per row,
// and assembles a validated `LeagueHistory`.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::{debug, info, warn};

use luckbook_core::history::{HistoryError, LeagueHistory, Matchup, MatchupSide};
use luckbook_core::types::Season;

/// Columns every matchup CSV must carry. `is_playoff`, `is_tie` and
/// `is_final` are optional.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "season_id",
    "year",
    "week",
    "home_team_id",
    "home_member_id",
    "home_score",
    "away_team_id",
    "away_member_id",
    "away_score",
];

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid league history: {0}")]
    History(#[from] HistoryError),
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawMatchupRow {
    season_id: String,
    year: i32,
    week: u32,
    #[serde(default, deserialize_with = "flag_or_false")]
    is_playoff: bool,
    home_team_id: String,
    home_member_id: String,
    home_score: f64,
    away_team_id: String,
    away_member_id: String,
    away_score: f64,
    #[serde(default, deserialize_with = "flag_or_false")]
    is_tie: bool,
    #[serde(default = "default_final", deserialize_with = "flag_or_true")]
    is_final: bool,
}

fn default_final() -> bool {
    true
}

/// Database exports spell booleans many ways (`true`, `t`, `1`, `yes`).
fn parse_flag(raw: &str, empty: bool) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Some(empty),
        "true" | "t" | "1" | "yes" | "y" => Some(true),
        "false" | "f" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn flag_with_empty<'de, D: Deserializer<'de>>(d: D, empty: bool) -> Result<bool, D::Error> {
    let raw = String::deserialize(d)?;
    parse_flag(&raw, empty)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid boolean `{raw}`")))
}

fn flag_or_false<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    flag_with_empty(d, false)
}

fn flag_or_true<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    flag_with_empty(d, true)
}

// ---------------------------------------------------------------------------
// Reader-based loaders (enable testing without temp files)
// ---------------------------------------------------------------------------

/// Parse rows, skipping malformed, non-final and unusable ones.
fn load_rows_from_reader<R: Read>(rdr: R) -> Result<Vec<RawMatchupRow>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let headers = reader
        .headers()
        .map_err(|e| ImportError::Validation(format!("unreadable CSV header: {e}")))?
        .clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::Validation(format!(
            "matchup CSV is missing columns: {}",
            missing.join(", ")
        )));
    }

    let mut rows = Vec::new();
    for result in reader.deserialize::<RawMatchupRow>() {
        match result {
            Ok(raw) => {
                if !raw.is_final {
                    debug!(
                        "skipping unfinished matchup {} vs {} (season {} week {})",
                        raw.home_team_id, raw.away_team_id, raw.season_id, raw.week
                    );
                    continue;
                }
                if raw.week == 0 {
                    warn!(
                        "skipping matchup {} vs {} (season {}): weeks start at 1",
                        raw.home_team_id, raw.away_team_id, raw.season_id
                    );
                    continue;
                }
                let scores = [raw.home_score, raw.away_score];
                if scores.iter().any(|s| !s.is_finite() || *s < 0.0) {
                    warn!(
                        "skipping matchup {} vs {} (season {} week {}): invalid score",
                        raw.home_team_id, raw.away_team_id, raw.season_id, raw.week
                    );
                    continue;
                }
                rows.push(raw);
            }
            Err(e) => {
                warn!("skipping malformed matchup row: {}", e);
            }
        }
    }
    Ok(rows)
}

/// Build a `LeagueHistory` from CSV text. Seasons are derived from the
/// `(season_id, year)` columns.
pub fn load_history_from_reader<R: Read>(rdr: R) -> Result<LeagueHistory, ImportError> {
    let rows = load_rows_from_reader(rdr)?;
    if rows.is_empty() {
        return Err(ImportError::Validation(
            "matchup CSV produced zero final rows".into(),
        ));
    }

    let mut years: BTreeMap<String, i32> = BTreeMap::new();
    let mut matchups = Vec::with_capacity(rows.len());
    for raw in rows {
        let year = *years.entry(raw.season_id.clone()).or_insert(raw.year);
        if year != raw.year {
            return Err(ImportError::Validation(format!(
                "season `{}` appears with years {} and {}",
                raw.season_id, year, raw.year
            )));
        }
        matchups.push(Matchup {
            season_id: raw.season_id,
            week: raw.week,
            is_playoff: raw.is_playoff,
            is_tie: raw.is_tie,
            home: MatchupSide {
                team_id: raw.home_team_id,
                member_id: raw.home_member_id,
                score: raw.home_score,
            },
            away: MatchupSide {
                team_id: raw.away_team_id,
                member_id: raw.away_member_id,
                score: raw.away_score,
            },
        });
    }

    let seasons = years
        .into_iter()
        .map(|(id, year)| Season { id, year })
        .collect();
    Ok(LeagueHistory::new(seasons, matchups)?)
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load the league history from a matchup CSV file.
pub fn load_history(path: &Path) -> Result<LeagueHistory, ImportError> {
    let file = std::fs::File::open(path).map_err(|e| ImportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let history = load_history_from_reader(file)?;
    info!(
        "Loaded {} matchups across {} seasons from {}",
        history.matchups().len(),
        history.seasons().len(),
        path.display()
    );
    Ok(history)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
