// Integration tests for luckbook.
//
// These exercise the library crates end-to-end: config loading, CSV import,
// the luck engine through the history layer, and report rendering.

use std::fs;
use std::path::{Path, PathBuf};

use luckbook_app::config;
use luckbook_app::import::{self, ImportError};
use luckbook_app::report;
use luckbook_core::history::{HistoryError, LeagueHistory};
use luckbook_core::types::{LuckOptions, Record};

// ===========================================================================
// Test helpers
// ===========================================================================

const EPS: f64 = 1e-9;

fn crate_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn fixture(name: &str) -> PathBuf {
    crate_root().join("tests/fixtures").join(name)
}

/// Five members over two seasons; alice switches teams between seasons and
/// erin takes over her old one.
fn fixture_history() -> LeagueHistory {
    import::load_history(&fixture("matchups.csv")).expect("fixture should import")
}

/// A throwaway project directory with defaults/ and the fixture data.
fn temp_project() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("defaults")).unwrap();
    fs::copy(
        crate_root().join("defaults/league.toml"),
        tmp.path().join("defaults/league.toml"),
    )
    .unwrap();
    fs::create_dir_all(tmp.path().join("data")).unwrap();
    fs::copy(fixture("matchups.csv"), tmp.path().join("data/matchups.csv")).unwrap();
    tmp
}

fn load_from_project(dir: &Path) -> (config::Config, LeagueHistory) {
    let config = config::load_config(dir).unwrap();
    let history = import::load_history(&dir.join(&config.data_paths.matchups)).unwrap();
    (config, history)
}

// ===========================================================================
// Import
// ===========================================================================

#[test]
fn fixture_import_skips_unfinished_games() {
    let history = fixture_history();
    assert_eq!(history.matchups().len(), 12);
    assert_eq!(history.seasons().len(), 2);
    assert_eq!(
        history.members(),
        vec!["alice", "bob", "carol", "dave", "erin"]
    );
    assert!(history.matchups().iter().all(|m| m.week <= 4));
}

#[test]
fn default_config_points_at_data_dir() {
    let project = temp_project();
    let (config, history) = load_from_project(project.path());
    assert_eq!(config.luck_options(), LuckOptions::default());
    assert_eq!(history.matchups().len(), 12);
}

// ===========================================================================
// Member report
// ===========================================================================

#[test]
fn member_report_regular_season() {
    let history = fixture_history();
    let report = history
        .member_report("alice", &LuckOptions::default())
        .unwrap();

    // 2021: 2/3 + 1/3 + 1/2 (tied dave, beat bob, lost to carol)
    // 2022: 1 + 0
    assert_eq!(report.career.actual_record(), Record::new(2, 2, 1));
    assert!((report.career.expected_wins - 2.5).abs() < EPS);
    assert!((report.career.luck_index + 0.5).abs() < EPS);
    assert_eq!(report.career.weeks_played, 5);

    assert_eq!(report.seasons.len(), 2);
    let y2021 = &report.seasons[0];
    assert_eq!(y2021.year, 2021);
    assert_eq!(y2021.stats.actual_record(), Record::new(1, 1, 1));
    assert!((y2021.stats.expected_wins - 1.5).abs() < EPS);
    // bob 1-2, carol 2-1, dave 1-1-1
    assert!((y2021.stats.schedule_strength - 0.5).abs() < EPS);

    let y2022 = &report.seasons[1];
    assert_eq!(y2022.year, 2022);
    assert!((y2022.stats.expected_wins - 1.0).abs() < EPS);
}

#[test]
fn member_report_with_playoffs() {
    let history = fixture_history();
    let report = history
        .member_report("alice", &LuckOptions::with_playoffs(true))
        .unwrap();
    assert_eq!(report.career.actual_record(), Record::new(3, 2, 1));
    assert!((report.career.expected_wins - 3.5).abs() < EPS);
    assert_eq!(report.career.weeks_played, 6);
}

#[test]
fn member_who_left_has_one_season() {
    let history = fixture_history();
    let report = history
        .member_report("dave", &LuckOptions::default())
        .unwrap();
    assert_eq!(report.seasons.len(), 1);
    assert_eq!(report.seasons[0].year, 2021);
    let season = &report.seasons[0].stats;
    assert_eq!(report.career.actual_record(), season.actual_record());
    assert!((report.career.expected_wins - season.expected_wins).abs() < EPS);
    // Career schedule strength uses opponents' career records, so it may
    // differ from the single-season figure.
    assert!((0.0..=1.0).contains(&report.career.schedule_strength));
}

#[test]
fn unknown_member_is_an_error() {
    let history = fixture_history();
    let err = history
        .member_report("nobody", &LuckOptions::default())
        .unwrap_err();
    assert_eq!(err, HistoryError::UnknownMember("nobody".into()));
}

#[test]
fn schedule_strength_within_bounds_for_everyone() {
    let history = fixture_history();
    for member in history.members() {
        let report = history.member_report(&member, &LuckOptions::default()).unwrap();
        assert!((0.0..=1.0).contains(&report.career.schedule_strength));
        for season in &report.seasons {
            assert!(season.stats.expected_wins <= f64::from(season.stats.weeks_played) + EPS);
        }
    }
}

// ===========================================================================
// Leaderboard
// ===========================================================================

#[test]
fn leaderboard_covers_every_member_and_nets_out() {
    let history = fixture_history();
    let board = history.leaderboard(&LuckOptions::default());
    assert_eq!(board.len(), 5);
    for pair in board.windows(2) {
        assert!(pair[0].stats.luck_index >= pair[1].stats.luck_index);
    }
    // 10 regular-season games hand out 10 expected wins; two ties leave only
    // 8 actual wins.
    let total: f64 = board.iter().map(|e| e.stats.luck_index).sum();
    assert!((total + 2.0).abs() < EPS);
}

#[test]
fn leaderboard_is_idempotent() {
    let history = fixture_history();
    let options = LuckOptions::default();
    assert_eq!(history.leaderboard(&options), history.leaderboard(&options));
}

// ===========================================================================
// Rendering
// ===========================================================================

#[test]
fn member_report_renders_table_and_json() {
    let history = fixture_history();
    let member_report = history
        .member_report("alice", &LuckOptions::default())
        .unwrap();

    let text = report::render_member_report(&member_report, 0.5);
    assert!(text.contains("2021"));
    assert!(text.contains("2022"));
    assert!(text.contains("2-2-1"));
    assert!(text.contains("-0.50"));

    let json = report::member_report_json(&member_report, 0.5).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["career"]["label"], "neutral");
    assert_eq!(value["seasons"].as_array().unwrap().len(), 2);
}

#[test]
fn leaderboard_renders_every_member() {
    let history = fixture_history();
    let board = history.leaderboard(&LuckOptions::default());
    let text = report::render_leaderboard(&board, 0.5);
    assert_eq!(text.lines().count(), 6);
    for member in history.members() {
        assert!(text.contains(&member));
    }
}

// ===========================================================================
// Failure paths
// ===========================================================================

#[test]
fn missing_matchup_file_reports_path() {
    let err = import::load_history(Path::new("tests/fixtures/nope.csv")).unwrap_err();
    match err {
        ImportError::Io { path, .. } => assert!(path.ends_with("nope.csv")),
        other => panic!("expected Io error, got {other:?}"),
    }
}
