// Sanity checks on the files shipped alongside the crate.

use std::path::PathBuf;

use luckbook_app::import::REQUIRED_COLUMNS;

fn crate_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Verify that defaults/league.toml is valid TOML with every section.
#[test]
fn default_league_toml_is_valid() {
    let content = std::fs::read_to_string(crate_root().join("defaults/league.toml"))
        .expect("defaults/league.toml should exist");
    let parsed: toml::Value = toml::from_str(&content).expect("defaults/league.toml is not valid TOML");
    for section in ["league", "luck", "data_paths"] {
        assert!(parsed.get(section).is_some(), "missing [{section}] section");
    }
}

/// Verify that the bundled sample data carries every required column.
#[test]
fn sample_matchups_have_required_columns() {
    for path in ["data/matchups.csv", "tests/fixtures/matchups.csv"] {
        let content = std::fs::read_to_string(crate_root().join(path))
            .unwrap_or_else(|_| panic!("{path} should exist"));
        let header: Vec<&str> = content.lines().next().unwrap().split(',').collect();
        for col in REQUIRED_COLUMNS {
            assert!(header.contains(col), "{path} is missing column {col}");
        }
    }
}
