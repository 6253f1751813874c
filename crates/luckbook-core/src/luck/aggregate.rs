// Orchestration: one LuckStats per window, and the per-season breakdown.

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::luck::expected::{calculate_actual_record, calculate_expected_wins, calculate_luck_index};
use crate::luck::schedule::calculate_schedule_strength;
use crate::types::{LuckOptions, LuckStats, OpponentRecord, Season, SeasonLuckStats, WeeklyScore};

/// Compute every luck number for one member over the window covered by
/// `member_scores`.
///
/// `all_scores` must contain the league-wide pool for the same weeks;
/// `opponents` holds one final record per opponent faced in the window.
pub fn calculate_luck_stats(
    member_scores: &[WeeklyScore],
    all_scores: &[WeeklyScore],
    opponents: &[OpponentRecord],
    options: &LuckOptions,
) -> LuckStats {
    let record = calculate_actual_record(member_scores, options);
    let expected_wins = calculate_expected_wins(member_scores, all_scores, options);
    let weeks_played = member_scores.iter().filter(|s| s.qualifies(options)).count() as u32;

    LuckStats {
        actual_wins: record.wins,
        actual_losses: record.losses,
        actual_ties: record.ties,
        expected_wins,
        luck_index: calculate_luck_index(record.wins, expected_wins),
        schedule_strength: calculate_schedule_strength(opponents),
        weeks_played,
    }
}

/// Split score rows by season id. Sorted by id so iteration is stable.
pub fn group_by_season(scores: &[WeeklyScore]) -> BTreeMap<&str, Vec<WeeklyScore>> {
    let mut groups: BTreeMap<&str, Vec<WeeklyScore>> = BTreeMap::new();
    for row in scores {
        groups
            .entry(row.season_id.as_str())
            .or_default()
            .push(row.clone());
    }
    groups
}

/// Year-by-year luck for one member.
///
/// Runs [`calculate_luck_stats`] once per season in which the member has at
/// least one qualifying week. `opponents_for` is asked for the opponent
/// records of each such season. Seasons missing from `seasons` are skipped.
/// The result is ordered by year.
pub fn calculate_season_luck_stats<F>(
    member_scores: &[WeeklyScore],
    all_scores: &[WeeklyScore],
    seasons: &[Season],
    mut opponents_for: F,
    options: &LuckOptions,
) -> Vec<SeasonLuckStats>
where
    F: FnMut(&str) -> Vec<OpponentRecord>,
{
    let years: HashMap<&str, i32> = seasons.iter().map(|s| (s.id.as_str(), s.year)).collect();
    let member_groups = group_by_season(member_scores);
    let mut league_groups = group_by_season(all_scores);

    let mut out = Vec::new();
    for (season_id, rows) in member_groups {
        if !rows.iter().any(|s| s.qualifies(options)) {
            continue;
        }
        let Some(&year) = years.get(season_id) else {
            warn!("scores reference unknown season {season_id}; season skipped");
            continue;
        };
        let pool = league_groups.remove(season_id).unwrap_or_default();
        let opponents = opponents_for(season_id);
        out.push(SeasonLuckStats {
            season_id: season_id.to_string(),
            year,
            stats: calculate_luck_stats(&rows, &pool, &opponents, options),
        });
    }

    out.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| a.season_id.cmp(&b.season_id)));
    out
}
