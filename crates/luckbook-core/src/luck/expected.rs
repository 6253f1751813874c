// All-play expected wins and actual record.
//
// Every week a member is credited with the fraction of the other teams'
// scores they beat that week (ties count half). Summed over a window this
// is the win total the member "should" have had if schedule did not matter.

use std::collections::HashMap;

use tracing::debug;

use crate::types::{LuckOptions, Record, WeeklyScore};

/// League scores for each `(season_id, week)` slot.
type WeekPool<'a> = HashMap<(&'a str, u32), Vec<&'a WeeklyScore>>;

fn build_week_pool<'a>(all_scores: &'a [WeeklyScore], options: &LuckOptions) -> WeekPool<'a> {
    let mut pool: WeekPool<'a> = HashMap::new();
    for row in all_scores.iter().filter(|s| s.qualifies(options)) {
        pool.entry((row.season_id.as_str(), row.week))
            .or_default()
            .push(row);
    }
    pool
}

/// All-play win fraction for one member week. Returns `0.0` when nobody else
/// has a score for that week.
fn week_contribution(member: &WeeklyScore, pool: &WeekPool<'_>) -> f64 {
    let Some(week_scores) = pool.get(&(member.season_id.as_str(), member.week)) else {
        debug!(
            "no league scores for season {} week {}; week skipped",
            member.season_id, member.week
        );
        return 0.0;
    };

    let mut others = 0u32;
    let mut beaten = 0u32;
    let mut tied = 0u32;
    for other in week_scores.iter().filter(|o| o.team_id != member.team_id) {
        others += 1;
        if member.score > other.score {
            beaten += 1;
        } else if member.score == other.score {
            tied += 1;
        }
    }

    if others == 0 {
        debug!(
            "team {} has no all-play opponents in season {} week {}; week skipped",
            member.team_id, member.season_id, member.week
        );
        return 0.0;
    }

    (f64::from(beaten) + 0.5 * f64::from(tied)) / f64::from(others)
}

/// Total all-play expected wins for `member_scores` against the league pool
/// in `all_scores`.
///
/// Order of either slice is irrelevant. Playoff weeks are dropped from both
/// inputs unless `options.include_playoffs` is set. The result lies in
/// `[0, qualifying weeks]`.
pub fn calculate_expected_wins(
    member_scores: &[WeeklyScore],
    all_scores: &[WeeklyScore],
    options: &LuckOptions,
) -> f64 {
    if member_scores.is_empty() {
        return 0.0;
    }
    let pool = build_week_pool(all_scores, options);
    member_scores
        .iter()
        .filter(|s| s.qualifies(options))
        .map(|s| week_contribution(s, &pool))
        .sum()
}

/// Number of real wins against scheduled opponents.
pub fn calculate_actual_wins(member_scores: &[WeeklyScore], options: &LuckOptions) -> u32 {
    member_scores
        .iter()
        .filter(|s| s.qualifies(options) && s.actual_win && !s.actual_tie)
        .count() as u32
}

/// Real win/loss/tie record. A row that is neither a win nor a tie is a loss.
pub fn calculate_actual_record(member_scores: &[WeeklyScore], options: &LuckOptions) -> Record {
    let mut record = Record::default();
    for row in member_scores.iter().filter(|s| s.qualifies(options)) {
        record.add_result(row.actual_win, row.actual_tie);
    }
    record
}

/// Wins above (positive) or below (negative) all-play expectation. Not
/// clamped.
pub fn calculate_luck_index(actual_wins: u32, expected_wins: f64) -> f64 {
    f64::from(actual_wins) - expected_wins
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
