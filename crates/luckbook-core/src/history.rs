// League history: validated matchup results and the joins that turn them
// into luck engine inputs (weekly score rows, opponent records).

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::luck::{calculate_luck_stats, calculate_season_luck_stats};
use crate::types::{LuckOptions, LuckStats, OpponentRecord, Record, Season, SeasonLuckStats, WeeklyScore};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum HistoryError {
    #[error("season `{0}` is listed more than once")]
    DuplicateSeason(String),

    #[error("matchup in week {week} references unknown season `{season_id}`")]
    UnknownSeason { season_id: String, week: u32 },

    #[error("season `{season_id}`: week numbers start at 1")]
    InvalidWeek { season_id: String },

    #[error("season `{season_id}` week {week}: team `{team_id}` has invalid score {score}")]
    InvalidScore {
        season_id: String,
        week: u32,
        team_id: String,
        score: f64,
    },

    #[error("season `{season_id}` week {week}: team `{team_id}` is scheduled against itself")]
    SelfMatchup {
        season_id: String,
        week: u32,
        team_id: String,
    },

    #[error(
        "season `{season_id}`: team `{team_id}` owned by both `{first}` and `{second}`"
    )]
    OwnershipConflict {
        season_id: String,
        team_id: String,
        first: String,
        second: String,
    },

    #[error("season `{season_id}` week {week}: team `{team_id}` has more than one game")]
    DuplicateTeamWeek {
        season_id: String,
        week: u32,
        team_id: String,
    },

    #[error("unknown member `{0}`")]
    UnknownMember(String),
}

// ---------------------------------------------------------------------------
// Matchup data
// ---------------------------------------------------------------------------

/// One side of a head-to-head game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupSide {
    pub team_id: String,
    pub member_id: String,
    pub score: f64,
}

/// A final head-to-head result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub season_id: String,
    pub week: u32,
    pub is_playoff: bool,
    /// Explicit tie flag from the source data. Equal scores are a tie even
    /// when this is unset.
    pub is_tie: bool,
    pub home: MatchupSide,
    pub away: MatchupSide,
}

impl Matchup {
    pub fn is_tied(&self) -> bool {
        self.is_tie || self.home.score == self.away.score
    }

    /// Both sides as `(side, opponent)` pairs.
    fn pairings(&self) -> [(&MatchupSide, &MatchupSide); 2] {
        [(&self.home, &self.away), (&self.away, &self.home)]
    }

    fn qualifies(&self, options: &LuckOptions) -> bool {
        options.include_playoffs || !self.is_playoff
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Career and year-by-year luck for one member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberLuckReport {
    pub member_id: String,
    pub career: LuckStats,
    pub seasons: Vec<SeasonLuckStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub member_id: String,
    #[serde(flatten)]
    pub stats: LuckStats,
}

// ---------------------------------------------------------------------------
// LeagueHistory
// ---------------------------------------------------------------------------

/// Validated league history. Immutable once built.
#[derive(Debug, Clone)]
pub struct LeagueHistory {
    seasons: Vec<Season>,
    matchups: Vec<Matchup>,
    scores: Vec<WeeklyScore>,
}

impl LeagueHistory {
    /// Validate `seasons` and `matchups` and precompute the flattened weekly
    /// score rows.
    pub fn new(mut seasons: Vec<Season>, matchups: Vec<Matchup>) -> Result<Self, HistoryError> {
        let mut season_ids = HashSet::new();
        for season in &seasons {
            if !season_ids.insert(season.id.as_str()) {
                return Err(HistoryError::DuplicateSeason(season.id.clone()));
            }
        }

        // (season, team) -> owning member
        let mut owners: HashMap<(&str, &str), &str> = HashMap::new();
        // One score per team per week.
        let mut played: HashSet<(&str, u32, &str)> = HashSet::new();
        for m in &matchups {
            if !season_ids.contains(m.season_id.as_str()) {
                return Err(HistoryError::UnknownSeason {
                    season_id: m.season_id.clone(),
                    week: m.week,
                });
            }
            if m.week == 0 {
                return Err(HistoryError::InvalidWeek {
                    season_id: m.season_id.clone(),
                });
            }
            if m.home.team_id == m.away.team_id {
                return Err(HistoryError::SelfMatchup {
                    season_id: m.season_id.clone(),
                    week: m.week,
                    team_id: m.home.team_id.clone(),
                });
            }
            for side in [&m.home, &m.away] {
                if !side.score.is_finite() || side.score < 0.0 {
                    return Err(HistoryError::InvalidScore {
                        season_id: m.season_id.clone(),
                        week: m.week,
                        team_id: side.team_id.clone(),
                        score: side.score,
                    });
                }
                if !played.insert((m.season_id.as_str(), m.week, side.team_id.as_str())) {
                    return Err(HistoryError::DuplicateTeamWeek {
                        season_id: m.season_id.clone(),
                        week: m.week,
                        team_id: side.team_id.clone(),
                    });
                }
                let owner = owners
                    .entry((m.season_id.as_str(), side.team_id.as_str()))
                    .or_insert(side.member_id.as_str());
                if *owner != side.member_id {
                    return Err(HistoryError::OwnershipConflict {
                        season_id: m.season_id.clone(),
                        team_id: side.team_id.clone(),
                        first: owner.to_string(),
                        second: side.member_id.clone(),
                    });
                }
            }
        }

        seasons.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| a.id.cmp(&b.id)));
        let scores = flatten_matchups(&matchups);
        debug!(
            "league history built: {} seasons, {} matchups, {} score rows",
            seasons.len(),
            matchups.len(),
            scores.len()
        );

        Ok(Self {
            seasons,
            matchups,
            scores,
        })
    }

    /// Seasons ordered by year.
    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    pub fn matchups(&self) -> &[Matchup] {
        &self.matchups
    }

    /// Every team's score for every week, one row per team per game.
    pub fn weekly_scores(&self) -> &[WeeklyScore] {
        &self.scores
    }

    pub fn member_scores(&self, member_id: &str) -> Vec<WeeklyScore> {
        self.scores
            .iter()
            .filter(|s| s.member_id == member_id)
            .cloned()
            .collect()
    }

    /// Every member that appears in the history, sorted.
    pub fn members(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.scores.iter().map(|s| s.member_id.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    pub fn has_member(&self, member_id: &str) -> bool {
        self.scores.iter().any(|s| s.member_id == member_id)
    }

    /// Per-member records for one season, or across the whole history when
    /// `season_id` is `None`.
    pub fn records(&self, season_id: Option<&str>, options: &LuckOptions) -> HashMap<String, Record> {
        let Some(season_id) = season_id else {
            let mut career: HashMap<String, Record> = HashMap::new();
            for season in &self.seasons {
                for (member, record) in self.records(Some(season.id.as_str()), options) {
                    *career.entry(member).or_default() += record;
                }
            }
            return career;
        };

        let mut records: HashMap<String, Record> = HashMap::new();
        for m in self.window(Some(season_id), options) {
            let tied = m.is_tied();
            for (side, opponent) in m.pairings() {
                records
                    .entry(side.member_id.clone())
                    .or_default()
                    .add_result(side.score > opponent.score, tied);
            }
        }
        records
    }

    /// One record per distinct opponent `member_id` faced in the window,
    /// carrying that opponent's record over the same window. Sorted by
    /// opponent id.
    pub fn opponents_faced(
        &self,
        member_id: &str,
        season_id: Option<&str>,
        options: &LuckOptions,
    ) -> Vec<OpponentRecord> {
        let faced: BTreeSet<&str> = self
            .window(season_id, options)
            .flat_map(|m| m.pairings())
            .filter(|(side, _)| side.member_id == member_id)
            .map(|(_, opponent)| opponent.member_id.as_str())
            .filter(|opponent| *opponent != member_id)
            .collect();
        if faced.is_empty() {
            return Vec::new();
        }

        let records = self.records(season_id, options);
        faced
            .into_iter()
            .map(|opponent| {
                OpponentRecord::new(opponent, records.get(opponent).copied().unwrap_or_default())
            })
            .collect()
    }

    /// Career luck plus the per-season breakdown for one member.
    pub fn member_report(
        &self,
        member_id: &str,
        options: &LuckOptions,
    ) -> Result<MemberLuckReport, HistoryError> {
        if !self.has_member(member_id) {
            return Err(HistoryError::UnknownMember(member_id.to_string()));
        }
        let member_scores = self.member_scores(member_id);
        let career_opponents = self.opponents_faced(member_id, None, options);
        let career = calculate_luck_stats(&member_scores, &self.scores, &career_opponents, options);
        let seasons = calculate_season_luck_stats(
            &member_scores,
            &self.scores,
            &self.seasons,
            |season_id| self.opponents_faced(member_id, Some(season_id), options),
            options,
        );

        Ok(MemberLuckReport {
            member_id: member_id.to_string(),
            career,
            seasons,
        })
    }

    /// Career luck for every member, luckiest first.
    pub fn leaderboard(&self, options: &LuckOptions) -> Vec<LeaderboardEntry> {
        let mut by_member: BTreeMap<&str, Vec<WeeklyScore>> = BTreeMap::new();
        for row in &self.scores {
            by_member
                .entry(row.member_id.as_str())
                .or_default()
                .push(row.clone());
        }

        let mut entries: Vec<LeaderboardEntry> = by_member
            .into_iter()
            .map(|(member_id, rows)| {
                let opponents = self.opponents_faced(member_id, None, options);
                LeaderboardEntry {
                    member_id: member_id.to_string(),
                    stats: calculate_luck_stats(&rows, &self.scores, &opponents, options),
                }
            })
            .filter(|e| e.stats.weeks_played > 0)
            .collect();

        entries.sort_by(|a, b| {
            b.stats
                .luck_index
                .total_cmp(&a.stats.luck_index)
                .then_with(|| a.member_id.cmp(&b.member_id))
        });
        entries
    }

    fn window<'a>(
        &'a self,
        season_id: Option<&'a str>,
        options: &'a LuckOptions,
    ) -> impl Iterator<Item = &'a Matchup> + 'a {
        self.matchups.iter().filter(move |m| {
            m.qualifies(options) && season_id.map_or(true, |id| m.season_id == id)
        })
    }
}

/// Flatten head-to-head results into one `WeeklyScore` per team per game.
pub fn flatten_matchups(matchups: &[Matchup]) -> Vec<WeeklyScore> {
    let mut rows = Vec::with_capacity(matchups.len() * 2);
    for m in matchups {
        let tied = m.is_tied();
        for (side, opponent) in m.pairings() {
            rows.push(WeeklyScore {
                season_id: m.season_id.clone(),
                week: m.week,
                team_id: side.team_id.clone(),
                member_id: side.member_id.clone(),
                score: side.score,
                actual_win: !tied && side.score > opponent.score,
                actual_tie: tied,
                is_playoff: m.is_playoff,
            });
        }
    }
    rows
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
