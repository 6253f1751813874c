// Value types shared by the luck engine and the history layer.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Engine inputs
// ---------------------------------------------------------------------------

/// One team's final score for one week, already joined with the member who
/// owned the team that season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyScore {
    pub season_id: String,
    pub week: u32,
    pub team_id: String,
    pub member_id: String,
    pub score: f64,
    /// The team beat its scheduled opponent this week.
    pub actual_win: bool,
    /// The game against the scheduled opponent ended level.
    #[serde(default)]
    pub actual_tie: bool,
    pub is_playoff: bool,
}

impl WeeklyScore {
    /// Whether this row takes part in a calculation run with `options`.
    pub fn qualifies(&self, options: &LuckOptions) -> bool {
        options.include_playoffs || !self.is_playoff
    }
}

/// Knobs shared by every engine entry point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckOptions {
    /// Count postseason weeks. Off by default so luck reflects the regular
    /// season only.
    #[serde(default)]
    pub include_playoffs: bool,
}

impl LuckOptions {
    pub fn with_playoffs(include_playoffs: bool) -> Self {
        Self { include_playoffs }
    }
}

/// Win/loss/tie tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl Record {
    pub fn new(wins: u32, losses: u32, ties: u32) -> Self {
        Self { wins, losses, ties }
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// `(wins + 0.5 * ties) / games`, or `None` when no games were played.
    pub fn win_pct(&self) -> Option<f64> {
        match self.games() {
            0 => None,
            games => Some((f64::from(self.wins) + 0.5 * f64::from(self.ties)) / f64::from(games)),
        }
    }

    /// Fold one game result into the tally. A tie wins over a win flag.
    pub fn add_result(&mut self, won: bool, tied: bool) {
        if tied {
            self.ties += 1;
        } else if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }
}

impl std::ops::AddAssign for Record {
    fn add_assign(&mut self, other: Self) {
        self.wins += other.wins;
        self.losses += other.losses;
        self.ties += other.ties;
    }
}

/// Final record of an opponent a member faced. Each opponent appears once
/// per window, no matter how many times they met.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentRecord {
    pub member_id: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl OpponentRecord {
    pub fn new(member_id: impl Into<String>, record: Record) -> Self {
        Self {
            member_id: member_id.into(),
            wins: record.wins,
            losses: record.losses,
            ties: record.ties,
        }
    }

    pub fn record(&self) -> Record {
        Record::new(self.wins, self.losses, self.ties)
    }
}

/// A league season. `id` is opaque; `year` orders seasons for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: String,
    pub year: i32,
}

// ---------------------------------------------------------------------------
// Engine outputs
// ---------------------------------------------------------------------------

/// Derived luck numbers for one member over one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LuckStats {
    pub actual_wins: u32,
    pub actual_losses: u32,
    pub actual_ties: u32,
    /// All-play expected wins; fractional.
    pub expected_wins: f64,
    /// `actual_wins - expected_wins`. Positive is lucky.
    pub luck_index: f64,
    /// Mean win percentage of the opponents faced, in `[0, 1]`.
    pub schedule_strength: f64,
    /// Weeks that survived playoff filtering.
    pub weeks_played: u32,
}

impl LuckStats {
    pub fn actual_record(&self) -> Record {
        Record::new(self.actual_wins, self.actual_losses, self.actual_ties)
    }
}

/// `LuckStats` for a single season of a member's career.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonLuckStats {
    pub season_id: String,
    pub year: i32,
    #[serde(flatten)]
    pub stats: LuckStats,
}
