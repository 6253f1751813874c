// Report formatting: plain-text tables and JSON for luck results.

use std::fmt::{self, Write as _};

use serde::Serialize;

use luckbook_core::history::{LeaderboardEntry, MemberLuckReport};
use luckbook_core::types::LuckStats;

/// Human label for a luck index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LuckLabel {
    Lucky,
    Unlucky,
    Neutral,
}

impl LuckLabel {
    /// Luck within `+/- neutral_band` wins is neutral.
    pub fn classify(luck_index: f64, neutral_band: f64) -> Self {
        if luck_index > neutral_band {
            LuckLabel::Lucky
        } else if luck_index < -neutral_band {
            LuckLabel::Unlucky
        } else {
            LuckLabel::Neutral
        }
    }
}

impl fmt::Display for LuckLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LuckLabel::Lucky => "lucky",
            LuckLabel::Unlucky => "unlucky",
            LuckLabel::Neutral => "neutral",
        };
        f.pad(s)
    }
}

/// `0.607` style, three decimals with no leading-zero trimming.
pub fn format_pct(value: f64) -> String {
    format!("{value:.3}")
}

/// Signed luck, two decimals: `+1.80`, `-0.33`, `+0.00`.
pub fn format_luck(value: f64) -> String {
    // Avoid printing "-0.00" for tiny negative noise.
    let value = if value.abs() < 0.005 { 0.0 } else { value };
    format!("{value:+.2}")
}

fn format_record(stats: &LuckStats) -> String {
    if stats.actual_ties > 0 {
        format!(
            "{}-{}-{}",
            stats.actual_wins, stats.actual_losses, stats.actual_ties
        )
    } else {
        format!("{}-{}", stats.actual_wins, stats.actual_losses)
    }
}

fn stats_columns(stats: &LuckStats, neutral_band: f64) -> String {
    format!(
        "{:>8} {:>6.2} {:>7} {:>6} {:<8}",
        format_record(stats),
        stats.expected_wins,
        format_luck(stats.luck_index),
        format_pct(stats.schedule_strength),
        LuckLabel::classify(stats.luck_index, neutral_band),
    )
}

const STATS_HEADER: &str = "  record  exp_w    luck    sos label";

/// Text table for one member: a row per season then the career total.
pub fn render_member_report(report: &MemberLuckReport, neutral_band: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Luck report for {}", report.member_id);
    let _ = writeln!(out, "{:<10}{STATS_HEADER}", "season");
    for season in &report.seasons {
        let _ = writeln!(
            out,
            "{:<10}{}",
            season.year,
            stats_columns(&season.stats, neutral_band)
        );
    }
    let _ = writeln!(
        out,
        "{:<10}{}",
        "career",
        stats_columns(&report.career, neutral_band)
    );
    out
}

/// Text table ranking every member by luck index.
pub fn render_leaderboard(entries: &[LeaderboardEntry], neutral_band: f64) -> String {
    let width = entries
        .iter()
        .map(|e| e.member_id.len())
        .max()
        .unwrap_or(0)
        .max("member".len())
        + 2;

    let mut out = String::new();
    let _ = writeln!(out, "{:>4} {:<width$}{STATS_HEADER}", "#", "member");
    for (rank, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4} {:<width$}{}",
            rank + 1,
            entry.member_id,
            stats_columns(&entry.stats, neutral_band)
        );
    }
    out
}

/// JSON wrapper that carries the label alongside the raw numbers.
#[derive(Debug, Serialize)]
struct Labelled<'a, T: Serialize> {
    #[serde(flatten)]
    inner: &'a T,
    label: LuckLabel,
}

#[derive(Debug, Serialize)]
struct MemberReportJson<'a> {
    member_id: &'a str,
    career: Labelled<'a, LuckStats>,
    seasons: Vec<Labelled<'a, luckbook_core::types::SeasonLuckStats>>,
}

pub fn member_report_json(
    report: &MemberLuckReport,
    neutral_band: f64,
) -> serde_json::Result<String> {
    let doc = MemberReportJson {
        member_id: &report.member_id,
        career: Labelled {
            inner: &report.career,
            label: LuckLabel::classify(report.career.luck_index, neutral_band),
        },
        seasons: report
            .seasons
            .iter()
            .map(|s| Labelled {
                inner: s,
                label: LuckLabel::classify(s.stats.luck_index, neutral_band),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&doc)
}

pub fn leaderboard_json(entries: &[LeaderboardEntry], neutral_band: f64) -> serde_json::Result<String> {
    let doc: Vec<Labelled<'_, LeaderboardEntry>> = entries
        .iter()
        .map(|e| Labelled {
            inner: e,
            label: LuckLabel::classify(e.stats.luck_index, neutral_band),
        })
        .collect();
    serde_json::to_string_pretty(&doc)
}
