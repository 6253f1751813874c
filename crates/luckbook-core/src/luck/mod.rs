// Luck engine: all-play expected wins, luck index, schedule strength.

pub mod aggregate;
pub mod expected;
pub mod schedule;

pub use aggregate::{calculate_luck_stats, calculate_season_luck_stats, group_by_season};
pub use expected::{
    calculate_actual_record, calculate_actual_wins, calculate_expected_wins, calculate_luck_index,
};
pub use schedule::calculate_schedule_strength;
