// Schedule strength: how good the opponents a member actually drew were.

use std::collections::HashSet;

use tracing::debug;

use crate::types::OpponentRecord;

/// Mean win percentage of the opponents faced.
///
/// Each opponent counts once. If the same `member_id` shows up more than once
/// only the first entry is used. Opponents with no games are skipped; an
/// empty (or all-skipped) input yields `0.0`.
pub fn calculate_schedule_strength(opponents: &[OpponentRecord]) -> f64 {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut total = 0.0;
    let mut counted = 0u32;

    for opponent in opponents {
        if !seen.insert(opponent.member_id.as_str()) {
            debug!("duplicate opponent {} ignored", opponent.member_id);
            continue;
        }
        if let Some(pct) = opponent.record().win_pct() {
            total += pct;
            counted += 1;
        }
    }

    if counted == 0 {
        return 0.0;
    }
    total / f64::from(counted)
}
