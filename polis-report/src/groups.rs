//! Group summaries derived from the math result

use polis_common::GroupVotes;
use std::collections::BTreeMap;
use thiserror::Error;

/// Group member counts whose sum does not fit in a `u64`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("participant count overflows at group '{group}' ({members} members)")]
pub struct ParticipantOverflow {
    pub group: String,
    pub members: u64,
}

/// Total participant count: sum of `n-members` over all groups
pub fn total_participants(
    group_votes: &BTreeMap<String, GroupVotes>,
) -> Result<u64, ParticipantOverflow> {
    group_votes.iter().try_fold(0u64, |total, (key, group)| {
        total
            .checked_add(group.member_count)
            .ok_or_else(|| ParticipantOverflow {
                group: key.clone(),
                members: group.member_count,
            })
    })
}

/// Display label for every group key
///
/// Numeric keys map to letters (`"0"` → `"A"`, `"1"` → `"B"`, ...);
/// anything else keeps its key as the label.
pub fn group_names(group_votes: &BTreeMap<String, GroupVotes>) -> BTreeMap<String, String> {
    group_votes
        .keys()
        .map(|key| (key.clone(), group_label(key)))
        .collect()
}

fn group_label(key: &str) -> String {
    match key.parse::<u32>() {
        Ok(n) if n < 26 => char::from(b'A' + n as u8).to_string(),
        Ok(n) => format!("G{}", n),
        Err(_) => key.to_string(),
    }
}
