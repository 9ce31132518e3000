use uuid::Uuid;

use crate::engine::Snapshot;

/// The single 0-100 score displayed for a skill.
///
/// Leaf skills report their most recent direct rating, or 0 when unrated.
/// Parent skills report the integer mean of their children's effective
/// ratings, counting only children whose rating is positive; a parent whose
/// children are all unrated reports 0. Unknown ids report 0.
pub fn effective_rating(snapshot: &Snapshot, skill_id: Uuid) -> i32 {
    effective_rating_at(snapshot, skill_id, 0)
}

/// The tree is two levels deep; anything below the root level is treated as
/// a leaf so malformed data read from disk cannot recurse further.
fn effective_rating_at(snapshot: &Snapshot, skill_id: Uuid, level: u8) -> i32 {
    let children = snapshot.children_of(skill_id);
    if children.is_empty() || level >= 1 {
        return snapshot
            .latest_rating(skill_id)
            .map(|r| r.rating)
            .unwrap_or(0);
    }

    let rated: Vec<i32> = children
        .iter()
        .map(|child| effective_rating_at(snapshot, child.id, level + 1))
        .filter(|&r| r > 0)
        .collect();

    if rated.is_empty() {
        0
    } else {
        rated.iter().sum::<i32>() / rated.len() as i32
    }
}
