//! Position planning for an account's library
//!
//! Both planners work on an in-memory snapshot of one account's memberships
//! and return only the memberships whose position changes. The caller writes
//! the returned set in a single batch; nothing here touches storage.

use crate::error::{MixtapeError, Result};
use crate::types::{Membership, MembershipId};

/// Plan moving `moved` to `new_position`, shifting the neighbours in between.
///
/// Moving later in the list decrements every membership in
/// `(old, new_position]`; moving earlier increments every membership in
/// `[new_position, old)`. The moved membership comes last in the result.
/// Returns an empty plan when the position does not change.
///
/// A `new_position` past the end of the list is not clamped: the neighbours
/// shift and the moved membership lands outside the dense range, leaving a
/// gap until [`plan_reindex`] is applied.
pub fn plan_reorder(
    memberships: &[Membership],
    moved: &MembershipId,
    new_position: i64,
) -> Result<Vec<Membership>> {
    if new_position < 0 {
        return Err(MixtapeError::validation(format!(
            "position must be non-negative, got {new_position}"
        )));
    }

    let current = memberships
        .iter()
        .find(|m| &m.id == moved)
        .ok_or_else(|| MixtapeError::not_found("Membership", moved.as_str()))?;
    let old = current.position;

    if old == new_position {
        return Ok(Vec::new());
    }

    let mut changes: Vec<Membership> = memberships
        .iter()
        .filter(|m| &m.id != moved)
        .filter_map(|m| {
            let shifted = if new_position > old {
                (m.position > old && m.position <= new_position).then_some(m.position - 1)
            } else {
                (m.position >= new_position && m.position < old).then_some(m.position + 1)
            };
            let shifted = shifted?;
            Some(Membership {
                position: shifted,
                ..m.clone()
            })
        })
        .collect();

    changes.push(Membership {
        position: new_position,
        ..current.clone()
    });

    Ok(changes)
}

/// Plan compaction: every membership gets its rank as position.
///
/// Ties keep their incoming order, so pass memberships in display order.
/// Memberships already at their rank are left out of the plan, which makes
/// a second pass an empty plan.
pub fn plan_reindex(memberships: &[Membership]) -> Vec<Membership> {
    let mut ordered: Vec<&Membership> = memberships.iter().collect();
    ordered.sort_by_key(|m| m.position);

    ordered
        .into_iter()
        .zip(0_i64..)
        .filter(|(m, rank)| m.position != *rank)
        .map(|(m, rank)| Membership {
            position: rank,
            ..m.clone()
        })
        .collect()
}

/// Whether positions are exactly `0..len` (in any order)
pub fn is_dense(memberships: &[Membership]) -> bool {
    let mut positions: Vec<i64> = memberships.iter().map(|m| m.position).collect();
    positions.sort_unstable();
    positions.into_iter().zip(0_i64..).all(|(p, i)| p == i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccountId, PlaylistId};

    fn library(positions: &[i64]) -> Vec<Membership> {
        let account = AccountId::new("account");
        positions
            .iter()
            .enumerate()
            .map(|(i, &position)| Membership {
                id: MembershipId::new(format!("m{}", i + 1)),
                account_id: account.clone(),
                playlist_id: PlaylistId::new(format!("p{}", i + 1)),
                is_owner: false,
                position,
            })
            .collect()
    }

    fn apply(list: &mut [Membership], changes: &[Membership]) {
        for change in changes {
            if let Some(m) = list.iter_mut().find(|m| m.id == change.id) {
                m.position = change.position;
            }
        }
    }

    fn position_of(list: &[Membership], id: &str) -> i64 {
        list.iter().find(|m| m.id.as_str() == id).unwrap().position
    }

    #[test]
    fn move_down_shifts_following_items_up() {
        let mut list = library(&[0, 1, 2]);
        let plan = plan_reorder(&list, &MembershipId::new("m1"), 2).unwrap();
        apply(&mut list, &plan);

        assert_eq!(position_of(&list, "m2"), 0);
        assert_eq!(position_of(&list, "m3"), 1);
        assert_eq!(position_of(&list, "m1"), 2);
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn move_up_shifts_preceding_items_down() {
        let mut list = library(&[0, 1, 2]);
        let plan = plan_reorder(&list, &MembershipId::new("m3"), 0).unwrap();
        apply(&mut list, &plan);

        assert_eq!(position_of(&list, "m1"), 1);
        assert_eq!(position_of(&list, "m2"), 2);
        assert_eq!(position_of(&list, "m3"), 0);
    }

    #[test]
    fn only_the_affected_range_is_touched() {
        let list = library(&[0, 1, 2, 3, 4]);
        let plan = plan_reorder(&list, &MembershipId::new("m2"), 3).unwrap();

        let touched: Vec<&str> = plan.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(touched, vec!["m3", "m4", "m2"]);
    }

    #[test]
    fn moved_item_is_last_in_plan() {
        let list = library(&[0, 1, 2, 3]);
        let plan = plan_reorder(&list, &MembershipId::new("m4"), 1).unwrap();
        assert_eq!(plan.last().unwrap().id.as_str(), "m4");
    }

    #[test]
    fn same_position_is_a_no_op() {
        let list = library(&[0, 1, 2]);
        let plan = plan_reorder(&list, &MembershipId::new("m2"), 1).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn negative_target_is_rejected() {
        let list = library(&[0, 1, 2]);
        let err = plan_reorder(&list, &MembershipId::new("m2"), -1).unwrap_err();
        assert!(matches!(err, MixtapeError::Validation(_)));
    }

    #[test]
    fn unknown_membership_is_not_found() {
        let list = library(&[0, 1]);
        let err = plan_reorder(&list, &MembershipId::new("nope"), 0).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn target_past_the_end_leaves_a_gap() {
        let mut list = library(&[0, 1, 2]);
        let plan = plan_reorder(&list, &MembershipId::new("m1"), 7).unwrap();
        apply(&mut list, &plan);

        assert_eq!(position_of(&list, "m2"), 0);
        assert_eq!(position_of(&list, "m3"), 1);
        assert_eq!(position_of(&list, "m1"), 7);
        assert!(!is_dense(&list));

        let compaction = plan_reindex(&list);
        apply(&mut list, &compaction);
        assert_eq!(position_of(&list, "m1"), 2);
        assert!(is_dense(&list));
    }

    #[test]
    fn reindex_closes_gaps_and_breaks_ties_in_order() {
        let mut list = library(&[0, 2, 2, 5]);
        let plan = plan_reindex(&list);
        apply(&mut list, &plan);

        assert_eq!(position_of(&list, "m1"), 0);
        assert_eq!(position_of(&list, "m2"), 1);
        assert_eq!(position_of(&list, "m3"), 2);
        assert_eq!(position_of(&list, "m4"), 3);
    }

    #[test]
    fn reindex_follows_positions_not_input_order() {
        let mut list = library(&[9, 3, 6]);
        let plan = plan_reindex(&list);
        apply(&mut list, &plan);

        assert_eq!(position_of(&list, "m2"), 0);
        assert_eq!(position_of(&list, "m3"), 1);
        assert_eq!(position_of(&list, "m1"), 2);
    }

    #[test]
    fn reindex_of_dense_list_is_empty() {
        let list = library(&[0, 1, 2, 3]);
        assert!(plan_reindex(&list).is_empty());
        assert!(plan_reindex(&[]).is_empty());
    }
}
