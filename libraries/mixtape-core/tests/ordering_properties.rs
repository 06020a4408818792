//! Property-based tests for library ordering
//!
//! Uses proptest to check the reorder and reindex planners against many
//! random library shapes.

use mixtape_core::ordering::{is_dense, plan_reindex, plan_reorder};
use mixtape_core::types::{AccountId, Membership, MembershipId, PlaylistId};
use proptest::prelude::*;

// ===== Helpers =====

fn library(positions: &[i64]) -> Vec<Membership> {
    let account = AccountId::new("account");
    positions
        .iter()
        .enumerate()
        .map(|(i, &position)| Membership {
            id: MembershipId::new(format!("m{i}")),
            account_id: account.clone(),
            playlist_id: PlaylistId::new(format!("p{i}")),
            is_owner: i == 0,
            position,
        })
        .collect()
}

fn dense_library(len: usize) -> Vec<Membership> {
    let positions: Vec<i64> = (0..len as i64).collect();
    library(&positions)
}

fn apply(list: &mut [Membership], changes: &[Membership]) {
    for change in changes {
        let slot = list
            .iter_mut()
            .find(|m| m.id == change.id)
            .expect("plan only touches known memberships");
        *slot = change.clone();
    }
}

/// Ids in display order
fn order(list: &[Membership]) -> Vec<MembershipId> {
    let mut sorted: Vec<&Membership> = list.iter().collect();
    sorted.sort_by_key(|m| m.position);
    sorted.into_iter().map(|m| m.id.clone()).collect()
}

fn dense_move() -> impl Strategy<Value = (usize, usize, usize)> {
    (1usize..40).prop_flat_map(|len| (Just(len), 0..len, 0..len))
}

// ===== Property Tests =====

proptest! {
    /// Property: a valid move keeps the library dense and lands the item on target
    #[test]
    fn reorder_keeps_library_dense((len, from, to) in dense_move()) {
        let mut list = dense_library(len);
        let moved = list[from].id.clone();

        let plan = plan_reorder(&list, &moved, to as i64).unwrap();
        apply(&mut list, &plan);

        prop_assert!(is_dense(&list));
        prop_assert_eq!(list.len(), len);
        let landed = list.iter().find(|m| m.id == moved).unwrap().position;
        prop_assert_eq!(landed, to as i64);
    }

    /// Property: untouched items keep their relative order
    #[test]
    fn reorder_preserves_relative_order((len, from, to) in dense_move()) {
        let mut list = dense_library(len);
        let moved = list[from].id.clone();
        let before: Vec<MembershipId> =
            order(&list).into_iter().filter(|id| id != &moved).collect();

        let plan = plan_reorder(&list, &moved, to as i64).unwrap();
        apply(&mut list, &plan);

        let after: Vec<MembershipId> =
            order(&list).into_iter().filter(|id| id != &moved).collect();
        prop_assert_eq!(before, after);
    }

    /// Property: moving an item onto its own position plans nothing
    #[test]
    fn reorder_in_place_is_empty((len, from, _to) in dense_move()) {
        let list = dense_library(len);
        let plan = plan_reorder(&list, &list[from].id, from as i64).unwrap();
        prop_assert!(plan.is_empty());
        prop_assert!(is_dense(&list));
    }

    /// Property: only memberships whose position changes are in the plan
    #[test]
    fn reorder_plan_is_minimal((len, from, to) in dense_move()) {
        let list = dense_library(len);
        let plan = plan_reorder(&list, &list[from].id, to as i64).unwrap();

        let expected = if from == to { 0 } else { from.abs_diff(to) + 1 };
        prop_assert_eq!(plan.len(), expected);
        for change in &plan {
            let original = list.iter().find(|m| m.id == change.id).unwrap();
            prop_assert_ne!(original.position, change.position);
        }
    }

    /// Property: reindex yields 0..n in the same rank order, and a second pass is empty
    #[test]
    fn reindex_compacts_and_is_idempotent(
        positions in prop::collection::vec(0i64..100, 0..40)
    ) {
        let mut list = library(&positions);
        let mut ranked: Vec<(i64, usize)> =
            positions.iter().copied().zip(0usize..).collect();
        ranked.sort_by_key(|(position, _)| *position);

        let plan = plan_reindex(&list);
        apply(&mut list, &plan);

        prop_assert!(is_dense(&list));
        for (rank, (_, index)) in ranked.iter().enumerate() {
            prop_assert_eq!(list[*index].position, rank as i64);
        }
        prop_assert!(plan_reindex(&list).is_empty());
    }
}
