use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::config::TuningConfig;
use crate::person::PersonId;

use super::family::FamilyIndex;
use super::types::PositionMap;

/// Re-centers each parent's children under the parent, or under the couple when
/// the other parent sits on the same row. Whole subtrees move so grandchildren
/// stay attached. One forward pass in family order; later parents may move
/// nodes an earlier parent already placed.
pub(super) fn center_children(
    positions: &mut PositionMap,
    index: &FamilyIndex<'_>,
    tuning: &TuningConfig,
) {
    let mut shifted = 0usize;
    for parent in index.parents() {
        let children = index.children_of(parent.id);
        let Some(first) = children.first().and_then(|id| index.person(*id)) else {
            continue;
        };
        let Some(parent_pos) = positions.get(&parent.id).copied() else {
            continue;
        };

        let mut parent_center = parent_pos.x;
        if let Some(spouse) = first.other_parent(parent.id) {
            if let Some(spouse_pos) = positions.get(&spouse) {
                if (parent_pos.y - spouse_pos.y).abs() < tuning.spouse_alignment_tolerance {
                    parent_center = (parent_pos.x + spouse_pos.x) / 2.0;
                }
            }
        }

        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        for child in children {
            if let Some(pos) = positions.get(child) {
                min_x = min_x.min(pos.x);
                max_x = max_x.max(pos.x);
            }
        }
        if !min_x.is_finite() {
            continue;
        }
        let children_center = (min_x + max_x) / 2.0;

        let shift = parent_center - children_center;
        if shift.abs() > tuning.magnet_threshold {
            for child in children {
                move_subtree(*child, shift, positions, index);
            }
            shifted += 1;
        }
    }
    debug!(shifted, "children magnet");
}

/// Shifts `root` and all of its descendants horizontally by `dx`.
pub(super) fn move_subtree(
    root: PersonId,
    dx: f32,
    positions: &mut PositionMap,
    index: &FamilyIndex<'_>,
) {
    let mut queue: VecDeque<PersonId> = VecDeque::from([root]);
    let mut visited: HashSet<PersonId> = HashSet::new();
    while let Some(current) = queue.pop_front() {
        if !visited.insert(current) {
            continue;
        }
        if let Some(pos) = positions.get_mut(&current) {
            pos.x += dx;
        }
        queue.extend(index.children_of(current).iter().copied());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::Position;
    use crate::person::PersonRecord;

    fn positions(start: &[(PersonId, f32, f32)]) -> PositionMap {
        start
            .iter()
            .map(|(id, x, y)| (*id, Position::new(*x, *y)))
            .collect()
    }

    #[test]
    fn centers_children_under_couple() {
        let persons = vec![
            PersonRecord::new(1, "A", "X"),
            PersonRecord::new(2, "B", "X"),
            PersonRecord::new(3, "C", "X").with_parents(Some(1), Some(2)),
            PersonRecord::new(4, "D", "X").with_parents(Some(1), Some(2)),
        ];
        let index = FamilyIndex::build(&persons);
        let mut table = positions(&[(1, 0.0, 90.0), (2, 220.0, 90.0), (3, 400.0, 390.0), (4, 660.0, 390.0)]);
        center_children(&mut table, &index, &TuningConfig::default());
        // couple center 110, children center 530
        assert_eq!(table[&3].x, -20.0);
        assert_eq!(table[&4].x, 240.0);
        assert_eq!(table[&1].x, 0.0);
        assert_eq!(table[&2].x, 220.0);
    }

    #[test]
    fn uses_parent_alone_when_spouse_is_on_another_row() {
        let persons = vec![
            PersonRecord::new(1, "A", "X"),
            PersonRecord::new(2, "B", "X"),
            PersonRecord::new(3, "C", "X").with_parents(Some(1), Some(2)),
        ];
        let index = FamilyIndex::build(&persons);
        let mut table = positions(&[(1, 100.0, 90.0), (2, 900.0, 390.0), (3, 300.0, 690.0)]);
        center_children(&mut table, &index, &TuningConfig::default());
        // parent 1 pulls the child to 100, then parent 2 pulls it to 900
        assert_eq!(table[&3].x, 900.0);
    }

    #[test]
    fn moves_grandchildren_with_their_parent() {
        let persons = vec![
            PersonRecord::new(1, "A", "X"),
            PersonRecord::new(2, "B", "X").with_parents(Some(1), None),
            PersonRecord::new(3, "C", "X").with_parents(Some(2), None),
            PersonRecord::new(4, "D", "X").with_parents(Some(2), None),
        ];
        let index = FamilyIndex::build(&persons);
        let mut table = positions(&[(1, 0.0, 0.0), (2, 500.0, 300.0), (3, 370.0, 600.0), (4, 630.0, 600.0)]);
        center_children(&mut table, &index, &TuningConfig::default());
        assert_eq!(table[&2].x, 0.0);
        assert_eq!(table[&3].x, -130.0);
        assert_eq!(table[&4].x, 130.0);
    }

    #[test]
    fn small_offsets_are_ignored() {
        let persons = vec![
            PersonRecord::new(1, "A", "X"),
            PersonRecord::new(2, "B", "X").with_parents(Some(1), None),
        ];
        let index = FamilyIndex::build(&persons);
        let mut table = positions(&[(1, 0.0, 0.0), (2, 0.5, 300.0)]);
        center_children(&mut table, &index, &TuningConfig::default());
        assert_eq!(table[&2].x, 0.5);
    }

    #[test]
    fn subtree_move_terminates_on_cycles() {
        let persons = vec![
            PersonRecord::new(1, "A", "X").with_parents(Some(2), None),
            PersonRecord::new(2, "B", "X").with_parents(Some(1), None),
        ];
        let index = FamilyIndex::build(&persons);
        let mut table = positions(&[(1, 0.0, 0.0), (2, 10.0, 300.0)]);
        move_subtree(1, 5.0, &mut table, &index);
        assert_eq!(table[&1].x, 5.0);
        assert_eq!(table[&2].x, 15.0);
    }
}
