use std::collections::BTreeSet;

use tracing::debug;

use crate::config::SizePreset;
use crate::person::PersonId;

use super::family::FamilyIndex;
use super::types::PositionMap;

/// Unordered `(father, mother)` pair, stored lowest id first.
pub(crate) type CoupleKey = (PersonId, PersonId);

pub(crate) fn couple_key(a: PersonId, b: PersonId) -> CoupleKey {
    if a <= b { (a, b) } else { (b, a) }
}

/// Every couple with at least one child in the list, as `(father, mother)`
/// in family order of their first child.
pub(crate) fn couples(index: &FamilyIndex<'_>) -> Vec<(PersonId, PersonId)> {
    let mut seen: BTreeSet<CoupleKey> = BTreeSet::new();
    let mut out = Vec::new();
    for person in &index.order {
        let (Some(father), Some(mother)) = (person.father(), person.mother()) else {
            continue;
        };
        if father == mother {
            continue;
        }
        if seen.insert(couple_key(father, mother)) {
            out.push((father, mother));
        }
    }
    out
}

/// Pulls couples on the same rank to `node_width + couple_gap` apart, around
/// their current midpoint. Never pushes them apart.
pub(super) fn tighten_couples(
    positions: &mut PositionMap,
    index: &FamilyIndex<'_>,
    preset: &SizePreset,
) {
    let ideal = preset.couple_distance();
    let half = ideal / 2.0;
    let mut tightened = 0usize;

    for (father, mother) in couples(index) {
        let (Some(a), Some(b)) = (positions.get(&father).copied(), positions.get(&mother).copied())
        else {
            continue;
        };
        if (a.y - b.y).abs() >= preset.node_height {
            continue;
        }
        if (a.x - b.x).abs() <= ideal {
            continue;
        }
        let center = (a.x + b.x) / 2.0;
        let (left, right) = if a.x < b.x { (father, mother) } else { (mother, father) };
        if let Some(pos) = positions.get_mut(&left) {
            pos.x = center - half;
        }
        if let Some(pos) = positions.get_mut(&right) {
            pos.x = center + half;
        }
        tightened += 1;
    }
    debug!(tightened, ideal, "couple proximity");
}
