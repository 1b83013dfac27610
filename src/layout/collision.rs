use std::collections::HashSet;

use tracing::debug;

use crate::config::{SizePreset, TuningConfig};
use crate::person::PersonId;

use super::couples::{CoupleKey, couple_key};
use super::types::{Position, PositionMap};

/// Orders nodes by row band, then by `x`.
///
/// A band opens at the topmost unassigned node and takes every node less than
/// `band_height` below it; ids break the remaining ties so the order is total.
fn sweep_order(positions: &PositionMap, band_height: f32) -> Vec<PersonId> {
    let mut by_y: Vec<(PersonId, Position)> = positions.iter().map(|(id, pos)| (*id, *pos)).collect();
    by_y.sort_by(|a, b| a.1.y.total_cmp(&b.1.y).then(a.0.cmp(&b.0)));

    let mut keyed: Vec<(usize, f32, PersonId)> = Vec::with_capacity(by_y.len());
    let mut band = 0usize;
    let mut band_top: Option<f32> = None;
    for (id, pos) in by_y {
        match band_top {
            Some(top) if pos.y - top < band_height => {}
            Some(_) => {
                band += 1;
                band_top = Some(pos.y);
            }
            None => band_top = Some(pos.y),
        }
        keyed.push((band, pos.x, id));
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)).then(a.2.cmp(&b.2)));
    keyed.into_iter().map(|(_, _, id)| id).collect()
}

/// Pushes same-row neighbors apart, left to right. Couples keep their own,
/// tighter distance so this pass does not undo the couple adjustment.
pub(super) fn resolve_collisions(
    positions: &mut PositionMap,
    couples: &HashSet<CoupleKey>,
    preset: &SizePreset,
    tuning: &TuningConfig,
) {
    let order = sweep_order(positions, preset.node_height);
    let mut pushed = 0usize;

    for _ in 0..tuning.collision_passes {
        for pair in order.windows(2) {
            let (left_id, right_id) = (pair[0], pair[1]);
            let (Some(left), Some(right)) =
                (positions.get(&left_id).copied(), positions.get(&right_id).copied())
            else {
                continue;
            };
            if (left.y - right.y).abs() >= preset.node_height {
                continue;
            }
            let min_distance = if couples.contains(&couple_key(left_id, right_id)) {
                preset.couple_distance()
            } else {
                preset.collision_distance()
            };
            let distance = right.x - left.x;
            if distance < min_distance {
                if let Some(pos) = positions.get_mut(&right_id) {
                    pos.x += min_distance - distance;
                    if (left.y - pos.y).abs() < tuning.same_level_snap {
                        pos.y = left.y;
                    }
                }
                pushed += 1;
            }
        }
    }
    debug!(pushed, "horizontal collisions");
}
