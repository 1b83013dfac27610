use tracing::debug;

use crate::config::TuningConfig;

use super::family::FamilyIndex;
use super::types::PositionMap;

/// Moves parentless people with a known birth year onto the row of the
/// closest-born person who has parents.
pub(super) fn align_orphans(
    positions: &mut PositionMap,
    index: &FamilyIndex<'_>,
    tuning: &TuningConfig,
) {
    // Candidate rows are read from parented nodes only, which this pass never
    // moves, so one snapshot serves every orphan.
    let candidates: Vec<(i32, f32)> = positions
        .iter()
        .filter_map(|(id, pos)| {
            let person = index.person(*id)?;
            if person.is_orphan() {
                return None;
            }
            Some((person.birth_year()?, pos.y))
        })
        .collect();
    if candidates.is_empty() {
        return;
    }

    let mut aligned = 0usize;
    for (id, pos) in positions.iter_mut() {
        let Some(person) = index.person(*id) else {
            continue;
        };
        if !person.is_orphan() {
            continue;
        }
        let Some(year) = person.birth_year() else {
            continue;
        };

        let mut best: Option<(i32, f32)> = None;
        for (other_year, other_y) in &candidates {
            let diff = (year - other_year).abs();
            if best.is_none_or(|(min_diff, _)| diff < min_diff) {
                best = Some((diff, *other_y));
            }
        }
        if let Some((diff, y)) = best {
            if diff < tuning.orphan_year_threshold {
                pos.y = y;
                aligned += 1;
            }
        }
    }
    debug!(aligned, "orphan generational alignment");
}
