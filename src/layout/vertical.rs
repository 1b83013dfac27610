use tracing::{debug, warn};

use crate::config::{SizePreset, TuningConfig};

use super::types::{LayoutEdge, PositionMap};

/// Pushes every child at least `rank_spacing` below each of its parents.
///
/// Repeats the edge scan until nothing moves. The pass count is capped at the
/// larger of the configured passes and the node count: an acyclic chain never
/// needs more, and a cyclic one would never settle.
pub(super) fn enforce_generations(
    positions: &mut PositionMap,
    edges: &[&LayoutEdge],
    preset: &SizePreset,
    tuning: &TuningConfig,
) {
    let cap = tuning.vertical_passes.max(positions.len());
    let mut passes = 0usize;
    let mut settled = false;
    while passes < cap {
        passes += 1;
        let mut changed = false;
        for edge in edges {
            let Some(parent_y) = positions.get(&edge.source).map(|pos| pos.y) else {
                continue;
            };
            let Some(child) = positions.get_mut(&edge.target) else {
                continue;
            };
            let min_child_y = parent_y + preset.rank_spacing;
            if child.y < min_child_y {
                child.y = min_child_y;
                changed = true;
            }
        }
        if !changed {
            settled = true;
            break;
        }
    }
    if settled {
        debug!(passes, "vertical consistency");
    } else {
        warn!(passes, "vertical consistency did not settle, the parent links may contain a cycle");
    }
}
