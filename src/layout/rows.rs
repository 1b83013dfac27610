use tracing::debug;

use crate::config::{SizePreset, TuningConfig};
use crate::person::PersonId;

use super::types::PositionMap;

#[derive(Debug)]
struct Row {
    key: f32,
    members: Vec<PersonId>,
}

/// Groups nodes into rows: a node joins the first row (in creation order)
/// whose key is within `tolerance` of its `y`, otherwise it opens a new row
/// keyed by its own `y`.
fn group_rows(positions: &PositionMap, tolerance: f32) -> Vec<Row> {
    let mut rows: Vec<Row> = Vec::new();
    for (id, pos) in positions {
        match rows.iter_mut().find(|row| (row.key - pos.y).abs() < tolerance) {
            Some(row) => row.members.push(*id),
            None => rows.push(Row {
                key: pos.y,
                members: vec![*id],
            }),
        }
    }
    rows.sort_by(|a, b| a.key.total_cmp(&b.key));
    rows
}

/// Spreads rows so consecutive ones are at least `node_height + row_padding`
/// apart. Shifts accumulate top to bottom; x is never touched.
pub(super) fn normalize_rows(positions: &mut PositionMap, preset: &SizePreset, tuning: &TuningConfig) {
    let mut rows = group_rows(positions, tuning.row_tolerance);
    let min_gap = preset.min_row_gap();
    let mut shift = 0.0f32;

    for i in 1..rows.len() {
        let ideal = rows[i - 1].key + min_gap;
        let current = rows[i].key;
        if current < ideal {
            shift += ideal - current;
        }
        if shift > 0.0 {
            for id in &rows[i].members {
                if let Some(pos) = positions.get_mut(id) {
                    pos.y += shift;
                }
            }
            rows[i].key += shift;
        }
    }
    debug!(rows = rows.len(), shift, "row spacing");
}
