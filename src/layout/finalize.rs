use crate::config::{LayoutMode, SizePreset};

use super::family::FamilyIndex;
use super::types::{FamilyLayout, LayoutEdge, Position, PositionMap, PositionedNode};

/// Converts centers to top-left anchors and assembles the final layout, nodes
/// in family order.
pub(super) fn finalize(
    positions: &PositionMap,
    index: &FamilyIndex<'_>,
    edges: Vec<LayoutEdge>,
    preset: &SizePreset,
    mode: LayoutMode,
) -> FamilyLayout {
    let half_w = preset.node_width / 2.0;
    let half_h = preset.node_height / 2.0;

    let mut nodes = Vec::with_capacity(index.len());
    for person in &index.order {
        let Some(center) = positions.get(&person.id).copied() else {
            continue;
        };
        nodes.push(PositionedNode {
            id: person.id,
            center,
            position: Position::new(center.x - half_w, center.y - half_h),
            width: preset.node_width,
            height: preset.node_height,
            person: (*person).clone(),
        });
    }

    let (width, height) = bounds(&nodes);
    FamilyLayout {
        mode,
        nodes,
        edges,
        width,
        height,
    }
}

fn bounds(nodes: &[PositionedNode]) -> (f32, f32) {
    if nodes.is_empty() {
        return (0.0, 0.0);
    }
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for node in nodes {
        min_x = min_x.min(node.position.x);
        min_y = min_y.min(node.position.y);
        max_x = max_x.max(node.position.x + node.width);
        max_y = max_y.max(node.position.y + node.height);
    }
    (max_x - min_x, max_y - min_y)
}
