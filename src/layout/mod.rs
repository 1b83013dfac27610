mod collision;
mod couples;
mod family;
mod finalize;
mod magnet;
mod orphans;
mod ranking;
mod rows;
pub(crate) mod types;
mod vertical;
pub use types::*;

use std::collections::HashSet;

use collision::resolve_collisions;
use couples::{CoupleKey, couple_key, couples, tighten_couples};
use family::FamilyIndex;
use finalize::finalize;
use magnet::center_children;
use orphans::align_orphans;
use ranking::assign_ranks;
use rows::normalize_rows;
use tracing::{debug, instrument};
use vertical::enforce_generations;

use crate::config::TreeLayoutConfig;
use crate::person::PersonRecord;

/// Lays out a family tree: ranks first, then the geometric refinement passes
/// over one shared position table, then top-left anchoring.
#[instrument(skip_all, fields(persons = persons.len(), mode = ?config.mode))]
pub fn compute_family_layout(persons: &[PersonRecord], config: &TreeLayoutConfig) -> FamilyLayout {
    let index = FamilyIndex::build(persons);
    let edges = index.edges();
    if index.is_empty() {
        return FamilyLayout {
            edges,
            ..FamilyLayout::empty(config.mode)
        };
    }

    let preset = config.preset();
    let tuning = &config.tuning;
    let layout_edges = index.layout_edges(&edges);

    let mut positions = assign_ranks(&index, &layout_edges, preset);
    align_orphans(&mut positions, &index, tuning);
    tighten_couples(&mut positions, &index, preset);
    center_children(&mut positions, &index, tuning);
    enforce_generations(&mut positions, &layout_edges, preset, tuning);
    normalize_rows(&mut positions, preset, tuning);
    let couple_set: HashSet<CoupleKey> = couples(&index)
        .into_iter()
        .map(|(father, mother)| couple_key(father, mother))
        .collect();
    resolve_collisions(&mut positions, &couple_set, preset, tuning);

    let layout = finalize(&positions, &index, edges, preset, config.mode);
    debug!(
        nodes = layout.nodes.len(),
        edges = layout.edges.len(),
        width = layout.width,
        height = layout.height,
        "family layout done"
    );
    layout
}
