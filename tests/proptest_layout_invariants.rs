//! Property tests for the family tree layout pipeline.
//!
//! Properties covered:
//! - one node per distinct person and one edge per set parent reference
//! - every child sits at least one rank spacing below each parent
//! - nodes sharing a row keep the collision distance, couples the couple distance
//! - identical input produces identical layouts and identical JSON
//! - every layout finishes, including on cyclic parent links
//!
//! Most generated families are forests where parents always carry lower ids.
//! The termination property also feeds arbitrary parent links, cycles included.
//! Every property runs the default configuration of the chosen mode.

use std::collections::HashSet;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use family_tree_layout::{
    FamilyLayout, LayoutMode, PersonId, PersonRecord, SizePreset, Theme,
    TreeLayoutConfig, compute_family_layout, layout_dump_json,
};
use proptest::prelude::*;

const EPS: f32 = 1e-2;

fn arb_parent() -> impl Strategy<Value = Option<u8>> {
    prop_oneof![
        2 => Just(None),
        3 => any::<u8>().prop_map(Some),
    ]
}

fn arb_birthday() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None),
        4 => (1900i32..2020).prop_map(|year| Some(format!("{year}-06-15"))),
        1 => (1900i32..2020).prop_map(|year| Some(year.to_string())),
    ]
}

fn arb_family() -> impl Strategy<Value = Vec<PersonRecord>> {
    prop::collection::vec((arb_parent(), arb_parent(), arb_birthday()), 0..28).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(idx, (father, mother, birthday))| {
                let id = idx as PersonId + 1;
                let pick = |raw: Option<u8>| {
                    raw.filter(|_| idx > 0)
                        .map(|raw| PersonId::from(raw) % idx as PersonId + 1)
                };
                let mut person = PersonRecord::new(id, format!("P{id}"), "Gen")
                    .with_parents(pick(father), pick(mother));
                if let Some(birthday) = birthday {
                    person = person.with_birthday(birthday);
                }
                person
            })
            .collect()
    })
}

fn arb_mode() -> impl Strategy<Value = LayoutMode> {
    prop_oneof![Just(LayoutMode::Regular), Just(LayoutMode::Compact)]
}

fn arb_tangled_family() -> impl Strategy<Value = Vec<PersonRecord>> {
    prop::collection::vec((arb_parent(), arb_parent()), 1..20).prop_map(|rows| {
        let count = rows.len() as PersonId;
        rows.into_iter()
            .enumerate()
            .map(|(idx, (father, mother))| {
                let id = idx as PersonId + 1;
                let pick = |raw: Option<u8>| raw.map(|raw| PersonId::from(raw) % count + 1);
                PersonRecord::new(id, format!("T{id}"), "Loop").with_parents(pick(father), pick(mother))
            })
            .collect()
    })
}

fn couple_keys(persons: &[PersonRecord]) -> HashSet<(PersonId, PersonId)> {
    persons
        .iter()
        .filter_map(|p| match (p.father(), p.mother()) {
            (Some(f), Some(m)) if f != m => Some((f.min(m), f.max(m))),
            _ => None,
        })
        .collect()
}

fn row_violations(layout: &FamilyLayout, persons: &[PersonRecord], preset: &SizePreset) -> Vec<String> {
    let couples = couple_keys(persons);
    let mut nodes: Vec<_> = layout.nodes.iter().collect();
    nodes.sort_by(|a, b| a.center.y.total_cmp(&b.center.y).then(a.id.cmp(&b.id)));

    let mut bands: Vec<Vec<_>> = Vec::new();
    let mut top = f32::NEG_INFINITY;
    for node in nodes {
        if bands.is_empty() || node.center.y - top >= preset.node_height {
            top = node.center.y;
            bands.push(Vec::new());
        }
        if let Some(band) = bands.last_mut() {
            band.push(node);
        }
    }

    let mut violations = Vec::new();
    for mut band in bands {
        band.sort_by(|a, b| a.center.x.total_cmp(&b.center.x).then(a.id.cmp(&b.id)));
        for pair in band.windows(2) {
            let key = (pair[0].id.min(pair[1].id), pair[0].id.max(pair[1].id));
            let required = if couples.contains(&key) {
                preset.couple_distance()
            } else {
                preset.collision_distance()
            };
            let gap = pair[1].center.x - pair[0].center.x;
            if gap + EPS < required {
                violations.push(format!("{} and {}: {gap} < {required}", pair[0].id, pair[1].id));
            }
        }
    }
    violations
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn node_and_edge_counts_match_input(persons in arb_family(), mode in arb_mode()) {
        let layout = compute_family_layout(&persons, &TreeLayoutConfig::for_mode(mode));
        let expected_edges: usize = persons
            .iter()
            .map(|p| usize::from(p.father().is_some()) + usize::from(p.mother().is_some()))
            .sum();
        prop_assert_eq!(layout.nodes.len(), persons.len());
        prop_assert_eq!(layout.edges.len(), expected_edges);
    }

    #[test]
    fn children_sit_below_parents(persons in arb_family(), mode in arb_mode()) {
        let config = TreeLayoutConfig::for_mode(mode);
        let preset = config.preset();
        let layout = compute_family_layout(&persons, &config);
        for edge in &layout.edges {
            let parent = layout.node(edge.source).map(|n| n.center.y);
            let child = layout.node(edge.target).map(|n| n.center.y);
            if let (Some(parent), Some(child)) = (parent, child) {
                prop_assert!(
                    child + EPS >= parent + preset.rank_spacing,
                    "edge {} parent y {} child y {}",
                    edge.id,
                    parent,
                    child
                );
            }
        }
    }

    #[test]
    fn rows_keep_their_spacing(persons in arb_family(), mode in arb_mode()) {
        let config = TreeLayoutConfig::for_mode(mode);
        let layout = compute_family_layout(&persons, &config);
        let violations = row_violations(&layout, &persons, config.preset());
        prop_assert!(violations.is_empty(), "{:?}", violations);
    }

    #[test]
    fn layout_is_deterministic(persons in arb_family(), mode in arb_mode()) {
        let config = TreeLayoutConfig::for_mode(mode);
        let first = compute_family_layout(&persons, &config);
        let second = compute_family_layout(&persons, &config);
        let first_json = layout_dump_json(&first, &Theme::default(), false);
        let second_json = layout_dump_json(&second, &Theme::default(), false);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first_json.ok(), second_json.ok());
    }

    #[test]
    fn coordinates_are_finite(persons in arb_family(), mode in arb_mode()) {
        let layout = compute_family_layout(&persons, &TreeLayoutConfig::for_mode(mode));
        for node in &layout.nodes {
            prop_assert!(node.center.x.is_finite() && node.center.y.is_finite());
        }
        prop_assert!(layout.width >= 0.0 && layout.height >= 0.0);
    }

    #[test]
    fn every_layout_finishes(persons in arb_tangled_family(), mode in arb_mode()) {
        let expected = persons.len();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(compute_family_layout(&persons, &TreeLayoutConfig::for_mode(mode)));
        });
        let layout = rx.recv_timeout(Duration::from_secs(10));
        prop_assert!(layout.is_ok(), "layout did not finish");
        if let Ok(layout) = layout {
            prop_assert_eq!(layout.nodes.len(), expected);
        }
    }
}
