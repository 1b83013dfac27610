use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::debug;

use crate::config::SizePreset;
use crate::person::PersonId;

use super::couples::couples;
use super::family::FamilyIndex;
use super::types::{LayoutEdge, Position, PositionMap};

const ORDER_PASSES: usize = 4;
const PLACEMENT_SWEEPS: usize = 2;

/// A slot in a rank: a person, or a virtual node splitting an edge that spans
/// several ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum LayerNode {
    Person(PersonId),
    Dummy(usize),
}

/// Initial center positions, ancestors above descendants.
pub(super) fn assign_ranks(
    index: &FamilyIndex<'_>,
    edges: &[&LayoutEdge],
    preset: &SizePreset,
) -> PositionMap {
    if index.is_empty() {
        return PositionMap::new();
    }
    positions_from_layers(index, edges, preset)
}

/// Partners per person, both directions, in family order of the couple.
fn spouse_lists(index: &FamilyIndex<'_>) -> HashMap<PersonId, Vec<PersonId>> {
    let mut spouses: HashMap<PersonId, Vec<PersonId>> = HashMap::new();
    for (father, mother) in couples(index) {
        spouses.entry(father).or_default().push(mother);
        spouses.entry(mother).or_default().push(father);
    }
    spouses
}

fn positions_from_layers(
    index: &FamilyIndex<'_>,
    edges: &[&LayoutEdge],
    preset: &SizePreset,
) -> PositionMap {
    let ranks = compute_ranks(index, edges);
    let max_rank = ranks.values().copied().max().unwrap_or(0);

    let mut rank_nodes: Vec<Vec<LayerNode>> = vec![Vec::new(); max_rank + 1];
    for person in &index.order {
        let rank = ranks.get(&person.id).copied().unwrap_or(0);
        rank_nodes[rank].push(LayerNode::Person(person.id));
    }

    let mut order_map: HashMap<LayerNode, usize> = index
        .order
        .iter()
        .enumerate()
        .map(|(idx, person)| (LayerNode::Person(person.id), idx))
        .collect();

    let mut edge_set: HashSet<(PersonId, PersonId)> = HashSet::new();
    let mut person_edges: Vec<(PersonId, PersonId)> = Vec::new();
    let mut expanded: Vec<(LayerNode, LayerNode)> = Vec::new();
    let mut dummy_counter = 0usize;
    for edge in edges {
        if !edge_set.insert((edge.source, edge.target)) {
            continue;
        }
        let (Some(&from_rank), Some(&to_rank)) = (ranks.get(&edge.source), ranks.get(&edge.target))
        else {
            continue;
        };
        if to_rank <= from_rank {
            continue;
        }
        person_edges.push((edge.source, edge.target));
        let mut prev = LayerNode::Person(edge.source);
        for step in 1..(to_rank - from_rank) {
            let dummy = LayerNode::Dummy(dummy_counter);
            dummy_counter += 1;
            order_map.insert(dummy, order_map.len());
            rank_nodes[from_rank + step].push(dummy);
            expanded.push((prev, dummy));
            prev = dummy;
        }
        expanded.push((prev, LayerNode::Person(edge.target)));
    }

    let spouses = spouse_lists(index);
    order_rank_nodes(&mut rank_nodes, &expanded, &order_map, &spouses, ORDER_PASSES);

    let person_ranks: Vec<Vec<PersonId>> = rank_nodes
        .iter()
        .map(|bucket| {
            bucket
                .iter()
                .filter_map(|slot| match slot {
                    LayerNode::Person(id) => Some(*id),
                    LayerNode::Dummy(_) => None,
                })
                .collect()
        })
        .collect();

    let mut incoming: HashMap<PersonId, Vec<PersonId>> = HashMap::new();
    let mut outgoing: HashMap<PersonId, Vec<PersonId>> = HashMap::new();
    for (from, to) in &person_edges {
        incoming.entry(*to).or_default().push(*from);
        outgoing.entry(*from).or_default().push(*to);
    }

    let half = preset.node_width / 2.0;
    let mut cross_pos: HashMap<PersonId, f32> = HashMap::new();
    for _ in 0..PLACEMENT_SWEEPS {
        for bucket in &person_ranks {
            place_rank(bucket, &incoming, &mut cross_pos, half, preset.node_spacing);
        }
        for bucket in person_ranks.iter().rev() {
            place_rank(bucket, &outgoing, &mut cross_pos, half, preset.node_spacing);
        }
    }

    let rank_step = preset.node_height + preset.rank_spacing;
    let mut positions = PositionMap::new();
    for (rank, bucket) in person_ranks.iter().enumerate() {
        let y = rank as f32 * rank_step + preset.node_height / 2.0;
        for id in bucket {
            let x = cross_pos.get(id).copied().unwrap_or(0.0);
            positions.insert(*id, Position::new(x, y));
        }
    }

    // Shift so the leftmost card starts at x = 0.
    let min_x = positions.values().map(|p| p.x).fold(f32::INFINITY, f32::min);
    if min_x.is_finite() {
        let dx = half - min_x;
        for pos in positions.values_mut() {
            pos.x += dx;
        }
    }
    debug!(nodes = positions.len(), ranks = person_ranks.len(), "layered ranking done");
    positions
}

/// Places one rank at the mean of each node's neighbors, keeping the rank's
/// slot order, the minimum spacing and the rank's overall center of mass.
fn place_rank(
    bucket: &[PersonId],
    neighbors: &HashMap<PersonId, Vec<PersonId>>,
    cross_pos: &mut HashMap<PersonId, f32>,
    half: f32,
    spacing: f32,
) {
    if bucket.is_empty() {
        return;
    }
    let mut entries: Vec<(PersonId, f32)> = Vec::with_capacity(bucket.len());
    for (slot, id) in bucket.iter().enumerate() {
        let mut sum = 0.0;
        let mut count = 0.0;
        if let Some(list) = neighbors.get(id) {
            for neighbor in list {
                if let Some(center) = cross_pos.get(neighbor) {
                    sum += *center;
                    count += 1.0;
                }
            }
        }
        let desired = if count > 0.0 {
            sum / count
        } else {
            cross_pos
                .get(id)
                .copied()
                .unwrap_or(slot as f32 * (2.0 * half + spacing))
        };
        entries.push((*id, desired));
    }
    let desired_mean = entries.iter().map(|(_, d)| *d).sum::<f32>() / entries.len() as f32;

    let mut assigned: Vec<(PersonId, f32)> = Vec::with_capacity(entries.len());
    let mut prev_center: Option<f32> = None;
    for (id, desired) in entries {
        let center = match prev_center {
            Some(prev) => desired.max(prev + 2.0 * half + spacing),
            None => desired,
        };
        assigned.push((id, center));
        prev_center = Some(center);
    }
    let actual_mean = assigned.iter().map(|(_, c)| *c).sum::<f32>() / assigned.len() as f32;
    let delta = desired_mean - actual_mean;
    for (id, center) in assigned {
        cross_pos.insert(id, center + delta);
    }
}

fn compute_ranks(index: &FamilyIndex<'_>, edges: &[&LayoutEdge]) -> HashMap<PersonId, usize> {
    let mut adj: HashMap<PersonId, Vec<PersonId>> = HashMap::new();
    let mut indeg: HashMap<PersonId, usize> = index.order.iter().map(|p| (p.id, 0)).collect();
    for edge in edges {
        adj.entry(edge.source).or_default().push(edge.target);
        if let Some(deg) = indeg.get_mut(&edge.target) {
            *deg += 1;
        }
    }

    let order_key: HashMap<PersonId, usize> = index
        .order
        .iter()
        .enumerate()
        .map(|(idx, person)| (person.id, idx))
        .collect();
    let key_of = |id: PersonId| order_key.get(&id).copied().unwrap_or(usize::MAX);

    let mut ready: BinaryHeap<Reverse<(usize, PersonId)>> = BinaryHeap::new();
    for person in &index.order {
        if indeg.get(&person.id).copied().unwrap_or(0) == 0 {
            ready.push(Reverse((key_of(person.id), person.id)));
        }
    }

    let mut order: Vec<PersonId> = Vec::with_capacity(index.len());
    let mut processed: HashSet<PersonId> = HashSet::new();
    loop {
        while let Some(Reverse((_key, id))) = ready.pop() {
            if !processed.insert(id) {
                continue;
            }
            order.push(id);
            if let Some(nexts) = adj.get(&id) {
                for next in nexts {
                    if processed.contains(next) {
                        continue;
                    }
                    if let Some(deg) = indeg.get_mut(next) {
                        *deg = deg.saturating_sub(1);
                        if *deg == 0 {
                            ready.push(Reverse((key_of(*next), *next)));
                        }
                    }
                }
            }
        }

        if processed.len() >= index.len() {
            break;
        }

        // Cycle: restart from the earliest unprocessed person in family order,
        // treating its incoming edges as back-edges.
        match index.order.iter().find(|person| !processed.contains(&person.id)) {
            Some(person) => ready.push(Reverse((key_of(person.id), person.id))),
            None => break,
        }
    }

    let order_index: HashMap<PersonId, usize> =
        order.iter().enumerate().map(|(idx, id)| (*id, idx)).collect();

    let mut ranks: HashMap<PersonId, usize> = HashMap::new();
    for id in &order {
        let rank = *ranks.entry(*id).or_insert(0);
        if let Some(nexts) = adj.get(id) {
            let from_idx = order_index.get(id).copied().unwrap_or(0);
            for next in nexts {
                let to_idx = order_index.get(next).copied().unwrap_or(from_idx);
                if to_idx <= from_idx {
                    continue;
                }
                let entry = ranks.entry(*next).or_insert(0);
                *entry = (*entry).max(rank + 1);
            }
        }
    }
    ranks
}

fn order_rank_nodes(
    rank_nodes: &mut [Vec<LayerNode>],
    edges: &[(LayerNode, LayerNode)],
    node_order: &HashMap<LayerNode, usize>,
    spouses: &HashMap<PersonId, Vec<PersonId>>,
    passes: usize,
) {
    for bucket in rank_nodes.iter_mut() {
        keep_couples_adjacent(bucket, spouses);
    }
    if rank_nodes.len() <= 1 {
        return;
    }
    let mut incoming: HashMap<LayerNode, Vec<LayerNode>> = HashMap::new();
    let mut outgoing: HashMap<LayerNode, Vec<LayerNode>> = HashMap::new();
    for (from, to) in edges {
        outgoing.entry(*from).or_default().push(*to);
        incoming.entry(*to).or_default().push(*from);
    }

    let mut positions: HashMap<LayerNode, usize> = HashMap::new();
    let update_positions = |rank_nodes: &[Vec<LayerNode>], positions: &mut HashMap<LayerNode, usize>| {
        positions.clear();
        for bucket in rank_nodes {
            for (idx, node) in bucket.iter().enumerate() {
                positions.insert(*node, idx);
            }
        }
    };
    update_positions(rank_nodes, &mut positions);

    let sort_bucket = |bucket: &mut Vec<LayerNode>,
                       neighbors: &HashMap<LayerNode, Vec<LayerNode>>,
                       positions: &HashMap<LayerNode, usize>| {
        let current: HashMap<LayerNode, usize> =
            bucket.iter().enumerate().map(|(idx, node)| (*node, idx)).collect();
        let scores: HashMap<LayerNode, f32> = bucket
            .iter()
            .map(|node| (*node, median_position(*node, neighbors, positions, &current)))
            .collect();
        bucket.sort_by(|a, b| {
            let a_score = scores.get(a).copied().unwrap_or(0.0);
            let b_score = scores.get(b).copied().unwrap_or(0.0);
            a_score
                .total_cmp(&b_score)
                .then_with(|| current.get(a).cmp(&current.get(b)))
                .then_with(|| {
                    let a_order = node_order.get(a).copied().unwrap_or(usize::MAX);
                    let b_order = node_order.get(b).copied().unwrap_or(usize::MAX);
                    a_order.cmp(&b_order)
                })
        });
        keep_couples_adjacent(bucket, spouses);
    };

    for _ in 0..passes.max(1) {
        for rank in 1..rank_nodes.len() {
            if rank_nodes[rank].len() <= 1 {
                continue;
            }
            sort_bucket(&mut rank_nodes[rank], &incoming, &positions);
            update_positions(rank_nodes, &mut positions);
        }
        for rank in (0..rank_nodes.len() - 1).rev() {
            if rank_nodes[rank].len() <= 1 {
                continue;
            }
            sort_bucket(&mut rank_nodes[rank], &outgoing, &positions);
            update_positions(rank_nodes, &mut positions);
        }
    }
}

/// Pulls each person's partners in the same rank to the slots right after
/// them, so a couple is never split by an unrelated node. Partners already on
/// the left stay where they are.
fn keep_couples_adjacent(bucket: &mut Vec<LayerNode>, spouses: &HashMap<PersonId, Vec<PersonId>>) {
    let mut idx = 0;
    while idx < bucket.len() {
        if let LayerNode::Person(id) = bucket[idx] {
            if let Some(partners) = spouses.get(&id) {
                let mut insert_at = idx + 1;
                for partner in partners {
                    let slot = LayerNode::Person(*partner);
                    let Some(pos) = bucket.iter().position(|node| *node == slot) else {
                        continue;
                    };
                    if pos < insert_at {
                        continue;
                    }
                    let node = bucket.remove(pos);
                    bucket.insert(insert_at, node);
                    insert_at += 1;
                }
            }
        }
        idx += 1;
    }
}

fn median_position(
    node: LayerNode,
    neighbors: &HashMap<LayerNode, Vec<LayerNode>>,
    positions: &HashMap<LayerNode, usize>,
    current: &HashMap<LayerNode, usize>,
) -> f32 {
    let fallback = current.get(&node).copied().unwrap_or(0) as f32;
    let Some(list) = neighbors.get(&node) else {
        return fallback;
    };
    let mut values: Vec<f32> = list
        .iter()
        .filter_map(|neighbor| positions.get(neighbor).map(|pos| *pos as f32))
        .collect();
    if values.is_empty() {
        return fallback;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) * 0.5
    }
}
