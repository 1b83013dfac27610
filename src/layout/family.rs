use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::warn;

use crate::person::{PersonId, PersonRecord};

use super::types::{LayoutEdge, Relation};

/// Lookup tables shared by every stage of one layout call.
#[derive(Debug)]
pub(crate) struct FamilyIndex<'a> {
    /// Persons stable-sorted by `(father, mother)`, duplicates removed.
    pub order: Vec<&'a PersonRecord>,
    pub by_id: HashMap<PersonId, &'a PersonRecord>,
    /// Child ids per parent id, in family order.
    pub children: BTreeMap<PersonId, Vec<PersonId>>,
}

impl<'a> FamilyIndex<'a> {
    pub fn build(persons: &'a [PersonRecord]) -> Self {
        let mut seen: HashSet<PersonId> = HashSet::new();
        let mut order: Vec<&PersonRecord> = Vec::with_capacity(persons.len());
        for person in persons {
            if !seen.insert(person.id) {
                warn!(id = person.id, "duplicate person id, keeping the first record");
                continue;
            }
            order.push(person);
        }
        // `sort_by_key` is stable, so input order survives inside one family.
        order.sort_by_key(|person| (person.father().unwrap_or(0), person.mother().unwrap_or(0)));

        let by_id: HashMap<PersonId, &PersonRecord> =
            order.iter().map(|person| (person.id, *person)).collect();

        let mut children: BTreeMap<PersonId, Vec<PersonId>> = BTreeMap::new();
        for person in &order {
            let father = person.father();
            let mother = person.mother();
            if let Some(father) = father {
                children.entry(father).or_default().push(person.id);
            }
            if let Some(mother) = mother {
                if father != Some(mother) {
                    children.entry(mother).or_default().push(person.id);
                }
            }
        }

        Self {
            order,
            by_id,
            children,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn person(&self, id: PersonId) -> Option<&'a PersonRecord> {
        self.by_id.get(&id).copied()
    }

    pub fn children_of(&self, parent: PersonId) -> &[PersonId] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Persons with at least one child in the list, in family order.
    pub fn parents(&self) -> impl Iterator<Item = &'a PersonRecord> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|person| self.children.contains_key(&person.id))
    }

    /// One edge per known parent reference, father before mother, in family order.
    ///
    /// References to ids outside the list are kept so the caller sees every
    /// relation the backend reported.
    pub fn edges(&self) -> Vec<LayoutEdge> {
        let mut edges = Vec::new();
        for person in &self.order {
            if let Some(father) = person.father() {
                if !self.contains(father) {
                    warn!(child = person.id, father, "father is not in the person list");
                }
                edges.push(LayoutEdge::new(father, person.id, Relation::Father));
            }
            if let Some(mother) = person.mother() {
                if !self.contains(mother) {
                    warn!(child = person.id, mother, "mother is not in the person list");
                }
                edges.push(LayoutEdge::new(mother, person.id, Relation::Mother));
            }
        }
        edges
    }

    /// Edges whose endpoints are both in the list.
    pub fn layout_edges<'e>(&self, edges: &'e [LayoutEdge]) -> Vec<&'e LayoutEdge> {
        edges
            .iter()
            .filter(|edge| self.contains(edge.source) && self.contains(edge.target))
            .collect()
    }
}
