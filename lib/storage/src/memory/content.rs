use rdf_multiset_model::{
    GraphName, GraphNameRef, NamedNode, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef,
    Quad, QuadRef, Subject, SubjectRef, Term, TermRef,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::hash::Hash;

/// Maps a term to the slots of all quads that contain the term in a given position. The slots
/// are kept in ascending order, which is the insertion order of the quads.
type QuadIndex<K> = FxHashMap<K, Vec<usize>>;

/// The unsynchronized content of a [MemDataset](super::MemDataset).
///
/// Quads are stored in insertion order. Removing a quad leaves an empty slot behind such that
/// the slots of the remaining quads stay valid.
#[derive(Clone, Debug, Default)]
pub(super) struct Content {
    slots: Vec<Option<Quad>>,
    slot_of: FxHashMap<Quad, usize>,
    by_subject: QuadIndex<Subject>,
    by_predicate: QuadIndex<NamedNode>,
    by_object: QuadIndex<Term>,
    by_graph_name: QuadIndex<GraphName>,
    named_graphs: Vec<NamedOrBlankNode>,
    named_graph_set: FxHashSet<NamedOrBlankNode>,
}

impl Content {
    pub fn len(&self) -> usize {
        self.slot_of.len()
    }

    pub fn contains(&self, quad: QuadRef<'_>) -> bool {
        self.slot_of.contains_key(&quad.into_owned())
    }

    pub fn insert(&mut self, quad: QuadRef<'_>) -> bool {
        let quad = quad.into_owned();
        if self.slot_of.contains_key(&quad) {
            return false;
        }

        let slot = self.slots.len();
        push_slot(&mut self.by_subject, quad.subject.clone(), slot);
        push_slot(&mut self.by_predicate, quad.predicate.clone(), slot);
        push_slot(&mut self.by_object, quad.object.clone(), slot);
        push_slot(&mut self.by_graph_name, quad.graph_name.clone(), slot);
        match &quad.graph_name {
            GraphName::NamedNode(graph) => {
                self.add_named_graph(NamedOrBlankNode::NamedNode(graph.clone()));
            }
            GraphName::BlankNode(graph) => {
                self.add_named_graph(NamedOrBlankNode::BlankNode(graph.clone()));
            }
            GraphName::DefaultGraph => {}
        }

        self.slot_of.insert(quad.clone(), slot);
        self.slots.push(Some(quad));
        true
    }

    pub fn remove(&mut self, quad: QuadRef<'_>) -> bool {
        let quad = quad.into_owned();
        let Some(slot) = self.slot_of.remove(&quad) else {
            return false;
        };

        self.slots[slot] = None;
        remove_slot(&mut self.by_subject, &quad.subject, slot);
        remove_slot(&mut self.by_predicate, &quad.predicate, slot);
        remove_slot(&mut self.by_object, &quad.object, slot);
        remove_slot(&mut self.by_graph_name, &quad.graph_name, slot);
        true
    }

    pub fn add_named_graph(&mut self, graph: NamedOrBlankNode) -> bool {
        if !self.named_graph_set.insert(graph.clone()) {
            return false;
        }
        self.named_graphs.push(graph);
        true
    }

    pub fn contains_named_graph(&self, graph: NamedOrBlankNodeRef<'_>) -> bool {
        self.named_graph_set.contains(&graph.into_owned())
    }

    /// Removes the named graph and all of its quads.
    pub fn remove_named_graph(&mut self, graph: NamedOrBlankNodeRef<'_>) -> bool {
        let graph = graph.into_owned();
        if !self.named_graph_set.remove(&graph) {
            return false;
        }
        self.named_graphs.retain(|g| *g != graph);

        let graph_name = match graph {
            NamedOrBlankNode::NamedNode(graph) => GraphName::NamedNode(graph),
            NamedOrBlankNode::BlankNode(graph) => GraphName::BlankNode(graph),
        };
        let quads = self.matching(None, None, None, Some(graph_name.as_ref()));
        for quad in &quads {
            self.remove(quad.as_ref());
        }
        true
    }

    pub fn named_graphs(&self) -> &[NamedOrBlankNode] {
        &self.named_graphs
    }

    pub fn quads(&self) -> impl Iterator<Item = &Quad> {
        self.slots.iter().flatten()
    }

    /// Returns all quads that match the pattern, in insertion order.
    ///
    /// The index of the most selective bound component is scanned and the remaining components
    /// are checked on each candidate.
    pub fn matching(
        &self,
        subject: Option<SubjectRef<'_>>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<TermRef<'_>>,
        graph_name: Option<GraphNameRef<'_>>,
    ) -> Vec<Quad> {
        let candidates = [
            subject.map(|s| lookup(&self.by_subject, &s.into_owned())),
            predicate.map(|p| lookup(&self.by_predicate, &p.into_owned())),
            object.map(|o| lookup(&self.by_object, &o.into_owned())),
            graph_name.map(|g| lookup(&self.by_graph_name, &g.into_owned())),
        ];
        let smallest = candidates.into_iter().flatten().min_by_key(|slots| slots.len());

        let matches = |quad: &&Quad| {
            subject.map_or(true, |s| quad.subject.as_ref() == s)
                && predicate.map_or(true, |p| quad.predicate.as_ref() == p)
                && object.map_or(true, |o| quad.object.as_ref() == o)
                && graph_name.map_or(true, |g| quad.graph_name.as_ref() == g)
        };

        match smallest {
            Some(slots) => slots
                .iter()
                .filter_map(|slot| self.slots[*slot].as_ref())
                .filter(matches)
                .cloned()
                .collect(),
            None => self.quads().filter(matches).cloned().collect(),
        }
    }

    /// Checks that all indexes agree with the stored quads.
    pub fn validate(&self) -> Result<(), String> {
        for (quad, slot) in &self.slot_of {
            if self.slots.get(*slot).and_then(Option::as_ref) != Some(quad) {
                return Err(format!("Quad {quad} is not stored in slot {slot}."));
            }
            let indexed = contains_slot(&self.by_subject, &quad.subject, *slot)
                && contains_slot(&self.by_predicate, &quad.predicate, *slot)
                && contains_slot(&self.by_object, &quad.object, *slot)
                && contains_slot(&self.by_graph_name, &quad.graph_name, *slot);
            if !indexed {
                return Err(format!("Quad {quad} is missing in an index."));
            }
        }

        let occupied = self.slots.iter().flatten().count();
        if occupied != self.slot_of.len() {
            return Err(format!(
                "{occupied} occupied slots but {} registered quads.",
                self.slot_of.len()
            ));
        }
        Ok(())
    }
}

static EMPTY: Vec<usize> = Vec::new();

fn lookup<'a, K: Hash + Eq>(index: &'a QuadIndex<K>, key: &K) -> &'a Vec<usize> {
    index.get(key).unwrap_or(&EMPTY)
}

fn push_slot<K: Hash + Eq>(index: &mut QuadIndex<K>, key: K, slot: usize) {
    index.entry(key).or_default().push(slot);
}

fn remove_slot<K: Hash + Eq>(index: &mut QuadIndex<K>, key: &K, slot: usize) {
    if let Some(slots) = index.get_mut(key) {
        if let Ok(position) = slots.binary_search(&slot) {
            slots.remove(position);
        }
        if slots.is_empty() {
            index.remove(key);
        }
    }
}

fn contains_slot<K: Hash + Eq>(index: &QuadIndex<K>, key: &K, slot: usize) -> bool {
    index
        .get(key)
        .is_some_and(|slots| slots.binary_search(&slot).is_ok())
}
