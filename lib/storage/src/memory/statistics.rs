use rdf_multiset_model::vocab::opt;
use rdf_multiset_model::{
    integer_literal, Graph, NamedNodeRef, QuadRef, Subject, Term, TermRef, Triple,
};
use rustc_hash::FxHashMap;

/// Counts how often each term occurs in each position of a quad.
#[derive(Debug, Default)]
pub(super) struct StatisticsBuilder {
    subjects: Counts,
    predicates: Counts,
    objects: Counts,
}

/// Keeps the counts in first-seen order so that the generated graph is stable.
#[derive(Debug, Default)]
struct Counts {
    order: Vec<Term>,
    counts: FxHashMap<Term, u64>,
}

impl Counts {
    fn increment(&mut self, term: TermRef<'_>) {
        let term = term.into_owned();
        if let Some(count) = self.counts.get_mut(&term) {
            *count += 1;
        } else {
            self.counts.insert(term.clone(), 1);
            self.order.push(term);
        }
    }

    fn emit(&self, predicate: NamedNodeRef<'_>, graph: &mut Graph) {
        for term in &self.order {
            let subject = match term {
                Term::NamedNode(node) => Subject::NamedNode(node.clone()),
                Term::BlankNode(node) => Subject::BlankNode(node.clone()),
                _ => continue,
            };
            let count = self.counts.get(term).copied().unwrap_or_default();
            let count = i64::try_from(count).unwrap_or(i64::MAX);
            graph.insert(&Triple::new(subject, predicate, integer_literal(count)));
        }
    }
}

impl StatisticsBuilder {
    pub fn record(&mut self, quad: QuadRef<'_>) {
        self.subjects.increment(quad.subject.into());
        self.predicates.increment(quad.predicate.into());
        self.objects.increment(quad.object);
    }

    pub fn build(&self) -> Graph {
        let mut graph = Graph::new();
        self.subjects.emit(opt::SUBJECT_COUNT, &mut graph);
        self.predicates.emit(opt::PREDICATE_COUNT, &mut graph);
        self.objects.emit(opt::OBJECT_COUNT, &mut graph);
        graph
    }
}
