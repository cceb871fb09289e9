use rdf_multiset_common::TripleSource;
use rdf_multiset_model::vocab::opt;
use rdf_multiset_model::{
    integer_literal, GraphName, GraphNameRef, Literal, NamedNode, NamedOrBlankNode, Quad, Subject, Term,
};
use rdf_multiset_storage::MemDataset;

#[test]
fn test_insert_quad() {
    let dataset = MemDataset::new();

    let inserted = dataset.insert_quads(vec![example_quad()]).unwrap();
    assert_eq!(inserted, 1);

    let len = dataset.len().unwrap();
    assert_eq!(len, 1);
}

#[test]
fn test_insert_duplicate_quads_no_effect() {
    let dataset = MemDataset::new();

    dataset.insert_quads(vec![example_quad()]).unwrap();

    let inserted = dataset.insert_quads(vec![example_quad()]).unwrap();
    assert_eq!(inserted, 0);
}

#[test]
fn test_insert_duplicate_quads_in_same_operation() {
    let dataset = MemDataset::new();

    let inserted = dataset
        .insert_quads(vec![example_quad(), example_quad()])
        .unwrap();

    assert_eq!(inserted, 1);
}

#[test]
fn test_named_graph_insertion_and_query() {
    let dataset = MemDataset::new();
    let graph = NamedOrBlankNode::NamedNode(NamedNode::new("http://example.com/graph").unwrap());

    let inserted = dataset.insert_named_graph(graph.as_ref()).unwrap();
    assert!(inserted);

    let exists = dataset.contains_named_graph(graph.as_ref()).unwrap();
    assert!(exists);

    let graphs = dataset.named_graphs().unwrap();
    assert_eq!(graphs, vec![graph]);
}

#[test]
fn test_inserting_quad_declares_graph() {
    let dataset = MemDataset::new();
    dataset
        .insert_quads(vec![example_quad_in_graph("http://example.com/g1")])
        .unwrap();

    let graphs = dataset.named_graphs().unwrap();
    assert_eq!(graphs.len(), 1);
    assert_eq!(graphs[0].to_string(), "<http://example.com/g1>");
}

#[test]
fn test_remove_quad() {
    let dataset = MemDataset::new();
    dataset.insert_quads(vec![example_quad()]).unwrap();

    let removed = dataset.remove(&example_quad()).unwrap();
    assert!(removed);
    assert_eq!(dataset.len().unwrap(), 0);

    let removed_again = dataset.remove(&example_quad()).unwrap();
    assert!(!removed_again);
    dataset.validate().unwrap();
}

#[test]
fn test_remove_named_graph_removes_quads() {
    let dataset = MemDataset::new();
    dataset
        .insert_quads(vec![
            example_quad(),
            example_quad_in_graph("http://example.com/g1"),
        ])
        .unwrap();

    let graph = NamedOrBlankNode::NamedNode(NamedNode::new("http://example.com/g1").unwrap());
    let removed = dataset.remove_named_graph(graph.as_ref()).unwrap();
    assert!(removed);

    assert!(!dataset.contains_named_graph(graph.as_ref()).unwrap());
    assert_eq!(dataset.len().unwrap(), 1);
    dataset.validate().unwrap();
}

#[test]
fn test_clear_all() {
    let dataset = MemDataset::new();
    dataset
        .insert_quads(vec![
            example_quad_in_graph("http://example.com/g1"),
            example_quad_in_graph("http://example.com/g2"),
        ])
        .unwrap();

    dataset.clear().unwrap();
    assert_eq!(dataset.len().unwrap(), 0);
    assert!(dataset.named_graphs().unwrap().is_empty());
}

#[test]
fn test_snapshot_consistency() {
    let dataset = MemDataset::new();
    dataset
        .insert_quads(vec![example_quad_in_graph("http://g")])
        .unwrap();

    let snapshot = dataset.snapshot().unwrap();

    // Update the dataset after the snapshot
    dataset.clear().unwrap();

    assert_eq!(snapshot.len().unwrap(), 1);
}

#[test]
fn test_pattern_lookup_preserves_insertion_order() {
    let dataset = MemDataset::new();
    let predicate = NamedNode::new("http://example.com/p").unwrap();
    let quads = (0_i64..5)
        .map(|i| {
            Quad::new(
                NamedNode::new(format!("http://example.com/s{i}")).unwrap(),
                predicate.clone(),
                Literal::from(i),
                GraphName::DefaultGraph,
            )
        })
        .collect::<Vec<_>>();
    dataset.insert_quads(quads.clone()).unwrap();

    let result = dataset
        .quads_for_pattern(None, Some(predicate.as_ref()), None, None)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(result, quads);
}

#[test]
fn test_pattern_lookup_with_multiple_bound_components() {
    let dataset = MemDataset::new();
    dataset
        .insert_quads(vec![
            example_quad(),
            example_quad_in_graph("http://example.com/g1"),
        ])
        .unwrap();

    let subject = Subject::NamedNode(NamedNode::new("http://example.com/subject").unwrap());
    let object = Term::Literal(Literal::new_simple_literal("value"));
    let result = dataset
        .quads_for_pattern(
            Some(subject.as_ref()),
            None,
            Some(object.as_ref()),
            Some(GraphNameRef::DefaultGraph),
        )
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(result, vec![example_quad()]);

    let missing = Term::Literal(Literal::new_simple_literal("other"));
    let result = dataset
        .quads_for_pattern(None, None, Some(missing.as_ref()), None)
        .count();
    assert_eq!(result, 0);
}

#[test]
fn test_statistics_graph() {
    let dataset = MemDataset::new();
    dataset
        .insert_quads(vec![
            example_quad(),
            example_quad_in_graph("http://example.com/g1"),
        ])
        .unwrap();

    let statistics = dataset.statistics_graph().unwrap();
    let subject = NamedNode::new("http://example.com/subject").unwrap();
    let predicate = NamedNode::new("http://example.com/predicate").unwrap();

    let expected = Term::from(integer_literal(2));

    let subject_count =
        statistics.object_for_subject_predicate(subject.as_ref(), opt::SUBJECT_COUNT);
    assert_eq!(subject_count, Some(expected.as_ref()));
    let predicate_count =
        statistics.object_for_subject_predicate(predicate.as_ref(), opt::PREDICATE_COUNT);
    assert_eq!(predicate_count, Some(expected.as_ref()));
    // The literal object cannot be described
    assert_eq!(statistics.len(), 2);
}

fn example_quad() -> Quad {
    Quad::new(
        Subject::NamedNode(NamedNode::new("http://example.com/subject").unwrap()),
        NamedNode::new("http://example.com/predicate").unwrap(),
        Term::Literal(Literal::new_simple_literal("value")),
        GraphName::DefaultGraph,
    )
}

fn example_quad_in_graph(graph: &str) -> Quad {
    Quad::new(
        Subject::NamedNode(NamedNode::new("http://example.com/subject").unwrap()),
        NamedNode::new("http://example.com/predicate").unwrap(),
        Term::Literal(Literal::new_simple_literal("value")),
        GraphName::NamedNode(NamedNode::new(graph).unwrap()),
    )
}
