use rdf_multiset_common::BindingId;
use rdf_multiset_engine::group::{
    BindingGroup, GroupBy, GroupByExpression, GroupByVariable, Grouping,
};
use rdf_multiset_engine::Multiset;
use rdf_multiset_functions::ExpressionEvaluator;
use rdf_multiset_model::{integer_literal, Expression, Literal, NamedNode, Term, Variable};

fn var(name: &str) -> Variable {
    Variable::new_unchecked(name)
}

fn iri(name: &str) -> Option<Term> {
    Some(NamedNode::new_unchecked(format!("http://example.com/{name}")).into())
}

fn int(value: i64) -> Option<Term> {
    Some(integer_literal(value).into())
}

fn ids(group: &BindingGroup) -> Vec<usize> {
    group.ids().iter().map(|id| id.as_usize()).collect()
}

/// x = a, b, unbound, a
fn solutions_with_nulls() -> Multiset {
    Multiset::from_rows(
        vec![var("x"), var("y")],
        [
            vec![iri("a"), int(1)],
            vec![iri("b"), int(1)],
            vec![None, int(2)],
            vec![iri("a"), int(2)],
        ],
    )
}

#[test]
fn group_by_variable_puts_unbound_values_last() {
    let multiset = solutions_with_nulls();
    let grouping = GroupByVariable::new(var("x"));

    let groups = grouping.apply(&multiset, &multiset.ids()).unwrap();

    assert_eq!(
        groups.iter().map(ids).collect::<Vec<_>>(),
        vec![vec![0, 3], vec![1], vec![2]]
    );
}

#[test]
fn group_by_variable_assigns_values() {
    let multiset = solutions_with_nulls();
    let grouping = GroupByVariable::new(var("x")).with_assignment(var("key"));

    let groups = grouping.apply(&multiset, &multiset.ids()).unwrap();

    let assignments = groups
        .iter()
        .map(|group| group.assignment(var("key").as_ref()).map(Option::<&Term>::cloned))
        .collect::<Vec<_>>();
    assert_eq!(assignments, vec![Some(iri("a")), Some(iri("b")), Some(None)]);
}

#[test]
fn group_by_variable_uses_term_equality() {
    let multiset = Multiset::from_rows(
        vec![var("x")],
        [
            int(1),
            Some(Literal::new_typed_literal("01", rdf_multiset_model::vocab::xsd::INTEGER).into()),
            int(1),
        ]
        .map(|value| vec![value]),
    );

    let groups = GroupByVariable::new(var("x"))
        .apply(&multiset, &multiset.ids())
        .unwrap();

    assert_eq!(
        groups.iter().map(ids).collect::<Vec<_>>(),
        vec![vec![0, 2], vec![1]]
    );
}

#[test]
fn chained_grouping_refines_groups() {
    let multiset = solutions_with_nulls();
    let group_by = GroupBy::new(vec![
        Box::new(GroupByVariable::new(var("x"))),
        Box::new(GroupByVariable::new(var("y"))),
    ]);

    let groups = group_by.apply(&multiset, &multiset.ids()).unwrap();

    assert_eq!(
        groups.iter().map(ids).collect::<Vec<_>>(),
        vec![vec![0], vec![3], vec![1], vec![2]]
    );
}

#[test]
fn child_groups_inherit_assignments() {
    let multiset = solutions_with_nulls();
    let group_by = GroupBy::new(vec![
        Box::new(GroupByVariable::new(var("x")).with_assignment(var("gx"))),
        Box::new(GroupByVariable::new(var("y")).with_assignment(var("gy"))),
    ]);

    let groups = group_by.apply(&multiset, &multiset.ids()).unwrap();

    let first = &groups[0];
    assert_eq!(first.assignment(var("gx").as_ref()), Some(iri("a").as_ref()));
    assert_eq!(first.assignment(var("gy").as_ref()), Some(int(1).as_ref()));
    let last = &groups[3];
    assert_eq!(last.assignment(var("gx").as_ref()), Some(None));
    assert_eq!(last.assignment(var("gy").as_ref()), Some(int(2).as_ref()));
}

#[test]
fn group_by_expression_separates_errors_and_unbound_values() {
    let n = var("n");
    let multiset = Multiset::from_rows(
        vec![n.clone()],
        [
            int(1),
            Some(Literal::new_simple_literal("a").into()),
            None,
            int(1),
            int(2),
            Some(Literal::new_simple_literal("b").into()),
        ]
        .map(|value| vec![value]),
    );
    // IF(BOUND(?n), ?n + 1, ?missing)
    let expression = Expression::If(
        Box::new(Expression::Bound(n.clone())),
        Box::new(Expression::Add(
            Box::new(Expression::Variable(n)),
            Box::new(Expression::Literal(integer_literal(1))),
        )),
        Box::new(Expression::Variable(var("missing"))),
    );
    let grouping = GroupByExpression::new(expression, ExpressionEvaluator::default())
        .with_assignment(var("v"));

    let groups = grouping.apply(&multiset, &multiset.ids()).unwrap();

    assert_eq!(
        groups.iter().map(ids).collect::<Vec<_>>(),
        vec![vec![0, 3], vec![4], vec![1, 5], vec![2]]
    );
    let assignments = groups
        .iter()
        .map(|group| group.assignment(var("v").as_ref()).map(Option::<&Term>::cloned))
        .collect::<Vec<_>>();
    assert_eq!(
        assignments,
        vec![Some(int(2)), Some(int(3)), Some(None), Some(None)]
    );
}

#[test]
fn grouping_without_keys_creates_a_single_group() {
    let multiset = solutions_with_nulls();
    let group_by = GroupBy::default();

    let groups = group_by.apply(&multiset, &multiset.ids()).unwrap();
    assert_eq!(groups.iter().map(ids).collect::<Vec<_>>(), vec![vec![0, 1, 2, 3]]);

    let empty = Multiset::new(vec![var("x")]);
    let groups = group_by.apply(&empty, &empty.ids()).unwrap();
    assert_eq!(groups, vec![BindingGroup::new(Vec::new())]);
}

#[test]
fn grouping_with_keys_on_empty_input_creates_no_group() {
    let empty = Multiset::new(vec![var("x")]);
    let group_by = GroupBy::new(vec![Box::new(GroupByVariable::new(var("x")))]);

    let groups = group_by.apply(&empty, &empty.ids()).unwrap();
    assert!(groups.is_empty());
}

#[test]
fn every_solution_lands_in_exactly_one_group() {
    let multiset = Multiset::from_rows(
        vec![var("x"), var("y")],
        (0..20).map(|i| {
            vec![
                (i % 3 != 0).then(|| integer_literal(i % 4).into()),
                (i % 5 != 0).then(|| integer_literal(i % 2).into()),
            ]
        }),
    );
    let group_by = GroupBy::new(vec![
        Box::new(GroupByVariable::new(var("x"))),
        Box::new(GroupByVariable::new(var("y"))),
    ]);

    let groups = group_by.apply(&multiset, &multiset.ids()).unwrap();

    let mut all = groups
        .iter()
        .flat_map(|group| group.ids().iter().copied())
        .collect::<Vec<_>>();
    all.sort();
    assert_eq!(all, (0..20).map(BindingId::new).collect::<Vec<_>>());
    assert!(groups.iter().all(|group| !group.ids().is_empty()));
}

#[test]
fn projectable_variables_are_deduplicated() {
    let group_by = GroupBy::new(vec![
        Box::new(GroupByVariable::new(var("x"))),
        Box::new(
            GroupByExpression::new(Expression::Variable(var("y")), ExpressionEvaluator::default())
                .with_assignment(var("v")),
        ),
        Box::new(GroupByVariable::new(var("x")).with_assignment(var("v"))),
    ]);

    assert_eq!(group_by.variables(), vec![var("x")]);
    assert_eq!(group_by.projectable_variables(), vec![var("x"), var("v")]);
}

#[test]
fn grouping_order_does_not_change_the_partition() {
    let multiset = Multiset::from_rows(
        vec![var("a"), var("b")],
        (0..24).map(|i| {
            vec![
                (i % 5 != 0).then(|| integer_literal(i % 3).into()),
                (i % 7 != 0).then(|| integer_literal(i % 4).into()),
            ]
        }),
    );
    let partition = |first: &str, second: &str| {
        let group_by = GroupBy::new(vec![
            Box::new(GroupByVariable::new(var(first))),
            Box::new(GroupByVariable::new(var(second))),
        ]);
        let mut groups = group_by
            .apply(&multiset, &multiset.ids())
            .unwrap()
            .iter()
            .map(|group| {
                let mut ids = ids(group);
                ids.sort_unstable();
                ids
            })
            .collect::<Vec<_>>();
        groups.sort();
        groups
    };

    let ab = partition("a", "b");
    let ba = partition("b", "a");

    assert_eq!(ab.len(), ba.len());
    assert_eq!(ab, ba);
}
