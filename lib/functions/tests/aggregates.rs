mod common;

use common::{render, SolutionTable};
use insta::assert_snapshot;
use rdf_multiset_common::error::QueryEvaluationError;
use rdf_multiset_functions::aggregates::create_aggregate;
use rdf_multiset_functions::{ExprValue, ExpressionEvaluator};
use rdf_multiset_model::vocab::agg;
use rdf_multiset_model::{
    integer_literal, AggregateExpression, AggregateFunction, Expression, Literal, NamedNode,
    Term, Variable,
};

fn x() -> Expression {
    Expression::Variable(Variable::new_unchecked("x"))
}

fn int(value: i64) -> Option<Term> {
    Some(integer_literal(value).into())
}

fn string(value: &str) -> Option<Term> {
    Some(Literal::new_simple_literal(value).into())
}

fn boolean(value: bool) -> Option<Term> {
    Some(Literal::from(value).into())
}

fn iri(value: &str) -> Option<Term> {
    Some(NamedNode::new_unchecked(value).into())
}

fn aggregate(name: AggregateFunction, distinct: bool, table: &SolutionTable) -> ExprValue {
    let expression = AggregateExpression::FunctionCall {
        name,
        expr: x(),
        distinct,
    };
    create_aggregate(&expression, &ExpressionEvaluator::default())
        .unwrap()
        .apply(table, &table.ids())
        .unwrap()
}

fn custom(name: rdf_multiset_model::NamedNodeRef<'_>) -> AggregateFunction {
    AggregateFunction::Custom(name.into_owned())
}

#[test]
fn count_skips_unbound_values() {
    let table = SolutionTable::column(vec![int(1), None, int(1)]);
    let result = aggregate(AggregateFunction::Count, false, &table);
    assert_eq!(result, ExprValue::Bound(integer_literal(2).into()));
}

#[test]
fn count_distinct_uses_term_equality() {
    let table = SolutionTable::column(vec![
        int(1),
        Some(Literal::new_typed_literal("01", rdf_multiset_model::vocab::xsd::INTEGER).into()),
        int(1),
    ]);
    let result = aggregate(AggregateFunction::Count, true, &table);
    assert_eq!(result, ExprValue::Bound(integer_literal(2).into()));
}

#[test]
fn count_solutions() {
    let table = SolutionTable::new(
        &["x", "y"],
        vec![
            vec![int(1), None],
            vec![int(1), None],
            vec![int(1), int(2)],
        ],
    );
    let ids = table.ids();

    let all = create_aggregate(
        &AggregateExpression::CountSolutions { distinct: false },
        &ExpressionEvaluator::default(),
    )
    .unwrap();
    assert_eq!(
        all.apply(&table, &ids).unwrap(),
        ExprValue::Bound(integer_literal(3).into())
    );

    let distinct = create_aggregate(
        &AggregateExpression::CountSolutions { distinct: true },
        &ExpressionEvaluator::default(),
    )
    .unwrap();
    assert_eq!(
        distinct.apply(&table, &ids).unwrap(),
        ExprValue::Bound(integer_literal(2).into())
    );
}

#[test]
fn count_distinct_solutions_ignores_engine_variables() {
    let table = SolutionTable::new(
        &["s", "__path0", "__bnode_b"],
        vec![
            vec![iri("s"), iri("m1"), iri("o1")],
            vec![iri("s"), iri("m2"), iri("o2")],
        ],
    );

    let distinct = create_aggregate(
        &AggregateExpression::CountSolutions { distinct: true },
        &ExpressionEvaluator::default(),
    )
    .unwrap();
    assert_eq!(
        distinct.apply(&table, &table.ids()).unwrap(),
        ExprValue::Bound(integer_literal(1).into())
    );
}

#[test]
fn sum_of_empty_group_is_zero() {
    let table = SolutionTable::column(vec![]);
    let result = aggregate(AggregateFunction::Sum, false, &table);
    assert_eq!(result, ExprValue::Bound(integer_literal(0).into()));
}

#[test]
fn sum_with_non_numeric_value_is_an_error() {
    let table = SolutionTable::column(vec![int(1), string("a"), int(2)]);
    let result = aggregate(AggregateFunction::Sum, false, &table);
    assert_eq!(result, ExprValue::Error);
}

#[test]
fn sum_distinct() {
    let table = SolutionTable::column(vec![int(1), int(2), int(2), None]);
    let result = aggregate(AggregateFunction::Sum, true, &table);
    assert_eq!(result, ExprValue::Bound(integer_literal(3).into()));
}

#[test]
fn avg_of_integers_is_decimal() {
    let table = SolutionTable::column(vec![int(1), int(2)]);
    let result = aggregate(AggregateFunction::Avg, false, &table);
    assert_snapshot!(render(&result), @r#""1.5"^^<http://www.w3.org/2001/XMLSchema#decimal>"#);
}

#[test]
fn min_and_max_use_the_term_order() {
    let table = SolutionTable::column(vec![int(10), iri("http://example.com/a"), int(9), None]);
    let min = aggregate(AggregateFunction::Min, false, &table);
    let max = aggregate(AggregateFunction::Max, false, &table);

    assert_snapshot!(render(&min), @"<http://example.com/a>");
    assert_snapshot!(render(&max), @r#""10"^^<http://www.w3.org/2001/XMLSchema#integer>"#);
}

#[test]
fn min_of_empty_group_is_unbound() {
    let table = SolutionTable::column(vec![None]);
    let result = aggregate(AggregateFunction::Min, false, &table);
    assert_eq!(result, ExprValue::Unbound);
}

#[test]
fn sample_returns_first_bound_value() {
    let table = SolutionTable::column(vec![None, string("b"), string("c")]);
    let result = aggregate(AggregateFunction::Sample, false, &table);
    assert_eq!(result, ExprValue::Bound(Literal::new_simple_literal("b").into()));
}

#[test]
fn group_concat_with_separator() {
    let table = SolutionTable::column(vec![string("a"), None, string(""), string("c")]);
    let result = aggregate(
        AggregateFunction::GroupConcat {
            separator: Some(", ".to_owned()),
        },
        false,
        &table,
    );
    assert_snapshot!(render(&result), @r#""a, , c""#);
}

#[test]
fn group_concat_keeps_common_language() {
    let table = SolutionTable::column(vec![
        Some(Literal::new_language_tagged_literal_unchecked("a", "en").into()),
        Some(Literal::new_language_tagged_literal_unchecked("b", "en").into()),
    ]);
    let result = aggregate(AggregateFunction::GroupConcat { separator: None }, false, &table);
    assert_snapshot!(render(&result), @r#""a b"@en"#);
}

#[test]
fn group_concat_of_iri_is_an_error() {
    let table = SolutionTable::column(vec![string("a"), iri("http://example.com/a")]);
    let result = aggregate(AggregateFunction::GroupConcat { separator: None }, false, &table);
    assert_eq!(result, ExprValue::Error);
}

#[test]
fn all_stops_at_first_false_value() {
    let table = SolutionTable::column(vec![boolean(true), boolean(false), boolean(true), boolean(true)]);
    let result = aggregate(custom(agg::ALL), false, &table);

    assert_eq!(result, ExprValue::Bound(Literal::from(false).into()));
    assert_eq!(table.lookups(), 2);
}

#[test]
fn all_stops_at_first_error() {
    let table = SolutionTable::column(vec![boolean(true), iri("http://example.com/a"), boolean(true)]);
    let result = aggregate(custom(agg::ALL), false, &table);

    assert_eq!(result, ExprValue::Bound(Literal::from(false).into()));
    assert_eq!(table.lookups(), 2);
}

#[test]
fn all_of_empty_group_is_true() {
    let table = SolutionTable::column(vec![]);
    let result = aggregate(custom(agg::ALL), false, &table);
    assert_eq!(result, ExprValue::Bound(Literal::from(true).into()));
}

#[test]
fn all_true_values() {
    let table = SolutionTable::column(vec![boolean(true), int(1), string("x")]);
    let result = aggregate(custom(agg::ALL), false, &table);
    assert_eq!(result, ExprValue::Bound(Literal::from(true).into()));
    assert_eq!(table.lookups(), 3);
}

#[test]
fn any_skips_errors() {
    let table = SolutionTable::column(vec![iri("http://example.com/a"), boolean(false), int(3)]);
    let result = aggregate(custom(agg::ANY), false, &table);
    assert_eq!(result, ExprValue::Bound(Literal::from(true).into()));

    let table = SolutionTable::column(vec![]);
    let result = aggregate(custom(agg::ANY), false, &table);
    assert_eq!(result, ExprValue::Bound(Literal::from(false).into()));
}

#[test]
fn none_is_true_without_true_values() {
    let table = SolutionTable::column(vec![boolean(false), iri("http://example.com/a"), int(0)]);
    let result = aggregate(custom(agg::NONE), false, &table);
    assert_eq!(result, ExprValue::Bound(Literal::from(true).into()));

    let table = SolutionTable::column(vec![boolean(false), boolean(true)]);
    let result = aggregate(custom(agg::NONE), false, &table);
    assert_eq!(result, ExprValue::Bound(Literal::from(false).into()));
}

#[test]
fn mode_prefers_first_seen_on_ties() {
    let table = SolutionTable::column(vec![
        string("b"),
        string("a"),
        string("a"),
        string("b"),
        None,
        None,
        None,
    ]);
    let result = aggregate(custom(agg::MODE), false, &table);
    assert_snapshot!(render(&result), @r#""b""#);
}

#[test]
fn median_of_odd_and_even_groups() {
    let odd = SolutionTable::column(vec![int(5), int(1), int(3)]);
    let result = aggregate(custom(agg::MEDIAN), false, &odd);
    assert_snapshot!(render(&result), @r#""3"^^<http://www.w3.org/2001/XMLSchema#integer>"#);

    let even = SolutionTable::column(vec![int(4), int(1), int(3), int(2)]);
    let result = aggregate(custom(agg::MEDIAN), false, &even);
    assert_snapshot!(render(&result), @r#""2.5"^^<http://www.w3.org/2001/XMLSchema#decimal>"#);
}

#[test]
fn median_with_non_numeric_value_is_an_error() {
    let table = SolutionTable::column(vec![int(1), string("a")]);
    let result = aggregate(custom(agg::MEDIAN), false, &table);
    assert_eq!(result, ExprValue::Error);
}

#[test]
fn unknown_custom_aggregate() {
    let expression = AggregateExpression::FunctionCall {
        name: AggregateFunction::Custom(NamedNode::new_unchecked("http://example.com/agg")),
        expr: x(),
        distinct: false,
    };
    let result = create_aggregate(&expression, &ExpressionEvaluator::default());
    assert!(matches!(result, Err(QueryEvaluationError::NotImplemented(_))));
}
