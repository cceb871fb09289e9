//! Collects the variables that a pattern may read.

use rdf_multiset_model::{
    AggregateExpression, Expression, GraphPattern, NamedNodePattern, OrderExpression, TermPattern,
    Variable,
};
use rustc_hash::FxHashSet;

/// Returns the variables that `pattern` mentions, including the variables of its expressions.
///
/// A sub-query only exposes its projected variables.
pub(super) fn mentioned_variables(pattern: &GraphPattern) -> FxHashSet<&Variable> {
    let mut variables = FxHashSet::default();
    add_pattern(pattern, &mut variables);
    variables
}

fn add_pattern<'a>(pattern: &'a GraphPattern, variables: &mut FxHashSet<&'a Variable>) {
    match pattern {
        GraphPattern::Bgp { patterns } => {
            for pattern in patterns {
                add_term(&pattern.subject, variables);
                add_named_node(&pattern.predicate, variables);
                add_term(&pattern.object, variables);
            }
        }
        GraphPattern::Path {
            subject, object, ..
        } => {
            add_term(subject, variables);
            add_term(object, variables);
        }
        GraphPattern::Join { left, right }
        | GraphPattern::Union { left, right }
        | GraphPattern::Minus { left, right } => {
            add_pattern(left, variables);
            add_pattern(right, variables);
        }
        GraphPattern::LeftJoin {
            left,
            right,
            expression,
        } => {
            add_pattern(left, variables);
            add_pattern(right, variables);
            if let Some(expression) = expression {
                add_expression(expression, variables);
            }
        }
        GraphPattern::Filter { expr, inner } => {
            add_expression(expr, variables);
            add_pattern(inner, variables);
        }
        GraphPattern::Graph { name, inner } | GraphPattern::Service { name, inner, .. } => {
            add_named_node(name, variables);
            add_pattern(inner, variables);
        }
        GraphPattern::Extend {
            inner,
            variable,
            expression,
        } => {
            variables.insert(variable);
            add_expression(expression, variables);
            add_pattern(inner, variables);
        }
        GraphPattern::Values {
            variables: values, ..
        } => variables.extend(values),
        GraphPattern::OrderBy { inner, expression } => {
            for expression in expression {
                let (OrderExpression::Asc(expression) | OrderExpression::Desc(expression)) =
                    expression;
                add_expression(expression, variables);
            }
            add_pattern(inner, variables);
        }
        GraphPattern::Project {
            variables: projected,
            ..
        } => variables.extend(projected),
        GraphPattern::Distinct { inner }
        | GraphPattern::Reduced { inner }
        | GraphPattern::Slice { inner, .. } => add_pattern(inner, variables),
        GraphPattern::Group {
            inner,
            variables: grouped,
            aggregates,
        } => {
            variables.extend(grouped);
            for (variable, aggregate) in aggregates {
                variables.insert(variable);
                if let AggregateExpression::FunctionCall { expr, .. } = aggregate {
                    add_expression(expr, variables);
                }
            }
            add_pattern(inner, variables);
        }
    }
}

fn add_term<'a>(term: &'a TermPattern, variables: &mut FxHashSet<&'a Variable>) {
    if let TermPattern::Variable(variable) = term {
        variables.insert(variable);
    }
}

fn add_named_node<'a>(node: &'a NamedNodePattern, variables: &mut FxHashSet<&'a Variable>) {
    if let NamedNodePattern::Variable(variable) = node {
        variables.insert(variable);
    }
}

fn add_expression<'a>(expression: &'a Expression, variables: &mut FxHashSet<&'a Variable>) {
    match expression {
        Expression::NamedNode(_) | Expression::Literal(_) => {}
        Expression::Variable(variable) | Expression::Bound(variable) => {
            variables.insert(variable);
        }
        Expression::Or(lhs, rhs)
        | Expression::And(lhs, rhs)
        | Expression::Equal(lhs, rhs)
        | Expression::SameTerm(lhs, rhs)
        | Expression::Greater(lhs, rhs)
        | Expression::GreaterOrEqual(lhs, rhs)
        | Expression::Less(lhs, rhs)
        | Expression::LessOrEqual(lhs, rhs)
        | Expression::Add(lhs, rhs)
        | Expression::Subtract(lhs, rhs)
        | Expression::Multiply(lhs, rhs)
        | Expression::Divide(lhs, rhs) => {
            add_expression(lhs, variables);
            add_expression(rhs, variables);
        }
        Expression::UnaryPlus(inner) | Expression::UnaryMinus(inner) | Expression::Not(inner) => {
            add_expression(inner, variables);
        }
        Expression::In(needle, haystack) => {
            add_expression(needle, variables);
            for expression in haystack {
                add_expression(expression, variables);
            }
        }
        Expression::If(condition, then, otherwise) => {
            add_expression(condition, variables);
            add_expression(then, variables);
            add_expression(otherwise, variables);
        }
        Expression::Coalesce(args) | Expression::FunctionCall(_, args) => {
            for expression in args {
                add_expression(expression, variables);
            }
        }
        Expression::Exists(pattern) => add_pattern(pattern, variables),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_multiset_model::{Literal, TriplePattern};

    fn var(name: &str) -> Variable {
        Variable::new_unchecked(name)
    }

    fn names(pattern: &GraphPattern) -> Vec<String> {
        let mut names = mentioned_variables(pattern)
            .into_iter()
            .map(|variable| variable.as_str().to_owned())
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    #[test]
    fn includes_filter_variables() {
        let pattern = GraphPattern::Filter {
            expr: Expression::Equal(
                Box::new(Expression::Variable(var("w"))),
                Box::new(Expression::Variable(var("v"))),
            ),
            inner: Box::new(GraphPattern::Bgp {
                patterns: vec![TriplePattern {
                    subject: var("x").into(),
                    predicate: var("p").into(),
                    object: var("w").into(),
                }],
            }),
        };

        assert_eq!(names(&pattern), vec!["p", "v", "w", "x"]);
    }

    #[test]
    fn sub_queries_only_expose_projected_variables() {
        let pattern = GraphPattern::Project {
            inner: Box::new(GraphPattern::Extend {
                inner: Box::new(GraphPattern::Bgp {
                    patterns: Vec::new(),
                }),
                variable: var("hidden"),
                expression: Expression::Literal(Literal::new_simple_literal("a")),
            }),
            variables: vec![var("visible")],
        };

        assert_eq!(names(&pattern), vec!["visible"]);
    }
}
