use rdf_multiset_model::{Expression, GraphPattern, OrderExpression};

/// Rewrites a graph pattern bottom-up.
///
/// The children of a node (including the patterns of `EXISTS` expressions) are rewritten
/// before `f` is applied to the node itself.
pub fn transform_up<E>(
    pattern: GraphPattern,
    f: &mut impl FnMut(GraphPattern) -> Result<GraphPattern, E>,
) -> Result<GraphPattern, E> {
    let pattern = match pattern {
        GraphPattern::Bgp { .. }
        | GraphPattern::Path { .. }
        | GraphPattern::Values { .. } => pattern,
        GraphPattern::Join { left, right } => GraphPattern::Join {
            left: Box::new(transform_up(*left, f)?),
            right: Box::new(transform_up(*right, f)?),
        },
        GraphPattern::LeftJoin {
            left,
            right,
            expression,
        } => GraphPattern::LeftJoin {
            left: Box::new(transform_up(*left, f)?),
            right: Box::new(transform_up(*right, f)?),
            expression: expression
                .map(|e| transform_expression(e, f))
                .transpose()?,
        },
        GraphPattern::Filter { expr, inner } => GraphPattern::Filter {
            expr: transform_expression(expr, f)?,
            inner: Box::new(transform_up(*inner, f)?),
        },
        GraphPattern::Union { left, right } => GraphPattern::Union {
            left: Box::new(transform_up(*left, f)?),
            right: Box::new(transform_up(*right, f)?),
        },
        GraphPattern::Graph { name, inner } => GraphPattern::Graph {
            name,
            inner: Box::new(transform_up(*inner, f)?),
        },
        GraphPattern::Extend {
            inner,
            variable,
            expression,
        } => GraphPattern::Extend {
            inner: Box::new(transform_up(*inner, f)?),
            variable,
            expression: transform_expression(expression, f)?,
        },
        GraphPattern::Minus { left, right } => GraphPattern::Minus {
            left: Box::new(transform_up(*left, f)?),
            right: Box::new(transform_up(*right, f)?),
        },
        GraphPattern::OrderBy { inner, expression } => GraphPattern::OrderBy {
            inner: Box::new(transform_up(*inner, f)?),
            expression: expression
                .into_iter()
                .map(|e| match e {
                    OrderExpression::Asc(e) => transform_expression(e, f).map(OrderExpression::Asc),
                    OrderExpression::Desc(e) => {
                        transform_expression(e, f).map(OrderExpression::Desc)
                    }
                })
                .collect::<Result<_, _>>()?,
        },
        GraphPattern::Project { inner, variables } => GraphPattern::Project {
            inner: Box::new(transform_up(*inner, f)?),
            variables,
        },
        GraphPattern::Distinct { inner } => GraphPattern::Distinct {
            inner: Box::new(transform_up(*inner, f)?),
        },
        GraphPattern::Reduced { inner } => GraphPattern::Reduced {
            inner: Box::new(transform_up(*inner, f)?),
        },
        GraphPattern::Slice {
            inner,
            start,
            length,
        } => GraphPattern::Slice {
            inner: Box::new(transform_up(*inner, f)?),
            start,
            length,
        },
        GraphPattern::Group {
            inner,
            variables,
            aggregates,
        } => GraphPattern::Group {
            inner: Box::new(transform_up(*inner, f)?),
            variables,
            aggregates,
        },
        GraphPattern::Service {
            name,
            inner,
            silent,
        } => GraphPattern::Service {
            name,
            inner: Box::new(transform_up(*inner, f)?),
            silent,
        },
    };
    f(pattern)
}

/// Rewrites the graph patterns nested in `EXISTS` expressions.
fn transform_expression<E>(
    expression: Expression,
    f: &mut impl FnMut(GraphPattern) -> Result<GraphPattern, E>,
) -> Result<Expression, E> {
    Ok(match expression {
        Expression::Exists(pattern) => Expression::Exists(Box::new(transform_up(*pattern, f)?)),
        Expression::Not(inner) => Expression::Not(boxed(inner, f)?),
        Expression::UnaryPlus(inner) => Expression::UnaryPlus(boxed(inner, f)?),
        Expression::UnaryMinus(inner) => Expression::UnaryMinus(boxed(inner, f)?),
        Expression::Or(lhs, rhs) => Expression::Or(boxed(lhs, f)?, boxed(rhs, f)?),
        Expression::And(lhs, rhs) => Expression::And(boxed(lhs, f)?, boxed(rhs, f)?),
        Expression::Equal(lhs, rhs) => Expression::Equal(boxed(lhs, f)?, boxed(rhs, f)?),
        Expression::SameTerm(lhs, rhs) => Expression::SameTerm(boxed(lhs, f)?, boxed(rhs, f)?),
        Expression::Greater(lhs, rhs) => Expression::Greater(boxed(lhs, f)?, boxed(rhs, f)?),
        Expression::GreaterOrEqual(lhs, rhs) => {
            Expression::GreaterOrEqual(boxed(lhs, f)?, boxed(rhs, f)?)
        }
        Expression::Less(lhs, rhs) => Expression::Less(boxed(lhs, f)?, boxed(rhs, f)?),
        Expression::LessOrEqual(lhs, rhs) => Expression::LessOrEqual(boxed(lhs, f)?, boxed(rhs, f)?),
        Expression::Add(lhs, rhs) => Expression::Add(boxed(lhs, f)?, boxed(rhs, f)?),
        Expression::Subtract(lhs, rhs) => Expression::Subtract(boxed(lhs, f)?, boxed(rhs, f)?),
        Expression::Multiply(lhs, rhs) => Expression::Multiply(boxed(lhs, f)?, boxed(rhs, f)?),
        Expression::Divide(lhs, rhs) => Expression::Divide(boxed(lhs, f)?, boxed(rhs, f)?),
        Expression::If(a, b, c) => Expression::If(boxed(a, f)?, boxed(b, f)?, boxed(c, f)?),
        Expression::In(lhs, list) => Expression::In(
            boxed(lhs, f)?,
            list.into_iter()
                .map(|e| transform_expression(e, f))
                .collect::<Result<_, _>>()?,
        ),
        Expression::Coalesce(list) => Expression::Coalesce(
            list.into_iter()
                .map(|e| transform_expression(e, f))
                .collect::<Result<_, _>>()?,
        ),
        Expression::FunctionCall(function, args) => Expression::FunctionCall(
            function,
            args.into_iter()
                .map(|e| transform_expression(e, f))
                .collect::<Result<_, _>>()?,
        ),
        Expression::NamedNode(_)
        | Expression::Literal(_)
        | Expression::Variable(_)
        | Expression::Bound(_) => expression,
    })
}

fn boxed<E>(
    expression: Box<Expression>,
    f: &mut impl FnMut(GraphPattern) -> Result<GraphPattern, E>,
) -> Result<Box<Expression>, E> {
    Ok(Box::new(transform_expression(*expression, f)?))
}
