use crate::paths::{PathTransformContext, TransformedPattern};
use rdf_multiset_common::error::QueryEvaluationError;
use rdf_multiset_model::{GraphPattern, PropertyPathExpression, TermPattern};

/// Transforms property paths into triple patterns.
///
/// The transformer keeps a variable counter across all transformed paths such that the
/// temporary variables of two paths in the same query never clash.
#[derive(Debug, Default)]
pub struct PathTransformer {
    next_variable: usize,
}

impl PathTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `path` can be lowered to something other than a single path pattern.
    pub fn is_lowerable(path: &PropertyPathExpression) -> bool {
        matches!(
            path,
            PropertyPathExpression::NamedNode(_)
                | PropertyPathExpression::Reverse(_)
                | PropertyPathExpression::Sequence(..)
                | PropertyPathExpression::Alternative(..)
        )
    }

    /// Transforms the path from `subject` to `object`.
    pub fn transform(
        &mut self,
        subject: &TermPattern,
        path: &PropertyPathExpression,
        object: &TermPattern,
    ) -> Result<GraphPattern, QueryEvaluationError> {
        let mut context = PathTransformContext::new(subject.clone(), object.clone())
            .with_first_variable(self.next_variable);
        transform_step(&mut context, path)?;
        self.next_variable = context.next_variable_index();
        context.to_algebra()
    }
}

/// Adds the patterns for `path` between the current subject and object of the `context`.
///
/// The current subject and object are the same before and after the call.
fn transform_step(
    context: &mut PathTransformContext,
    path: &PropertyPathExpression,
) -> Result<(), QueryEvaluationError> {
    match path {
        PropertyPathExpression::Reverse(inner) => {
            let subject = context.subject().clone();
            let object = context.object().clone();
            context.set_subject(object.clone());
            context.set_object(subject.clone());
            transform_step(context, inner)?;
            context.set_subject(subject);
            context.set_object(object);
        }
        PropertyPathExpression::Sequence(lhs, rhs) => {
            let subject = context.subject().clone();
            let object = context.object().clone();
            let joint = TermPattern::Variable(context.next_temporary_variable());

            context.set_object(joint.clone());
            transform_step(context, lhs)?;

            context.set_subject(joint);
            if &object == context.end() {
                context.reset_object();
            } else {
                context.set_object(object);
            }
            transform_step(context, rhs)?;

            context.set_subject(subject);
        }
        PropertyPathExpression::Alternative(..) => {
            let mut alternatives = Vec::new();
            collect_alternatives(path, &mut alternatives);

            let mut union: Option<GraphPattern> = None;
            for alternative in alternatives {
                let mut nested =
                    context.nested(context.subject().clone(), context.object().clone());
                transform_step(&mut nested, alternative)?;
                context.absorb_counter(&nested);

                let branch = nested.to_algebra()?;
                union = Some(match union {
                    None => branch,
                    Some(left) => GraphPattern::Union {
                        left: Box::new(left),
                        right: Box::new(branch),
                    },
                });
            }

            let Some(union) = union else {
                return QueryEvaluationError::internal("Alternative path without alternatives.");
            };
            context.add_pattern(TransformedPattern::Nested(union));
        }
        PropertyPathExpression::NamedNode(_)
        | PropertyPathExpression::ZeroOrMore(_)
        | PropertyPathExpression::OneOrMore(_)
        | PropertyPathExpression::ZeroOrOne(_)
        | PropertyPathExpression::NegatedPropertySet(_) => {
            let pattern = context.get_triple_pattern(
                context.subject().clone(),
                path,
                context.object().clone(),
            );
            context.add_pattern(pattern);
        }
    }
    Ok(())
}

fn collect_alternatives<'a>(
    path: &'a PropertyPathExpression,
    alternatives: &mut Vec<&'a PropertyPathExpression>,
) {
    match path {
        PropertyPathExpression::Alternative(lhs, rhs) => {
            collect_alternatives(lhs, alternatives);
            collect_alternatives(rhs, alternatives);
        }
        _ => alternatives.push(path),
    }
}
