use rdf_multiset_common::error::QueryEvaluationError;
use rdf_multiset_common::PATH_VARIABLE_PREFIX;
use rdf_multiset_model::{
    GraphPattern, NamedNodePattern, PropertyPathExpression, TermPattern, TriplePattern, Variable,
};

/// The prefix of the temporary variables that connect the steps of a path.
pub const TEMPORARY_VARIABLE_PREFIX: &str = PATH_VARIABLE_PREFIX;

/// A pattern produced while transforming a property path.
#[derive(Clone, Debug, PartialEq)]
pub enum TransformedPattern {
    Triple(TriplePattern),
    Path {
        subject: TermPattern,
        path: PropertyPathExpression,
        object: TermPattern,
    },
    /// An already lowered pattern, e.g., the union of the alternatives of a path.
    Nested(GraphPattern),
}

/// The state of a single property path transformation.
///
/// The context tracks the current subject and object between which the next step of the path is
/// placed. Steps are connected with fresh temporary variables.
#[derive(Clone, Debug)]
pub struct PathTransformContext {
    start: TermPattern,
    end: TermPattern,
    subject: TermPattern,
    object: TermPattern,
    patterns: Vec<TransformedPattern>,
    next_variable: usize,
    top: bool,
}

impl PathTransformContext {
    /// Creates a top-level context for a path from `start` to `end`.
    pub fn new(start: TermPattern, end: TermPattern) -> Self {
        Self {
            subject: start.clone(),
            object: end.clone(),
            start,
            end,
            patterns: Vec::new(),
            next_variable: 0,
            top: true,
        }
    }

    /// Sets the index of the next temporary variable. Used to keep temporary variables unique
    /// across multiple paths of the same query.
    #[must_use]
    pub fn with_first_variable(mut self, index: usize) -> Self {
        self.next_variable = index;
        self
    }

    /// Creates a nested context that shares the variable counter of this context.
    ///
    /// Call [Self::absorb_counter] once the nested transformation is done.
    pub fn nested(&self, start: TermPattern, end: TermPattern) -> Self {
        Self {
            top: false,
            ..Self::new(start, end).with_first_variable(self.next_variable)
        }
    }

    /// Continues the variable counter after a nested transformation.
    pub fn absorb_counter(&mut self, nested: &PathTransformContext) {
        self.next_variable = self.next_variable.max(nested.next_variable);
    }

    pub fn start(&self) -> &TermPattern {
        &self.start
    }

    pub fn end(&self) -> &TermPattern {
        &self.end
    }

    pub fn subject(&self) -> &TermPattern {
        &self.subject
    }

    pub fn set_subject(&mut self, subject: TermPattern) {
        self.subject = subject;
    }

    pub fn object(&self) -> &TermPattern {
        &self.object
    }

    pub fn set_object(&mut self, object: TermPattern) {
        self.object = object;
    }

    /// Sets the current object back to the end of the path.
    pub fn reset_object(&mut self) {
        self.object = self.end.clone();
    }

    /// Whether this is the outermost transformation of a path.
    pub fn is_top(&self) -> bool {
        self.top
    }

    pub fn set_top(&mut self, top: bool) {
        self.top = top;
    }

    pub fn patterns(&self) -> &[TransformedPattern] {
        &self.patterns
    }

    pub fn add_pattern(&mut self, pattern: TransformedPattern) {
        self.patterns.push(pattern);
    }

    /// The index that the next temporary variable will receive.
    pub fn next_variable_index(&self) -> usize {
        self.next_variable
    }

    /// Creates a fresh variable that is unique within this transformation.
    pub fn next_temporary_variable(&mut self) -> Variable {
        let variable =
            Variable::new_unchecked(format!("{TEMPORARY_VARIABLE_PREFIX}{}", self.next_variable));
        self.next_variable += 1;
        variable
    }

    /// Creates the pattern for a single step of a path.
    ///
    /// Within a top-level context, a step that is a single predicate becomes a plain triple
    /// pattern. Otherwise, a path pattern is created.
    pub fn get_triple_pattern(
        &self,
        subject: TermPattern,
        path: &PropertyPathExpression,
        object: TermPattern,
    ) -> TransformedPattern {
        match path {
            PropertyPathExpression::NamedNode(predicate) if self.top => {
                TransformedPattern::Triple(TriplePattern {
                    subject,
                    predicate: NamedNodePattern::NamedNode(predicate.clone()),
                    object,
                })
            }
            _ => TransformedPattern::Path {
                subject,
                path: path.clone(),
                object,
            },
        }
    }

    /// Creates the algebra for the accumulated patterns.
    ///
    /// Consecutive triple patterns are grouped into a basic graph pattern. All parts are joined in
    /// the order in which they were added.
    pub fn to_algebra(&self) -> Result<GraphPattern, QueryEvaluationError> {
        if self.patterns.is_empty() {
            return QueryEvaluationError::internal(format!(
                "The transformation of the path from {} to {} produced no patterns.",
                self.start, self.end
            ));
        }

        let mut parts = Vec::new();
        let mut bgp = Vec::new();
        for pattern in &self.patterns {
            match pattern {
                TransformedPattern::Triple(triple) => bgp.push(triple.clone()),
                TransformedPattern::Path {
                    subject,
                    path,
                    object,
                } => {
                    flush_bgp(&mut bgp, &mut parts);
                    parts.push(GraphPattern::Path {
                        subject: subject.clone(),
                        path: path.clone(),
                        object: object.clone(),
                    });
                }
                TransformedPattern::Nested(nested) => {
                    flush_bgp(&mut bgp, &mut parts);
                    parts.push(nested.clone());
                }
            }
        }
        flush_bgp(&mut bgp, &mut parts);

        parts
            .into_iter()
            .reduce(|left, right| GraphPattern::Join {
                left: Box::new(left),
                right: Box::new(right),
            })
            .ok_or_else(|| {
                QueryEvaluationError::InternalError(
                    "No parts in a non-empty path transformation.".to_owned(),
                )
            })
    }
}

fn flush_bgp(bgp: &mut Vec<TriplePattern>, parts: &mut Vec<GraphPattern>) {
    if !bgp.is_empty() {
        parts.push(GraphPattern::Bgp {
            patterns: std::mem::take(bgp),
        });
    }
}
