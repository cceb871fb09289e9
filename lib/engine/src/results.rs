//! The results of a SPARQL query.

use rdf_multiset_model::{Term, Triple, Variable};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Results of a [SPARQL query](https://www.w3.org/TR/sparql11-query/).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryResults {
    /// Results of a [SELECT](https://www.w3.org/TR/sparql11-query/#select) query.
    Solutions(QuerySolutions),
    /// Result of a [ASK](https://www.w3.org/TR/sparql11-query/#ask) query.
    Boolean(bool),
    /// Results of a [CONSTRUCT](https://www.w3.org/TR/sparql11-query/#construct) or
    /// [DESCRIBE](https://www.w3.org/TR/sparql11-query/#describe) query.
    Graph(Vec<Triple>),
}

impl QueryResults {
    /// Returns the solutions of a SELECT query.
    pub fn into_solutions(self) -> Option<QuerySolutions> {
        match self {
            QueryResults::Solutions(solutions) => Some(solutions),
            QueryResults::Boolean(_) | QueryResults::Graph(_) => None,
        }
    }
}

impl From<QuerySolutions> for QueryResults {
    fn from(value: QuerySolutions) -> Self {
        QueryResults::Solutions(value)
    }
}

/// The ordered solutions of a SELECT query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuerySolutions {
    variables: Arc<[Variable]>,
    rows: Vec<Vec<Option<Term>>>,
}

impl QuerySolutions {
    pub fn new(variables: Arc<[Variable]>, rows: Vec<Vec<Option<Term>>>) -> Self {
        Self { variables, rows }
    }

    /// The projected variables.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = QuerySolution<'_>> {
        self.rows.iter().map(|values| QuerySolution {
            variables: &self.variables,
            values,
        })
    }

    /// Returns the values of `variable` in all solutions.
    pub fn column(&self, variable: &str) -> Vec<Option<&Term>> {
        self.iter().map(|solution| solution.get(variable)).collect()
    }
}

/// Renders the solutions as a table. Unbound values are shown as `UNDEF`.
impl Display for QuerySolutions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let header = self
            .variables
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        write!(f, "{}", header.join(" | "))?;
        for row in &self.rows {
            let row = row
                .iter()
                .map(|value| value.as_ref().map_or_else(|| "UNDEF".to_owned(), Term::to_string))
                .collect::<Vec<_>>();
            write!(f, "\n{}", row.join(" | "))?;
        }
        Ok(())
    }
}

/// A single solution of a SELECT query.
#[derive(Clone, Copy, Debug)]
pub struct QuerySolution<'a> {
    variables: &'a [Variable],
    values: &'a [Option<Term>],
}

impl<'a> QuerySolution<'a> {
    /// Returns the value of the variable with the given `name`.
    pub fn get(&self, name: &str) -> Option<&'a Term> {
        let position = self
            .variables
            .iter()
            .position(|variable| variable.as_str() == name)?;
        self.values.get(position)?.as_ref()
    }

    pub fn values(&self) -> &'a [Option<Term>] {
        self.values
    }
}
