use rdf_multiset_model::VariableRef;

/// The prefix of the variables that connect the steps of a lowered property path.
pub const PATH_VARIABLE_PREFIX: &str = "__path";

/// The prefix of the variables that stand in for blank nodes of basic graph patterns.
pub const BLANK_NODE_VARIABLE_PREFIX: &str = "__bnode_";

/// Returns true if `variable` was introduced by the engine and must not be visible in results.
///
/// Such variables never appear in a projection and are ignored by `COUNT(DISTINCT *)`.
pub fn is_hidden_variable(variable: VariableRef<'_>) -> bool {
    let name = variable.as_str();
    name.starts_with(PATH_VARIABLE_PREFIX) || name.starts_with(BLANK_NODE_VARIABLE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_multiset_model::Variable;

    #[test]
    fn engine_variables_are_hidden() {
        assert!(is_hidden_variable(Variable::new_unchecked("__path3").as_ref()));
        assert!(is_hidden_variable(Variable::new_unchecked("__bnode_b0").as_ref()));
        assert!(!is_hidden_variable(Variable::new_unchecked("path").as_ref()));
        assert!(!is_hidden_variable(Variable::new_unchecked("_bnode").as_ref()));
    }
}
