use rdf_multiset_model::{GraphName, NamedOrBlankNode, QueryDataset};
use std::fmt::Display;

/// The active graph defines which graphs can partake in the pattern matching process.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActiveGraph {
    /// Only the default graph forms the active graph.
    #[default]
    DefaultGraph,
    /// Any graph, including the default graph, form the active graph.
    AllGraphs,
    /// A set of graphs form the active graph. This allows expressing the user-intent of
    /// queries that use the `FROM` clause or `GRAPH` patterns.
    Union(Vec<GraphName>),
}

impl ActiveGraph {
    /// Computes the active graph at the root of a query.
    ///
    /// An explicit `FROM` clause has precedence over `union_default_graph`.
    pub fn for_dataset(dataset: Option<&QueryDataset>, union_default_graph: bool) -> Self {
        match dataset {
            Some(dataset) => ActiveGraph::Union(
                dataset
                    .default
                    .iter()
                    .cloned()
                    .map(GraphName::NamedNode)
                    .collect(),
            ),
            None if union_default_graph => ActiveGraph::AllGraphs,
            None => ActiveGraph::DefaultGraph,
        }
    }

    /// The active graph of a `GRAPH` pattern.
    pub fn named(graph: NamedOrBlankNode) -> Self {
        let graph = match graph {
            NamedOrBlankNode::NamedNode(node) => GraphName::NamedNode(node),
            NamedOrBlankNode::BlankNode(node) => GraphName::BlankNode(node),
        };
        ActiveGraph::Union(vec![graph])
    }

    /// Returns true if matches from more than one graph can be combined. In this case, duplicate
    /// triples must be removed to obtain the RDF merge of the graphs.
    pub fn is_merge(&self) -> bool {
        match self {
            ActiveGraph::DefaultGraph => false,
            ActiveGraph::AllGraphs => true,
            ActiveGraph::Union(graphs) => graphs.len() > 1,
        }
    }
}

impl Display for ActiveGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActiveGraph::DefaultGraph => write!(f, "Default Graph"),
            ActiveGraph::AllGraphs => write!(f, "All Graphs"),
            ActiveGraph::Union(graphs) => write!(f, "Union of {:?}", graphs),
        }
    }
}
