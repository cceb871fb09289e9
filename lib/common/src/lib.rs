mod binding_id;
mod blank_node_mode;
pub mod error;
mod hidden_variable;
mod options;
mod triple_source;

pub use binding_id::BindingId;
pub use blank_node_mode::BlankNodeMatchingMode;
pub use hidden_variable::{
    is_hidden_variable, BLANK_NODE_VARIABLE_PREFIX, PATH_VARIABLE_PREFIX,
};
pub use options::{OptimizationLevel, QueryOptions};
pub use triple_source::{QuadIter, TripleSource};
