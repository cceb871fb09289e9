#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod store;

pub mod model {
    pub use rdf_multiset_model::*;
}

pub mod common {
    pub use rdf_multiset_common::*;
}

pub mod logical {
    pub use rdf_multiset_logical::*;
}

pub mod functions {
    pub use rdf_multiset_functions::*;
}

pub mod engine {
    pub use rdf_multiset_engine::*;
}

pub mod storage {
    pub use rdf_multiset_storage::*;
}
