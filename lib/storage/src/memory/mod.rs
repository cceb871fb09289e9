mod content;
mod dataset;
mod statistics;

pub use dataset::MemDataset;
