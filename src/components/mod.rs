pub mod dataset;
pub mod force_graph;
