#[macro_use] extern crate lazy_static;
#[macro_use] extern crate serde_derive;

pub mod types;
pub mod constants;
pub mod config;
pub mod utils;
pub mod data_types;
pub mod table;
pub mod http;
pub mod ontology;
pub mod ontology_graph;
pub mod ols;
pub mod uniprot_mapping;
pub mod union_find;
pub mod normalize;
pub mod dedup;
pub mod pipeline;
