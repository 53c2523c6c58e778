pub mod config;
pub mod core;
pub mod corpus;
pub mod error;
pub mod graph;
pub mod schema;
pub mod utils;

pub use config::Settings;
pub use crate::core::{BatchRunner, ExtractedRelation, OpenAiClient, RelationExtractor, RunReport};
pub use corpus::Document;
pub use error::ExtractError;
pub use graph::{EdgeStrategy, ProductGraph};
pub use schema::ExtractionSchema;
