pub mod export;

pub use export::{GraphExporter, GraphFormat};
