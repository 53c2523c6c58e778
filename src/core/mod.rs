pub mod extractor;
pub mod llm_client;
pub mod parser;
pub mod prompt;
pub mod runner;

pub use extractor::{ExtractedRelation, RelationExtractor};
pub use llm_client::{build_chat, ChatMessage, CompletionBackend, OpenAiClient};
pub use parser::parse_relations;
pub use prompt::{build_graph_prompt, SYSTEM_PROMPT};
pub use runner::{BatchRunner, RunReport};
