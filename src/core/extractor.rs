use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::llm_client::{build_chat, CompletionBackend};
use crate::core::parser::parse_relations;
use crate::core::prompt::{build_graph_prompt, SYSTEM_PROMPT};
use crate::error::ExtractError;
use crate::schema::ExtractionSchema;

/// One entity-relation record parsed from model output. All five fields are
/// present and non-empty; head/tail types are checked against the registry
/// only as a best-effort warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRelation {
    pub head: String,
    pub head_type: String,
    pub relation: String,
    pub tail: String,
    pub tail_type: String,
}

/// Per-document extraction pipeline: prompt rendering, backend call,
/// response parsing.
pub struct RelationExtractor {
    backend: Box<dyn CompletionBackend>,
    schema: ExtractionSchema,
}

impl RelationExtractor {
    pub fn new(backend: Box<dyn CompletionBackend>, schema: ExtractionSchema) -> Self {
        Self { backend, schema }
    }

    pub fn schema(&self) -> &ExtractionSchema {
        &self.schema
    }

    /// Extract relation records from one document's text. `history` carries
    /// prior (user, model) turns for conversational use; batch runs pass an
    /// empty slice.
    pub async fn extract_from_text(
        &self,
        text: &str,
        history: &[(String, String)],
    ) -> Result<Vec<ExtractedRelation>, ExtractError> {
        let prompt = build_graph_prompt(&self.schema, text);
        let messages = build_chat(SYSTEM_PROMPT, history, &prompt);

        let raw = self.backend.complete(&messages).await?;
        debug!("Model response length: {} chars", raw.len());

        let relations = parse_relations(&raw)?;

        for relation in &relations {
            if !self.schema.is_entity_type(&relation.head_type) {
                warn!("Unknown head type '{}' in record for '{}'", relation.head_type, relation.head);
            }
            if !self.schema.is_entity_type(&relation.tail_type) {
                warn!("Unknown tail type '{}' in record for '{}'", relation.tail_type, relation.tail);
            }
            if !self.schema.is_relation_type(&relation.relation) {
                warn!("Unknown relation type '{}' between '{}' and '{}'", relation.relation, relation.head, relation.tail);
            }
        }

        Ok(relations)
    }
}
