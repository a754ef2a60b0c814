//! MCP `add_cards` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use flashdeck::study::types::NewCard;

/// One flashcard as produced by the agent.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CardParams {
    #[schemars(description = "Question side of the card")]
    pub front: String,

    #[schemars(description = "Answer side of the card")]
    pub back: String,

    #[schemars(description = "Optional code sample shown with the answer")]
    pub code_snippet: Option<String>,

    #[schemars(description = "Estimated difficulty from 1 (easy) to 5 (hard)")]
    pub difficulty: Option<i64>,
}

impl From<CardParams> for NewCard {
    fn from(p: CardParams) -> Self {
        NewCard {
            front: p.front,
            back: p.back,
            code_snippet: p.code_snippet,
            difficulty: p.difficulty,
        }
    }
}

/// Parameters for the `add_cards` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddCardsParams {
    #[schemars(description = "ID of the deck to add cards to")]
    pub deck_id: String,

    #[schemars(description = "Cards to add; at least one. Each starts due immediately.")]
    pub cards: Vec<CardParams>,
}
