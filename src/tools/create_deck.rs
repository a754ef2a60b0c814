use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateDeckParams {
    #[schemars(description = "Deck title, e.g. the topic of the conversation")]
    pub title: String,

    #[schemars(description = "Optional one-line description of what the deck covers")]
    pub description: Option<String>,
}
