use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct NextDueCardParams {
    #[schemars(description = "ID of the deck to study")]
    pub deck_id: String,
}
