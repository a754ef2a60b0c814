use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StudyStatsParams {
    #[schemars(description = "Limit counts to one deck. Omit for all decks.")]
    pub deck_id: Option<String>,
}
