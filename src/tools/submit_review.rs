use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SubmitReviewParams {
    #[schemars(description = "ID of the deck the card belongs to")]
    pub deck_id: String,

    #[schemars(description = "ID of the card that was reviewed")]
    pub card_id: String,

    #[schemars(
        description = "Recall quality 0-5: 0 blackout, 1-2 failed, 3 hard pass, 4 good, 5 perfect"
    )]
    pub quality: i64,

    #[schemars(description = "Milliseconds the learner spent before answering. Defaults to 0.")]
    pub elapsed_ms: Option<i64>,
}
