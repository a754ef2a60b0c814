pub mod add_cards;
pub mod create_deck;
pub mod next_due_card;
pub mod study_stats;
pub mod submit_review;

use add_cards::AddCardsParams;
use chrono::Utc;
use create_deck::CreateDeckParams;
use next_due_card::NextDueCardParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use rusqlite::Connection;
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use study_stats::StudyStatsParams;
use submit_review::SubmitReviewParams;

use flashdeck::config::FlashdeckConfig;
use flashdeck::study;
use flashdeck::study::review::ReviewRequest;
use flashdeck::study::types::NewCard;

/// The flashdeck MCP tool handler. Holds the shared db connection and config
/// and exposes the study tools via the `#[tool_router]` macro. All tools act
/// as `storage.default_user`.
#[derive(Clone)]
pub struct StudyTools {
    tool_router: ToolRouter<Self>,
    db: Arc<Mutex<Connection>>,
    config: Arc<FlashdeckConfig>,
}

impl StudyTools {
    fn user_id(&self) -> String {
        self.config.storage.default_user.clone()
    }

    /// Run a store call on the blocking pool and serialize its result.
    async fn run<T, F>(&self, op: &'static str, f: F) -> Result<String, String>
    where
        F: FnOnce(&mut Connection) -> flashdeck::error::Result<T> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let value = tokio::task::spawn_blocking(move || {
            let mut conn = db.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut conn).map_err(|e| {
                if !e.is_client_error() {
                    tracing::error!(op, error = %e, "tool failed");
                }
                format!("{op} failed: {e}")
            })
        })
        .await
        .map_err(|e| format!("db task failed: {e}"))??;

        serde_json::to_string(&value).map_err(|e| format!("serialization failed: {e}"))
    }
}

#[tool_router]
impl StudyTools {
    pub fn new(db: Arc<Mutex<Connection>>, config: Arc<FlashdeckConfig>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            db,
            config,
        }
    }

    /// Create a new, empty deck.
    #[tool(description = "Create a flashcard deck. Returns the deck with its ID; add cards with add_cards.")]
    async fn create_deck(
        &self,
        Parameters(params): Parameters<CreateDeckParams>,
    ) -> Result<String, String> {
        let user_id = self.user_id();
        tracing::info!(title = %params.title, "create_deck called");

        self.run("create_deck", move |conn| {
            study::decks::create_deck(conn, &user_id, &params.title, params.description.as_deref())
        })
        .await
    }

    /// Add cards to a deck, e.g. cards distilled from a conversation.
    #[tool(description = "Add flashcards to a deck. Each card needs a front (question) and back (answer); new cards are due immediately.")]
    async fn add_cards(
        &self,
        Parameters(params): Parameters<AddCardsParams>,
    ) -> Result<String, String> {
        let user_id = self.user_id();
        tracing::info!(deck_id = %params.deck_id, count = params.cards.len(), "add_cards called");

        let deck_id = params.deck_id;
        let cards: Vec<NewCard> = params.cards.into_iter().map(NewCard::from).collect();

        self.run("add_cards", move |conn| {
            study::cards::add_cards(conn, &user_id, &deck_id, &cards, Utc::now())
        })
        .await
    }

    /// Record how well the learner recalled a card and reschedule it.
    #[tool(description = "Submit a review rating (0-5) for a card. Returns the updated SM-2 schedule and the next due card in the deck, if any.")]
    async fn submit_review(
        &self,
        Parameters(params): Parameters<SubmitReviewParams>,
    ) -> Result<String, String> {
        let user_id = self.user_id();
        let request = ReviewRequest {
            deck_id: params.deck_id,
            card_id: params.card_id,
            quality: params.quality,
            elapsed_ms: params.elapsed_ms.unwrap_or(0),
        };
        request.validate().map_err(|e| e.to_string())?;

        tracing::info!(card_id = %request.card_id, quality = request.quality, "submit_review called");

        self.run("submit_review", move |conn| {
            study::review::submit_review(conn, &user_id, &request, Utc::now())
        })
        .await
    }

    /// Get the next card due for review in a deck.
    #[tool(description = "Get the card in a deck with the earliest due time that is already due. Returns null when nothing is due.")]
    async fn next_due_card(
        &self,
        Parameters(params): Parameters<NextDueCardParams>,
    ) -> Result<String, String> {
        let user_id = self.user_id();
        tracing::info!(deck_id = %params.deck_id, "next_due_card called");

        self.run("next_due_card", move |conn| {
            study::review::next_due_card(conn, &user_id, &params.deck_id, Utc::now())
        })
        .await
    }

    /// Card and review counts.
    #[tool(description = "Get study statistics: total cards, cards due now, new cards, and total reviews.")]
    async fn study_stats(
        &self,
        Parameters(params): Parameters<StudyStatsParams>,
    ) -> Result<String, String> {
        let user_id = self.user_id();
        tracing::info!(deck_id = ?params.deck_id, "study_stats called");

        self.run("study_stats", move |conn| {
            study::stats::study_stats(conn, &user_id, params.deck_id.as_deref(), Utc::now())
        })
        .await
    }
}

#[tool_handler]
impl ServerHandler for StudyTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "flashdeck is a spaced-repetition flashcard server. Use create_deck and add_cards \
                 to turn material into cards, next_due_card to quiz the learner, and submit_review \
                 with a 0-5 rating after each answer."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
