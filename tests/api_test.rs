use std::sync::{Arc, Mutex};

use flashdeck::api::{self, AppState, USER_HEADER};
use reqwest::StatusCode;
use rusqlite::Connection;
use serde_json::{json, Value};

/// Bind the API router to an ephemeral port and return its base URL.
async fn spawn_server() -> String {
    let conn = flashdeck::db::open_memory_database().unwrap();
    spawn_server_with(Arc::new(Mutex::new(conn))).await
}

async fn spawn_server_with(db: Arc<Mutex<Connection>>) -> String {
    let app = api::router(AppState::new(db));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

struct Client {
    base: String,
    http: reqwest::Client,
    user: &'static str,
}

impl Client {
    fn new(base: &str, user: &'static str) -> Self {
        Self {
            base: base.to_string(),
            http: reqwest::Client::new(),
            user,
        }
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self
            .http
            .get(format!("{}{path}", self.base))
            .header(USER_HEADER, self.user)
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let resp = self
            .http
            .post(format!("{}{path}", self.base))
            .header(USER_HEADER, self.user)
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    async fn delete(&self, path: &str) -> (StatusCode, Value) {
        let resp = self
            .http
            .delete(format!("{}{path}", self.base))
            .header(USER_HEADER, self.user)
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    /// Create a deck with `n` cards; returns (deck_id, card_ids).
    async fn seed(&self, n: usize) -> (String, Vec<String>) {
        let (status, deck) = self.post("/api/decks", json!({ "title": "Rust" })).await;
        assert_eq!(status, StatusCode::OK);
        let deck_id = deck["id"].as_str().unwrap().to_string();

        let cards: Vec<Value> = (0..n)
            .map(|i| json!({ "front": format!("Q{i}"), "back": format!("A{i}") }))
            .collect();
        let (status, body) = self
            .post("/api/cards", json!({ "deckId": deck_id, "cards": cards }))
            .await;
        assert_eq!(status, StatusCode::OK);
        let ids = body["cards"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_str().unwrap().to_string())
            .collect();
        (deck_id, ids)
    }
}

#[tokio::test]
async fn health_needs_no_user() {
    let base = spawn_server().await;
    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn missing_user_header_is_unauthorized() {
    let base = spawn_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/review"))
        .json(&json!({ "deckId": "d", "cardId": "c", "quality": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn review_round_trip() {
    let base = spawn_server().await;
    let alice = Client::new(&base, "alice");
    let (deck_id, cards) = alice.seed(2).await;

    let (status, next) = alice.get(&format!("/api/review/next?deckId={deck_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(next["card"]["id"], cards[0].as_str());

    let (status, body) = alice
        .post(
            "/api/review",
            json!({ "deckId": deck_id, "cardId": cards[0], "quality": 4, "elapsedMs": 900 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["schedule"]["reps"], 1);
    assert_eq!(body["schedule"]["interval"], 1);
    assert_eq!(body["schedule"]["ease"], 2.5);
    assert_eq!(body["nextCard"]["id"], cards[1].as_str());

    let (status, history) = alice.get(&format!("/api/cards/{}/reviews", cards[0])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["reviews"].as_array().unwrap().len(), 1);
    assert_eq!(history["reviews"][0]["elapsedMs"], 900);

    let (status, stats) = alice.get(&format!("/api/stats?deckId={deck_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalCards"], 2);
    assert_eq!(stats["dueToday"], 1);
    assert_eq!(stats["totalReviews"], 1);
}

#[tokio::test]
async fn out_of_range_quality_is_bad_request() {
    let base = spawn_server().await;
    let alice = Client::new(&base, "alice");
    let (deck_id, cards) = alice.seed(1).await;

    let (status, body) = alice
        .post(
            "/api/review",
            json!({ "deckId": deck_id, "cardId": cards[0], "quality": 6 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains('6'));

    let (_, stats) = alice.get("/api/stats").await;
    assert_eq!(stats["totalReviews"], 0);
}

#[tokio::test]
async fn other_users_card_is_not_found() {
    let base = spawn_server().await;
    let alice = Client::new(&base, "alice");
    let mallory = Client::new(&base, "mallory");
    let (deck_id, cards) = alice.seed(1).await;

    let (status, _) = mallory
        .post(
            "/api/review",
            json!({ "deckId": deck_id, "cardId": cards[0], "quality": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = mallory.get(&format!("/api/decks/{deck_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, decks) = mallory.get("/api/decks").await;
    assert!(decks["decks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn next_requires_deck_id() {
    let base = spawn_server().await;
    let alice = Client::new(&base, "alice");

    let (status, body) = alice.get("/api/review/next").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "deckId required");
}

#[tokio::test]
async fn deleting_deck_removes_cards() {
    let base = spawn_server().await;
    let alice = Client::new(&base, "alice");
    let (deck_id, cards) = alice.seed(3).await;

    let (status, deck) = alice.get(&format!("/api/decks/{deck_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deck["cardCount"], 3);

    let (status, body) = alice.delete(&format!("/api/decks/{deck_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = alice.get(&format!("/api/cards/{}/reviews", cards[0])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn keeps_serving_after_a_panicked_request() {
    let conn = flashdeck::db::open_memory_database().unwrap();
    let db = Arc::new(Mutex::new(conn));

    // Poison the lock the way a panic inside a store call would
    let poisoner = Arc::clone(&db);
    let joined = std::thread::spawn(move || {
        let _guard = poisoner.lock().unwrap();
        panic!("store call panicked");
    })
    .join();
    assert!(joined.is_err());
    assert!(db.is_poisoned());

    let base = spawn_server_with(db).await;
    let alice = Client::new(&base, "alice");

    let (status, _) = alice.get("/api/decks/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (deck_id, cards) = alice.seed(1).await;
    let (status, body) = alice
        .post(
            "/api/review",
            json!({ "deckId": deck_id, "cardId": cards[0], "quality": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["schedule"]["reps"], 1);
}
