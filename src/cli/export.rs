use anyhow::Result;
use serde::{Deserialize, Serialize};

use flashdeck::config::FlashdeckConfig;
use flashdeck::study;
use flashdeck::study::types::NewCard;

/// Portable deck format shared by `export` and `import`. Scheduling state is not carried.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckFile {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub cards: Vec<NewCard>,
}

/// Export one deck as JSON to stdout.
pub fn export(config: &FlashdeckConfig, deck_id: &str) -> Result<()> {
    let conn = super::open(config)?;
    let user_id = &config.storage.default_user;

    let deck = study::decks::get_deck(&conn, user_id, deck_id)?;
    let cards = study::cards::list_cards(&conn, user_id, deck_id)?;

    let data = DeckFile {
        title: deck.title,
        description: deck.description,
        cards: cards
            .into_iter()
            .map(|c| NewCard {
                front: c.front,
                back: c.back,
                code_snippet: c.code_snippet,
                difficulty: c.difficulty.map(i64::from),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&data)?;
    println!("{json}");

    eprintln!("Exported {} cards from '{}'.", data.cards.len(), data.title);

    Ok(())
}
