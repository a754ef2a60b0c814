pub mod cards;
pub mod decks;
pub mod review;
pub mod stats;
pub mod types;
