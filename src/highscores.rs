//! Best score tracking
//!
//! Persisted through a [`KeyValueStore`]. Storage trouble never reaches the
//! caller: reads fall back to the last value seen in memory and failed
//! writes still update it.

use crate::platform::KeyValueStore;

/// Best score, persisted with an in-memory mirror
#[derive(Debug)]
pub struct HighScores {
    store: Box<dyn KeyValueStore>,
    in_memory: u64,
}

impl HighScores {
    /// Storage key for the best score
    pub const STORAGE_KEY: &'static str = "crown_dash_high_score";

    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        let mut scores = Self {
            store,
            in_memory: 0,
        };
        scores.in_memory = scores.get_high_score();
        scores
    }

    /// Stored best score; 0 if nothing valid is stored
    pub fn get_high_score(&self) -> u64 {
        match self.store.get(Self::STORAGE_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<u64>() {
                Ok(score) => score,
                Err(_) => {
                    log::warn!("Ignoring corrupt high score value {:?}", raw);
                    0
                }
            },
            Ok(None) => 0,
            Err(e) => {
                log::warn!("High score read failed, using in-memory value: {}", e);
                self.in_memory
            }
        }
    }

    pub fn set_high_score(&mut self, score: u64) {
        self.in_memory = score;
        if let Err(e) = self.store.set(Self::STORAGE_KEY, &score.to_string()) {
            log::warn!("High score write failed, kept in memory: {}", e);
        }
    }

    /// Record `score` if it beats the best. Returns true on a new best.
    pub fn update(&mut self, score: u64) -> bool {
        if score > self.get_high_score() {
            self.set_high_score(score);
            log::info!("New high score: {}", score);
            true
        } else {
            false
        }
    }
}
