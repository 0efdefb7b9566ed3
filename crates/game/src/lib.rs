//! krokodil-game – Spielrunde eines Chats
//!
//! Dieses Crate implementiert:
//! - GameSession: Zustandsautomat einer Runde (start, raten, Wort wechseln, stoppen)
//! - WortlisteProvider: Woerterbuch aus einer zeilengetrennten Liste
//! - SpeicherStatistik: In-Memory Zaehler und Ranglisten
//!
//! # Beispiel
//!
//! ```no_run
//! use std::sync::Arc;
//! use krokodil_core::{ChatId, Spieler, UserId};
//! use krokodil_game::{GameSession, SpeicherStatistik, SpielRegeln, WortlisteProvider};
//!
//! #[tokio::main]
//! async fn main() {
//!     let woerter = Arc::new(WortlisteProvider::aus_text("Apfel\nBirne").unwrap());
//!     let statistik = Arc::new(SpeicherStatistik::neu());
//!     let sitzung = GameSession::neu(ChatId(-100), woerter, statistik, SpielRegeln::default());
//!
//!     let wort = sitzung.start(&Spieler::neu(UserId(1), "Anna")).await.unwrap();
//!     let versuch = sitzung.guess(&wort, &Spieler::neu(UserId(2), "Bob")).await;
//!     assert!(versuch.ist_treffer());
//! }
//! ```

pub mod error;
pub mod session;
pub mod stats;
pub mod words;

#[cfg(test)]
mod tests;

// Bequeme Re-Exporte
pub use error::{GameError, GameResult};
pub use session::{GameSession, Rateversuch, SitzungsAnsicht, SpielRegeln, SpielZustand};
pub use stats::SpeicherStatistik;
pub use words::WortlisteProvider;
