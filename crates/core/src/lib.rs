//! krokodil-core – Gemeinsame Typen, Traits und Fehlertypen
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die von allen
//! anderen Krokodil-Crates gemeinsam genutzt werden: Identitaeten,
//! den zentralen Fehler-Enum und die Schnittstellen der externen
//! Kollaborateure (Woerterbuch, Statistik, geteilter Sperr-/Zaehlerspeicher).

pub mod error;
pub mod ports;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{KrokodilError, Result};
pub use ports::{
    ChatStatistik, GesamtStatistik, LockHandle, LockVersuch, RatingSource, SharedCounterStore,
    SharedLockStore, SpielerStatistik, StatsDelta, StatsSink, WordSource,
};
pub use types::{ChatId, Spieler, UserId};
