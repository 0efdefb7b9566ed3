//! Fehlertypen fuer Krokodil
//!
//! Zentraler Fehler-Enum fuer Ausfaelle der externen Kollaborateure
//! (Woerterbuch, Statistik, geteilter Speicher). Spielregel-Ablehnungen
//! sind keine Fehler dieses Typs, sie leben im Game-Crate.

use thiserror::Error;

/// Globaler Result-Alias fuer Krokodil
pub type Result<T> = std::result::Result<T, KrokodilError>;

/// Alle Ausfaelle externer Kollaborateure
#[derive(Debug, Error)]
pub enum KrokodilError {
    // --- Kollaborateure ---
    #[error("Wortquelle nicht verfuegbar: {0}")]
    WortquelleNichtVerfuegbar(String),

    #[error("Statistik konnte nicht gespeichert werden: {0}")]
    Statistik(String),

    #[error("Geteilter Speicher nicht erreichbar: {0}")]
    SpeicherNichtVerfuegbar(String),

    #[error("Zeitlimit ueberschritten: {0}")]
    Zeitlimit(String),

    // --- Konfiguration ---
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl KrokodilError {
    /// Erstellt einen internen Fehler aus einer beliebigen Nachricht
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Erstellt einen Speicherfehler aus einer beliebigen Nachricht
    pub fn speicher(msg: impl Into<String>) -> Self {
        Self::SpeicherNichtVerfuegbar(msg.into())
    }

    /// Gibt true zurueck wenn der Fehler wiederholbar sein koennte
    pub fn ist_wiederholbar(&self) -> bool {
        matches!(self, Self::SpeicherNichtVerfuegbar(_) | Self::Zeitlimit(_))
    }
}
