//! Fehlertypen fuer das Game-Crate

use std::time::Duration;

use chrono::{DateTime, Utc};
use krokodil_core::KrokodilError;
use thiserror::Error;

/// Ablehnungen und Fehler einer Spielrunde
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Es laeuft bereits eine Runde (gestartet {gestartet_am})")]
    SpielLaeuftBereits {
        gestartet_am: DateTime<Utc>,
        /// Monoton gemessene Laufzeit der aktiven Runde
        laeuft_seit: Duration,
    },

    #[error("Der Gewinner der letzten Runde hat noch {verbleibend:?} Vorrang")]
    WartetAufGewinner { verbleibend: Duration },

    #[error("Nur der Host der Runde darf das")]
    NichtHost,

    #[error("Keine aktive Runde")]
    KeineAktiveRunde,

    #[error("Wortquelle nicht verfuegbar: {0}")]
    WortquelleNichtVerfuegbar(#[source] KrokodilError),
}

pub type GameResult<T> = Result<T, GameError>;

impl GameError {
    /// Regel-Ablehnungen sind erwartete Antworten an den Spieler, keine Stoerungen
    pub fn ist_policy_ablehnung(&self) -> bool {
        !matches!(self, Self::WortquelleNichtVerfuegbar(_))
    }
}
