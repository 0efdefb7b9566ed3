//! Fehlertypen fuer das Koordinations-Crate

use std::time::Duration;

use krokodil_core::{ChatId, KrokodilError};
use krokodil_game::GameError;
use thiserror::Error;

/// Fehler beim Koordinieren eines Chat-Ereignisses
#[derive(Debug, Error)]
pub enum KoordinationError {
    /// Regel-Ablehnung oder Woerterbuch-Ausfall der Sitzung
    #[error(transparent)]
    Spiel(#[from] GameError),

    /// Clusterweite Sperre nicht erreichbar. Nie als "ungesperrt" behandeln.
    #[error("Sperrspeicher nicht verfuegbar: {0}")]
    SperreNichtVerfuegbar(#[source] KrokodilError),

    #[error("Zaehlerspeicher nicht verfuegbar: {0}")]
    ZaehlerNichtVerfuegbar(#[source] KrokodilError),

    #[error("Zeitlimit fuer {chat_id} nach {frist:?} ueberschritten")]
    Zeitlimit { chat_id: ChatId, frist: Duration },
}

pub type KoordinationResult<T> = Result<T, KoordinationError>;

impl KoordinationError {
    /// Gibt true zurueck wenn ein erneuter Versuch sinnvoll ist
    pub fn ist_wiederholbar(&self) -> bool {
        match self {
            Self::SperreNichtVerfuegbar(_) | Self::Zeitlimit { .. } => true,
            Self::ZaehlerNichtVerfuegbar(e) => e.ist_wiederholbar(),
            Self::Spiel(_) => false,
        }
    }

    /// Regel-Ablehnung der Sitzung (kein Betriebsfehler)
    pub fn ist_policy_ablehnung(&self) -> bool {
        matches!(self, Self::Spiel(e) if e.ist_policy_ablehnung())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wiederholbar_und_policy() {
        let sperre = KoordinationError::SperreNichtVerfuegbar(KrokodilError::speicher("weg"));
        assert!(sperre.ist_wiederholbar());
        assert!(!sperre.ist_policy_ablehnung());

        let regel = KoordinationError::from(GameError::NichtHost);
        assert!(!regel.ist_wiederholbar());
        assert!(regel.ist_policy_ablehnung());

        let zeit = KoordinationError::Zeitlimit {
            chat_id: ChatId(-1),
            frist: Duration::from_secs(1),
        };
        assert!(zeit.ist_wiederholbar());
        assert!(zeit.to_string().contains("chat:-1"));
    }
}
