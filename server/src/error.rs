//! Fehlertypen fuer den Server

use krokodil_coordination::KoordinationError;
use krokodil_core::KrokodilError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Koordination(#[from] KoordinationError),

    #[error(transparent)]
    Kern(#[from] KrokodilError),

    #[error("Transportfehler: {0}")]
    Transport(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Erwartete Regel-Ablehnung (kein Betriebsfehler)
    pub fn ist_policy_ablehnung(&self) -> bool {
        matches!(self, Self::Koordination(e) if e.ist_policy_ablehnung())
    }

    pub fn ist_wiederholbar(&self) -> bool {
        match self {
            Self::Koordination(e) => e.ist_wiederholbar(),
            Self::Kern(e) => e.ist_wiederholbar(),
            Self::Transport(_) => false,
        }
    }
}
