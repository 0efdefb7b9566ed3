//! Gemeinsame Identifikationstypen fuer Krokodil
//!
//! Chat- und Benutzer-IDs stammen vom Chat-Transport (vorzeichenbehaftete
//! 64-Bit-Ganzzahlen). Das Newtype-Pattern schliesst Verwechslungen zwischen
//! beiden zur Compilezeit aus.

use serde::{Deserialize, Serialize};

/// Eindeutige Chat-ID (Gruppe oder Privatchat)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl ChatId {
    /// Gibt die innere ID zurueck
    pub fn inner(&self) -> i64 {
        self.0
    }

    /// Privatchats haben beim Transport positive IDs, Gruppen negative
    pub fn ist_privat(&self) -> bool {
        self.0 > 0
    }
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chat:{}", self.0)
    }
}

/// Eindeutige Benutzer-ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl UserId {
    /// Gibt die innere ID zurueck
    pub fn inner(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

/// Ein Mitspieler: Identitaet plus Anzeigename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spieler {
    pub id: UserId,
    pub name: String,
}

impl Spieler {
    /// Erstellt einen Spieler; der Name wird getrimmt
    pub fn neu(id: UserId, name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self {
            id,
            name: name.trim().to_string(),
        }
    }
}
