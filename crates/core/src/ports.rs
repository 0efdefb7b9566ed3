//! Schnittstellen der externen Kollaborateure
//!
//! Der Spielkern kennt weder Woerterbuch-Dateien noch Datenbanken oder
//! einen konkreten geteilten Speicher. Er spricht nur ueber diese Traits.
//! Alle Traits sind objektsicher (`Arc<dyn ...>`), damit der Server die
//! Implementierung beim Start waehlen kann.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChatId, Spieler, UserId};

// ---------------------------------------------------------------------------
// Woerterbuch
// ---------------------------------------------------------------------------

/// Liefert auf Anfrage ein zufaelliges Wort. Wiederholungen sind erlaubt.
#[async_trait]
pub trait WordSource: Send + Sync {
    async fn next_word(&self) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Statistik
// ---------------------------------------------------------------------------

/// Additive Zaehler fuer ein einzelnes Spielereignis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsDelta {
    /// Spieler hat eine Runde als Host begonnen
    pub war_host: u32,
    /// Das Wort des Hosts wurde erraten
    pub erfolgreich: u32,
    /// Spieler hat ein Wort erraten
    pub erraten: u32,
}

impl StatsDelta {
    pub fn host() -> Self {
        Self {
            war_host: 1,
            ..Self::default()
        }
    }

    pub fn erfolgreich() -> Self {
        Self {
            erfolgreich: 1,
            ..Self::default()
        }
    }

    pub fn erraten() -> Self {
        Self {
            erraten: 1,
            ..Self::default()
        }
    }
}

/// Nimmt Spielergebnisse entgegen. Jeder Aufruf ist genau ein Ereignis,
/// Idempotenz wird nicht verlangt.
#[async_trait]
pub trait StatsSink: Send + Sync {
    async fn record(&self, spieler: &Spieler, chat_id: ChatId, delta: StatsDelta) -> Result<()>;
}

/// Zaehlerstand eines Spielers (in einem Chat oder chatuebergreifend)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpielerStatistik {
    pub user_id: UserId,
    pub name: String,
    pub war_host: u64,
    pub erfolgreich: u64,
    pub erraten: u64,
}

/// Anzahl gespielter (erratener) Runden eines Chats
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatStatistik {
    pub chat_id: ChatId,
    pub erraten: u64,
}

/// Gesamtzahlen ueber alle Chats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GesamtStatistik {
    pub chats: u64,
    pub spieler: u64,
    pub runden: u64,
}

/// Lesezugriff auf die Statistik fuer Ranglisten
#[async_trait]
pub trait RatingSource: Send + Sync {
    /// Beste Rater eines Chats (nur Spieler mit mindestens einem Treffer)
    async fn rangliste(&self, chat_id: ChatId, limit: usize) -> Result<Vec<SpielerStatistik>>;

    /// Beste Rater ueber alle Chats
    async fn globale_rangliste(&self, limit: usize) -> Result<Vec<SpielerStatistik>>;

    /// Chats mit den meisten gespielten Runden
    async fn chat_rangliste(&self, limit: usize) -> Result<Vec<ChatStatistik>>;

    async fn gesamt(&self) -> Result<GesamtStatistik>;
}

// ---------------------------------------------------------------------------
// Geteilter Speicher (Multi-Instance-Betrieb)
// ---------------------------------------------------------------------------

/// Beleg fuer eine gehaltene clusterweite Sperre
///
/// Das Token unterscheidet den Halter von spaeteren Haltern derselben
/// Sperre, damit eine abgelaufene Sperre nicht fremd freigegeben wird.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockHandle {
    pub name: String,
    pub token: String,
}

/// Ergebnis eines einzelnen Sperrversuchs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockVersuch {
    Erhalten(LockHandle),
    /// Eine andere Instanz haelt die Sperre
    Belegt,
}

/// Clusterweite, beratende Sperren
///
/// `Err` bedeutet: Speicher nicht erreichbar. Das ist etwas anderes als
/// `Ok(LockVersuch::Belegt)` und darf nie als "nicht gesperrt" gelten.
#[async_trait]
pub trait SharedLockStore: Send + Sync {
    /// Ein einzelner, nicht blockierender Versuch. Die Sperre verfaellt
    /// nach `ttl`, falls der Halter sie nie freigibt.
    async fn try_acquire(&self, name: &str, ttl: Duration) -> Result<LockVersuch>;

    /// Setzt die Verfallszeit einer gehaltenen Sperre neu auf `ttl`.
    /// `Ok(false)`: abgelaufen oder inzwischen einem anderen Halter vergeben.
    async fn extend(&self, handle: &LockHandle, ttl: Duration) -> Result<bool>;

    async fn release(&self, handle: &LockHandle) -> Result<()>;
}

/// Atomare Zaehler mit Ablaufzeit
#[async_trait]
pub trait SharedCounterStore: Send + Sync {
    /// Erhoeht den Zaehler und gibt den neuen Stand zurueck. Beim ersten
    /// Inkrement eines Schluessels wird die Ablaufzeit `ttl` gesetzt.
    async fn increment_with_expiry(&self, key: &str, ttl: Duration) -> Result<u64>;
}
