mod session_tests;
mod stats_tests;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use krokodil_core::{ChatId, KrokodilError, Result, Spieler, StatsDelta, StatsSink, UserId, WordSource};
use parking_lot::Mutex;

/// Liefert Woerter in fester Reihenfolge; danach immer "Reserve"
#[derive(Default)]
pub(crate) struct FesteWoerter {
    woerter: Mutex<VecDeque<String>>,
    ausgefallen: AtomicBool,
}

impl FesteWoerter {
    pub(crate) fn neu(woerter: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            woerter: Mutex::new(woerter.iter().map(|w| w.to_string()).collect()),
            ausgefallen: AtomicBool::new(false),
        })
    }

    pub(crate) fn ausfallen(&self, ausgefallen: bool) {
        self.ausgefallen.store(ausgefallen, Ordering::SeqCst);
    }
}

#[async_trait]
impl WordSource for FesteWoerter {
    async fn next_word(&self) -> Result<String> {
        if self.ausgefallen.load(Ordering::SeqCst) {
            return Err(KrokodilError::WortquelleNichtVerfuegbar("Testausfall".into()));
        }
        Ok(self
            .woerter
            .lock()
            .pop_front()
            .unwrap_or_else(|| "Reserve".to_string()))
    }
}

/// Zeichnet alle Statistik-Aufrufe auf, kann Fehler simulieren
#[derive(Default)]
pub(crate) struct AufzeichnendeStatistik {
    pub(crate) aufrufe: Mutex<Vec<(UserId, ChatId, StatsDelta)>>,
    pub(crate) fehlschlagen: AtomicBool,
}

#[async_trait]
impl StatsSink for AufzeichnendeStatistik {
    async fn record(&self, spieler: &Spieler, chat_id: ChatId, delta: StatsDelta) -> Result<()> {
        if self.fehlschlagen.load(Ordering::SeqCst) {
            return Err(KrokodilError::Statistik("Datenbank weg".into()));
        }
        self.aufrufe.lock().push((spieler.id, chat_id, delta));
        Ok(())
    }
}

pub(crate) fn spieler(id: i64, name: &str) -> Spieler {
    Spieler::neu(UserId(id), name)
}
