//! Register der Spielsitzungen
//!
//! Genau eine [`GameSession`] pro Chat, angelegt beim ersten Zugriff und
//! fuer die Lebensdauer des Prozesses behalten.

use std::sync::Arc;

use dashmap::DashMap;
use krokodil_core::{ChatId, StatsSink, WordSource};
use krokodil_game::{GameSession, SpielRegeln};

pub struct SessionRegistry {
    sitzungen: DashMap<ChatId, Arc<GameSession>>,
    woerter: Arc<dyn WordSource>,
    statistik: Arc<dyn StatsSink>,
    regeln: SpielRegeln,
}

impl SessionRegistry {
    pub fn neu(
        woerter: Arc<dyn WordSource>,
        statistik: Arc<dyn StatsSink>,
        regeln: SpielRegeln,
    ) -> Self {
        Self {
            sitzungen: DashMap::new(),
            woerter,
            statistik,
            regeln,
        }
    }

    /// Sitzung des Chats, wird bei Bedarf angelegt.
    /// Parallele Erstzugriffe erhalten dieselbe Instanz.
    pub fn sitzung(&self, chat_id: ChatId) -> Arc<GameSession> {
        let eintrag = self.sitzungen.entry(chat_id).or_insert_with(|| {
            tracing::debug!(chat_id = %chat_id, "Neue Spielsitzung angelegt");
            Arc::new(GameSession::neu(
                chat_id,
                Arc::clone(&self.woerter),
                Arc::clone(&self.statistik),
                self.regeln.clone(),
            ))
        });
        Arc::clone(eintrag.value())
    }

    /// Sitzung nur falls bereits vorhanden
    pub fn vorhanden(&self, chat_id: ChatId) -> Option<Arc<GameSession>> {
        self.sitzungen.get(&chat_id).map(|e| Arc::clone(e.value()))
    }

    pub fn anzahl(&self) -> usize {
        self.sitzungen.len()
    }
}
