//! In-Memory Statistik
//!
//! Additive Zaehler pro (Chat, Spieler). Ersetzt fuer den Einzelbetrieb
//! die persistente Statistik-Datenbank und liefert die Ranglisten.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use dashmap::DashMap;
use krokodil_core::{
    ChatId, ChatStatistik, GesamtStatistik, RatingSource, Result, Spieler, SpielerStatistik,
    StatsDelta, StatsSink, UserId,
};

#[derive(Debug, Clone, Default)]
struct Zaehlerstand {
    name: String,
    war_host: u64,
    erfolgreich: u64,
    erraten: u64,
}

/// Thread-safe Statistik im Speicher (DashMap)
#[derive(Debug, Default)]
pub struct SpeicherStatistik {
    eintraege: DashMap<(ChatId, UserId), Zaehlerstand>,
}

impl SpeicherStatistik {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Zaehlerstand eines Spielers in einem Chat
    pub fn spieler(&self, chat_id: ChatId, user_id: UserId) -> Option<SpielerStatistik> {
        self.eintraege
            .get(&(chat_id, user_id))
            .map(|e| als_statistik(user_id, e.value()))
    }

    /// Alle Eintraege sortiert nach (Chat, Spieler), damit Auswertungen deterministisch sind
    fn sortierte_eintraege(&self) -> Vec<((ChatId, UserId), Zaehlerstand)> {
        let mut alle: Vec<_> = self
            .eintraege
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        alle.sort_by_key(|(schluessel, _)| *schluessel);
        alle
    }
}

fn als_statistik(user_id: UserId, stand: &Zaehlerstand) -> SpielerStatistik {
    SpielerStatistik {
        user_id,
        name: stand.name.clone(),
        war_host: stand.war_host,
        erfolgreich: stand.erfolgreich,
        erraten: stand.erraten,
    }
}

fn nach_treffern_sortieren(liste: &mut Vec<SpielerStatistik>, limit: usize) {
    liste.sort_by(|a, b| b.erraten.cmp(&a.erraten).then(a.user_id.cmp(&b.user_id)));
    liste.truncate(limit);
}

#[async_trait]
impl StatsSink for SpeicherStatistik {
    async fn record(&self, spieler: &Spieler, chat_id: ChatId, delta: StatsDelta) -> Result<()> {
        let mut stand = self.eintraege.entry((chat_id, spieler.id)).or_default();
        stand.name = spieler.name.clone();
        stand.war_host += u64::from(delta.war_host);
        stand.erfolgreich += u64::from(delta.erfolgreich);
        stand.erraten += u64::from(delta.erraten);
        Ok(())
    }
}

#[async_trait]
impl RatingSource for SpeicherStatistik {
    async fn rangliste(&self, chat_id: ChatId, limit: usize) -> Result<Vec<SpielerStatistik>> {
        let mut liste: Vec<SpielerStatistik> = self
            .eintraege
            .iter()
            .filter(|e| e.key().0 == chat_id && e.value().erraten > 0)
            .map(|e| als_statistik(e.key().1, e.value()))
            .collect();
        nach_treffern_sortieren(&mut liste, limit);
        Ok(liste)
    }

    async fn globale_rangliste(&self, limit: usize) -> Result<Vec<SpielerStatistik>> {
        let mut pro_spieler: BTreeMap<UserId, SpielerStatistik> = BTreeMap::new();
        for ((_, user_id), stand) in self.sortierte_eintraege() {
            let summe = pro_spieler.entry(user_id).or_insert_with(|| SpielerStatistik {
                user_id,
                name: stand.name.clone(),
                war_host: 0,
                erfolgreich: 0,
                erraten: 0,
            });
            summe.war_host += stand.war_host;
            summe.erfolgreich += stand.erfolgreich;
            summe.erraten += stand.erraten;
        }

        let mut liste: Vec<SpielerStatistik> = pro_spieler
            .into_values()
            .filter(|s| s.erraten > 0)
            .collect();
        nach_treffern_sortieren(&mut liste, limit);
        Ok(liste)
    }

    async fn chat_rangliste(&self, limit: usize) -> Result<Vec<ChatStatistik>> {
        let mut pro_chat: BTreeMap<ChatId, u64> = BTreeMap::new();
        for ((chat_id, _), stand) in self.sortierte_eintraege() {
            *pro_chat.entry(chat_id).or_default() += stand.erraten;
        }

        let mut liste: Vec<ChatStatistik> = pro_chat
            .into_iter()
            .filter(|(_, erraten)| *erraten > 0)
            .map(|(chat_id, erraten)| ChatStatistik { chat_id, erraten })
            .collect();
        liste.sort_by(|a, b| b.erraten.cmp(&a.erraten).then(a.chat_id.cmp(&b.chat_id)));
        liste.truncate(limit);
        Ok(liste)
    }

    async fn gesamt(&self) -> Result<GesamtStatistik> {
        let mut chats = BTreeSet::new();
        let mut spieler = BTreeSet::new();
        let mut runden = 0;

        for ((chat_id, user_id), stand) in self.sortierte_eintraege() {
            // Privatchats (Chat-ID == Benutzer-ID) zaehlen nicht als Spielgruppe
            if chat_id.inner() != user_id.inner() {
                chats.insert(chat_id);
            }
            spieler.insert(user_id);
            runden += stand.erraten;
        }

        Ok(GesamtStatistik {
            chats: chats.len() as u64,
            spieler: spieler.len() as u64,
            runden,
        })
    }
}
