//! Ereignis-Dispatcher
//!
//! Nimmt Chat-Ereignisse entgegen und leitet sie an den Koordinator oder
//! die Statistik weiter. Jedes Ereignis laeuft in einer eigenen Aufgabe;
//! Ereignisse desselben Chats serialisiert die Chat-Sperre im Koordinator.
//! Jede Nachricht an einen Chat laeuft durch das Nachrichten-Limit,
//! Popups fuer einzelne Spieler nicht.

use std::sync::Arc;

use krokodil_coordination::{AdmissionLimiter, GameCoordinator, KoordinationError};
use krokodil_core::{ChatId, RatingSource, Spieler};
use krokodil_game::{GameError, Rateversuch};
use krokodil_observability::gemessen;
use tokio::task::{AbortHandle, JoinSet};

use crate::ereignis::{Befehl, Ereignis, Inhalt, Taste};
use crate::error::{ServerError, ServerResult};
use crate::texte;
use crate::transport::{ChatTransport, Tastatur};

pub struct Dispatcher {
    koordinator: Arc<GameCoordinator>,
    limiter: Arc<AdmissionLimiter>,
    ranglisten: Arc<dyn RatingSource>,
    transport: Arc<dyn ChatTransport>,
}

impl Dispatcher {
    pub fn neu(
        koordinator: Arc<GameCoordinator>,
        limiter: Arc<AdmissionLimiter>,
        ranglisten: Arc<dyn RatingSource>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            koordinator,
            limiter,
            ranglisten,
            transport,
        }
    }

    /// Verarbeitet das Ereignis in einer eigenen Aufgabe in `laufend`
    pub fn einreichen(
        self: &Arc<Self>,
        laufend: &mut JoinSet<()>,
        ereignis: Ereignis,
    ) -> AbortHandle {
        let dispatcher = Arc::clone(self);
        laufend.spawn(async move { dispatcher.verarbeiten(ereignis).await })
    }

    /// Verarbeitet ein Ereignis vollstaendig; Fehler werden protokolliert
    pub async fn verarbeiten(&self, ereignis: Ereignis) {
        let art = ereignis.art();
        tracing::debug!(
            chat_id = %ereignis.chat_id,
            user_id = %ereignis.absender.id,
            art,
            "Ereignis empfangen"
        );

        let Err(fehler) = gemessen(art, self.ausfuehren(&ereignis)).await else {
            return;
        };

        if fehler.ist_policy_ablehnung() {
            tracing::debug!(chat_id = %ereignis.chat_id, art, grund = %fehler, "Abgelehnt");
        } else if fehler.ist_wiederholbar() {
            tracing::warn!(chat_id = %ereignis.chat_id, art, fehler = %fehler, "Ereignis nicht verarbeitet");
        } else {
            tracing::error!(chat_id = %ereignis.chat_id, art, fehler = %fehler, "Ereignis fehlgeschlagen");
        }
    }

    async fn ausfuehren(&self, ereignis: &Ereignis) -> ServerResult<()> {
        let chat_id = ereignis.chat_id;
        let absender = &ereignis.absender;

        match &ereignis.inhalt {
            Inhalt::Text(text) => self.raten(chat_id, text, absender).await,
            Inhalt::Befehl(Befehl::Start) => self.start_befehl(chat_id, absender).await,
            Inhalt::Befehl(Befehl::Regeln) => {
                self.nachricht(chat_id, texte::REGELN, Tastatur::Keine).await
            }
            Inhalt::Befehl(Befehl::Rangliste) => {
                let liste = self
                    .ranglisten
                    .rangliste(chat_id, texte::RANGLISTE_LAENGE)
                    .await?;
                let text = texte::rangliste("Top 25 Krokodil-Spieler", &liste);
                self.nachricht(chat_id, &text, Tastatur::Keine).await
            }
            Inhalt::Befehl(Befehl::GlobaleRangliste) => {
                let liste = self
                    .ranglisten
                    .globale_rangliste(texte::RANGLISTE_LAENGE)
                    .await?;
                let text = texte::rangliste("Top 25 Krokodil-Spieler in allen Chats", &liste);
                self.nachricht(chat_id, &text, Tastatur::Keine).await
            }
            Inhalt::Befehl(Befehl::ChatRangliste) => {
                let liste = self
                    .ranglisten
                    .chat_rangliste(texte::RANGLISTE_LAENGE)
                    .await?;
                let text = texte::chat_rangliste("Top 25 Chats nach Anzahl der Spiele", &liste);
                self.nachricht(chat_id, &text, Tastatur::Keine).await
            }
            Inhalt::Befehl(Befehl::Statistik) => {
                let gesamt = self.ranglisten.gesamt().await?;
                self.nachricht(chat_id, &texte::gesamtstatistik(&gesamt), Tastatur::Keine)
                    .await
            }
            Inhalt::Befehl(Befehl::Status) => {
                let ansicht = self.koordinator.handle_status(chat_id).await;
                self.nachricht(chat_id, &texte::status(&ansicht), Tastatur::Keine)
                    .await
            }
            Inhalt::Taste(Taste::NeuesSpiel) => self.start_taste(chat_id, absender).await,
            Inhalt::Taste(Taste::WortAnsehen) => {
                let ergebnis = self.koordinator.handle_see_word(chat_id, absender.id).await;
                self.wort_popup(chat_id, absender, ergebnis).await
            }
            Inhalt::Taste(Taste::NaechstesWort) => {
                let ergebnis = self
                    .koordinator
                    .handle_advance_word(chat_id, absender.id)
                    .await;
                self.wort_popup(chat_id, absender, ergebnis).await
            }
        }
    }

    /// Nachricht an den Chat, begrenzt durch das Nachrichten-Limit
    async fn nachricht(&self, chat_id: ChatId, text: &str, tastatur: Tastatur) -> ServerResult<()> {
        self.limiter
            .limit(
                chat_id,
                || self.transport.senden(chat_id, text, tastatur),
                || {
                    self.transport
                        .senden(chat_id, texte::LIMIT_ERREICHT, Tastatur::Keine)
                },
                || async { Ok(()) },
            )
            .await
    }

    async fn raten(&self, chat_id: ChatId, text: &str, rater: &Spieler) -> ServerResult<()> {
        match self.koordinator.handle_guess(chat_id, text, rater).await? {
            Rateversuch::Treffer { wort, gewinner, .. } => {
                let text = texte::erraten(&gewinner.name, &wort);
                self.nachricht(chat_id, &text, Tastatur::NeuesSpiel).await
            }
            Rateversuch::Daneben => Ok(()),
        }
    }

    async fn start_befehl(&self, chat_id: ChatId, host: &Spieler) -> ServerResult<()> {
        if chat_id.ist_privat() {
            return self.nachricht(chat_id, texte::EINLADUNG, Tastatur::Keine).await;
        }

        match self.koordinator.handle_start(chat_id, host).await {
            Ok(_) => {
                let text = texte::host_erklaert(&host.name);
                self.nachricht(chat_id, &text, Tastatur::Wort).await
            }
            Err(KoordinationError::Spiel(GameError::SpielLaeuftBereits { .. })) => {
                self.nachricht(chat_id, texte::SPIEL_LAEUFT, Tastatur::Keine)
                    .await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn start_taste(&self, chat_id: ChatId, host: &Spieler) -> ServerResult<()> {
        match self.koordinator.handle_start(chat_id, host).await {
            Ok(start) => {
                self.transport
                    .popup(chat_id, host.id, &texte::du_bist_host(&start.wort))
                    .await?;
                let text = texte::host_erklaert(&host.name);
                self.nachricht(chat_id, &text, Tastatur::Wort).await
            }
            Err(KoordinationError::Spiel(GameError::SpielLaeuftBereits { .. })) => {
                self.transport
                    .popup(chat_id, host.id, texte::SPIEL_LAEUFT)
                    .await
            }
            Err(KoordinationError::Spiel(GameError::WartetAufGewinner { .. })) => {
                self.transport
                    .popup(chat_id, host.id, texte::GEWINNER_HAT_VORRANG)
                    .await
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Popup mit dem Wort oder dem Grund der Ablehnung
    async fn wort_popup(
        &self,
        chat_id: ChatId,
        spieler: &Spieler,
        ergebnis: Result<String, KoordinationError>,
    ) -> ServerResult<()> {
        let text = match ergebnis {
            Ok(wort) => wort,
            Err(KoordinationError::Spiel(GameError::NichtHost)) => texte::NICHT_FUER_DICH.into(),
            Err(KoordinationError::Spiel(GameError::KeineAktiveRunde)) => texte::KEINE_RUNDE.into(),
            Err(e) => return Err(ServerError::from(e)),
        };
        self.transport.popup(chat_id, spieler.id, &text).await
    }
}
