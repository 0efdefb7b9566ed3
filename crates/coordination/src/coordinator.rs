//! Koordinator fuer Chat-Ereignisse
//!
//! Jedes spielrelevante Ereignis laeuft als:
//! Chat-Sperre erwerben -> Sitzung aufloesen -> Operation -> Sperre freigeben.
//! Die Sperre wird auf jedem Weg freigegeben, auch bei Fehlern und
//! abgelaufener Handler-Frist.

use std::future::Future;
use std::time::Duration;

use krokodil_core::{ChatId, Spieler, UserId};
use krokodil_game::{GameError, Rateversuch, SitzungsAnsicht};

use crate::chat_lock::ChatLockTable;
use crate::error::{KoordinationError, KoordinationResult};
use crate::registry::SessionRegistry;

/// Laufende Runden aelter als das duerfen durch einen neuen Start abgeloest werden
pub const RUNDE_VERALTET_NACH: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct KoordinatorKonfig {
    pub runde_veraltet_nach: Duration,
    /// Obergrenze fuer eine einzelne Operation unter der Sperre
    pub handler_frist: Duration,
}

impl Default for KoordinatorKonfig {
    fn default() -> Self {
        Self {
            runde_veraltet_nach: RUNDE_VERALTET_NACH,
            handler_frist: Duration::from_secs(30),
        }
    }
}

/// Ergebnis eines erfolgreichen Starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartErgebnis {
    pub wort: String,
    /// true wenn dafuer eine veraltete Runde beendet wurde
    pub abgeloest: bool,
}

pub struct GameCoordinator {
    sperren: ChatLockTable,
    sitzungen: SessionRegistry,
    konfig: KoordinatorKonfig,
}

impl GameCoordinator {
    pub fn neu(sperren: ChatLockTable, sitzungen: SessionRegistry, konfig: KoordinatorKonfig) -> Self {
        Self {
            sperren,
            sitzungen,
            konfig,
        }
    }

    pub fn sitzungen(&self) -> &SessionRegistry {
        &self.sitzungen
    }

    pub fn sperren(&self) -> &ChatLockTable {
        &self.sperren
    }

    /// Fuehrt `arbeit` unter der Chat-Sperre aus
    async fn geschuetzt<T, F>(&self, chat_id: ChatId, arbeit: F) -> KoordinationResult<T>
    where
        F: Future<Output = KoordinationResult<T>>,
    {
        let guard = self.sperren.acquire(chat_id).await?;

        let frist = self.konfig.handler_frist;
        let ergebnis = match tokio::time::timeout(frist, arbeit).await {
            Ok(ergebnis) => ergebnis,
            Err(_) => {
                tracing::warn!(
                    chat_id = %chat_id,
                    frist_ms = frist.as_millis() as u64,
                    "Operation hat die Frist ueberschritten"
                );
                Err(KoordinationError::Zeitlimit { chat_id, frist })
            }
        };

        if let Err(e) = guard.release().await {
            tracing::warn!(chat_id = %chat_id, fehler = %e, "Chat-Sperre nicht sauber freigegeben");
        }
        ergebnis
    }

    /// Neue Runde mit `host` als Erklaerer
    ///
    /// Laeuft bereits eine Runde laenger als `runde_veraltet_nach`, wird sie
    /// beendet und genau ein weiterer Start versucht.
    pub async fn handle_start(
        &self,
        chat_id: ChatId,
        host: &Spieler,
    ) -> KoordinationResult<StartErgebnis> {
        self.geschuetzt(chat_id, async {
            let sitzung = self.sitzungen.sitzung(chat_id);
            match sitzung.start(host).await {
                Ok(wort) => Ok(StartErgebnis {
                    wort,
                    abgeloest: false,
                }),
                Err(GameError::SpielLaeuftBereits { laeuft_seit, .. })
                    if laeuft_seit >= self.konfig.runde_veraltet_nach =>
                {
                    tracing::info!(
                        chat_id = %chat_id,
                        laeuft_seit_sek = laeuft_seit.as_secs(),
                        "Veraltete Runde wird abgeloest"
                    );
                    sitzung.stop().await;
                    sitzung
                        .start(host)
                        .await
                        .map(|wort| StartErgebnis {
                            wort,
                            abgeloest: true,
                        })
                        .map_err(KoordinationError::from)
                }
                Err(e) => {
                    tracing::debug!(chat_id = %chat_id, grund = %e, "Start abgelehnt");
                    Err(KoordinationError::from(e))
                }
            }
        })
        .await
    }

    pub async fn handle_guess(
        &self,
        chat_id: ChatId,
        text: &str,
        rater: &Spieler,
    ) -> KoordinationResult<Rateversuch> {
        self.geschuetzt(chat_id, async {
            let sitzung = self.sitzungen.sitzung(chat_id);
            Ok::<_, KoordinationError>(sitzung.guess(text, rater).await)
        })
        .await
    }

    pub async fn handle_advance_word(
        &self,
        chat_id: ChatId,
        anfragender: UserId,
    ) -> KoordinationResult<String> {
        self.geschuetzt(chat_id, async {
            let sitzung = self.sitzungen.sitzung(chat_id);
            sitzung
                .advance_word(anfragender)
                .await
                .map_err(KoordinationError::from)
        })
        .await
    }

    pub async fn handle_see_word(
        &self,
        chat_id: ChatId,
        anfragender: UserId,
    ) -> KoordinationResult<String> {
        self.geschuetzt(chat_id, async {
            let sitzung = self.sitzungen.sitzung(chat_id);
            sitzung
                .see_word(anfragender)
                .await
                .map_err(KoordinationError::from)
        })
        .await
    }

    /// Beendet die laufende Runde ohne Statistik
    pub async fn handle_stop(&self, chat_id: ChatId) -> KoordinationResult<bool> {
        self.geschuetzt(chat_id, async {
            let sitzung = self.sitzungen.sitzung(chat_id);
            Ok::<_, KoordinationError>(sitzung.stop().await)
        })
        .await
    }

    /// Momentaufnahme der Sitzung, ohne Chat-Sperre
    pub async fn handle_status(&self, chat_id: ChatId) -> SitzungsAnsicht {
        self.sitzungen.sitzung(chat_id).ansicht().await
    }
}
