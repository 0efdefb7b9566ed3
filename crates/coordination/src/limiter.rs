//! Nachrichten-Limit pro Chat
//!
//! Zaehlt ausgehende Nachrichten je Identitaet (Chat) in Minuten-Buckets
//! der Wanduhr. Schluessel: `rate/<identitaet>/<minute-der-stunde>`, der
//! Zaehler verfaellt nach [`BUCKET_DAUER`]. An einer Minutengrenze sind
//! daher kurzzeitig bis zu doppelt so viele Nachrichten moeglich.
//!
//! Pro Minute: die ersten N Aufrufe sind erlaubt, Aufruf N+1 meldet die
//! erste Ablehnung (einmalige Nachricht an den Chat), alle weiteren werden
//! still verworfen.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};
use krokodil_core::{ChatId, SharedCounterStore};

use crate::error::{KoordinationError, KoordinationResult};

/// Standard: 10 Nachrichten pro Minute und Chat
pub const NACHRICHTEN_PRO_MINUTE: u64 = 10;

/// Lebensdauer eines Minuten-Buckets. Fest an den Schluessel gebunden:
/// laenger wuerde in dieselbe Minute der naechsten Stunde hineinzaehlen.
pub const BUCKET_DAUER: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct LimitKonfig {
    pub max_pro_minute: u64,
}

impl Default for LimitKonfig {
    fn default() -> Self {
        Self {
            max_pro_minute: NACHRICHTEN_PRO_MINUTE,
        }
    }
}

/// Entscheidung fuer einen einzelnen Aufruf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zulassung {
    Erlaubt,
    /// Genau der erste Aufruf ueber dem Limit
    ErsteAblehnung,
    Abgelehnt,
}

pub struct AdmissionLimiter {
    zaehler: Arc<dyn SharedCounterStore>,
    konfig: LimitKonfig,
}

impl AdmissionLimiter {
    pub fn neu(zaehler: Arc<dyn SharedCounterStore>, konfig: LimitKonfig) -> Self {
        Self { zaehler, konfig }
    }

    pub fn konfig(&self) -> &LimitKonfig {
        &self.konfig
    }

    /// Zaehlt einen Aufruf und entscheidet ueber die Zulassung
    pub async fn pruefen(&self, identitaet: ChatId) -> KoordinationResult<Zulassung> {
        self.pruefen_zum(identitaet, Utc::now()).await
    }

    pub async fn pruefen_zum(
        &self,
        identitaet: ChatId,
        jetzt: DateTime<Utc>,
    ) -> KoordinationResult<Zulassung> {
        let schluessel = format!("rate/{}/{}", identitaet.inner(), jetzt.minute());
        let stand = self
            .zaehler
            .increment_with_expiry(&schluessel, BUCKET_DAUER)
            .await
            .map_err(KoordinationError::ZaehlerNichtVerfuegbar)?;

        let max = self.konfig.max_pro_minute;
        let zulassung = if stand <= max {
            Zulassung::Erlaubt
        } else if stand == max + 1 {
            tracing::info!(chat_id = %identitaet, max, "Nachrichtenlimit erreicht");
            Zulassung::ErsteAblehnung
        } else {
            tracing::debug!(chat_id = %identitaet, stand, "Nachricht verworfen (Limit)");
            Zulassung::Abgelehnt
        };
        Ok(zulassung)
    }

    /// Fuehrt je nach Zulassung genau einen der drei Zweige aus
    ///
    /// Das Ergebnis von `bei_erlaubt` bzw. `bei_erster_ablehnung` wird
    /// durchgereicht. Ein Fehler von `bei_ablehnung` wird verworfen.
    /// Faellt der Zaehler aus, laeuft kein Zweig.
    pub async fn limit<E, A, FA, B, FB, C, FC>(
        &self,
        identitaet: ChatId,
        bei_erlaubt: A,
        bei_erster_ablehnung: B,
        bei_ablehnung: C,
    ) -> Result<(), E>
    where
        E: From<KoordinationError>,
        A: FnOnce() -> FA,
        FA: Future<Output = Result<(), E>>,
        B: FnOnce() -> FB,
        FB: Future<Output = Result<(), E>>,
        C: FnOnce() -> FC,
        FC: Future<Output = Result<(), E>>,
    {
        self.limit_zum(
            identitaet,
            Utc::now(),
            bei_erlaubt,
            bei_erster_ablehnung,
            bei_ablehnung,
        )
        .await
    }

    pub async fn limit_zum<E, A, FA, B, FB, C, FC>(
        &self,
        identitaet: ChatId,
        jetzt: DateTime<Utc>,
        bei_erlaubt: A,
        bei_erster_ablehnung: B,
        bei_ablehnung: C,
    ) -> Result<(), E>
    where
        E: From<KoordinationError>,
        A: FnOnce() -> FA,
        FA: Future<Output = Result<(), E>>,
        B: FnOnce() -> FB,
        FB: Future<Output = Result<(), E>>,
        C: FnOnce() -> FC,
        FC: Future<Output = Result<(), E>>,
    {
        match self.pruefen_zum(identitaet, jetzt).await? {
            Zulassung::Erlaubt => bei_erlaubt().await,
            Zulassung::ErsteAblehnung => bei_erster_ablehnung().await,
            Zulassung::Abgelehnt => {
                if bei_ablehnung().await.is_err() {
                    tracing::trace!(chat_id = %identitaet, "Fehler im Ablehnungszweig ignoriert");
                }
                Ok(())
            }
        }
    }
}
