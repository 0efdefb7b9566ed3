//! Sperre pro Chat
//!
//! Jeder Chat bekommt beim ersten Zugriff genau ein lokales Sperr-Handle.
//! Die Tabelle waechst nur und wird nie bereinigt, das Anlegen ist durch
//! einen globalen Mutex geschuetzt. Optional wird zusaetzlich eine
//! clusterweite Sperre `mutex/<chat>` im geteilten Speicher gehalten.
//!
//! Reihenfolge: erst lokal, dann geteilt. Freigabe in umgekehrter Reihenfolge.
//!
//! Solange ein [`ChatGuard`] lebt, verlaengert eine Hintergrundaufgabe die
//! geteilte Sperre alle `geteilte_ttl / 3`. Die TTL begrenzt damit nur, wie
//! lange die Sperre eine abgestuerzte Instanz ueberlebt, nicht die Laufzeit
//! eines Handlers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use krokodil_core::{ChatId, LockHandle, LockVersuch, SharedLockStore};
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::task::JoinHandle;

use crate::error::{KoordinationError, KoordinationResult};

/// Zeitverhalten der Chat-Sperren
#[derive(Debug, Clone)]
pub struct SperrKonfig {
    /// Obergrenze fuer das gesamte Erwerben (lokal + geteilt)
    pub erwerb_timeout: Duration,
    /// Wartezeit zwischen zwei Versuchen bei belegter geteilter Sperre
    pub wiederholung: Duration,
    /// Verfallszeit der geteilten Sperre, falls der Halter abstuerzt
    pub geteilte_ttl: Duration,
}

impl SperrKonfig {
    /// Abstand zwischen zwei Verlaengerungen der geteilten Sperre
    pub fn erneuerung(&self) -> Duration {
        self.geteilte_ttl / 3
    }
}

impl Default for SperrKonfig {
    fn default() -> Self {
        Self {
            erwerb_timeout: Duration::from_secs(10),
            wiederholung: Duration::from_millis(50),
            geteilte_ttl: Duration::from_secs(8),
        }
    }
}

/// Name der clusterweiten Sperre eines Chats
pub fn sperr_name(chat_id: ChatId) -> String {
    format!("mutex/{}", chat_id.inner())
}

/// Tabelle der Chat-Sperren
pub struct ChatLockTable {
    lokal: Mutex<HashMap<ChatId, Arc<AsyncMutex<()>>>>,
    geteilt: Option<Arc<dyn SharedLockStore>>,
    konfig: SperrKonfig,
}

impl ChatLockTable {
    /// Nur prozesslokale Sperren (Einzelinstanz)
    pub fn lokal(konfig: SperrKonfig) -> Self {
        Self {
            lokal: Mutex::new(HashMap::new()),
            geteilt: None,
            konfig,
        }
    }

    /// Lokale Sperren plus clusterweite Sperre im geteilten Speicher
    pub fn verteilt(store: Arc<dyn SharedLockStore>, konfig: SperrKonfig) -> Self {
        Self {
            lokal: Mutex::new(HashMap::new()),
            geteilt: Some(store),
            konfig,
        }
    }

    pub fn ist_verteilt(&self) -> bool {
        self.geteilt.is_some()
    }

    /// Anzahl bisher gesehener Chats
    pub fn anzahl(&self) -> usize {
        self.lokal.lock().len()
    }

    /// Liefert das Handle des Chats und legt es beim ersten Zugriff an
    pub(crate) fn handle_fuer(&self, chat_id: ChatId) -> Arc<AsyncMutex<()>> {
        let mut tabelle = self.lokal.lock();
        let handle = tabelle.entry(chat_id).or_insert_with(|| {
            tracing::trace!(chat_id = %chat_id, "Chat-Sperre angelegt");
            Arc::new(AsyncMutex::new(()))
        });
        Arc::clone(handle)
    }

    /// Erwirbt die Sperre des Chats, wartet hoechstens `erwerb_timeout`
    pub async fn acquire(&self, chat_id: ChatId) -> KoordinationResult<ChatGuard> {
        let frist = self.konfig.erwerb_timeout;
        match tokio::time::timeout(frist, self.erwerben(chat_id)).await {
            Ok(ergebnis) => ergebnis,
            Err(_) => {
                tracing::warn!(
                    chat_id = %chat_id,
                    frist_ms = frist.as_millis() as u64,
                    "Chat-Sperre nicht rechtzeitig erhalten"
                );
                Err(KoordinationError::Zeitlimit { chat_id, frist })
            }
        }
    }

    async fn erwerben(&self, chat_id: ChatId) -> KoordinationResult<ChatGuard> {
        let lokal = self.handle_fuer(chat_id).lock_owned().await;

        // Schlaegt der geteilte Teil fehl, faellt `lokal` hier wieder frei
        let geteilt = match &self.geteilt {
            Some(store) => {
                let handle = self.geteilt_erwerben(store.as_ref(), chat_id).await?;
                let erneuerung = tokio::spawn(erneuern(
                    Arc::clone(store),
                    handle.clone(),
                    self.konfig.geteilte_ttl,
                    self.konfig.erneuerung(),
                ));
                Some(GeteilteSperre {
                    store: Arc::clone(store),
                    handle,
                    erneuerung,
                })
            }
            None => None,
        };

        tracing::trace!(chat_id = %chat_id, verteilt = geteilt.is_some(), "Chat gesperrt");
        Ok(ChatGuard {
            chat_id,
            geteilt,
            _lokal: lokal,
        })
    }

    async fn geteilt_erwerben(
        &self,
        store: &dyn SharedLockStore,
        chat_id: ChatId,
    ) -> KoordinationResult<LockHandle> {
        let name = sperr_name(chat_id);
        loop {
            match store.try_acquire(&name, self.konfig.geteilte_ttl).await {
                Ok(LockVersuch::Erhalten(handle)) => return Ok(handle),
                Ok(LockVersuch::Belegt) => {
                    tracing::trace!(sperre = %name, "Geteilte Sperre belegt, neuer Versuch");
                    tokio::time::sleep(self.konfig.wiederholung).await;
                }
                Err(e) => {
                    tracing::warn!(sperre = %name, fehler = %e, "Sperrspeicher nicht erreichbar");
                    return Err(KoordinationError::SperreNichtVerfuegbar(e));
                }
            }
        }
    }
}

/// Haelt die geteilte Sperre am Leben, bis die Aufgabe abgebrochen wird
async fn erneuern(
    store: Arc<dyn SharedLockStore>,
    handle: LockHandle,
    ttl: Duration,
    intervall: Duration,
) {
    loop {
        tokio::time::sleep(intervall).await;
        match store.extend(&handle, ttl).await {
            Ok(true) => tracing::trace!(sperre = %handle.name, "Geteilte Sperre verlaengert"),
            Ok(false) => {
                tracing::warn!(sperre = %handle.name, "Geteilte Sperre verloren");
                return;
            }
            // Naechster Versuch, bevor die TTL ablaeuft
            Err(e) => tracing::warn!(
                sperre = %handle.name,
                fehler = %e,
                "Geteilte Sperre nicht verlaengert"
            ),
        }
    }
}

struct GeteilteSperre {
    store: Arc<dyn SharedLockStore>,
    handle: LockHandle,
    erneuerung: JoinHandle<()>,
}

/// Gehaltene Chat-Sperre
///
/// Bevorzugt ueber [`ChatGuard::release`] freigeben. Beim blossen Drop
/// wird die lokale Sperre sofort frei, die geteilte Sperre im Hintergrund.
pub struct ChatGuard {
    chat_id: ChatId,
    geteilt: Option<GeteilteSperre>,
    _lokal: OwnedMutexGuard<()>,
}

impl ChatGuard {
    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    /// Gibt erst die geteilte, dann die lokale Sperre frei
    pub async fn release(mut self) -> KoordinationResult<()> {
        let ergebnis = match self.geteilt.take() {
            Some(sperre) => {
                sperre.erneuerung.abort();
                sperre
                    .store
                    .release(&sperre.handle)
                    .await
                    .map_err(KoordinationError::SperreNichtVerfuegbar)
            }
            None => Ok(()),
        };
        tracing::trace!(chat_id = %self.chat_id, "Chat entsperrt");
        ergebnis
    }
}

impl Drop for ChatGuard {
    fn drop(&mut self) {
        let Some(sperre) = self.geteilt.take() else {
            return;
        };
        sperre.erneuerung.abort();
        let chat_id = self.chat_id;
        match tokio::runtime::Handle::try_current() {
            Ok(laufzeit) => {
                laufzeit.spawn(async move {
                    if let Err(e) = sperre.store.release(&sperre.handle).await {
                        tracing::warn!(
                            chat_id = %chat_id,
                            fehler = %e,
                            "Geteilte Sperre nicht freigegeben, verfaellt nach TTL"
                        );
                    }
                });
            }
            Err(_) => {
                tracing::warn!(
                    chat_id = %chat_id,
                    "Keine Laufzeit fuer Freigabe, geteilte Sperre verfaellt nach TTL"
                );
            }
        }
    }
}
