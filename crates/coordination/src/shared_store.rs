//! In-Memory Sperr- und Zaehlerspeicher
//!
//! Steht fuer einen externen Schluessel-Wert-Speicher mit Ablaufzeiten.
//! Mehrere Koordinator-Instanzen im selben Prozess koennen sich einen
//! `SpeicherStore` teilen und verhalten sich dann wie ein Cluster.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use krokodil_core::{LockHandle, LockVersuch, Result, SharedCounterStore, SharedLockStore};
use parking_lot::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

#[derive(Debug)]
struct SperrEintrag {
    token: String,
    laeuft_ab: Instant,
}

#[derive(Debug)]
struct ZaehlerEintrag {
    stand: u64,
    laeuft_ab: Instant,
}

/// Thread-safe Speicher fuer Sperren und Zaehler mit TTL
#[derive(Debug, Default)]
pub struct SpeicherStore {
    sperren: Mutex<HashMap<String, SperrEintrag>>,
    zaehler: Mutex<HashMap<String, ZaehlerEintrag>>,
}

impl SpeicherStore {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Entfernt abgelaufene Sperren und Zaehler, gibt die Anzahl zurueck
    pub fn aufraeumen(&self) -> usize {
        let jetzt = Instant::now();
        let mut entfernt = 0;

        let mut sperren = self.sperren.lock();
        let vorher = sperren.len();
        sperren.retain(|_, e| e.laeuft_ab > jetzt);
        entfernt += vorher - sperren.len();
        drop(sperren);

        let mut zaehler = self.zaehler.lock();
        let vorher = zaehler.len();
        zaehler.retain(|_, e| e.laeuft_ab > jetzt);
        entfernt += vorher - zaehler.len();

        if entfernt > 0 {
            tracing::debug!(entfernt, "Abgelaufene Speichereintraege entfernt");
        }
        entfernt
    }

    /// Anzahl aktuell gehaltener (nicht abgelaufener) Sperren
    pub fn gehaltene_sperren(&self) -> usize {
        let jetzt = Instant::now();
        self.sperren
            .lock()
            .values()
            .filter(|e| e.laeuft_ab > jetzt)
            .count()
    }
}

#[async_trait]
impl SharedLockStore for SpeicherStore {
    async fn try_acquire(&self, name: &str, ttl: Duration) -> Result<LockVersuch> {
        let jetzt = Instant::now();
        let mut sperren = self.sperren.lock();

        if sperren.get(name).is_some_and(|e| e.laeuft_ab > jetzt) {
            return Ok(LockVersuch::Belegt);
        }

        let token = Uuid::new_v4().to_string();
        sperren.insert(
            name.to_string(),
            SperrEintrag {
                token: token.clone(),
                laeuft_ab: jetzt + ttl,
            },
        );

        Ok(LockVersuch::Erhalten(LockHandle {
            name: name.to_string(),
            token,
        }))
    }

    async fn extend(&self, handle: &LockHandle, ttl: Duration) -> Result<bool> {
        let jetzt = Instant::now();
        let mut sperren = self.sperren.lock();
        match sperren.get_mut(&handle.name) {
            Some(e) if e.token == handle.token && e.laeuft_ab > jetzt => {
                e.laeuft_ab = jetzt + ttl;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release(&self, handle: &LockHandle) -> Result<()> {
        let mut sperren = self.sperren.lock();
        // Nur der aktuelle Halter darf freigeben
        if sperren
            .get(&handle.name)
            .is_some_and(|e| e.token == handle.token)
        {
            sperren.remove(&handle.name);
        } else {
            tracing::debug!(
                sperre = %handle.name,
                "Sperre bereits abgelaufen oder neu vergeben"
            );
        }
        Ok(())
    }
}

#[async_trait]
impl SharedCounterStore for SpeicherStore {
    async fn increment_with_expiry(&self, key: &str, ttl: Duration) -> Result<u64> {
        let jetzt = Instant::now();
        let mut zaehler = self.zaehler.lock();

        let eintrag = zaehler
            .entry(key.to_string())
            .or_insert_with(|| ZaehlerEintrag {
                stand: 0,
                laeuft_ab: jetzt + ttl,
            });

        if eintrag.laeuft_ab <= jetzt {
            eintrag.stand = 0;
            eintrag.laeuft_ab = jetzt + ttl;
        }

        // Ablaufzeit gilt ab dem ersten Inkrement und wird nicht verlaengert
        eintrag.stand += 1;
        Ok(eintrag.stand)
    }
}
