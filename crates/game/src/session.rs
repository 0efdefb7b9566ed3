//! GameSession – Zustandsautomat einer Krokodil-Runde
//!
//! Pro Chat existiert genau eine Sitzung. Zustaende:
//!
//! ```text
//!            start                     guess (Treffer) / stop
//!   Idle ──────────────▶ Active ──────────────────────────────▶ Idle
//!     ▲  (Gewinner-Vorrang)  │  advance_word / see_word (Host)
//!     └──────────────────────┘  start ──▶ SpielLaeuftBereits
//! ```
//!
//! Jede Operation haelt den internen Lock der Sitzung fuer ihre gesamte
//! Dauer, auch waehrend Woerterbuch und Statistik aufgerufen werden.
//! Zustandsuebergaenge sind dadurch linearisierbar, unabhaengig von der
//! aeusseren Chat-Sperre.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use krokodil_core::{ChatId, KrokodilError, Spieler, StatsDelta, StatsSink, UserId, WordSource};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::{GameError, GameResult};

/// Vorrang des letzten Gewinners beim Start der naechsten Runde
pub const GEWINNER_VORRANG: Duration = Duration::from_secs(5);

/// Beobachtbarer Zustand einer Sitzung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpielZustand {
    Idle,
    Active,
    /// Idle, aber der letzte Gewinner hat noch Vorrang beim naechsten Start.
    /// Wird nur von [`GameSession::phase`] gemeldet, nie gespeichert.
    AwaitingNextHost,
}

/// Spielregeln einer Sitzung
#[derive(Debug, Clone)]
pub struct SpielRegeln {
    pub gewinner_vorrang: Duration,
    /// Debug-Schalter: der Host darf sein eigenes Wort erraten
    pub host_darf_raten: bool,
}

impl Default for SpielRegeln {
    fn default() -> Self {
        Self {
            gewinner_vorrang: GEWINNER_VORRANG,
            host_darf_raten: false,
        }
    }
}

/// Ergebnis eines Rateversuchs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rateversuch {
    Treffer {
        wort: String,
        gewinner: Spieler,
        host: Spieler,
    },
    Daneben,
}

impl Rateversuch {
    pub fn ist_treffer(&self) -> bool {
        matches!(self, Self::Treffer { .. })
    }
}

/// Momentaufnahme einer Sitzung (ohne das geheime Wort)
#[derive(Debug, Clone)]
pub struct SitzungsAnsicht {
    pub chat_id: ChatId,
    pub zustand: SpielZustand,
    pub phase: SpielZustand,
    pub host: Option<Spieler>,
    pub gewinner: Option<Spieler>,
    pub gestartet_am: Option<DateTime<Utc>>,
    pub geloest_am: Option<DateTime<Utc>>,
}

/// Wanduhr fuer Meldungen, monotone Uhr fuer Fristen
#[derive(Debug, Clone, Copy)]
struct Zeitpunkt {
    wand: DateTime<Utc>,
    mono: Instant,
}

impl Zeitpunkt {
    fn jetzt() -> Self {
        Self {
            wand: Utc::now(),
            mono: Instant::now(),
        }
    }
}

#[derive(Debug)]
enum Runde {
    Idle,
    Active {
        wort: String,
        host: Spieler,
        gestartet: Zeitpunkt,
    },
}

#[derive(Debug)]
struct SitzungsDaten {
    runde: Runde,
    gewinner: Option<Spieler>,
    geloest: Option<Zeitpunkt>,
}

impl SitzungsDaten {
    fn zustand(&self) -> SpielZustand {
        match self.runde {
            Runde::Idle => SpielZustand::Idle,
            Runde::Active { .. } => SpielZustand::Active,
        }
    }

    /// Restlicher Vorrang des Gewinners gegenueber `anfragender`
    fn gewinner_vorrang_fuer(&self, anfragender: UserId, vorrang: Duration) -> Option<Duration> {
        let gewinner = self.gewinner.as_ref()?;
        let geloest = self.geloest?;
        if gewinner.id == anfragender {
            return None;
        }
        vorrang.checked_sub(geloest.mono.elapsed()).filter(|rest| !rest.is_zero())
    }

    fn phase(&self, vorrang: Duration) -> SpielZustand {
        match self.runde {
            Runde::Active { .. } => SpielZustand::Active,
            Runde::Idle => match self.geloest {
                Some(geloest) if self.gewinner.is_some() && geloest.mono.elapsed() < vorrang => {
                    SpielZustand::AwaitingNextHost
                }
                _ => SpielZustand::Idle,
            },
        }
    }
}

/// Zustandsautomat fuer die aktuelle Runde eines Chats
pub struct GameSession {
    chat_id: ChatId,
    daten: Mutex<SitzungsDaten>,
    woerter: Arc<dyn WordSource>,
    statistik: Arc<dyn StatsSink>,
    regeln: SpielRegeln,
}

impl GameSession {
    /// Erstellt eine neue Sitzung im Zustand `Idle`
    pub fn neu(
        chat_id: ChatId,
        woerter: Arc<dyn WordSource>,
        statistik: Arc<dyn StatsSink>,
        regeln: SpielRegeln,
    ) -> Self {
        Self {
            chat_id,
            daten: Mutex::new(SitzungsDaten {
                runde: Runde::Idle,
                gewinner: None,
                geloest: None,
            }),
            woerter,
            statistik,
            regeln,
        }
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    /// Startet eine neue Runde mit `host` und gibt das gezogene Wort zurueck
    ///
    /// Abgelehnt mit `SpielLaeuftBereits` waehrend einer aktiven Runde und
    /// mit `WartetAufGewinner`, solange der letzte Gewinner Vorrang hat.
    /// Faellt das Woerterbuch aus, bleibt der Zustand unveraendert.
    pub async fn start(&self, host: &Spieler) -> GameResult<String> {
        let mut daten = self.daten.lock().await;

        if let Runde::Active { gestartet, .. } = &daten.runde {
            return Err(GameError::SpielLaeuftBereits {
                gestartet_am: gestartet.wand,
                laeuft_seit: gestartet.mono.elapsed(),
            });
        }

        if let Some(verbleibend) = daten.gewinner_vorrang_fuer(host.id, self.regeln.gewinner_vorrang)
        {
            return Err(GameError::WartetAufGewinner { verbleibend });
        }

        let wort = self.wort_ziehen().await?;
        daten.runde = Runde::Active {
            wort: wort.clone(),
            host: host.clone(),
            gestartet: Zeitpunkt::jetzt(),
        };

        tracing::info!(chat_id = %self.chat_id, host = %host.id, "Runde gestartet");
        self.statistik_erfassen(host, StatsDelta::host()).await;

        Ok(wort)
    }

    /// Prueft einen Rateversuch gegen das aktuelle Wort
    ///
    /// Vergleich ohne Gross-/Kleinschreibung und ohne umgebende Leerzeichen.
    /// Der Host selbst wird ignoriert (ausser im Debug-Modus). Ein Treffer
    /// beendet die Runde; Statistikfehler machen ihn nicht rueckgaengig.
    pub async fn guess(&self, text: &str, rater: &Spieler) -> Rateversuch {
        let mut daten = self.daten.lock().await;

        let trifft = match &daten.runde {
            Runde::Idle => false,
            Runde::Active { wort, host, .. } => {
                (host.id != rater.id || self.regeln.host_darf_raten) && woerter_gleich(text, wort)
            }
        };
        if !trifft {
            return Rateversuch::Daneben;
        }

        let Runde::Active { wort, host, .. } = std::mem::replace(&mut daten.runde, Runde::Idle)
        else {
            return Rateversuch::Daneben;
        };
        daten.gewinner = Some(rater.clone());
        daten.geloest = Some(Zeitpunkt::jetzt());

        tracing::info!(
            chat_id = %self.chat_id,
            gewinner = %rater.id,
            host = %host.id,
            "Wort erraten"
        );
        self.statistik_erfassen(rater, StatsDelta::erraten()).await;
        self.statistik_erfassen(&host, StatsDelta::erfolgreich()).await;

        Rateversuch::Treffer {
            wort,
            gewinner: rater.clone(),
            host,
        }
    }

    /// Ersetzt das Wort der laufenden Runde (nur fuer den Host)
    pub async fn advance_word(&self, anfragender: UserId) -> GameResult<String> {
        let mut daten = self.daten.lock().await;

        match &mut daten.runde {
            Runde::Idle => Err(GameError::KeineAktiveRunde),
            Runde::Active { wort, host, .. } => {
                if host.id != anfragender {
                    return Err(GameError::NichtHost);
                }
                let neu = self.wort_ziehen().await?;
                *wort = neu.clone();
                tracing::debug!(chat_id = %self.chat_id, "Neues Wort fuer den Host gezogen");
                Ok(neu)
            }
        }
    }

    /// Zeigt dem Host das aktuelle Wort erneut
    pub async fn see_word(&self, anfragender: UserId) -> GameResult<String> {
        let daten = self.daten.lock().await;

        match &daten.runde {
            Runde::Idle => Err(GameError::KeineAktiveRunde),
            Runde::Active { wort, host, .. } if host.id == anfragender => Ok(wort.clone()),
            Runde::Active { .. } => Err(GameError::NichtHost),
        }
    }

    /// Beendet eine laufende Runde bedingungslos
    ///
    /// Gibt `true` zurueck wenn tatsaechlich eine Runde lief.
    pub async fn stop(&self) -> bool {
        let mut daten = self.daten.lock().await;
        let lief = matches!(daten.runde, Runde::Active { .. });
        daten.runde = Runde::Idle;
        if lief {
            tracing::info!(chat_id = %self.chat_id, "Runde abgebrochen");
        }
        lief
    }

    /// Gespeicherter Zustand (`Idle` oder `Active`)
    pub async fn zustand(&self) -> SpielZustand {
        self.daten.lock().await.zustand()
    }

    /// Wie `zustand`, meldet aber `AwaitingNextHost` waehrend der Gewinner Vorrang hat
    pub async fn phase(&self) -> SpielZustand {
        self.daten.lock().await.phase(self.regeln.gewinner_vorrang)
    }

    pub async fn ansicht(&self) -> SitzungsAnsicht {
        let daten = self.daten.lock().await;
        let (host, gestartet_am) = match &daten.runde {
            Runde::Active {
                host, gestartet, ..
            } => (Some(host.clone()), Some(gestartet.wand)),
            Runde::Idle => (None, None),
        };

        SitzungsAnsicht {
            chat_id: self.chat_id,
            zustand: daten.zustand(),
            phase: daten.phase(self.regeln.gewinner_vorrang),
            host,
            gewinner: daten.gewinner.clone(),
            gestartet_am,
            geloest_am: daten.geloest.map(|z| z.wand),
        }
    }

    async fn wort_ziehen(&self) -> GameResult<String> {
        let wort = self
            .woerter
            .next_word()
            .await
            .map_err(GameError::WortquelleNichtVerfuegbar)?;
        let wort = wort.trim();
        if wort.is_empty() {
            return Err(GameError::WortquelleNichtVerfuegbar(
                KrokodilError::WortquelleNichtVerfuegbar("leeres Wort geliefert".into()),
            ));
        }
        Ok(wort.to_string())
    }

    async fn statistik_erfassen(&self, spieler: &Spieler, delta: StatsDelta) {
        if let Err(e) = self.statistik.record(spieler, self.chat_id, delta).await {
            tracing::warn!(
                chat_id = %self.chat_id,
                user_id = %spieler.id,
                fehler = %e,
                "Statistik nicht gespeichert, Rundenergebnis bleibt gueltig"
            );
        }
    }
}

fn woerter_gleich(versuch: &str, wort: &str) -> bool {
    versuch.trim().to_lowercase() == wort.trim().to_lowercase()
}
