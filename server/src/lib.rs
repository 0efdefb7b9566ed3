//! krokodil-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und baut aus der Konfiguration die
//! Dienste zusammen: Woerterbuch, Statistik, geteilter Speicher,
//! Koordinator, Nachrichten-Limit und Dispatcher.

pub mod config;
pub mod dispatcher;
pub mod ereignis;
pub mod error;
pub mod texte;
pub mod transport;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use config::KrokodilConfig;
use dispatcher::Dispatcher;
use krokodil_coordination::{
    AdmissionLimiter, ChatLockTable, GameCoordinator, SessionRegistry, SpeicherStore,
};
use krokodil_core::WordSource;
use krokodil_game::{SpeicherStatistik, WortlisteProvider};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use transport::{ChatTransport, KonsolenTransport};

/// Intervall fuer das Entfernen abgelaufener Speichereintraege
const AUFRAEUM_INTERVALL: Duration = Duration::from_secs(60);

/// Zusammengebaute Dienste eines laufenden Bots
pub struct Dienste {
    pub dispatcher: Arc<Dispatcher>,
    pub speicher: Arc<SpeicherStore>,
    pub statistik: Arc<SpeicherStatistik>,
}

impl Dienste {
    pub fn aufbauen(
        config: &KrokodilConfig,
        woerter: Arc<dyn WordSource>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        let statistik = Arc::new(SpeicherStatistik::neu());
        let speicher = Arc::new(SpeicherStore::neu());

        let sperren = if config.sperre.geteilt {
            ChatLockTable::verteilt(speicher.clone(), config.sperr_konfig())
        } else {
            ChatLockTable::lokal(config.sperr_konfig())
        };
        let sitzungen = SessionRegistry::neu(woerter, statistik.clone(), config.spiel_regeln());
        let koordinator = Arc::new(GameCoordinator::neu(
            sperren,
            sitzungen,
            config.koordinator_konfig(),
        ));
        let limiter = Arc::new(AdmissionLimiter::neu(speicher.clone(), config.limit_konfig()));

        let dispatcher = Arc::new(Dispatcher::neu(
            koordinator,
            limiter,
            statistik.clone(),
            transport,
        ));

        Self {
            dispatcher,
            speicher,
            statistik,
        }
    }
}

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: KrokodilConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: KrokodilConfig) -> Self {
        Self { config }
    }

    /// Startet den Bot und laeuft bis Eingabeende oder Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Woerterbuch laden
    /// 2. Dienste aufbauen
    /// 3. Aufraeumen des geteilten Speichers im Hintergrund
    /// 4. Ereignisse von stdin lesen, jedes in einer eigenen Aufgabe
    /// 5. Beim Beenden auf alle laufenden Ereignisse warten
    pub async fn starten(self) -> Result<()> {
        let woerter = WortlisteProvider::laden(&self.config.spiel.woerterbuch).await?;
        let dienste = Dienste::aufbauen(
            &self.config,
            Arc::new(woerter),
            Arc::new(KonsolenTransport::neu()),
        );

        tracing::info!(
            geteilte_sperre = self.config.sperre.geteilt,
            limit = self.config.limit.nachrichten_pro_minute,
            host_darf_raten = self.config.spiel.host_darf_raten,
            "Krokodil-Bot startet"
        );

        let aufraeumer = {
            let speicher = dienste.speicher.clone();
            tokio::spawn(async move {
                let mut intervall = tokio::time::interval(AUFRAEUM_INTERVALL);
                loop {
                    intervall.tick().await;
                    speicher.aufraeumen();
                }
            })
        };

        tracing::info!("Bot laeuft. Warte auf Ereignisse (stdin) oder Ctrl-C...");
        let ergebnis = eingabe_verarbeiten(
            &dienste.dispatcher,
            BufReader::new(tokio::io::stdin()),
            tokio::signal::ctrl_c(),
        )
        .await;

        aufraeumer.abort();
        ergebnis
    }
}

/// Liest Ereignisse zeilenweise bis Eingabeende oder `stopp`
///
/// Jedes Ereignis laeuft in einer eigenen Aufgabe. Vor der Rueckkehr wird
/// auf alle noch laufenden gewartet, damit ihre Antworten nicht verloren gehen.
pub async fn eingabe_verarbeiten<R, S>(
    dispatcher: &Arc<Dispatcher>,
    eingabe: R,
    stopp: S,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    S: Future<Output = std::io::Result<()>>,
{
    let mut zeilen = eingabe.lines();
    let mut laufend = JoinSet::new();
    tokio::pin!(stopp);

    let ergebnis = loop {
        tokio::select! {
            zeile = zeilen.next_line() => match zeile {
                Err(e) => break Err(e.into()),
                Ok(Some(zeile)) if zeile.trim().is_empty() => {}
                Ok(Some(zeile)) => match transport::zeile_parsen(&zeile) {
                    Some(ereignis) => {
                        dispatcher.einreichen(&mut laufend, ereignis);
                    }
                    None => tracing::warn!(zeile = %zeile, "Eingabe nicht verstanden"),
                },
                Ok(None) => {
                    tracing::info!("Eingabe beendet");
                    break Ok(());
                }
            },
            Some(fertig) = laufend.join_next() => aufgabe_pruefen(fertig),
            signal = &mut stopp => {
                tracing::info!("Shutdown-Signal empfangen, Bot wird beendet");
                break signal.map_err(Into::into);
            }
        }
    };

    if !laufend.is_empty() {
        tracing::info!(offen = laufend.len(), "Warte auf laufende Ereignisse");
    }
    while let Some(fertig) = laufend.join_next().await {
        aufgabe_pruefen(fertig);
    }
    ergebnis
}

fn aufgabe_pruefen(fertig: std::result::Result<(), tokio::task::JoinError>) {
    if let Err(e) = fertig {
        tracing::error!(fehler = %e, "Ereignis-Aufgabe abgebrochen");
    }
}
