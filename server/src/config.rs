//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Bot ohne Konfigurationsdatei
//! lauffaehig ist (bis auf das Woerterbuch). Ob die Datei fehlte, meldet
//! der Aufrufer erst, wenn das Logging steht.

use std::time::Duration;

use krokodil_coordination::{KoordinatorKonfig, LimitKonfig, SperrKonfig};
use krokodil_game::SpielRegeln;
use serde::{Deserialize, Serialize};

/// Untergrenze fuer die TTL der geteilten Sperre (Verlaengerung alle TTL/3)
const MIN_GETEILT_TTL_MS: u64 = 300;

/// Vollstaendige Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KrokodilConfig {
    /// Spielregeln und Woerterbuch
    pub spiel: SpielEinstellungen,
    /// Nachrichten-Limit pro Chat
    pub limit: LimitEinstellungen,
    /// Chat-Sperren und Fristen
    pub sperre: SperrEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpielEinstellungen {
    /// Pfad zur Wortliste (ein Wort pro Zeile)
    pub woerterbuch: String,
    /// Vorrang des letzten Gewinners beim naechsten Start
    pub gewinner_vorrang_sek: u64,
    /// Ab diesem Alter darf eine laufende Runde abgeloest werden
    pub runde_veraltet_sek: u64,
    /// Debug: der Host darf sein eigenes Wort erraten
    pub host_darf_raten: bool,
}

impl Default for SpielEinstellungen {
    fn default() -> Self {
        Self {
            woerterbuch: "woerterbuch.txt".into(),
            gewinner_vorrang_sek: 5,
            runde_veraltet_sek: 120,
            host_darf_raten: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitEinstellungen {
    /// Gezaehlt wird in Minuten der Wanduhr
    pub nachrichten_pro_minute: u64,
}

impl Default for LimitEinstellungen {
    fn default() -> Self {
        Self {
            nachrichten_pro_minute: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SperrEinstellungen {
    /// Maximale Wartezeit auf die Chat-Sperre
    pub erwerb_timeout_ms: u64,
    /// Maximale Laufzeit einer Operation unter der Sperre
    pub handler_frist_ms: u64,
    /// Zusaetzlich clusterweite Sperre im geteilten Speicher halten
    pub geteilt: bool,
    /// Verfallszeit nach Absturz des Halters; gehaltene Sperren werden
    /// alle `geteilt_ttl_ms / 3` verlaengert
    pub geteilt_ttl_ms: u64,
    pub wiederholung_ms: u64,
}

impl Default for SperrEinstellungen {
    fn default() -> Self {
        Self {
            erwerb_timeout_ms: 10_000,
            handler_frist_ms: 30_000,
            geteilt: false,
            geteilt_ttl_ms: 8_000,
            wiederholung_ms: 50,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl KrokodilConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// `None`, wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Option<Self>> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                config
                    .pruefen()
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(Some(config))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Prueft Werte, die sich nicht ueber den Typ ausschliessen lassen
    pub fn pruefen(&self) -> anyhow::Result<()> {
        if self.limit.nachrichten_pro_minute == 0 {
            anyhow::bail!("limit.nachrichten_pro_minute muss groesser 0 sein");
        }
        if self.sperre.erwerb_timeout_ms == 0 || self.sperre.handler_frist_ms == 0 {
            anyhow::bail!("sperre.erwerb_timeout_ms und sperre.handler_frist_ms muessen groesser 0 sein");
        }
        if self.sperre.geteilt_ttl_ms < MIN_GETEILT_TTL_MS {
            anyhow::bail!(
                "sperre.geteilt_ttl_ms muss mindestens {MIN_GETEILT_TTL_MS} sein, ist {}",
                self.sperre.geteilt_ttl_ms
            );
        }
        Ok(())
    }

    /// Entwicklungsmodus: Host darf raten, alles wird protokolliert
    pub fn dev_modus_anwenden(&mut self) {
        self.spiel.host_darf_raten = true;
        self.logging.level = "trace".into();
    }

    pub fn spiel_regeln(&self) -> SpielRegeln {
        SpielRegeln {
            gewinner_vorrang: Duration::from_secs(self.spiel.gewinner_vorrang_sek),
            host_darf_raten: self.spiel.host_darf_raten,
        }
    }

    pub fn limit_konfig(&self) -> LimitKonfig {
        LimitKonfig {
            max_pro_minute: self.limit.nachrichten_pro_minute,
        }
    }

    pub fn sperr_konfig(&self) -> SperrKonfig {
        SperrKonfig {
            erwerb_timeout: Duration::from_millis(self.sperre.erwerb_timeout_ms),
            wiederholung: Duration::from_millis(self.sperre.wiederholung_ms),
            geteilte_ttl: Duration::from_millis(self.sperre.geteilt_ttl_ms),
        }
    }

    pub fn koordinator_konfig(&self) -> KoordinatorKonfig {
        KoordinatorKonfig {
            runde_veraltet_nach: Duration::from_secs(self.spiel.runde_veraltet_sek),
            handler_frist: Duration::from_millis(self.sperre.handler_frist_ms),
        }
    }
}
