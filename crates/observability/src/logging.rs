//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable, die Vorrang vor der Konfigurationsdatei hat:
//! - `KROKODIL_LOG_LEVEL`: Filter (trace/debug/info/warn/error oder EnvFilter-Direktiven)
//! - `KROKODIL_LOG_FORMAT`: Format (text/json), Standard: text
//!
//! Logs gehen nach stderr, stdout gehoert dem Konsolen-Transport.

use std::str::FromStr;

use anyhow::anyhow;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const ENV_LOG_LEVEL: &str = "KROKODIL_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "KROKODIL_LOG_FORMAT";

/// Ausgabeformat der Logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            anderes => Err(anyhow!("Unbekanntes Log-Format '{anderes}' (erlaubt: text, json)")),
        }
    }
}

/// Wirksame Logging-Einstellungen nach Auswertung der Umgebung
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEinstellungen {
    pub filter: String,
    pub format: LogFormat,
}

impl LogEinstellungen {
    /// Kombiniert Konfiguration und Umgebung. Ein ungueltiges Format
    /// faellt auf `text` zurueck.
    pub fn aufloesen(
        level: &str,
        format: &str,
        env_level: Option<String>,
        env_format: Option<String>,
    ) -> Self {
        let filter = env_level
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| level.to_string());
        let format = env_format
            .as_deref()
            .unwrap_or(format)
            .parse::<LogFormat>()
            .unwrap_or_default();
        Self { filter, format }
    }

    /// Wie [`aufloesen`](Self::aufloesen) mit den Werten aus der Prozessumgebung
    pub fn aus_umgebung(level: &str, format: &str) -> Self {
        Self::aufloesen(
            level,
            format,
            std::env::var(ENV_LOG_LEVEL).ok(),
            std::env::var(ENV_LOG_FORMAT).ok(),
        )
    }
}

/// Initialisiert das Logging-System.
///
/// Liest `KROKODIL_LOG_LEVEL` und `KROKODIL_LOG_FORMAT` aus der Umgebung.
/// Ein unbrauchbarer Filter faellt auf `info` zurueck.
pub fn logging_initialisieren(level: &str, format: &str) -> anyhow::Result<()> {
    let einstellungen = LogEinstellungen::aus_umgebung(level, format);
    subscriber_bauen(&einstellungen, std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Logging konnte nicht initialisiert werden: {e}"))
}

/// Baut den Subscriber, der alle Zeilen nach `ziel` schreibt
pub fn subscriber_bauen<W>(
    einstellungen: &LogEinstellungen,
    ziel: W,
) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter =
        EnvFilter::try_new(&einstellungen.filter).unwrap_or_else(|_| EnvFilter::new("info"));

    match einstellungen.format {
        LogFormat::Json => Box::new(
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_current_span(true)
                .with_writer(ziel)
                .finish(),
        ),
        LogFormat::Text => Box::new(
            fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(ziel)
                .finish(),
        ),
    }
}

/// Validiert ob ein Log-Level-String gueltig ist.
pub fn log_level_gueltig(level: &str) -> bool {
    matches!(level, "trace" | "debug" | "info" | "warn" | "error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[test]
    fn log_level_gueltige_werte() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            assert!(log_level_gueltig(level));
        }
        assert!(!log_level_gueltig("verbose"));
        assert!(!log_level_gueltig("INFO")); // Gross-/Kleinschreibung
        assert!(!log_level_gueltig(""));
    }

    #[test]
    fn log_format_parsen() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("JSON".parse::<LogFormat>().is_err());
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn konfiguration_ohne_umgebung() {
        let e = LogEinstellungen::aufloesen("debug", "json", None, None);
        assert_eq!(e.filter, "debug");
        assert_eq!(e.format, LogFormat::Json);
    }

    #[test]
    fn umgebung_hat_vorrang() {
        let e = LogEinstellungen::aufloesen(
            "info",
            "text",
            Some("krokodil_game=trace".into()),
            Some("json".into()),
        );
        assert_eq!(e.filter, "krokodil_game=trace");
        assert_eq!(e.format, LogFormat::Json);
    }

    /// Sammelt die Ausgabe eines Subscribers
    #[derive(Clone, Default)]
    struct Puffer(Arc<Mutex<Vec<u8>>>);

    impl Puffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Puffer {
        fn write(&mut self, daten: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(daten);
            Ok(daten.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Puffer {
        type Writer = Puffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn zeilen_gehen_an_das_ziel() {
        for format in [LogFormat::Text, LogFormat::Json] {
            let puffer = Puffer::default();
            let einstellungen = LogEinstellungen {
                filter: "info".into(),
                format,
            };

            tracing::subscriber::with_default(subscriber_bauen(&einstellungen, puffer.clone()), || {
                tracing::info!(chat_id = -100, "Runde gestartet");
                tracing::debug!("unter dem Filter");
            });

            let text = puffer.text();
            assert!(text.contains("Runde gestartet"), "{format:?}: {text}");
            assert!(text.contains("-100"));
            assert!(!text.contains("unter dem Filter"));
        }
    }

    #[test]
    fn leere_umgebung_und_falsches_format() {
        let e = LogEinstellungen::aufloesen("warn", "yaml", Some("  ".into()), None);
        assert_eq!(e.filter, "warn");
        assert_eq!(e.format, LogFormat::Text);
    }
}
