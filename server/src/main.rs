//! Krokodil-Bot – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und startet den Bot.

use anyhow::Result;
use krokodil_observability::logging_initialisieren;
use krokodil_server::{config::KrokodilConfig, Server};

#[tokio::main]
async fn main() -> Result<()> {
    // Konfigurationsdatei-Pfad aus Umgebungsvariable oder Standard
    let config_pfad = std::env::var("KROKODIL_CONFIG").unwrap_or_else(|_| "krokodil.toml".into());

    // Konfiguration laden (Standardwerte falls Datei fehlt)
    let geladen = KrokodilConfig::laden(&config_pfad)?;
    let datei_gefunden = geladen.is_some();
    let mut config = geladen.unwrap_or_default();
    let dev_modus = std::env::var_os("KROKODIL_DEV").is_some_and(|v| !v.is_empty());
    if dev_modus {
        config.dev_modus_anwenden();
    }

    logging_initialisieren(&config.logging.level, &config.logging.format)?;
    if !datei_gefunden {
        tracing::warn!(
            pfad = %config_pfad,
            "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
        );
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        dev_modus,
        "Krokodil-Bot wird initialisiert"
    );

    Server::neu(config).starten().await
}
