//! Woerterbuch aus einer zeilengetrennten Wortliste
//!
//! Jede nicht-leere Zeile ist ein Wort. Die Auswahl ist gleichverteilt,
//! Wiederholungen sind erlaubt.

use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use krokodil_core::{KrokodilError, Result, WordSource};
use rand::seq::SliceRandom;

/// Feste Wortliste im Speicher
#[derive(Debug, Clone)]
pub struct WortlisteProvider {
    woerter: Vec<String>,
}

impl WortlisteProvider {
    /// Erstellt die Liste aus einem Text mit einem Wort pro Zeile
    pub fn aus_text(inhalt: &str) -> Result<Self> {
        let woerter: Vec<String> = inhalt
            .lines()
            .map(str::trim)
            .filter(|zeile| !zeile.is_empty())
            .map(String::from)
            .collect();

        if woerter.is_empty() {
            return Err(KrokodilError::Konfiguration(
                "Woerterbuch enthaelt keine Woerter".into(),
            ));
        }

        Ok(Self { woerter })
    }

    /// Liest die komplette Liste aus einem beliebigen Reader
    pub fn aus_reader(mut reader: impl Read) -> Result<Self> {
        let mut inhalt = String::new();
        reader
            .read_to_string(&mut inhalt)
            .map_err(|e| KrokodilError::Konfiguration(format!("Woerterbuch nicht lesbar: {e}")))?;
        Self::aus_text(&inhalt)
    }

    /// Laedt die Liste aus einer Datei
    pub async fn laden(pfad: impl AsRef<Path>) -> Result<Self> {
        let pfad = pfad.as_ref();
        let inhalt = tokio::fs::read_to_string(pfad).await.map_err(|e| {
            KrokodilError::Konfiguration(format!(
                "Woerterbuch '{}' nicht lesbar: {e}",
                pfad.display()
            ))
        })?;

        let provider = Self::aus_text(&inhalt)?;
        tracing::info!(
            pfad = %pfad.display(),
            anzahl = provider.anzahl(),
            "Woerterbuch geladen"
        );
        Ok(provider)
    }

    pub fn anzahl(&self) -> usize {
        self.woerter.len()
    }
}

#[async_trait]
impl WordSource for WortlisteProvider {
    async fn next_word(&self) -> Result<String> {
        let wort = self.woerter.choose(&mut rand::thread_rng()).cloned();
        wort.ok_or_else(|| KrokodilError::WortquelleNichtVerfuegbar("Woerterbuch ist leer".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leere_zeilen_werden_ignoriert() {
        let provider = WortlisteProvider::aus_text("  Apfel \n\n\tBirne\n   \nKirsche\n").unwrap();
        assert_eq!(provider.anzahl(), 3);
        assert_eq!(provider.woerter, vec!["Apfel", "Birne", "Kirsche"]);
    }

    #[test]
    fn leere_liste_abgelehnt() {
        let ergebnis = WortlisteProvider::aus_text("\n   \n");
        assert!(matches!(ergebnis, Err(KrokodilError::Konfiguration(_))));
    }

    #[test]
    fn aus_reader() {
        let provider = WortlisteProvider::aus_reader("eins\nzwei".as_bytes()).unwrap();
        assert_eq!(provider.anzahl(), 2);
    }

    #[tokio::test]
    async fn wort_stammt_aus_der_liste() {
        let provider = WortlisteProvider::aus_text("Apfel\nBirne\nKirsche").unwrap();
        for _ in 0..50 {
            let wort = provider.next_word().await.unwrap();
            assert!(["Apfel", "Birne", "Kirsche"].contains(&wort.as_str()));
        }
    }

    #[tokio::test]
    async fn fehlende_datei_ist_konfigurationsfehler() {
        let ergebnis = WortlisteProvider::laden("/nicht/vorhanden/woerter.txt").await;
        assert!(matches!(ergebnis, Err(KrokodilError::Konfiguration(_))));
    }
}
