//! Texte fuer die Spieler

use krokodil_core::{ChatStatistik, GesamtStatistik, SpielerStatistik};
use krokodil_game::{SitzungsAnsicht, SpielZustand};

/// Laenge der Ranglisten
pub const RANGLISTE_LAENGE: usize = 25;

pub const LIMIT_ERREICHT: &str = "Limit fuer Nachrichten pro Minute erreicht!";
pub const EINLADUNG: &str = "Fuege den Bot zu einer Gruppe hinzu, um Krokodil zu spielen.";
pub const SPIEL_LAEUFT: &str = "Es laeuft bereits eine Runde! Bitte warte 2 Minuten.";
pub const GEWINNER_HAT_VORRANG: &str = "Der Gewinner hat 5 Sekunden Vorrang!";
pub const NICHT_FUER_DICH: &str = "Dieses Wort ist nicht fuer dich!";
pub const KEINE_RUNDE: &str = "Gerade laeuft keine Runde.";
pub const ZU_WENIG_DATEN: &str = "Noch nicht genug Daten!";

pub const REGELN: &str = "\
KROKODIL - SPIELREGELN

Es gibt einen Erklaerer und Spieler, die das Wort erraten.

Nach /start sieht sich der Erklaerer mit \"Wort ansehen\" sein Wort an und \
umschreibt es, ohne Woerter mit demselben Stamm zu benutzen.
Gefaellt das Wort nicht, gibt es mit \"Naechstes Wort\" ein neues.
Die Spieler schreiben ihre Vorschlaege einfach in den Chat, ein Wort pro Nachricht.";

pub fn host_erklaert(name: &str) -> String {
    format!("{name} erklaert das Wort")
}

pub fn du_bist_host(wort: &str) -> String {
    format!("Du erklaerst, dein Wort ist: {wort}")
}

pub fn erraten(name: &str, wort: &str) -> String {
    format!("{name} hat das Wort {wort} erraten")
}

fn antworten(n: u64) -> &'static str {
    if n == 1 {
        "Antwort"
    } else {
        "Antworten"
    }
}

fn spiele(n: u64) -> &'static str {
    if n == 1 {
        "Spiel"
    } else {
        "Spiele"
    }
}

pub fn rangliste(kopf: &str, eintraege: &[SpielerStatistik]) -> String {
    if eintraege.is_empty() {
        return ZU_WENIG_DATEN.into();
    }

    let mut text = format!("{kopf}\n\n");
    for (platz, e) in eintraege.iter().enumerate() {
        text.push_str(&format!(
            "{}. {}: {} {}\n",
            platz + 1,
            e.name,
            e.erraten,
            antworten(e.erraten)
        ));
    }
    text
}

pub fn chat_rangliste(kopf: &str, eintraege: &[ChatStatistik]) -> String {
    if eintraege.is_empty() {
        return ZU_WENIG_DATEN.into();
    }

    let mut text = format!("{kopf}\n\n");
    for (platz, e) in eintraege.iter().enumerate() {
        text.push_str(&format!(
            "{}. {}: {} {}\n",
            platz + 1,
            e.chat_id,
            e.erraten,
            spiele(e.erraten)
        ));
    }
    text
}

pub fn gesamtstatistik(g: &GesamtStatistik) -> String {
    format!(
        "Krokodil-Statistik\n\nChats: {}\nSpieler: {}\nSpiele insgesamt: {}\n",
        g.chats, g.spieler, g.runden
    )
}

pub fn status(ansicht: &SitzungsAnsicht) -> String {
    match ansicht.phase {
        SpielZustand::Active => {
            let host = ansicht
                .host
                .as_ref()
                .map(|h| h.name.as_str())
                .unwrap_or("?");
            match ansicht.gestartet_am {
                Some(am) => format!(
                    "Runde laeuft, {host} erklaert (seit {} UTC)",
                    am.format("%H:%M:%S")
                ),
                None => format!("Runde laeuft, {host} erklaert"),
            }
        }
        SpielZustand::AwaitingNextHost => {
            let gewinner = ansicht
                .gewinner
                .as_ref()
                .map(|g| g.name.as_str())
                .unwrap_or("?");
            format!("{gewinner} hat gewonnen und darf als Erster die naechste Runde starten")
        }
        SpielZustand::Idle => "Keine Runde aktiv. Starte eine mit /start".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krokodil_core::{ChatId, Spieler, UserId};

    fn eintrag(id: i64, name: &str, erraten: u64) -> SpielerStatistik {
        SpielerStatistik {
            user_id: UserId(id),
            name: name.into(),
            war_host: 0,
            erfolgreich: 0,
            erraten,
        }
    }

    #[test]
    fn leere_rangliste() {
        assert_eq!(rangliste("Top", &[]), ZU_WENIG_DATEN);
        assert_eq!(chat_rangliste("Top", &[]), ZU_WENIG_DATEN);
    }

    #[test]
    fn rangliste_mit_einzahl_und_mehrzahl() {
        let text = rangliste("Top", &[eintrag(1, "Anna", 3), eintrag(2, "Bob", 1)]);
        assert_eq!(text, "Top\n\n1. Anna: 3 Antworten\n2. Bob: 1 Antwort\n");
    }

    #[test]
    fn chat_rangliste_text() {
        let text = chat_rangliste(
            "Chats",
            &[ChatStatistik {
                chat_id: ChatId(-5),
                erraten: 1,
            }],
        );
        assert!(text.ends_with("1. chat:-5: 1 Spiel\n"));
    }

    #[test]
    fn status_texte() {
        let mut ansicht = SitzungsAnsicht {
            chat_id: ChatId(-1),
            zustand: SpielZustand::Idle,
            phase: SpielZustand::Idle,
            host: None,
            gewinner: None,
            gestartet_am: None,
            geloest_am: None,
        };
        assert!(status(&ansicht).contains("/start"));

        ansicht.phase = SpielZustand::AwaitingNextHost;
        ansicht.gewinner = Some(Spieler::neu(UserId(2), "Bob"));
        assert!(status(&ansicht).starts_with("Bob hat gewonnen"));

        ansicht.zustand = SpielZustand::Active;
        ansicht.phase = SpielZustand::Active;
        ansicht.host = Some(Spieler::neu(UserId(1), "Anna"));
        assert_eq!(status(&ansicht), "Runde laeuft, Anna erklaert");
    }
}
