//! Unit-Tests fuer den GameSession-Zustandsautomaten

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use krokodil_core::{ChatId, StatsDelta, UserId};

use super::{spieler, AufzeichnendeStatistik, FesteWoerter};
use crate::{
    error::GameError,
    session::{GameSession, Rateversuch, SpielRegeln, SpielZustand},
};

const CHAT: ChatId = ChatId(-100);

fn sitzung_mit(
    woerter: Arc<FesteWoerter>,
    statistik: Arc<AufzeichnendeStatistik>,
    regeln: SpielRegeln,
) -> GameSession {
    GameSession::neu(CHAT, woerter, statistik, regeln)
}

fn sitzung(woerter: &[&str]) -> (GameSession, Arc<AufzeichnendeStatistik>) {
    let statistik = Arc::new(AufzeichnendeStatistik::default());
    let s = sitzung_mit(FesteWoerter::neu(woerter), statistik.clone(), SpielRegeln::default());
    (s, statistik)
}

#[tokio::test]
async fn test_start_aus_idle() {
    let (sitzung, statistik) = sitzung(&["Krokodil"]);
    let anna = spieler(1, "Anna");

    let wort = sitzung.start(&anna).await.expect("Start fehlgeschlagen");

    assert_eq!(wort, "Krokodil");
    assert_eq!(sitzung.zustand().await, SpielZustand::Active);
    let ansicht = sitzung.ansicht().await;
    assert_eq!(ansicht.host, Some(anna.clone()));
    assert!(ansicht.gestartet_am.is_some());
    assert_eq!(
        statistik.aufrufe.lock().as_slice(),
        &[(UserId(1), CHAT, StatsDelta::host())]
    );
}

#[tokio::test]
async fn test_start_waehrend_aktiver_runde_abgelehnt() {
    let (sitzung, _) = sitzung(&["Krokodil", "Giraffe"]);
    sitzung.start(&spieler(1, "Anna")).await.unwrap();
    let gestartet_am = sitzung.ansicht().await.gestartet_am.unwrap();

    let ergebnis = sitzung.start(&spieler(2, "Bob")).await;

    match ergebnis {
        Err(GameError::SpielLaeuftBereits {
            gestartet_am: gemeldet,
            ..
        }) => assert_eq!(gemeldet, gestartet_am),
        andere => panic!("SpielLaeuftBereits erwartet, erhalten: {andere:?}"),
    }
    // Host bleibt unveraendert
    assert_eq!(sitzung.ansicht().await.host.unwrap().id, UserId(1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_gleichzeitige_starts_genau_einer_gewinnt() {
    let (sitzung, _) = sitzung(&[]);
    let sitzung = Arc::new(sitzung);

    let mut tasks = Vec::new();
    for i in 0..16 {
        let s = sitzung.clone();
        tasks.push(tokio::spawn(async move { s.start(&spieler(i, "Spieler")).await }));
    }

    let mut erfolge = 0;
    let mut abgelehnt = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => erfolge += 1,
            Err(GameError::SpielLaeuftBereits { .. }) => abgelehnt += 1,
            Err(e) => panic!("Unerwarteter Fehler: {e}"),
        }
    }

    assert_eq!(erfolge, 1);
    assert_eq!(abgelehnt, 15);
}

#[tokio::test]
async fn test_treffer_beendet_runde_genau_einmal() {
    let (sitzung, statistik) = sitzung(&["Krokodil"]);
    let anna = spieler(1, "Anna");
    let bob = spieler(2, "Bob");
    sitzung.start(&anna).await.unwrap();

    let versuch = sitzung.guess("  kROKODIL  ", &bob).await;
    assert_eq!(
        versuch,
        Rateversuch::Treffer {
            wort: "Krokodil".into(),
            gewinner: bob.clone(),
            host: anna.clone(),
        }
    );
    assert_eq!(sitzung.zustand().await, SpielZustand::Idle);
    assert_eq!(sitzung.ansicht().await.gewinner, Some(bob.clone()));

    // Wiederholter Treffer ist wirkungslos
    let nochmal = sitzung.guess("Krokodil", &bob).await;
    assert_eq!(nochmal, Rateversuch::Daneben);

    let aufrufe = statistik.aufrufe.lock().clone();
    assert_eq!(
        aufrufe,
        vec![
            (UserId(1), CHAT, StatsDelta::host()),
            (UserId(2), CHAT, StatsDelta::erraten()),
            (UserId(1), CHAT, StatsDelta::erfolgreich()),
        ]
    );
}

#[tokio::test]
async fn test_falscher_versuch_ohne_wirkung() {
    let (sitzung, statistik) = sitzung(&["Krokodil"]);
    sitzung.start(&spieler(1, "Anna")).await.unwrap();

    let versuch = sitzung.guess("Alligator", &spieler(2, "Bob")).await;

    assert!(!versuch.ist_treffer());
    assert_eq!(sitzung.zustand().await, SpielZustand::Active);
    assert_eq!(statistik.aufrufe.lock().len(), 1);
}

#[tokio::test]
async fn test_raten_ohne_runde() {
    let (sitzung, _) = sitzung(&["Krokodil"]);
    assert_eq!(
        sitzung.guess("Krokodil", &spieler(2, "Bob")).await,
        Rateversuch::Daneben
    );
}

#[tokio::test]
async fn test_host_darf_eigenes_wort_nicht_raten() {
    let (sitzung, _) = sitzung(&["Krokodil"]);
    let anna = spieler(1, "Anna");
    sitzung.start(&anna).await.unwrap();

    assert_eq!(sitzung.guess("Krokodil", &anna).await, Rateversuch::Daneben);
    assert_eq!(sitzung.zustand().await, SpielZustand::Active);
}

#[tokio::test]
async fn test_debug_modus_erlaubt_host_treffer() {
    let statistik = Arc::new(AufzeichnendeStatistik::default());
    let sitzung = sitzung_mit(
        FesteWoerter::neu(&["Krokodil"]),
        statistik,
        SpielRegeln {
            host_darf_raten: true,
            ..SpielRegeln::default()
        },
    );
    let anna = spieler(1, "Anna");
    sitzung.start(&anna).await.unwrap();

    assert!(sitzung.guess("krokodil", &anna).await.ist_treffer());
}

#[tokio::test(start_paused = true)]
async fn test_gewinner_vorrang_fuenf_sekunden() {
    let (sitzung, _) = sitzung(&["Krokodil", "Giraffe"]);
    let bob = spieler(2, "Bob");
    let carla = spieler(3, "Carla");
    sitzung.start(&spieler(1, "Anna")).await.unwrap();
    assert!(sitzung.guess("Krokodil", &bob).await.ist_treffer());
    assert_eq!(sitzung.phase().await, SpielZustand::AwaitingNextHost);

    tokio::time::advance(Duration::from_millis(4_999)).await;
    match sitzung.start(&carla).await {
        Err(GameError::WartetAufGewinner { verbleibend }) => {
            assert_eq!(verbleibend, Duration::from_millis(1));
        }
        andere => panic!("WartetAufGewinner erwartet, erhalten: {andere:?}"),
    }
    assert_eq!(sitzung.zustand().await, SpielZustand::Idle);

    tokio::time::advance(Duration::from_millis(1)).await;
    assert_eq!(sitzung.phase().await, SpielZustand::Idle);
    let wort = sitzung.start(&carla).await.expect("Start nach 5 s muss gelingen");
    assert_eq!(wort, "Giraffe");
}

#[tokio::test(start_paused = true)]
async fn test_gewinner_darf_sofort_starten() {
    let (sitzung, _) = sitzung(&["Krokodil", "Giraffe"]);
    let bob = spieler(2, "Bob");
    sitzung.start(&spieler(1, "Anna")).await.unwrap();
    sitzung.guess("Krokodil", &bob).await;

    let wort = sitzung.start(&bob).await.expect("Gewinner darf sofort starten");
    assert_eq!(wort, "Giraffe");
    assert_eq!(sitzung.ansicht().await.host, Some(bob));
}

#[tokio::test]
async fn test_wortquelle_ausfall_beim_start() {
    let woerter = FesteWoerter::neu(&["Krokodil"]);
    woerter.ausfallen(true);
    let statistik = Arc::new(AufzeichnendeStatistik::default());
    let sitzung = sitzung_mit(woerter.clone(), statistik.clone(), SpielRegeln::default());

    let ergebnis = sitzung.start(&spieler(1, "Anna")).await;

    assert!(matches!(ergebnis, Err(GameError::WortquelleNichtVerfuegbar(_))));
    assert_eq!(sitzung.zustand().await, SpielZustand::Idle);
    assert!(statistik.aufrufe.lock().is_empty());

    woerter.ausfallen(false);
    assert_eq!(sitzung.start(&spieler(1, "Anna")).await.unwrap(), "Krokodil");
}

#[tokio::test]
async fn test_neues_wort_nur_fuer_host() {
    let woerter = FesteWoerter::neu(&["Krokodil", "Giraffe"]);
    let sitzung = sitzung_mit(
        woerter.clone(),
        Arc::new(AufzeichnendeStatistik::default()),
        SpielRegeln::default(),
    );

    assert!(matches!(
        sitzung.advance_word(UserId(1)).await,
        Err(GameError::KeineAktiveRunde)
    ));

    let anna = spieler(1, "Anna");
    sitzung.start(&anna).await.unwrap();
    let gestartet_am = sitzung.ansicht().await.gestartet_am;

    assert!(matches!(
        sitzung.advance_word(UserId(2)).await,
        Err(GameError::NichtHost)
    ));
    assert_eq!(sitzung.advance_word(UserId(1)).await.unwrap(), "Giraffe");

    // Zustand, Host und Startzeit bleiben
    let ansicht = sitzung.ansicht().await;
    assert_eq!(ansicht.zustand, SpielZustand::Active);
    assert_eq!(ansicht.host, Some(anna));
    assert_eq!(ansicht.gestartet_am, gestartet_am);

    // Das alte Wort trifft nicht mehr, das neue schon
    assert!(!sitzung.guess("Krokodil", &spieler(2, "Bob")).await.ist_treffer());

    woerter.ausfallen(true);
    assert!(matches!(
        sitzung.advance_word(UserId(1)).await,
        Err(GameError::WortquelleNichtVerfuegbar(_))
    ));
    assert!(sitzung.guess("giraffe", &spieler(2, "Bob")).await.ist_treffer());
}

#[tokio::test]
async fn test_wort_ansehen() {
    let (sitzung, _) = sitzung(&["Krokodil"]);
    assert!(matches!(
        sitzung.see_word(UserId(1)).await,
        Err(GameError::KeineAktiveRunde)
    ));

    sitzung.start(&spieler(1, "Anna")).await.unwrap();
    assert_eq!(sitzung.see_word(UserId(1)).await.unwrap(), "Krokodil");
    assert!(matches!(
        sitzung.see_word(UserId(2)).await,
        Err(GameError::NichtHost)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_stop_erlaubt_neustart_veralteter_runde() {
    let (sitzung, _) = sitzung(&["Krokodil", "Giraffe"]);
    sitzung.start(&spieler(1, "Anna")).await.unwrap();
    tokio::time::advance(Duration::from_secs(120)).await;

    match sitzung.start(&spieler(2, "Bob")).await {
        Err(GameError::SpielLaeuftBereits { laeuft_seit, .. }) => {
            assert!(laeuft_seit >= Duration::from_secs(120));
        }
        andere => panic!("SpielLaeuftBereits erwartet, erhalten: {andere:?}"),
    }

    assert!(sitzung.stop().await);
    assert!(!sitzung.stop().await);
    assert_eq!(sitzung.start(&spieler(2, "Bob")).await.unwrap(), "Giraffe");
}

#[tokio::test]
async fn test_statistikfehler_rollt_treffer_nicht_zurueck() {
    let (sitzung, statistik) = sitzung(&["Krokodil"]);
    sitzung.start(&spieler(1, "Anna")).await.unwrap();
    statistik.fehlschlagen.store(true, Ordering::SeqCst);

    let versuch = sitzung.guess("Krokodil", &spieler(2, "Bob")).await;

    assert!(versuch.ist_treffer());
    assert_eq!(sitzung.zustand().await, SpielZustand::Idle);
    assert_eq!(sitzung.ansicht().await.gewinner.unwrap().id, UserId(2));
}
