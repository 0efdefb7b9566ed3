//! Unit-Tests fuer die In-Memory Statistik

use krokodil_core::{ChatId, RatingSource, StatsDelta, StatsSink, UserId};

use super::spieler;
use crate::stats::SpeicherStatistik;

async fn befuellte_statistik() -> SpeicherStatistik {
    let statistik = SpeicherStatistik::neu();
    let gruppe_a = ChatId(-1);
    let gruppe_b = ChatId(-2);

    for _ in 0..3 {
        statistik
            .record(&spieler(1, "Anna"), gruppe_a, StatsDelta::erraten())
            .await
            .unwrap();
    }
    statistik
        .record(&spieler(2, "Bob"), gruppe_a, StatsDelta::erraten())
        .await
        .unwrap();
    statistik
        .record(&spieler(2, "Bob"), gruppe_a, StatsDelta::host())
        .await
        .unwrap();
    statistik
        .record(&spieler(3, "Carla"), gruppe_a, StatsDelta::host())
        .await
        .unwrap();
    for _ in 0..5 {
        statistik
            .record(&spieler(2, "Bob"), gruppe_b, StatsDelta::erraten())
            .await
            .unwrap();
    }
    statistik
}

#[tokio::test]
async fn test_zaehler_addieren_sich() {
    let statistik = SpeicherStatistik::neu();
    let chat = ChatId(-1);
    let anna = spieler(1, "Anna");

    statistik.record(&anna, chat, StatsDelta::host()).await.unwrap();
    statistik.record(&anna, chat, StatsDelta::host()).await.unwrap();
    statistik.record(&anna, chat, StatsDelta::erfolgreich()).await.unwrap();
    statistik
        .record(&spieler(1, "Anna B."), chat, StatsDelta::erraten())
        .await
        .unwrap();

    let stand = statistik.spieler(chat, UserId(1)).expect("Eintrag fehlt");
    assert_eq!(stand.war_host, 2);
    assert_eq!(stand.erfolgreich, 1);
    assert_eq!(stand.erraten, 1);
    // Letzter Anzeigename gewinnt
    assert_eq!(stand.name, "Anna B.");
}

#[tokio::test]
async fn test_rangliste_eines_chats() {
    let statistik = befuellte_statistik().await;

    let rangliste = statistik.rangliste(ChatId(-1), 25).await.unwrap();

    let ids: Vec<UserId> = rangliste.iter().map(|s| s.user_id).collect();
    // Carla hat nichts erraten und erscheint nicht
    assert_eq!(ids, vec![UserId(1), UserId(2)]);
    assert_eq!(rangliste[0].erraten, 3);
}

#[tokio::test]
async fn test_rangliste_limit() {
    let statistik = befuellte_statistik().await;
    let rangliste = statistik.rangliste(ChatId(-1), 1).await.unwrap();
    assert_eq!(rangliste.len(), 1);
}

#[tokio::test]
async fn test_globale_rangliste_summiert_ueber_chats() {
    let statistik = befuellte_statistik().await;

    let rangliste = statistik.globale_rangliste(25).await.unwrap();

    assert_eq!(rangliste.len(), 2);
    assert_eq!(rangliste[0].user_id, UserId(2));
    assert_eq!(rangliste[0].erraten, 6);
    assert_eq!(rangliste[0].war_host, 1);
    assert_eq!(rangliste[1].user_id, UserId(1));
}

#[tokio::test]
async fn test_chat_rangliste() {
    let statistik = befuellte_statistik().await;

    let rangliste = statistik.chat_rangliste(25).await.unwrap();

    assert_eq!(rangliste.len(), 2);
    assert_eq!(rangliste[0].chat_id, ChatId(-2));
    assert_eq!(rangliste[0].erraten, 5);
    assert_eq!(rangliste[1].chat_id, ChatId(-1));
    assert_eq!(rangliste[1].erraten, 4);
}

#[tokio::test]
async fn test_gesamtstatistik() {
    let statistik = befuellte_statistik().await;
    // Privatchat: Chat-ID gleich Benutzer-ID
    statistik
        .record(&spieler(9, "Ida"), ChatId(9), StatsDelta::host())
        .await
        .unwrap();

    let gesamt = statistik.gesamt().await.unwrap();

    assert_eq!(gesamt.chats, 2);
    assert_eq!(gesamt.spieler, 4);
    assert_eq!(gesamt.runden, 9);
}
