//! Anbindung an den Chat
//!
//! [`ChatTransport`] ist die Grenze zum Messenger. [`KonsolenTransport`]
//! ersetzt ihn im Einzelbetrieb: Ereignisse kommen zeilenweise ueber stdin,
//! Antworten gehen nach stdout.
//!
//! Zeilenformat: `<chat> <user> <name> <text>`
//! - `name` ohne Leerzeichen, `_` wird als Leerzeichen angezeigt
//! - `text` beginnend mit `#` ist ein Tastendruck (`#new_game`, `#see_word`, `#next_word`)
//! - Chat-IDs groesser 0 sind Privatchats

use async_trait::async_trait;
use krokodil_core::{ChatId, Spieler, UserId};
use tokio::io::{AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

use crate::ereignis::{Ereignis, Taste};
use crate::error::{ServerError, ServerResult};

/// Tasten, die unter einer Nachricht angeboten werden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tastatur {
    Keine,
    /// Fuer den Erklaerer: Wort ansehen, naechstes Wort
    Wort,
    /// Nach einem Treffer: neue Runde
    NeuesSpiel,
}

impl Tastatur {
    pub fn tasten(&self) -> &'static [Taste] {
        match self {
            Self::Keine => &[],
            Self::Wort => &[Taste::WortAnsehen, Taste::NaechstesWort],
            Self::NeuesSpiel => &[Taste::NeuesSpiel],
        }
    }
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Nachricht an alle im Chat
    async fn senden(&self, chat_id: ChatId, text: &str, tastatur: Tastatur) -> ServerResult<()>;

    /// Antwort auf einen Tastendruck, nur fuer den Druecker sichtbar
    async fn popup(&self, chat_id: ChatId, user_id: UserId, text: &str) -> ServerResult<()>;
}

/// Zerlegt eine Eingabezeile in ein Ereignis
pub fn zeile_parsen(zeile: &str) -> Option<Ereignis> {
    let mut teile = zeile.trim().splitn(4, char::is_whitespace);
    let chat_id = ChatId(teile.next()?.parse().ok()?);
    let user_id = UserId(teile.next()?.parse().ok()?);
    let name = teile.next()?.replace('_', " ");
    let text = teile.next()?.trim();
    if text.is_empty() {
        return None;
    }

    let absender = Spieler::neu(user_id, name);
    match text.strip_prefix('#') {
        Some(kennung) => {
            Taste::aus_kennung(kennung).map(|taste| Ereignis::taste(chat_id, absender, taste))
        }
        None => Some(Ereignis::nachricht(chat_id, absender, text)),
    }
}

pub struct KonsolenTransport {
    ausgabe: Mutex<Stdout>,
}

impl KonsolenTransport {
    pub fn neu() -> Self {
        Self {
            ausgabe: Mutex::new(tokio::io::stdout()),
        }
    }

    async fn schreiben(&self, zeile: String) -> ServerResult<()> {
        let mut ausgabe = self.ausgabe.lock().await;
        ausgabe
            .write_all(zeile.as_bytes())
            .await
            .map_err(|e| ServerError::transport(format!("stdout: {e}")))?;
        ausgabe
            .flush()
            .await
            .map_err(|e| ServerError::transport(format!("stdout: {e}")))
    }
}

impl Default for KonsolenTransport {
    fn default() -> Self {
        Self::neu()
    }
}

#[async_trait]
impl ChatTransport for KonsolenTransport {
    async fn senden(&self, chat_id: ChatId, text: &str, tastatur: Tastatur) -> ServerResult<()> {
        let mut zeile = format!("[{chat_id}] {text}\n");
        for taste in tastatur.tasten() {
            zeile.push_str(&format!("[{chat_id}]   #{} ({})\n", taste.kennung(), taste.beschriftung()));
        }
        self.schreiben(zeile).await
    }

    async fn popup(&self, chat_id: ChatId, user_id: UserId, text: &str) -> ServerResult<()> {
        self.schreiben(format!("[{chat_id} -> {user_id}] {text}\n")).await
    }
}
