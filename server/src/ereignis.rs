//! Eingehende Chat-Ereignisse

use krokodil_core::{ChatId, Spieler};

/// Unterstuetzte Befehle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Befehl {
    Start,
    Regeln,
    Rangliste,
    GlobaleRangliste,
    ChatRangliste,
    Statistik,
    Status,
}

impl Befehl {
    /// Erkennt `/befehl` und `/befehl@botname`, Argumente werden ignoriert
    pub fn erkennen(text: &str) -> Option<Self> {
        let wort = text.trim().split_whitespace().next()?;
        let name = wort.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);

        match name {
            "start" => Some(Self::Start),
            "rules" => Some(Self::Regeln),
            "rating" => Some(Self::Rangliste),
            "globalrating" => Some(Self::GlobaleRangliste),
            "chatrating" => Some(Self::ChatRangliste),
            "cstat" => Some(Self::Statistik),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

/// Tasten unter den Bot-Nachrichten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taste {
    NeuesSpiel,
    WortAnsehen,
    NaechstesWort,
}

impl Taste {
    pub fn kennung(&self) -> &'static str {
        match self {
            Self::NeuesSpiel => "new_game",
            Self::WortAnsehen => "see_word",
            Self::NaechstesWort => "next_word",
        }
    }

    pub fn aus_kennung(kennung: &str) -> Option<Self> {
        match kennung {
            "new_game" => Some(Self::NeuesSpiel),
            "see_word" => Some(Self::WortAnsehen),
            "next_word" => Some(Self::NaechstesWort),
            _ => None,
        }
    }

    pub fn beschriftung(&self) -> &'static str {
        match self {
            Self::NeuesSpiel => "Ich will erklaeren!",
            Self::WortAnsehen => "Wort ansehen",
            Self::NaechstesWort => "Naechstes Wort",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inhalt {
    Text(String),
    Befehl(Befehl),
    Taste(Taste),
}

/// Ein Ereignis aus einem Chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ereignis {
    pub chat_id: ChatId,
    pub absender: Spieler,
    pub inhalt: Inhalt,
}

impl Ereignis {
    /// Nachricht: bekannter Befehl oder Rateversuch
    pub fn nachricht(chat_id: ChatId, absender: Spieler, text: &str) -> Self {
        let inhalt = match Befehl::erkennen(text) {
            Some(befehl) => Inhalt::Befehl(befehl),
            None => Inhalt::Text(text.to_string()),
        };
        Self {
            chat_id,
            absender,
            inhalt,
        }
    }

    pub fn taste(chat_id: ChatId, absender: Spieler, taste: Taste) -> Self {
        Self {
            chat_id,
            absender,
            inhalt: Inhalt::Taste(taste),
        }
    }

    /// Name fuer Logs und Laufzeitmessung
    pub fn art(&self) -> &'static str {
        match &self.inhalt {
            Inhalt::Text(_) => "text",
            Inhalt::Befehl(Befehl::Start) => "start",
            Inhalt::Befehl(Befehl::Regeln) => "rules",
            Inhalt::Befehl(Befehl::Rangliste) => "rating",
            Inhalt::Befehl(Befehl::GlobaleRangliste) => "globalrating",
            Inhalt::Befehl(Befehl::ChatRangliste) => "chatrating",
            Inhalt::Befehl(Befehl::Statistik) => "cstat",
            Inhalt::Befehl(Befehl::Status) => "status",
            Inhalt::Taste(t) => t.kennung(),
        }
    }
}
