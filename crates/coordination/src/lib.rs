//! krokodil-coordination – Nebenlaeufigkeit rund um die Spielsitzungen
//!
//! Dieses Crate implementiert:
//! - ChatLockTable: eine Sperre pro Chat, lokal oder zusaetzlich clusterweit
//! - SessionRegistry: genau eine GameSession pro Chat
//! - AdmissionLimiter: Minuten-Zaehler fuer ausgehende Nachrichten pro Chat
//! - SpeicherStore: In-Memory Sperr- und Zaehlerspeicher
//! - GameCoordinator: Sperre -> Sitzung -> Operation -> Freigabe
//!
//! Ablauf eines Ereignisses fuer Chat C:
//! `ChatLock(C)` erwerben, Sitzung(C) aufloesen, Operation unter dem
//! Sitzungs-Lock ausfuehren, `ChatLock(C)` freigeben. Ereignisse
//! verschiedener Chats laufen vollstaendig parallel.

pub mod chat_lock;
pub mod coordinator;
pub mod error;
pub mod limiter;
pub mod registry;
pub mod shared_store;

// Bequeme Re-Exporte
pub use chat_lock::{ChatGuard, ChatLockTable, SperrKonfig};
pub use coordinator::{GameCoordinator, KoordinatorKonfig, StartErgebnis};
pub use error::{KoordinationError, KoordinationResult};
pub use limiter::{AdmissionLimiter, LimitKonfig, Zulassung};
pub use registry::SessionRegistry;
pub use shared_store::SpeicherStore;
