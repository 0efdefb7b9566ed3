//! # krokodil-observability
//!
//! Observability-Crate fuer Krokodil:
//! - Structured Logging (text oder JSON) via tracing-subscriber
//! - Laufzeitmessung fuer Ereignis-Handler

pub mod logging;
pub mod zeitmessung;

pub use logging::{logging_initialisieren, subscriber_bauen, LogEinstellungen, LogFormat};
pub use zeitmessung::{gemessen, LANGSAM_AB};
