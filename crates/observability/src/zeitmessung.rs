//! Laufzeitmessung fuer Ereignis-Handler
//!
//! Misst die Dauer eines Futures und protokolliert sie als strukturiertes
//! Log-Event. Langsame Handler werden als Warnung gemeldet.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

/// Ab dieser Dauer gilt ein Handler als langsam
pub const LANGSAM_AB: Duration = Duration::from_secs(1);

/// Fuehrt `arbeit` aus und protokolliert die Dauer unter `name`
pub async fn gemessen<T, F>(name: &'static str, arbeit: F) -> T
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let ergebnis = arbeit.await;
    let dauer = start.elapsed();

    if dauer >= LANGSAM_AB {
        tracing::warn!(
            handler = name,
            dauer_ms = dauer.as_millis() as u64,
            "Langsamer Handler"
        );
    } else {
        tracing::trace!(
            handler = name,
            dauer_us = dauer.as_micros() as u64,
            "Handler abgeschlossen"
        );
    }
    ergebnis
}
