//! Button-HAL firmware entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  GPIO vector ──▶ InterruptHal::service_pending           │
//! │                    debounce gate · event register        │
//! │                                                          │
//! │  ─────────────── Platform trait boundary ──────────────  │
//! │                                                          │
//! │  main task:  TapToggle::step                             │
//! │              sleep ─▶ drain ─▶ toggle LEDs               │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

#[cfg(all(feature = "espidf", target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use log::info;

    use irqhal::adapters::esp32::{self, Esp32Platform};
    use irqhal::app::service::TapToggle;
    use irqhal::{HalConfig, InterruptHal};

    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  irqhal v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. HAL bring-up ───────────────────────────────────────
    // Leaked: the GPIO vector holds a 'static reference for the process lifetime.
    let hal: &'static InterruptHal<Esp32Platform> = Box::leak(Box::new(InterruptHal::new(
        Esp32Platform::new(),
        &HalConfig::default(),
    )?));
    esp32::bind(hal);
    hal.init()?;

    // ── 3. Main loop ──────────────────────────────────────────
    let mut app = TapToggle::new(hal);
    app.start();
    loop {
        let events = app.step();
        if !events.is_empty() {
            info!("taps: {:?}", events);
        }
    }
}

#[cfg(not(all(feature = "espidf", target_os = "espidf")))]
fn main() {
    eprintln!("irqhal firmware only runs on ESP-IDF targets; see the host tests instead");
}
