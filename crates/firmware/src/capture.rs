//! Tasks and types related to measuring the pulses output by the RC receiver.
//!
//! Each receiver channel gets its own task and its own [`Watch`]. The control loop only ever reads the latest value,
//! so a channel that updates faster or slower than the others never holds the rest back.

use defmt::{info, warn};
use embassy_stm32::exti::ExtiInput;
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    watch::{AnonReceiver, Sender, Watch},
};
use embassy_time::{Duration, Instant, with_timeout};
use radiorgan_lib::pulse::{PulseCapture, PulseWidth};

/// Receivers repeat each channel roughly every 20ms; missing two frames in a row means the transmitter is gone.
const PULSE_TIMEOUT: Duration = Duration::from_millis(50);

const PULSE_RECEIVER_CNT: usize = 0;
pub type PulseSync = Watch<CriticalSectionRawMutex, Option<PulseWidth>, PULSE_RECEIVER_CNT>;
pub type PulseSender<'a> =
    Sender<'a, CriticalSectionRawMutex, Option<PulseWidth>, PULSE_RECEIVER_CNT>;
pub type PulseSpy<'a> =
    AnonReceiver<'a, CriticalSectionRawMutex, Option<PulseWidth>, PULSE_RECEIVER_CNT>;

/// Latest steering (ST) pulse; selects the scale degree.
pub static STEERING: PulseSync = Watch::new_with(None);
/// Latest throttle (TH) pulse; sets the volume.
pub static THROTTLE: PulseSync = Watch::new_with(None);
/// Latest AUX1 pulse; selects the instrument family.
pub static AUX1: PulseSync = Watch::new_with(None);
/// Latest AUX2 pulse; shifts the octave.
pub static AUX2: PulseSync = Watch::new_with(None);

/// Waits for the next plausible pulse, skipping glitches.
///
/// Edges are timestamped with the 1MHz time driver; a coarser tick would blur the throttle dead-band.
async fn next_pulse(pin: &mut ExtiInput<'static>, capture: &mut PulseCapture) -> PulseWidth {
    loop {
        pin.wait_for_rising_edge().await;
        capture.rising_edge(Instant::now());
        pin.wait_for_falling_edge().await;
        if let Some(width) = capture.falling_edge(Instant::now()) {
            return width;
        }
    }
}

/// Measures the pulses arriving on `pin`, publishing `None` whenever none arrives in time.
#[embassy_executor::task(pool_size = 4)]
pub async fn capture(
    mut pin: ExtiInput<'static>,
    name: &'static str,
    pulses: PulseSender<'static>,
) -> ! {
    let mut capture = PulseCapture::new();
    loop {
        match with_timeout(PULSE_TIMEOUT, next_pulse(&mut pin, &mut capture)).await {
            Ok(width) => {
                if pulses.try_get().flatten().is_none() {
                    info!("{} channel receiving", name);
                }
                pulses.send(Some(width));
            }
            Err(_) => {
                capture.reset();
                if pulses.try_get().flatten().is_some() {
                    warn!("No pulse on {} channel for {}ms", name, PULSE_TIMEOUT.as_millis());
                }
                pulses.send(None);
            }
        }
    }
}
