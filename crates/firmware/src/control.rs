//! The control loop: samples the latest pulses and selections, runs them through the [`Organ`] and drives every
//! output from the result.

use crate::{
    capture::{self, PulseSpy},
    meters::Meters,
    selector::{self, SelectionSpy},
    sound::{self, MidiSender},
};
use defmt::{info, warn};
use embassy_stm32::gpio::Output;
use embassy_time::{Duration, Ticker};
use radiorgan_lib::{
    calibration::Calibration,
    configuration::{KeySignature, Octave, Tone},
    organ::{Changes, ControlInput, Organ, SignalStatus},
    pulse::Channels,
};

/// One receiver frame.
const CONTROL_PERIOD: Duration = Duration::from_millis(20);

/// Read-only views of everything the other tasks publish.
pub struct Inputs {
    steering: PulseSpy<'static>,
    throttle: PulseSpy<'static>,
    aux1: PulseSpy<'static>,
    aux2: PulseSpy<'static>,
    key_signature: SelectionSpy<'static, KeySignature>,
    octave: SelectionSpy<'static, Octave>,
    tone: SelectionSpy<'static, Tone>,
}

impl Inputs {
    pub fn new() -> Self {
        Self {
            steering: capture::STEERING.anon_receiver(),
            throttle: capture::THROTTLE.anon_receiver(),
            aux1: capture::AUX1.anon_receiver(),
            aux2: capture::AUX2.anon_receiver(),
            key_signature: selector::KEY_SIGNATURE_SYNC.anon_receiver(),
            octave: selector::OCTAVE_SYNC.anon_receiver(),
            tone: selector::TONE_SYNC.anon_receiver(),
        }
    }

    fn snapshot(&mut self) -> ControlInput {
        ControlInput {
            channels: Channels {
                steering: self.steering.try_get().flatten(),
                throttle: self.throttle.try_get().flatten(),
                aux1: self.aux1.try_get().flatten(),
                aux2: self.aux2.try_get().flatten(),
            },
            key_signature: self.key_signature.try_get().unwrap_or_default(),
            octave: self.octave.try_get().unwrap_or_default(),
            tone: self.tone.try_get().unwrap_or_default(),
        }
    }
}

/// Task responsible for running the organ once per frame.
///
/// The LED is lit while the signal is valid.
#[embassy_executor::task]
pub async fn control(
    mut inputs: Inputs,
    mut meters: Meters,
    mut led: Output<'static>,
    midi: MidiSender<'static>,
) -> ! {
    let mut organ = Organ::new(&Calibration::DEFAULT);
    let mut ticker = Ticker::every(CONTROL_PERIOD);

    loop {
        let cycle = organ.tick(&inputs.snapshot());

        if cycle.changes.contains(Changes::Signal) {
            match cycle.signal {
                SignalStatus::Valid => {
                    info!("Signal acquired");
                    led.set_high();
                }
                SignalStatus::Lost => {
                    warn!("Signal lost, silencing all notes");
                    led.set_low();
                }
            }
        }
        if cycle.changes.contains(Changes::Timbre) {
            info!("Playing {}", cycle.timbre);
        }
        for event in cycle.events.iter() {
            info!(
                "{} {}{} in octave {} (MIDI {})",
                event.action,
                event.note.degree.to_str(),
                event.note.accidental.to_str(),
                event.note.octave.number(),
                event.note.midi_number()
            );
        }

        meters.show(&cycle.angles);
        sound::express(&cycle, &midi).await;

        ticker.next().await;
    }
}
