//! Controls the device's communication with the General MIDI sound module, over a classic 5-pin serial MIDI link.

use defmt::{debug, warn};
use embassy_stm32::{mode::Async, usart::UartTx};
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, Receiver, Sender},
};
use radiorgan_lib::{
    key_state::KeyAction,
    organ::{Changes, Cycle},
};
use wmidi::{Channel as MidiChannel, ControlFunction, MidiMessage, U7};

/// Fixed by MIDI 1.0 for the 5-pin DIN transport.
pub const MIDI_BAUD_RATE: u32 = 31_250;

const MIDI_CHANNEL: MidiChannel = MidiChannel::Ch1;
const NOTE_ON_VELOCITY: u8 = 100;

/// Enough for a program change, a volume change and a full cycle of note events.
const MIDI_QUEUE_DEPTH: usize = 16;
pub type MidiQueue = Channel<CriticalSectionRawMutex, MidiMessage<'static>, MIDI_QUEUE_DEPTH>;
pub type MidiSender<'a> =
    Sender<'a, CriticalSectionRawMutex, MidiMessage<'static>, MIDI_QUEUE_DEPTH>;
pub type MidiReceiver<'a> =
    Receiver<'a, CriticalSectionRawMutex, MidiMessage<'static>, MIDI_QUEUE_DEPTH>;

/// Messages waiting to be written to the UART.
pub static MIDI_QUEUE: MidiQueue = Channel::new();

/// Queues the MIDI messages that express a cycle, skipping whatever did not change.
///
/// Program and volume changes go first so that a note started in the same cycle already sounds as intended.
pub async fn express(cycle: &Cycle, midi: &MidiSender<'static>) {
    if cycle.changes.contains(Changes::Timbre) {
        midi.send(MidiMessage::ProgramChange(MIDI_CHANNEL, cycle.timbre.program()))
            .await;
    }
    if cycle.changes.contains(Changes::Volume) {
        midi.send(MidiMessage::ControlChange(
            MIDI_CHANNEL,
            ControlFunction::MAIN_VOLUME,
            cycle.volume.control_value(),
        ))
        .await;
    }
    for event in cycle.events.iter() {
        let note = event.note.note();
        let message = match event.action {
            KeyAction::Press => {
                MidiMessage::NoteOn(MIDI_CHANNEL, note, U7::from_u8_lossy(NOTE_ON_VELOCITY))
            }
            KeyAction::Release => MidiMessage::NoteOff(MIDI_CHANNEL, note, U7::from_u8_lossy(0)),
        };
        midi.send(message).await;
    }
}

/// Task responsible for writing queued MIDI messages to the sound module.
#[embassy_executor::task]
pub async fn sound(mut uart: UartTx<'static, Async>, midi: MidiReceiver<'static>) -> ! {
    // no channel message is longer than three bytes
    let mut buf = [0u8; 3];
    loop {
        let message = midi.receive().await;
        let Ok(len) = message.copy_to_slice(&mut buf) else {
            warn!("Skipping MIDI message of {} bytes", message.bytes_size());
            continue;
        };

        debug!("Sending MIDI {=[u8]:02x}", &buf[..len]);
        if let Err(e) = uart.write(&buf[..len]).await {
            warn!("MIDI write failed: {}", e);
        }
    }
}
