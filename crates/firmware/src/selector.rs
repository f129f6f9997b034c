//! Tasks and types related to the push-buttons the performer uses to pick a key, an octave and a tone.

use defmt::info;
use embassy_stm32::exti::ExtiInput;
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    watch::{AnonReceiver, Sender, Watch},
};
use num_traits::{FromPrimitive, ToPrimitive};
use radiorgan_lib::configuration::{CycleConfig, KeySignature, Octave, Tone};

const SELECTION_RECEIVER_CNT: usize = 0;
pub type SelectionSync<T> = Watch<CriticalSectionRawMutex, T, SELECTION_RECEIVER_CNT>;
pub type SelectionSender<'a, T> = Sender<'a, CriticalSectionRawMutex, T, SELECTION_RECEIVER_CNT>;
pub type SelectionSpy<'a, T> = AnonReceiver<'a, CriticalSectionRawMutex, T, SELECTION_RECEIVER_CNT>;

/// Syncs the selected [`KeySignature`] across tasks.
pub static KEY_SIGNATURE_SYNC: SelectionSync<KeySignature> = Watch::new_with(KeySignature::C);
/// Syncs the selected [`Octave`] across tasks.
pub static OCTAVE_SYNC: SelectionSync<Octave> = Watch::new_with(Octave::Four);
/// Syncs the selected [`Tone`] across tasks.
pub static TONE_SYNC: SelectionSync<Tone> = Watch::new_with(Tone::First);

/// Waits for a press, then publishes and returns the selection following the current one.
async fn cycle_on_press<T>(button: &mut ExtiInput<'static>, selection: &SelectionSender<'static, T>) -> T
where
    T: Clone + Default + CycleConfig + FromPrimitive + ToPrimitive,
{
    button.wait_for_rising_edge().await;

    let next = selection.try_get().unwrap_or_default().cycle();
    selection.send(next.clone());
    next
}

/// Handles button presses, cycling through the [`KeySignature`]s from six flats to six sharps.
#[embassy_executor::task]
pub async fn select_key_signature(
    mut button: ExtiInput<'static>,
    key_signature: SelectionSender<'static, KeySignature>,
) -> ! {
    loop {
        let selected = cycle_on_press(&mut button, &key_signature).await;
        info!("Key signature: {}", selected);
    }
}

/// Handles button presses, cycling through the [`Octave`]s.
#[embassy_executor::task]
pub async fn select_octave(
    mut button: ExtiInput<'static>,
    octave: SelectionSender<'static, Octave>,
) -> ! {
    loop {
        let selected = cycle_on_press(&mut button, &octave).await;
        info!("Octave: {}", selected.number());
    }
}

/// Handles button presses, cycling through the [`Tone`]s. The instrument family itself is chosen from the
/// transmitter.
#[embassy_executor::task]
pub async fn select_tone(mut button: ExtiInput<'static>, tone: SelectionSender<'static, Tone>) -> ! {
    loop {
        let selected = cycle_on_press(&mut button, &tone).await;
        info!("Tone: {}", selected);
    }
}
