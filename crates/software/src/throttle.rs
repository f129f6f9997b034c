//! Converts the throttle channel into a volume.

use crate::{calibration::ThrottleCalibration, pulse::PulseWidth, timbre::Timbre};
use wmidi::{ControlValue, U7};

/// Loudness as a percentage of the sound module's full scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Volume(u8);

impl Volume {
    /// No sound at all.
    pub const SILENT: Self = Self(0);
    /// Full volume.
    pub const MAX: Self = Self(100);

    /// Constructs a [`Volume`], clamping `percent` to 100.
    pub const fn new(percent: u8) -> Self {
        if percent > 100 { Self::MAX } else { Self(percent) }
    }

    /// Getter.
    pub const fn percent(&self) -> u8 {
        self.0
    }

    /// Returns `true` for [`Volume::SILENT`].
    pub const fn is_silent(&self) -> bool {
        self.0 == 0
    }

    /// Scales the volume to the 0-127 range of a MIDI controller.
    pub fn control_value(&self) -> ControlValue {
        U7::from_u8_lossy((u16::from(self.0) * 127 / 100) as u8)
    }
}

/// Decodes the throttle channel.
///
/// Resting the trigger (within the dead-band) is silence. Pulling toward the accelerator or pushing toward the brake
/// both get louder, each side scaled by its own amplitude so that both reach full volume at full throw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Throttle {
    calibration: ThrottleCalibration,
    strings_min_volume: Volume,
}

impl Throttle {
    /// Constructs a [`Throttle`]. `strings_min_volume` is the quietest a string instrument may play.
    pub fn new(calibration: ThrottleCalibration, strings_min_volume: u8) -> Self {
        Self {
            calibration,
            strings_min_volume: Volume::new(strings_min_volume),
        }
    }

    /// Returns the [`Volume`] for a throttle pulse, without regard to the instrument.
    ///
    /// Any pulse outside the dead-band yields at least 1%, so a pulled trigger is never mistaken for a resting one.
    pub fn volume_for(&self, pulse: PulseWidth) -> Volume {
        let ThrottleCalibration {
            neutral,
            accelerator_amplitude,
            brake_amplitude,
            play,
            ..
        } = self.calibration;
        let pulse = pulse.as_micros();

        let (travel, amplitude) = if pulse > neutral.saturating_add(play) {
            (pulse - neutral - play, accelerator_amplitude)
        } else if pulse < neutral.saturating_sub(play) {
            (neutral - play - pulse, brake_amplitude)
        } else {
            return Volume::SILENT;
        };

        let span = u32::from(amplitude.saturating_sub(play).max(1));
        let percent = (u32::from(travel) * 100).div_ceil(span).min(100);
        Volume::new(percent as u8)
    }

    /// Raises the volume of a sounding string instrument to the configured minimum.
    ///
    /// Plucked and struck instruments decay, and a note started too quietly stays inaudible even once the volume is
    /// raised. Silence is left alone, as are wind instruments.
    pub fn apply_floor(&self, volume: Volume, timbre: Timbre) -> Volume {
        if timbre.is_string() && !volume.is_silent() {
            volume.max(self.strings_min_volume)
        } else {
            volume
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(ThrottleCalibration::DEFAULT, 3)
    }
}
