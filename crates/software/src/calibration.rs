//! Pulse-width and meter calibrations, measured on the actual transmitter and instrument.
//!
//! Calibrations are immutable once constructed. The `DEFAULT` constants match the hardware this firmware was
//! developed against; the validating constructors exist for anyone tuning the instrument to other equipment.

use core::fmt;

/// Reasons a calibration may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    /// The pulse widths are not ordered `min < neutral < max`.
    Unordered,
    /// An amplitude, threshold or dead-band is zero, or reaches past the channel's range.
    Amplitude,
    /// The minimum volume for string instruments is not a percentage.
    Volume,
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unordered => f.write_str("pulse widths must satisfy min < neutral < max"),
            Self::Amplitude => f.write_str("amplitude must be non-zero and within the channel's range"),
            Self::Volume => f.write_str("minimum volume must not exceed 100"),
        }
    }
}

impl core::error::Error for CalibrationError {}

fn check_order(min: u16, neutral: u16, max: u16) -> Result<(), CalibrationError> {
    if min < neutral && neutral < max {
        Ok(())
    } else {
        Err(CalibrationError::Unordered)
    }
}

/// Calibration of a proportional channel with a symmetric throw, i.e., the steering channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StickCalibration {
    min: u16,
    neutral: u16,
    max: u16,
    amplitude: u16,
}

impl StickCalibration {
    /// Calibration of the transmitter used during development.
    pub const DEFAULT: Self = Self {
        min: 1100,
        neutral: 1500,
        max: 1900,
        amplitude: 400,
    };

    /// Constructs a [`StickCalibration`], validating it.
    ///
    /// The frets span half the amplitude on either side of neutral in steps of a sixth, so the amplitude must be at
    /// least 6µs and half of it must fit on both sides.
    pub fn new(min: u16, neutral: u16, max: u16, amplitude: u16) -> Result<Self, CalibrationError> {
        check_order(min, neutral, max)?;
        if amplitude < 6 || amplitude / 2 > neutral - min || amplitude / 2 > max - neutral {
            return Err(CalibrationError::Amplitude);
        }
        Ok(Self {
            min,
            neutral,
            max,
            amplitude,
        })
    }

    /// Pulse width at full left, in microseconds.
    pub const fn min(&self) -> u16 {
        self.min
    }

    /// Pulse width with the stick (or wheel) at rest.
    pub const fn neutral(&self) -> u16 {
        self.neutral
    }

    /// Pulse width at full right.
    pub const fn max(&self) -> u16 {
        self.max
    }

    /// Distance from neutral to either extreme used for playing.
    pub const fn amplitude(&self) -> u16 {
        self.amplitude
    }
}

impl Default for StickCalibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Calibration of the throttle, which on a pistol-grip transmitter has a longer throw toward the accelerator than
/// toward the brake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThrottleCalibration {
    /// Pulse width at full brake, in microseconds.
    pub min: u16,
    /// Pulse width with the trigger at rest.
    pub neutral: u16,
    /// Pulse width at full accelerator.
    pub max: u16,
    /// Distance from neutral to full accelerator.
    pub accelerator_amplitude: u16,
    /// Distance from neutral to full brake.
    pub brake_amplitude: u16,
    /// Half-width of the dead-band around neutral.
    pub play: u16,
}

impl ThrottleCalibration {
    /// Measured on the development transmitter in its 7:3 (accelerator:brake) mode.
    pub const DEFAULT: Self = Self {
        min: 1050,
        neutral: 1363,
        max: 1850,
        accelerator_amplitude: 480,
        brake_amplitude: 310,
        play: 10,
    };

    /// Constructs a [`ThrottleCalibration`], validating it.
    ///
    /// Both amplitudes must exceed the dead-band, and must not reach past `max` and `min` respectively.
    pub fn new(
        min: u16,
        neutral: u16,
        max: u16,
        accelerator_amplitude: u16,
        brake_amplitude: u16,
        play: u16,
    ) -> Result<Self, CalibrationError> {
        check_order(min, neutral, max)?;
        if accelerator_amplitude <= play
            || brake_amplitude <= play
            || accelerator_amplitude > max - neutral
            || brake_amplitude > neutral - min
        {
            return Err(CalibrationError::Amplitude);
        }
        Ok(Self {
            min,
            neutral,
            max,
            accelerator_amplitude,
            brake_amplitude,
            play,
        })
    }
}

impl Default for ThrottleCalibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Calibration of an auxiliary channel, which is read as an on/off switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AuxCalibration {
    /// Pulse width of the switch's neutral (or center) position.
    pub neutral: u16,
    /// How far above neutral a pulse must be for the switch to read as on.
    pub threshold: u16,
}

impl AuxCalibration {
    /// Calibration of the transmitter used during development.
    pub const DEFAULT: Self = Self {
        neutral: 1500,
        threshold: 250,
    };

    /// Constructs an [`AuxCalibration`], validating it.
    pub fn new(neutral: u16, threshold: u16) -> Result<Self, CalibrationError> {
        if threshold == 0 || neutral.checked_add(threshold).is_none() {
            return Err(CalibrationError::Amplitude);
        }
        Ok(Self { neutral, threshold })
    }
}

impl Default for AuxCalibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Angles (in degrees) at which the meter servos' needles point to the printed scale marks.
///
/// These were trimmed by hand against the meter faces, hence the odd values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeterCalibration {
    /// Octave meter marks for octaves 3, 4 and 5.
    pub octaves: [u8; 3],
    /// Key meter mark for C.
    pub key_c: u8,
    /// Key meter mark for B.
    pub key_b: u8,
    /// Volume meter mark for silence.
    pub volume_0: u8,
    /// Volume meter mark for full volume.
    pub volume_100: u8,
}

impl MeterCalibration {
    /// Calibration of the meters on the development instrument.
    pub const DEFAULT: Self = Self {
        octaves: [120 - 2, 90 - 2, 60 - 2],
        key_c: 150,
        key_b: 35,
        volume_0: 130,
        volume_100: 25,
    };
}

impl Default for MeterCalibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Every calibration the instrument needs, along with tuning constants that are not tied to one channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// Steering channel (ST).
    pub steering: StickCalibration,
    /// Throttle channel (TH).
    pub throttle: ThrottleCalibration,
    /// Both auxiliary channels.
    pub aux: AuxCalibration,
    /// Meter servos.
    pub meters: MeterCalibration,
    /// The quietest a string instrument may play once it plays at all, as a percentage.
    pub strings_min_volume: u8,
}

impl Calibration {
    /// Calibration of the development instrument.
    pub const DEFAULT: Self = Self {
        steering: StickCalibration::DEFAULT,
        throttle: ThrottleCalibration::DEFAULT,
        aux: AuxCalibration::DEFAULT,
        meters: MeterCalibration::DEFAULT,
        strings_min_volume: 3,
    };

    /// Replaces the string minimum volume, validating it.
    pub fn with_strings_min_volume(self, strings_min_volume: u8) -> Result<Self, CalibrationError> {
        if strings_min_volume > 100 {
            return Err(CalibrationError::Volume);
        }
        Ok(Self {
            strings_min_volume,
            ..self
        })
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}
