//! Converts the steering channel into scale degrees.
//!
//! Much like the frets of a guitar, a set of fixed boundaries turns a continuous position into discrete notes. Steering
//! all the way to one side plays C and all the way to the other plays B; the wheel at rest plays F.

use crate::{
    calibration::StickCalibration,
    pulse::PulseWidth,
    scale::{DEGREE_CNT, ScaleDegree},
};

/// The number of boundaries needed to split the steering range into one band per [`ScaleDegree`].
pub const FRET_CNT: usize = DEGREE_CNT - 1;

/// Fret boundaries derived from a [`StickCalibration`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FretBank {
    /// Pulse widths in microseconds, in ascending order.
    thresholds: [u16; FRET_CNT],
}

impl FretBank {
    /// Places frets at `neutral ± k * amplitude / 6` for `k` in `1..=3`.
    ///
    /// A validated [`StickCalibration`] keeps the outermost frets within its range and at least 1µs apart, so the
    /// frets are strictly increasing and every degree has a band of its own.
    pub fn new(calibration: &StickCalibration) -> Self {
        let neutral = u32::from(calibration.neutral());
        let offset = |k: u32| u32::from(calibration.amplitude()) * k / 6;

        let thresholds = [-3, -2, -1, 1, 2, 3].map(|k: i32| {
            let fret = if k < 0 {
                neutral - offset(k.unsigned_abs())
            } else {
                neutral + offset(k.unsigned_abs())
            };
            u16::try_from(fret).unwrap_or(u16::MAX)
        });

        Self { thresholds }
    }

    /// Getter.
    pub fn thresholds(&self) -> &[u16; FRET_CNT] {
        &self.thresholds
    }

    /// Returns the [`ScaleDegree`] whose band contains `pulse`.
    ///
    /// A pulse landing exactly on a fret belongs to the band below it. Pulses beyond the outermost frets, however far,
    /// play the outermost degrees.
    pub fn degree_for(&self, pulse: PulseWidth) -> ScaleDegree {
        let pulse = pulse.as_micros();
        ScaleDegree::from_index(self.thresholds.partition_point(|&fret| fret < pulse))
    }
}

impl Default for FretBank {
    fn default() -> Self {
        Self::new(&StickCalibration::DEFAULT)
    }
}
