//! Maps the instrument's state onto the needles of its three analog meters.

use crate::{
    calibration::MeterCalibration,
    configuration::Octave,
    scale::{DEGREE_CNT, ScaleDegree},
    throttle::Volume,
};
use measurements::Angle;

/// Linearly maps `value` from the range `from` onto the angles `to`, clamping to the ends of `to`.
///
/// The angle range may run in either direction; meters are often mounted so that higher values turn the needle
/// counterclockwise.
pub fn interpolate(value: i32, from: (i32, i32), to: (f64, f64)) -> Angle {
    let (min, max) = from;
    let (at_min, at_max) = to;
    let progress = if max == min {
        0.0
    } else {
        ((f64::from(value) - f64::from(min)) / (f64::from(max) - f64::from(min))).clamp(0.0, 1.0)
    };
    Angle::from_degrees(at_min + progress * (at_max - at_min))
}

/// Needle positions for one cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ServoAngles {
    /// Octave meter.
    pub octave: Angle,
    /// Key meter; points at the degree being played.
    pub key: Angle,
    /// Volume meter.
    pub volume: Angle,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ServoAngles {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "ServoAngles {{ octave: {}°, key: {}°, volume: {}° }}",
            self.octave.as_degrees(),
            self.key.as_degrees(),
            self.volume.as_degrees()
        );
    }
}

/// Converts octaves, degrees and volumes to meter angles according to a [`MeterCalibration`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayMapper {
    octaves: [Angle; 3],
    /// Precomputed, since there are only seven of them.
    keys: [Angle; DEGREE_CNT],
    volume_0: f64,
    volume_100: f64,
}

impl DisplayMapper {
    /// Constructs a [`DisplayMapper`].
    pub fn new(calibration: &MeterCalibration) -> Self {
        let keys_to = (f64::from(calibration.key_c), f64::from(calibration.key_b));
        let last_degree = (DEGREE_CNT - 1) as i32;

        Self {
            octaves: calibration
                .octaves
                .map(|degrees| Angle::from_degrees(f64::from(degrees))),
            keys: ScaleDegree::ALL
                .map(|degree| interpolate(degree.index() as i32, (0, last_degree), keys_to)),
            volume_0: f64::from(calibration.volume_0),
            volume_100: f64::from(calibration.volume_100),
        }
    }

    /// Octaves only come in three sizes, so their marks are looked up rather than interpolated.
    pub fn octave_angle(&self, octave: Octave) -> Angle {
        self.octaves[octave.index()]
    }

    /// Getter.
    pub fn key_angle(&self, degree: ScaleDegree) -> Angle {
        self.keys[degree.index()]
    }

    /// Maps a volume percentage to the volume meter. Values outside 0-100 pin the needle to the nearest mark.
    pub fn volume_angle(&self, percent: i32) -> Angle {
        interpolate(percent, (0, 100), (self.volume_0, self.volume_100))
    }

    /// Computes all three needle positions.
    pub fn angles(&self, octave: Octave, degree: ScaleDegree, volume: Volume) -> ServoAngles {
        ServoAngles {
            octave: self.octave_angle(octave),
            key: self.key_angle(degree),
            volume: self.volume_angle(i32::from(volume.percent())),
        }
    }
}

impl Default for DisplayMapper {
    fn default() -> Self {
        Self::new(&MeterCalibration::DEFAULT)
    }
}
