//! Reads the auxiliary channels as switches.
//!
//! On the transmitter these are two-position switches rather than proportional controls, so a single threshold is
//! enough and no hysteresis is applied. AUX1 picks the [timbre family](crate::timbre::Family); AUX2 shifts the
//! octave up by one.

use crate::{calibration::AuxCalibration, pulse::PulseWidth};

/// Binarizes an auxiliary channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AuxSwitch {
    calibration: AuxCalibration,
}

impl AuxSwitch {
    /// Constructs an [`AuxSwitch`].
    pub const fn new(calibration: AuxCalibration) -> Self {
        Self { calibration }
    }

    /// Returns `true` if the pulse lies strictly above `neutral + threshold`.
    pub fn bool_for(&self, pulse: PulseWidth) -> bool {
        pulse.as_micros() > self.calibration.neutral.saturating_add(self.calibration.threshold)
    }

    /// Like [`bool_for`](Self::bool_for), but a missing pulse reads as off.
    ///
    /// Losing an auxiliary channel is not considered a loss of signal; the instrument keeps playing with the switch
    /// in its default position.
    pub fn read(&self, pulse: Option<PulseWidth>) -> bool {
        pulse.is_some_and(|pulse| self.bool_for(pulse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_exclusive() {
        let switch = AuxSwitch::default();
        assert!(!switch.bool_for(PulseWidth::from_micros(1750)));
        assert!(switch.bool_for(PulseWidth::from_micros(1751)));
    }

    #[test]
    fn neutral_and_low_are_off() {
        let switch = AuxSwitch::default();
        assert!(!switch.bool_for(PulseWidth::from_micros(1100)));
        assert!(!switch.bool_for(PulseWidth::from_micros(1500)));
        assert!(switch.bool_for(PulseWidth::from_micros(1900)));
    }

    #[test]
    fn missing_pulse_is_off() {
        let switch = AuxSwitch::default();
        assert!(!switch.read(None));
        assert!(switch.read(Some(PulseWidth::from_micros(1900))));
    }
}
