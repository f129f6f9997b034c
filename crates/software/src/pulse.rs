//! Types for pulse widths delivered by an RC receiver, and a helper for measuring them from edge timestamps.

use core::ops::RangeInclusive;
use embassy_time::{Duration, Instant};

/// Widths outside of this window cannot have come from a servo-style RC signal and are discarded as glitches.
///
/// Anything inside the window but outside a channel's calibration is still considered a signal; it is merely
/// clamped by the decoders.
pub const PLAUSIBLE_PULSE_US: RangeInclusive<u16> = 800..=2200;

/// The width of a single RC pulse, in microseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseWidth(u16);

impl PulseWidth {
    /// Constructs a [`PulseWidth`] from a number of microseconds.
    pub const fn from_micros(micros: u16) -> Self {
        Self(micros)
    }

    /// Getter.
    pub const fn as_micros(&self) -> u16 {
        self.0
    }

    /// Returns `true` if the width is one an RC receiver could plausibly produce.
    pub fn is_plausible(&self) -> bool {
        PLAUSIBLE_PULSE_US.contains(&self.0)
    }
}

impl From<Duration> for PulseWidth {
    /// Saturates at [`u16::MAX`] microseconds; any such value is implausible anyway.
    fn from(duration: Duration) -> Self {
        Self(u16::try_from(duration.as_micros()).unwrap_or(u16::MAX))
    }
}

/// One snapshot of every RC channel, taken before a decode cycle begins.
///
/// `None` means no (plausible) pulse was detected on that channel within the expected window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channels {
    /// Steering (ST); selects the scale degree.
    pub steering: Option<PulseWidth>,
    /// Throttle (TH); sets the volume.
    pub throttle: Option<PulseWidth>,
    /// First auxiliary channel; selects the timbre family.
    pub aux1: Option<PulseWidth>,
    /// Second auxiliary channel; shifts the octave up.
    pub aux2: Option<PulseWidth>,
}

/// Measures pulse widths from the timestamps of rising and falling edges.
#[derive(Clone, Copy, Debug, Default)]
pub struct PulseCapture {
    rising: Option<Instant>,
}

impl PulseCapture {
    /// Constructs a [`PulseCapture`] with no edge recorded.
    pub const fn new() -> Self {
        Self { rising: None }
    }

    /// Records the start of a pulse.
    pub fn rising_edge(&mut self, at: Instant) {
        self.rising = Some(at);
    }

    /// Records the end of a pulse, returning its width if it was plausible.
    ///
    /// A falling edge without a preceding rising edge (e.g., the capture started mid-pulse) yields `None`.
    pub fn falling_edge(&mut self, at: Instant) -> Option<PulseWidth> {
        let start = self.rising.take()?;
        let width = PulseWidth::from(at.checked_duration_since(start)?);
        width.is_plausible().then_some(width)
    }

    /// Forgets any pending rising edge, e.g., after a timeout.
    pub fn reset(&mut self) {
        self.rising = None;
    }
}
