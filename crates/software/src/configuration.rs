//! This module contains the performer's selections (implemented as enums) and traits to make them easier to work with in code.
//!
//! Each selection is made with a pushbutton on the instrument, so every one of them can be cycled.

mod key_signature;
pub use key_signature::*;

mod octave;
pub use octave::*;

mod tone;
pub use tone::*;

use num_traits::{FromPrimitive, ToPrimitive};

/// A trait which allows infinite cycling of an enum's variants.
///
/// Each press of a selector button advances to the next variant, wrapping back to the first after the last.
pub trait CycleConfig {
    /// Return the next variant, wrapping around as needed.
    fn cycle(self) -> Self
    where
        Self: FromPrimitive + ToPrimitive + Sized,
    {
        self.to_u8()
            .and_then(|index| Self::from_u8(index.saturating_add(1)))
            .or_else(|| Self::from_u8(0))
            .expect("selections should have at least one variant")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle() {
        let config = Tone::First.cycle();
        assert_eq!(
            Tone::Second,
            config,
            "Should advance to next variant; expected left but got right"
        );

        let config = config.cycle().cycle();
        assert_eq!(
            Tone::Fourth,
            config,
            "Should advance to next variant; expected left but got right"
        );

        let config = config.cycle();
        assert_eq!(
            Tone::First,
            config,
            "Should wrap around to first variant; expected left but got right"
        );
    }

    #[test]
    fn octave_cycle_wraps_to_lowest() {
        assert_eq!(Octave::Four, Octave::Three.cycle());
        assert_eq!(Octave::Three, Octave::Five.cycle());
    }
}
