use num_derive::{FromPrimitive, ToPrimitive};

/// The octave from which notes are played, in scientific pitch notation (middle C is C4).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Octave {
    /// The octave below middle C.
    Three,
    /// The octave starting at middle C.
    #[default]
    Four,
    /// The octave above middle C.
    Five,
}

impl Octave {
    /// Returns the [`Octave`] with the given number, clamping to the nearest supported one.
    pub fn from_number(number: u8) -> Self {
        match number {
            ..=3 => Self::Three,
            4 => Self::Four,
            5.. => Self::Five,
        }
    }

    /// Octave number in scientific pitch notation.
    pub const fn number(self) -> u8 {
        self as u8 + 3
    }

    /// Position among the supported octaves, starting from zero.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the octave above, or this one if there is none.
    pub fn up(self) -> Self {
        Self::from_number(self.number() + 1)
    }
}

impl super::CycleConfig for Octave {}
