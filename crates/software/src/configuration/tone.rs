use num_derive::{FromPrimitive, ToPrimitive};

/// Selects one of the four instruments within a [timbre family](crate::timbre::Family).
///
/// The family itself is chosen from the transmitter (see [`crate::aux_switch`]), so a single pushbutton and a
/// switch on the transmitter together reach all eight [`Timbre`](crate::timbre::Timbre)s.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tone {
    /// Grand piano or church organ.
    #[default]
    First,
    /// Tinkle bell or flute.
    Second,
    /// Nylon guitar or rock organ.
    Third,
    /// Harpsichord or harmonica.
    Fourth,
}

impl Tone {
    /// Position within the family, starting from zero.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl super::CycleConfig for Tone {}
