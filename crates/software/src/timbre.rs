//! The instruments the sound module is asked to play.

use crate::configuration::Tone;
use wmidi::{ProgramNumber, U7};

/// Broad category of instrument, selected from the transmitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Family {
    /// Plucked or struck instruments, whose notes decay.
    #[default]
    String,
    /// Blown instruments (organs count), whose notes sustain.
    Wind,
}

impl Family {
    /// Maps the AUX1 switch to a family; on selects [`Family::Wind`].
    pub const fn from_switch(on: bool) -> Self {
        if on { Self::Wind } else { Self::String }
    }
}

/// An instrument of the General MIDI sound set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Timbre {
    /// Acoustic Grand Piano
    #[default]
    GrandPiano,
    /// Tinkle Bell
    TinkleBell,
    /// Acoustic Guitar (nylon)
    NylonGuitar,
    /// Harpsichord
    Harpsichord,
    /// Church Organ
    ChurchOrgan,
    /// Flute
    Flute,
    /// Rock Organ
    RockOrgan,
    /// Harmonica
    Harmonica,
}

/// Every [`Timbre`], string instruments first, in [`Tone`] order within each family.
pub const TONE_TABLE: [Timbre; 8] = [
    Timbre::GrandPiano,
    Timbre::TinkleBell,
    Timbre::NylonGuitar,
    Timbre::Harpsichord,
    Timbre::ChurchOrgan,
    Timbre::Flute,
    Timbre::RockOrgan,
    Timbre::Harmonica,
];

impl Timbre {
    /// Looks up the [`Timbre`] for a family and tone.
    pub const fn select(family: Family, tone: Tone) -> Self {
        let offset = match family {
            Family::String => 0,
            Family::Wind => 4,
        };
        TONE_TABLE[offset + tone.index()]
    }

    /// Getter.
    pub const fn family(self) -> Family {
        match self {
            Self::GrandPiano | Self::TinkleBell | Self::NylonGuitar | Self::Harpsichord => {
                Family::String
            }
            Self::ChurchOrgan | Self::Flute | Self::RockOrgan | Self::Harmonica => Family::Wind,
        }
    }

    /// Returns `true` for instruments of [`Family::String`].
    pub const fn is_string(self) -> bool {
        matches!(self.family(), Family::String)
    }

    /// General MIDI program number (zero-based, as transmitted).
    pub fn program(self) -> ProgramNumber {
        let program = match self {
            Self::GrandPiano => 0,
            Self::TinkleBell => 112,
            Self::NylonGuitar => 24,
            Self::Harpsichord => 6,
            Self::ChurchOrgan => 19,
            Self::Flute => 73,
            Self::RockOrgan => 18,
            Self::Harmonica => 22,
        };
        U7::from_u8_lossy(program)
    }
}
