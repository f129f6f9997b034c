//! The diatonic scale the instrument plays from.

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;

/// The number of degrees in the diatonic scale.
pub const DEGREE_CNT: usize = 7;

/// A degree of the C major scale, i.e., a white key on a piano. Accidentals are applied separately.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScaleDegree {
    /// Do
    #[default]
    C,
    /// Re
    D,
    /// Mi
    E,
    /// Fa
    F,
    /// Sol
    G,
    /// La
    A,
    /// Ti
    B,
}

impl ScaleDegree {
    /// Every degree, lowest to highest.
    pub const ALL: [ScaleDegree; DEGREE_CNT] = [
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::A,
        Self::B,
    ];

    /// Returns the degree at the given position in the scale, clamping indices past the last degree to [`ScaleDegree::B`].
    pub fn from_index(index: usize) -> Self {
        Self::from_usize(index).unwrap_or(Self::B)
    }

    /// Position of the degree in the scale, starting from zero.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Distance in semitones above C.
    pub const fn semitones(self) -> u8 {
        match self {
            Self::C => 0,
            Self::D => 2,
            Self::E => 4,
            Self::F => 5,
            Self::G => 7,
            Self::A => 9,
            Self::B => 11,
        }
    }

    /// Note name.
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
            Self::A => "A",
            Self::B => "B",
        }
    }
}

/// Alteration applied to a [`ScaleDegree`] by a key signature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Accidental {
    /// One semitone down.
    Flat,
    /// Unaltered.
    #[default]
    Natural,
    /// One semitone up.
    Sharp,
}

impl Accidental {
    /// Offset in semitones.
    pub const fn semitones(self) -> i8 {
        match self {
            Self::Flat => -1,
            Self::Natural => 0,
            Self::Sharp => 1,
        }
    }

    /// Symbol appended to a note name; empty for [`Accidental::Natural`].
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::Flat => "b",
            Self::Natural => "",
            Self::Sharp => "#",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_index_clamps() {
        assert_eq!(ScaleDegree::C, ScaleDegree::from_index(0));
        assert_eq!(ScaleDegree::F, ScaleDegree::from_index(3));
        assert_eq!(ScaleDegree::B, ScaleDegree::from_index(6));
        assert_eq!(
            ScaleDegree::B,
            ScaleDegree::from_index(42),
            "Out-of-range index should clamp to the highest degree"
        );
    }

    #[test]
    fn all_is_in_index_order() {
        for (i, degree) in ScaleDegree::ALL.iter().enumerate() {
            assert_eq!(i, degree.index(), "Expected left but got right");
        }
    }

    #[test]
    fn semitones_follow_major_scale() {
        let steps: [u8; DEGREE_CNT] = ScaleDegree::ALL.map(ScaleDegree::semitones);
        assert_eq!([0, 2, 4, 5, 7, 9, 11], steps, "Expected left but got right");
    }
}
