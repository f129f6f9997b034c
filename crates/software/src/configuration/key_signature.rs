use crate::scale::{Accidental, DEGREE_CNT, ScaleDegree};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;

use Accidental::{Flat as F, Natural as N, Sharp as S};

/// Accidentals applied to each [`ScaleDegree`], indexed by [`KeySignature`] (rows) and degree (columns).
pub const KEY_TABLE: [[Accidental; DEGREE_CNT]; 13] = [
    // C  D  E  F  G  A  B
    [F, F, F, N, F, F, F], // G flat major
    [N, F, F, N, F, F, F], // D flat major
    [N, F, F, N, N, F, F], // A flat major
    [N, N, F, N, N, F, F], // E flat major
    [N, N, F, N, N, N, F], // B flat major
    [N, N, N, N, N, N, F], // F major
    [N, N, N, N, N, N, N], // C major
    [N, N, N, S, N, N, N], // G major
    [S, N, N, S, N, N, N], // D major
    [S, N, N, S, S, N, N], // A major
    [S, S, N, S, S, N, N], // E major
    [S, S, N, S, S, S, N], // B major
    [S, S, S, S, S, S, N], // F sharp major
];

/// The major key the instrument plays in, ordered from flattest to sharpest.
///
/// Variants are named after the tonic; each maps to a row of [`KEY_TABLE`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeySignature {
    /// Six flats.
    GFlat,
    /// Five flats.
    DFlat,
    /// Four flats.
    AFlat,
    /// Three flats.
    EFlat,
    /// Two flats.
    BFlat,
    /// One flat.
    F,
    /// No accidentals.
    #[default]
    C,
    /// One sharp.
    G,
    /// Two sharps.
    D,
    /// Three sharps.
    A,
    /// Four sharps.
    E,
    /// Five sharps.
    B,
    /// Six sharps.
    FSharp,
}

impl KeySignature {
    /// Returns the key signature at the given row of [`KEY_TABLE`], clamping indices past the sharpest key.
    pub fn from_index(index: u8) -> Self {
        Self::from_u8(index).unwrap_or(Self::FSharp)
    }

    /// Row of [`KEY_TABLE`] belonging to this key signature.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Looks up the accidental this key signature applies to `degree`.
    pub const fn accidental(self, degree: ScaleDegree) -> Accidental {
        KEY_TABLE[self.index()][degree.index()]
    }
}

impl super::CycleConfig for KeySignature {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::CycleConfig;

    #[test]
    fn g_major_sharpens_f() {
        assert_eq!(
            Accidental::Sharp,
            KeySignature::from_index(7).accidental(ScaleDegree::F),
            "Expected left but got right"
        );
        assert_eq!(KeySignature::G, KeySignature::from_index(7));
    }

    #[test]
    fn c_major_is_all_naturals() {
        for degree in ScaleDegree::ALL {
            assert_eq!(Accidental::Natural, KeySignature::C.accidental(degree));
        }
    }

    #[test]
    fn accidental_count_matches_key() {
        let counts = KEY_TABLE.map(|row| {
            row.iter()
                .map(|accidental| accidental.semitones())
                .sum::<i8>()
        });
        assert_eq!(
            [-6, -5, -4, -3, -2, -1, 0, 1, 2, 3, 4, 5, 6],
            counts,
            "Each step should add one sharp or remove one flat"
        );
    }

    #[test]
    fn out_of_range_index_clamps() {
        assert_eq!(KeySignature::FSharp, KeySignature::from_index(13));
        assert_eq!(KeySignature::FSharp, KeySignature::from_index(u8::MAX));
    }

    #[test]
    fn cycle_wraps_from_sharpest_to_flattest() {
        assert_eq!(KeySignature::GFlat, KeySignature::FSharp.cycle());
    }
}
