//! Resolves a scale degree into a concrete pitch, given the performer's selections.

use crate::{
    configuration::{KeySignature, Octave},
    scale::{Accidental, ScaleDegree},
    throttle::Volume,
    timbre::Timbre,
};
use wmidi::{Note, U7};

/// A fully specified note, ready for the sound module.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResolvedNote {
    /// Which degree of the scale is played.
    pub degree: ScaleDegree,
    /// Alteration applied by the key signature.
    pub accidental: Accidental,
    /// Octave in which the degree is played.
    pub octave: Octave,
    /// Volume at the time the note was resolved.
    pub volume: Volume,
    /// Instrument playing the note.
    pub timbre: Timbre,
}

/// Resolves `degree` into a [`ResolvedNote`] by applying the accidental `key_signature` dictates for it.
///
/// Pure; the same inputs always resolve to the same note.
pub fn resolve(
    degree: ScaleDegree,
    key_signature: KeySignature,
    octave: Octave,
    timbre: Timbre,
    volume: Volume,
) -> ResolvedNote {
    ResolvedNote {
        degree,
        accidental: key_signature.accidental(degree),
        octave,
        volume,
        timbre,
    }
}

impl ResolvedNote {
    /// MIDI note number of the pitch, where C4 is 60.
    ///
    /// Accidentals are applied arithmetically, so C flat 4 is B3 and E sharp 4 is F4.
    pub fn midi_number(&self) -> u8 {
        let natural = 12 * (self.octave.number() + 1) + self.degree.semitones();
        natural.saturating_add_signed(self.accidental.semitones())
    }

    /// The pitch as a [`Note`].
    pub fn note(&self) -> Note {
        Note::from(U7::from_u8_lossy(self.midi_number()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(degree: ScaleDegree, key_signature: KeySignature, octave: Octave) -> ResolvedNote {
        resolve(degree, key_signature, octave, Timbre::default(), Volume::MAX)
    }

    #[test]
    fn f_in_g_major_is_f_sharp() {
        let resolved = note(ScaleDegree::F, KeySignature::from_index(7), Octave::Four);
        assert_eq!(Accidental::Sharp, resolved.accidental, "Expected left but got right");
        assert_eq!(66, resolved.midi_number(), "Expected left but got right");
    }

    #[test]
    fn middle_c() {
        assert_eq!(60, note(ScaleDegree::C, KeySignature::C, Octave::Four).midi_number());
        assert_eq!(Note::C4, note(ScaleDegree::C, KeySignature::C, Octave::Four).note());
    }

    #[test]
    fn octaves_are_twelve_semitones_apart() {
        let low = note(ScaleDegree::A, KeySignature::C, Octave::Three);
        let high = note(ScaleDegree::A, KeySignature::C, Octave::Five);
        assert_eq!(Note::A3, low.note());
        assert_eq!(Note::A5, high.note());
    }

    #[test]
    fn accidentals_cross_octave_boundaries() {
        // G flat major flattens C, which lands on the B below
        let c_flat = note(ScaleDegree::C, KeySignature::GFlat, Octave::Four);
        assert_eq!(Note::B3, c_flat.note());

        // F sharp major sharpens E, which lands on F
        let e_sharp = note(ScaleDegree::E, KeySignature::FSharp, Octave::Four);
        assert_eq!(Note::F4, e_sharp.note());
        assert_eq!(
            note(ScaleDegree::F, KeySignature::C, Octave::Four).midi_number(),
            e_sharp.midi_number(),
            "E sharp should sound the same as F"
        );
    }

    #[test]
    fn resolve_carries_volume_and_timbre() {
        let resolved = resolve(
            ScaleDegree::B,
            KeySignature::BFlat,
            Octave::Five,
            Timbre::Flute,
            Volume::new(30),
        );
        assert_eq!(
            ResolvedNote {
                degree: ScaleDegree::B,
                accidental: Accidental::Flat,
                octave: Octave::Five,
                volume: Volume::new(30),
                timbre: Timbre::Flute,
            },
            resolved,
            "Expected left but got right"
        );
    }
}
