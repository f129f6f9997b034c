//! The decoding pipeline: one snapshot of the receiver in, one set of instructions for the sound module and meters out.
//!
//! The pipeline runs once per control cycle. Everything it needs across cycles (the key states and the notes they
//! started) lives in [`Organ`]; everything else is derived afresh from the snapshot, so a glitch never outlives the
//! cycle after it.

use crate::{
    aux_switch::AuxSwitch,
    calibration::Calibration,
    configuration::{KeySignature, Octave, Tone},
    display::{DisplayMapper, ServoAngles},
    fret::FretBank,
    key_state::{KeyAction, KeyBank, KeyEvent},
    note::{ResolvedNote, resolve},
    pulse::Channels,
    scale::{DEGREE_CNT, ScaleDegree},
    throttle::{Throttle, Volume},
    timbre::{Family, Timbre},
};
use bitmask_enum::bitmask;
use tinyvec::ArrayVec;

/// Everything the pipeline reads in one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlInput {
    /// Pulse widths captured from the receiver.
    pub channels: Channels,
    /// Key selected on the instrument.
    pub key_signature: KeySignature,
    /// Octave selected on the instrument, before any shift from AUX2.
    pub octave: Octave,
    /// Tone selected on the instrument.
    pub tone: Tone,
}

/// Whether the receiver is delivering a usable signal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SignalStatus {
    /// Steering and throttle pulses are both arriving.
    Valid,
    /// At least one of steering or throttle is missing; nothing sounds until it returns.
    #[default]
    Lost,
}

impl SignalStatus {
    /// Returns `true` for [`SignalStatus::Valid`].
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Aspects of the output that differ from the previous cycle.
#[bitmask(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Changes {
    /// At least one note started or stopped.
    Notes,
    /// A different instrument was selected.
    Timbre,
    /// The volume changed.
    Volume,
    /// The signal was lost or recovered.
    Signal,
}

/// A note starting or stopping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoteEvent {
    /// [`KeyAction::Press`] for note-on, [`KeyAction::Release`] for note-off.
    pub action: KeyAction,
    /// The note. For a note-off, this is the very note that was started, even if the selections have changed since.
    pub note: ResolvedNote,
}

/// Note events produced by a single cycle, note-offs first.
pub type NoteEvents = ArrayVec<[NoteEvent; DEGREE_CNT]>;

/// The result of one cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cycle {
    /// Notes to start or stop.
    pub events: NoteEvents,
    /// Volume to apply to whatever is sounding.
    pub volume: Volume,
    /// Instrument to play with.
    pub timbre: Timbre,
    /// Octave in effect, after any shift from AUX2.
    pub octave: Octave,
    /// Degree selected by the steering channel, if the signal is valid.
    pub degree: Option<ScaleDegree>,
    /// Meter needle positions.
    pub angles: ServoAngles,
    /// State of the reception indicator.
    pub signal: SignalStatus,
    /// What differs from the previous cycle.
    pub changes: Changes,
}

/// The state carried from one cycle to the next.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Organ {
    fret_bank: FretBank,
    throttle: Throttle,
    aux: AuxSwitch,
    display: DisplayMapper,
    keys: KeyBank,
    /// Notes started by each degree, so they can be stopped exactly.
    sounding: [Option<ResolvedNote>; DEGREE_CNT],
    /// The key meter keeps pointing here while the signal is lost.
    last_degree: ScaleDegree,
    /// `None` until the first cycle, so that everything counts as changed on the first cycle.
    previous: Option<(Timbre, Volume, SignalStatus)>,
}

impl Organ {
    /// Constructs an [`Organ`] with every key off, deriving the frets and meter marks from `calibration`.
    pub fn new(calibration: &Calibration) -> Self {
        Self {
            fret_bank: FretBank::new(&calibration.steering),
            throttle: Throttle::new(calibration.throttle, calibration.strings_min_volume),
            aux: AuxSwitch::new(calibration.aux),
            display: DisplayMapper::new(&calibration.meters),
            keys: KeyBank::new(),
            sounding: [None; DEGREE_CNT],
            last_degree: ScaleDegree::F,
            previous: None,
        }
    }

    /// Runs one decode cycle.
    ///
    /// A missing steering or throttle pulse is a loss of signal: every sounding note is stopped and the volume drops
    /// to zero until both return.
    pub fn tick(&mut self, input: &ControlInput) -> Cycle {
        let Channels {
            steering,
            throttle,
            aux1,
            aux2,
        } = input.channels;

        let timbre = Timbre::select(Family::from_switch(self.aux.read(aux1)), input.tone);
        let octave = if self.aux.read(aux2) {
            input.octave.up()
        } else {
            input.octave
        };

        let (signal, degree, volume) = match (steering, throttle) {
            (Some(steering), Some(throttle)) => (
                SignalStatus::Valid,
                Some(self.fret_bank.degree_for(steering)),
                self.throttle
                    .apply_floor(self.throttle.volume_for(throttle), timbre),
            ),
            _ => (SignalStatus::Lost, None, Volume::SILENT),
        };
        if let Some(degree) = degree {
            self.last_degree = degree;
        }

        let mut events = NoteEvents::new();
        for KeyEvent { degree, action } in self.keys.advance(degree) {
            let slot = &mut self.sounding[degree.index()];
            let note = match action {
                KeyAction::Press => {
                    let note = resolve(degree, input.key_signature, octave, timbre, volume);
                    *slot = Some(note);
                    note
                }
                // a released degree was always pressed first, but resolving afresh beats dropping the note-off
                KeyAction::Release => slot
                    .take()
                    .unwrap_or_else(|| resolve(degree, input.key_signature, octave, timbre, volume)),
            };
            events.push(NoteEvent { action, note });
        }

        let mut changes = Changes::none();
        if !events.is_empty() {
            changes |= Changes::Notes;
        }
        match self.previous {
            Some((previous_timbre, previous_volume, previous_signal)) => {
                if previous_timbre != timbre {
                    changes |= Changes::Timbre;
                }
                if previous_volume != volume {
                    changes |= Changes::Volume;
                }
                if previous_signal != signal {
                    changes |= Changes::Signal;
                }
            }
            None => changes |= Changes::Timbre | Changes::Volume | Changes::Signal,
        }
        self.previous = Some((timbre, volume, signal));

        Cycle {
            events,
            volume,
            timbre,
            octave,
            degree,
            angles: self.display.angles(octave, self.last_degree, volume),
            signal,
            changes,
        }
    }

    /// Returns the notes currently sounding, lowest degree first.
    pub fn sounding(&self) -> impl Iterator<Item = ResolvedNote> + '_ {
        self.sounding.iter().flatten().copied()
    }
}

impl Default for Organ {
    fn default() -> Self {
        Self::new(&Calibration::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pulse::PulseWidth, scale::Accidental};

    const NEUTRAL: Option<PulseWidth> = Some(PulseWidth::from_micros(1500));
    const IDLE: Option<PulseWidth> = Some(PulseWidth::from_micros(1363));
    const HALF_THROTTLE: Option<PulseWidth> = Some(PulseWidth::from_micros(1608));
    const SWITCH_ON: Option<PulseWidth> = Some(PulseWidth::from_micros(1900));

    fn input(steering: Option<PulseWidth>, throttle: Option<PulseWidth>) -> ControlInput {
        ControlInput {
            channels: Channels {
                steering,
                throttle,
                aux1: None,
                aux2: None,
            },
            ..Default::default()
        }
    }

    fn steer(micros: u16) -> ControlInput {
        input(Some(PulseWidth::from_micros(micros)), HALF_THROTTLE)
    }

    fn actions(cycle: &Cycle) -> ArrayVec<[(KeyAction, ScaleDegree); DEGREE_CNT]> {
        cycle
            .events
            .iter()
            .map(|event| (event.action, event.note.degree))
            .collect()
    }

    #[test]
    fn key_state_round_trip() {
        let mut organ = Organ::default();
        let off = input(None, None);
        let on = input(NEUTRAL, HALF_THROTTLE);

        assert!(organ.tick(&off).events.is_empty(), "Nothing should sound without a signal");

        let first = organ.tick(&on);
        assert_eq!(&[(KeyAction::Press, ScaleDegree::F)], actions(&first).as_slice());

        let held = organ.tick(&on);
        assert!(held.events.is_empty(), "Holding should not retrigger");
        assert!(!held.changes.contains(Changes::Notes));

        let released = organ.tick(&off);
        assert_eq!(&[(KeyAction::Release, ScaleDegree::F)], actions(&released).as_slice());
        assert_eq!(first.events[0].note, released.events[0].note, "Note-off should match note-on");
    }

    #[test]
    fn signal_loss_releases_everything() {
        let mut organ = Organ::default();
        organ.tick(&steer(1900));
        organ.tick(&steer(1900));
        assert_eq!(1, organ.sounding().count());

        for lost in [input(None, HALF_THROTTLE), input(NEUTRAL, None), input(None, None)] {
            let mut organ = organ;
            let cycle = organ.tick(&lost);
            assert_eq!(SignalStatus::Lost, cycle.signal);
            assert_eq!(Volume::SILENT, cycle.volume);
            assert_eq!(None, cycle.degree);
            assert_eq!(&[(KeyAction::Release, ScaleDegree::B)], actions(&cycle).as_slice());
            assert!(cycle.changes.contains(Changes::Signal));
            assert_eq!(0, organ.sounding().count(), "Every note should be off after one lost cycle");
        }
    }

    #[test]
    fn signal_recovers_on_next_valid_cycle() {
        let mut organ = Organ::default();
        organ.tick(&steer(1100));
        organ.tick(&input(None, None));

        let recovered = organ.tick(&steer(1100));
        assert_eq!(SignalStatus::Valid, recovered.signal);
        assert!(recovered.changes.contains(Changes::Signal));
        assert_eq!(&[(KeyAction::Press, ScaleDegree::C)], actions(&recovered).as_slice());
    }

    #[test]
    fn sliding_releases_before_pressing() {
        let mut organ = Organ::default();
        organ.tick(&steer(1100));
        let cycle = organ.tick(&steer(1500));
        assert_eq!(
            &[(KeyAction::Release, ScaleDegree::C), (KeyAction::Press, ScaleDegree::F)],
            actions(&cycle).as_slice(),
            "Expected left but got right"
        );
    }

    #[test]
    fn note_off_matches_note_on_across_selection_changes() {
        let mut organ = Organ::default();
        let mut g_major = steer(1500);
        g_major.key_signature = KeySignature::G;
        let pressed = organ.tick(&g_major);
        assert_eq!(Accidental::Sharp, pressed.events[0].note.accidental);

        let mut c_major_up = steer(1100);
        c_major_up.octave = Octave::Five;
        let cycle = organ.tick(&c_major_up);

        assert_eq!(pressed.events[0].note, cycle.events[0].note, "Note-off should carry the F sharp 4 that was started");
        assert_eq!(Octave::Five, cycle.events[1].note.octave);
        assert_eq!(Accidental::Natural, cycle.events[1].note.accidental);
    }

    #[test]
    fn aux_switches_select_family_and_shift_octave() {
        let mut organ = Organ::default();
        let mut switched = steer(1500);
        switched.channels.aux1 = SWITCH_ON;
        switched.channels.aux2 = SWITCH_ON;
        switched.tone = Tone::Second;

        let cycle = organ.tick(&switched);
        assert_eq!(Timbre::Flute, cycle.timbre);
        assert_eq!(Octave::Five, cycle.octave);
        assert_eq!(Octave::Five, cycle.events[0].note.octave);
    }

    #[test]
    fn string_instruments_get_minimum_volume() {
        let mut organ = Organ::default();
        let barely = input(NEUTRAL, Some(PulseWidth::from_micros(1374)));
        assert_eq!(Volume::new(3), organ.tick(&barely).volume, "Piano should be raised to the floor");

        let mut wind = barely;
        wind.channels.aux1 = SWITCH_ON;
        let cycle = organ.tick(&wind);
        assert_eq!(Volume::new(1), cycle.volume, "Organ should not be raised");
        assert!(cycle.changes.contains(Changes::Timbre));
        assert!(cycle.changes.contains(Changes::Volume));

        assert_eq!(Volume::SILENT, organ.tick(&input(NEUTRAL, IDLE)).volume);
    }

    #[test]
    fn first_cycle_reports_everything_changed() {
        let mut organ = Organ::default();
        let first = organ.tick(&input(None, None));
        assert!(first.changes.contains(Changes::Timbre | Changes::Volume | Changes::Signal));
        assert!(!first.changes.contains(Changes::Notes));

        let second = organ.tick(&input(None, None));
        assert!(second.changes.is_none(), "Nothing changed");
    }

    #[test]
    fn meters_follow_selection_and_hold_key_while_lost() {
        let mut organ = Organ::default();
        let display = DisplayMapper::default();

        let playing = organ.tick(&steer(1900));
        assert_eq!(display.key_angle(ScaleDegree::B), playing.angles.key);
        assert_eq!(display.octave_angle(Octave::Four), playing.angles.octave);
        assert_eq!(display.volume_angle(50), playing.angles.volume);

        let lost = organ.tick(&input(None, None));
        assert_eq!(display.key_angle(ScaleDegree::B), lost.angles.key);
        assert_eq!(display.volume_angle(0), lost.angles.volume);
    }
}
