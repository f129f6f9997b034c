//! Debounces the stream of selected scale degrees into discrete key presses and releases.
//!
//! The fret bank reports a degree every cycle, whether or not it changed. Each degree has a small state machine
//! that turns this level into edges, so a held degree produces exactly one note-on and its release exactly one
//! note-off.

use crate::scale::{DEGREE_CNT, ScaleDegree};
use tinyvec::ArrayVec;

/// Whether a degree is sounding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyState {
    /// Not sounding.
    #[default]
    Off,
    /// Triggered during the current cycle.
    On1,
    /// Sounding since an earlier cycle; must not be retriggered.
    On2,
}

/// An edge emitted by a [`KeyState`] transition.
///
/// `Default` exists only because [`tinyvec`] requires it of the items it stores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// The degree started sounding.
    #[default]
    Press,
    /// The degree stopped sounding.
    Release,
}

impl KeyState {
    /// Computes the next state given whether the degree is selected this cycle, along with the edge (if any) the
    /// transition emits.
    pub const fn next(self, selected: bool) -> (KeyState, Option<KeyAction>) {
        match (self, selected) {
            (Self::Off, true) => (Self::On1, Some(KeyAction::Press)),
            (Self::On1 | Self::On2, true) => (Self::On2, None),
            (Self::On1 | Self::On2, false) => (Self::Off, Some(KeyAction::Release)),
            (Self::Off, false) => (Self::Off, None),
        }
    }

    /// Returns `true` for [`KeyState::On1`] and [`KeyState::On2`].
    pub const fn is_on(self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// A press or release of one degree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    /// The degree pressed or released.
    pub degree: ScaleDegree,
    /// What happened to it.
    pub action: KeyAction,
}

/// The edges produced by one cycle. Every degree but the selected one can release, and only the selected one can
/// press, so one slot per degree is always enough.
pub type KeyEvents = ArrayVec<[KeyEvent; DEGREE_CNT]>;

/// One [`KeyState`] per [`ScaleDegree`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyBank {
    states: [KeyState; DEGREE_CNT],
}

impl KeyBank {
    /// Constructs a [`KeyBank`] with every degree off.
    pub const fn new() -> Self {
        Self {
            states: [KeyState::Off; DEGREE_CNT],
        }
    }

    /// Getter.
    pub fn state(&self, degree: ScaleDegree) -> KeyState {
        self.states[degree.index()]
    }

    /// Advances every degree's state machine by one cycle, C through B. `None` selects nothing, releasing every
    /// sounding degree.
    ///
    /// Releases are reported before the press, so a monophonic sound module never sees two overlapping notes.
    pub fn advance(&mut self, selected: Option<ScaleDegree>) -> KeyEvents {
        let mut events = KeyEvents::new();
        let mut press = None;

        for degree in ScaleDegree::ALL {
            let state = &mut self.states[degree.index()];
            let (next, action) = state.next(selected == Some(degree));
            *state = next;

            match action {
                Some(KeyAction::Release) => events.push(KeyEvent {
                    degree,
                    action: KeyAction::Release,
                }),
                Some(KeyAction::Press) => press = Some(degree),
                None => (),
            }
        }

        if let Some(degree) = press {
            events.push(KeyEvent {
                degree,
                action: KeyAction::Press,
            });
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(degree: ScaleDegree) -> KeyEvent {
        KeyEvent {
            degree,
            action: KeyAction::Press,
        }
    }

    fn release(degree: ScaleDegree) -> KeyEvent {
        KeyEvent {
            degree,
            action: KeyAction::Release,
        }
    }

    #[test]
    fn transitions() {
        assert_eq!((KeyState::On1, Some(KeyAction::Press)), KeyState::Off.next(true));
        assert_eq!((KeyState::On2, None), KeyState::On1.next(true));
        assert_eq!((KeyState::On2, None), KeyState::On2.next(true));
        assert_eq!((KeyState::Off, Some(KeyAction::Release)), KeyState::On1.next(false));
        assert_eq!((KeyState::Off, Some(KeyAction::Release)), KeyState::On2.next(false));
        assert_eq!((KeyState::Off, None), KeyState::Off.next(false));
    }

    #[test]
    fn press_hold_release() {
        let mut bank = KeyBank::new();

        assert!(bank.advance(None).is_empty(), "Nothing selected yet");

        assert_eq!(&[press(ScaleDegree::G)], bank.advance(Some(ScaleDegree::G)).as_slice());
        assert_eq!(KeyState::On1, bank.state(ScaleDegree::G));

        assert!(
            bank.advance(Some(ScaleDegree::G)).is_empty(),
            "Holding a degree should not retrigger it"
        );
        assert_eq!(KeyState::On2, bank.state(ScaleDegree::G));

        assert_eq!(&[release(ScaleDegree::G)], bank.advance(None).as_slice());
        assert_eq!(KeyState::Off, bank.state(ScaleDegree::G));
    }

    #[test]
    fn moving_between_degrees_releases_before_pressing() {
        let mut bank = KeyBank::new();
        bank.advance(Some(ScaleDegree::E));

        // the press of the lower degree is still reported after the release of the higher one
        assert_eq!(
            &[release(ScaleDegree::E), press(ScaleDegree::C)],
            bank.advance(Some(ScaleDegree::C)).as_slice(),
            "Expected left but got right"
        );
        assert_eq!(
            &[release(ScaleDegree::C), press(ScaleDegree::B)],
            bank.advance(Some(ScaleDegree::B)).as_slice(),
            "Expected left but got right"
        );
    }

    #[test]
    fn single_frame_glitch_costs_one_retrigger() {
        let mut bank = KeyBank::new();
        let frames = [
            Some(ScaleDegree::D),
            Some(ScaleDegree::D),
            Some(ScaleDegree::E),
            Some(ScaleDegree::D),
            Some(ScaleDegree::D),
        ];
        let presses = frames
            .iter()
            .flat_map(|&frame| bank.advance(frame))
            .filter(|event| event.action == KeyAction::Press)
            .count();
        assert_eq!(3, presses, "Expected left but got right");
    }

    #[test]
    fn release_all() {
        let mut bank = KeyBank::new();
        bank.advance(Some(ScaleDegree::A));
        bank.advance(Some(ScaleDegree::A));
        assert_eq!(&[release(ScaleDegree::A)], bank.advance(None).as_slice());
        assert!(ScaleDegree::ALL.iter().all(|&degree| !bank.state(degree).is_on()));
    }
}
