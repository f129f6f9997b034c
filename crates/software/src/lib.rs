//! This crate contains architecture-agnostic logic for the RadiOrgan, a device which turns a hobby radio-control (RC)
//! transmitter into a musical instrument. Pulse widths captured from an RC receiver are decoded into notes of a
//! diatonic scale, transposed into a selectable key, and expressed as [MIDI](https://midi.org/midi-1-0) events for
//! a General MIDI sound module, while three analog meters (octave, key, volume) are driven by hobby servos.
//!
//! The [`organ::Organ`] pipeline ties the pieces together; each of its stages also lives in a module of its own so
//! it can be reasoned about (and tested) in isolation.

#![deny(missing_docs)]
#![no_std]

pub mod aux_switch;
pub mod calibration;
pub mod configuration;
pub mod display;
pub mod fret;
pub mod key_state;
pub mod note;
pub mod organ;
pub mod pulse;
pub mod scale;
pub mod throttle;
pub mod timbre;
