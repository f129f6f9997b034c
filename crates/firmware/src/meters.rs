//! Drives the hobby servos that move the needles of the octave, key and volume meters.

use embassy_stm32::{peripherals::TIM3, timer::simple_pwm::SimplePwmChannel};
use measurements::Angle;
use radiorgan_lib::display::ServoAngles;

/// Hobby servos expect a new position every 20ms.
pub const SERVO_HZ: u32 = 50;

const PERIOD_US: f64 = 1_000_000.0 / SERVO_HZ as f64;
const PULSE_AT_0_DEG_US: f64 = 500.0;
const PULSE_AT_180_DEG_US: f64 = 2500.0;

/// Converts an angle to the duty cycle that holds a servo there, given the timer's full-scale duty cycle.
///
/// Angles beyond the servo's 0-180° travel are clamped rather than sent on to strain the gears.
pub fn angle_to_duty(angle: Angle, max_duty: u16) -> u16 {
    let degrees = angle.as_degrees().clamp(0.0, 180.0);
    let pulse_us = PULSE_AT_0_DEG_US + degrees / 180.0 * (PULSE_AT_180_DEG_US - PULSE_AT_0_DEG_US);
    (pulse_us / PERIOD_US * f64::from(max_duty)) as u16
}

/// The three meters, each on its own channel of the same timer.
pub struct Meters {
    octave: SimplePwmChannel<'static, TIM3>,
    key: SimplePwmChannel<'static, TIM3>,
    volume: SimplePwmChannel<'static, TIM3>,
}

impl Meters {
    pub fn new(
        mut octave: SimplePwmChannel<'static, TIM3>,
        mut key: SimplePwmChannel<'static, TIM3>,
        mut volume: SimplePwmChannel<'static, TIM3>,
    ) -> Self {
        octave.enable();
        key.enable();
        volume.enable();
        Self {
            octave,
            key,
            volume,
        }
    }

    /// Moves every needle to its angle for this cycle.
    pub fn show(&mut self, angles: &ServoAngles) {
        for (channel, angle) in [
            (&mut self.octave, angles.octave),
            (&mut self.key, angles.key),
            (&mut self.volume, angles.volume),
        ] {
            let duty = angle_to_duty(angle, channel.max_duty_cycle());
            channel.set_duty_cycle(duty);
        }
    }
}
