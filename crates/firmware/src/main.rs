//! RadiOrgan is [Embassy](https://embassy.dev)-based firmware that turns a hobby radio-control transmitter into a
//! musical instrument. The firmware runs on the [Nucleo-F767ZI development
//! board](https://www.st.com/en/evaluation-tools/nucleo-f767zi.html), which is powered by an F7-series STM32
//! microcontroller.
//!
//! The board sits where a servo would normally plug into the RC receiver. Steering picks a note of the scale,
//! the throttle trigger sets the volume and the two auxiliary switches pick the instrument family and raise the
//! octave. Notes go out as serial MIDI to a General MIDI sound module, while three servo-driven meters show the
//! octave, key and volume, and an LED shows whether the transmitter is in range.
//!
//! The decoding itself lives in `radiorgan_lib`; this crate only wires it to the hardware.

#![no_std]
#![no_main]

mod capture;
mod control;
mod meters;
mod selector;
mod sound;

use crate::{control::Inputs, meters::Meters};
use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::{
    Config,
    exti::ExtiInput,
    gpio::{Level, Output, OutputType, Pull, Speed},
    time::Hertz,
    timer::{
        low_level::CountingMode,
        simple_pwm::{PwmPin, SimplePwm},
    },
    usart::{self, UartTx},
};

use {defmt_rtt as _, panic_probe as _};

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Initializing RadiOrgan");

    let mut config = Config::default();
    {
        use embassy_stm32::rcc::*;
        // hse: high-speed external clock, supplied by the on-board ST-LINK
        config.rcc.hse = Some(Hse {
            freq: Hertz(8_000_000),
            mode: HseMode::Bypass,
        });

        // pll: phase-locked loop, crucial for dividing clock
        config.rcc.pll_src = PllSource::HSE;
        config.rcc.pll = Some(Pll {
            prediv: PllPreDiv::DIV4,
            mul: PllMul::MUL216,
            divp: Some(PllPDiv::DIV2), // 8mhz / 4 * 216 / 2 = 216Mhz
            divq: None,
            divr: None,
        });
        config.rcc.ahb_pre = AHBPrescaler::DIV1;
        config.rcc.apb1_pre = APBPrescaler::DIV4;
        config.rcc.apb2_pre = APBPrescaler::DIV2;
        config.rcc.sys = Sysclk::PLL1_P;
    }
    let p = embassy_stm32::init(config);

    // RC receiver channels; each line needs an EXTI channel of its own
    let steering = ExtiInput::new(p.PE9, p.EXTI9, Pull::Down);
    unwrap!(spawner.spawn(capture::capture(steering, "ST", capture::STEERING.sender())));
    let throttle = ExtiInput::new(p.PE11, p.EXTI11, Pull::Down);
    unwrap!(spawner.spawn(capture::capture(throttle, "TH", capture::THROTTLE.sender())));
    let aux1 = ExtiInput::new(p.PF14, p.EXTI14, Pull::Down);
    unwrap!(spawner.spawn(capture::capture(aux1, "AUX1", capture::AUX1.sender())));
    let aux2 = ExtiInput::new(p.PF15, p.EXTI15, Pull::Down);
    unwrap!(spawner.spawn(capture::capture(aux2, "AUX2", capture::AUX2.sender())));

    // the blue user button on the Nucleo board has its own pull-down
    let button = ExtiInput::new(p.PC13, p.EXTI13, Pull::None);
    unwrap!(spawner.spawn(selector::select_key_signature(
        button,
        selector::KEY_SIGNATURE_SYNC.sender()
    )));
    let button = ExtiInput::new(p.PD1, p.EXTI1, Pull::Down);
    unwrap!(spawner.spawn(selector::select_octave(
        button,
        selector::OCTAVE_SYNC.sender()
    )));
    let button = ExtiInput::new(p.PG2, p.EXTI2, Pull::Down);
    unwrap!(spawner.spawn(selector::select_tone(button, selector::TONE_SYNC.sender())));

    // per RM0410, USART2 TX is available on port D, pin 5 and served by DMA1 stream 6
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = sound::MIDI_BAUD_RATE;
    let uart = unwrap!(UartTx::new(p.USART2, p.PD5, p.DMA1_CH6, uart_config));
    unwrap!(spawner.spawn(sound::sound(uart, sound::MIDI_QUEUE.receiver())));

    // TIM3 channels 1 through 3 drive the octave, key and volume meters respectively
    let pwm = SimplePwm::new(
        p.TIM3,
        Some(PwmPin::new(p.PA6, OutputType::PushPull)),
        Some(PwmPin::new(p.PC7, OutputType::PushPull)),
        Some(PwmPin::new(p.PC8, OutputType::PushPull)),
        None,
        Hertz(meters::SERVO_HZ),
        CountingMode::EdgeAlignedUp,
    );
    let channels = pwm.split();
    let meters = Meters::new(channels.ch1, channels.ch2, channels.ch3);

    // the green user LED doubles as the reception indicator
    let led = Output::new(p.PB0, Level::Low, Speed::Low);

    unwrap!(spawner.spawn(control::control(
        Inputs::new(),
        meters,
        led,
        sound::MIDI_QUEUE.sender()
    )));
}
