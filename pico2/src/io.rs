//! Sender ADC and backlight PWM.

use embassy_rp::Peri;
use embassy_rp::adc::{self, Adc, Blocking, Channel};
use embassy_rp::gpio::Pull;
use embassy_rp::peripherals::{ADC, PIN_20, PIN_26, PWM_SLICE2};
use embassy_rp::pwm::{self, Pwm};
use gauge_common::AnalogInput;

/// Oil pressure sender behind the divider on GPIO26 (ADC0).
pub struct AdcSender<'d> {
    adc: Adc<'d, Blocking>,
    channel: Channel<'d>,
}

impl<'d> AdcSender<'d> {
    pub fn new(
        adc: Peri<'d, ADC>,
        pin: Peri<'d, PIN_26>,
    ) -> Self {
        Self { adc: Adc::new_blocking(adc, adc::Config::default()), channel: Channel::new_pin(pin, Pull::None) }
    }
}

impl AnalogInput for AdcSender<'_> {
    fn read_raw(&mut self) -> Option<u16> { self.adc.blocking_read(&mut self.channel).ok() }
}

/// Panel backlight on GPIO20, 8-bit duty.
pub struct PwmBacklight<'d> {
    pwm: Pwm<'d>,
    config: pwm::Config,
    duty: u8,
}

impl<'d> PwmBacklight<'d> {
    pub fn new(
        slice: Peri<'d, PWM_SLICE2>,
        pin: Peri<'d, PIN_20>,
        duty: u8,
    ) -> Self {
        let mut config = pwm::Config::default();
        config.top = u8::MAX as u16;
        config.compare_a = duty as u16;
        Self { pwm: Pwm::new_output_a(slice, pin, config.clone()), config, duty }
    }

    #[inline]
    pub const fn duty(&self) -> u8 { self.duty }

    pub fn set_duty(
        &mut self,
        duty: u8,
    ) {
        if duty == self.duty {
            return;
        }
        self.duty = duty;
        self.config.compare_a = duty as u16;
        self.pwm.set_config(&self.config);
    }
}
