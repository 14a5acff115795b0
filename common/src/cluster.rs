//! The gauge pipeline driven by the host loop.
//!
//! Every loop iteration the host calls [`Cluster::service_backlight`] and
//! [`Cluster::service_telemetry`] with the current millisecond counter. The
//! telemetry path runs at most once per [`TELEMETRY_INTERVAL_MS`]:
//! sample, smooth, evaluate, and draw only when the value moved.

use crate::backlight::{BacklightController, simulated_headlight};
use crate::config::GaugeConfig;
use crate::filter::FilterState;
use crate::gauge::{Evaluation, Zone, ZoneThresholds, evaluate};
use crate::render::{GaugeCanvas, RenderCoordinator};
use crate::schedule::{IntervalTimer, TELEMETRY_INTERVAL_MS};
use crate::status::{StatusLine, StatusReporter};
use crate::telemetry::{AnalogInput, JitterSource, Sample, TelemetrySource};
use crate::web::ConfigEvent;

/// What one telemetry tick did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    /// Raw values, `None` when the sensor produced nothing this tick.
    pub sample: Option<Sample>,
    pub pressure: Option<Evaluation>,
    pub coolant_zone: Option<Zone>,
    pub needle_redrawn: bool,
    pub coolant_redrawn: bool,
    /// Due once per second.
    pub status: Option<StatusLine>,
}

impl TickReport {
    const EMPTY: Self = Self {
        sample: None,
        pressure: None,
        coolant_zone: None,
        needle_redrawn: false,
        coolant_redrawn: false,
        status: None,
    };
}

pub struct Cluster<J> {
    boot_ms: u32,
    telemetry: TelemetrySource<J>,
    filter: FilterState,
    renderer: RenderCoordinator,
    backlight: BacklightController,
    telemetry_timer: IntervalTimer,
    status: StatusReporter,
}

impl<J: JitterSource> Cluster<J> {
    pub fn new(
        config: &GaugeConfig,
        headlight_input: bool,
        now_ms: u32,
        jitter: J,
    ) -> Self {
        let headlight = if config.use_simulated_headlight { simulated_headlight(0) } else { headlight_input };
        Self {
            boot_ms: now_ms,
            telemetry: TelemetrySource::new(config, jitter),
            filter: FilterState::new(),
            renderer: RenderCoordinator::new(),
            backlight: BacklightController::new(headlight, config),
            telemetry_timer: IntervalTimer::new(TELEMETRY_INTERVAL_MS, now_ms),
            status: StatusReporter::new(now_ms),
        }
    }

    #[inline]
    pub fn elapsed_ms(
        &self,
        now_ms: u32,
    ) -> u32 {
        now_ms.wrapping_sub(self.boot_ms)
    }

    #[inline]
    pub const fn filter(&self) -> &FilterState { &self.filter }

    #[inline]
    pub const fn telemetry(&self) -> &TelemetrySource<J> { &self.telemetry }

    #[inline]
    pub const fn backlight(&self) -> &BacklightController { &self.backlight }

    /// Direct renderer access for the boot splash and sweep.
    #[inline]
    pub fn renderer_mut(&mut self) -> &mut RenderCoordinator { &mut self.renderer }

    /// Draw the static face for the current configuration.
    pub fn draw_face<C: GaugeCanvas>(
        &mut self,
        canvas: &mut C,
        config: &GaugeConfig,
    ) {
        self.renderer.draw_face(canvas, config);
    }

    /// Advance the backlight fade. Returns the PWM duty.
    pub fn service_backlight(
        &mut self,
        headlight_input: bool,
        now_ms: u32,
        config: &GaugeConfig,
    ) -> u8 {
        let headlight = if config.use_simulated_headlight {
            simulated_headlight(self.elapsed_ms(now_ms))
        } else {
            headlight_input
        };
        self.backlight.update(headlight, now_ms, config)
    }

    /// Run the telemetry path when its interval has elapsed.
    ///
    /// Returns `None` when the tick is not due yet.
    pub fn service_telemetry<C: GaugeCanvas, A: AnalogInput>(
        &mut self,
        canvas: &mut C,
        adc: &mut A,
        now_ms: u32,
        config: &GaugeConfig,
    ) -> Option<TickReport> {
        if !self.telemetry_timer.poll(now_ms) {
            return None;
        }

        let elapsed = self.elapsed_ms(now_ms);
        let Some(sample) = self.telemetry.sample(elapsed, adc, config) else {
            return Some(TickReport::EMPTY);
        };

        self.filter.update(&sample, config);
        let pressure = self.filter.pressure;
        let temperature = self.filter.temperature;

        let eval = evaluate(pressure, &ZoneThresholds::pressure(config), self.renderer.pressure_gate());
        let needle_redrawn = self.renderer.draw_pressure(canvas, &eval);

        let coolant_zone = ZoneThresholds::temperature(config).classify(temperature);
        let coolant_redrawn = self.renderer.draw_coolant(canvas, temperature, coolant_zone);

        let status = self.status.poll(
            now_ms,
            StatusLine { pressure, zone: eval.zone, temperature, sensor: sample.sensor },
        );

        Some(TickReport {
            sample: Some(sample),
            pressure: Some(eval),
            coolant_zone: Some(coolant_zone),
            needle_redrawn,
            coolant_redrawn,
            status,
        })
    }

    /// Rebuild sources and redraw the face after the configuration changed.
    pub fn reconfigure<C: GaugeCanvas>(
        &mut self,
        canvas: &mut C,
        config: &GaugeConfig,
    ) {
        self.telemetry.reconfigure(config);
        self.renderer.draw_face(canvas, config);
    }

    /// React to a config request. Failed writes change nothing.
    pub fn apply_event<C: GaugeCanvas>(
        &mut self,
        canvas: &mut C,
        event: &ConfigEvent,
        config: &GaugeConfig,
    ) {
        if event.applied() {
            self.reconfigure(canvas, config);
        }
    }
}
