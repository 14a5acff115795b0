//! Gauge face and needle rendering.
//!
//! # Partial Redraw
//!
//! The panel has no framebuffer readback, so a needle move is done in place:
//!
//! 1. Erase the old needle with a wider triangle in the face color.
//! 2. Restore every decoration the eraser can overlap (ticks, numerals,
//!    legends, hub).
//! 3. Draw the new needle and the digital readout in the zone color.
//!
//! The order is fixed. Restoring after the new needle would paint numerals
//! over it; skipping the restore leaves holes in the face.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle, Triangle};
use embedded_graphics::text::Text;
use heapless::String;

use crate::colors::{ACCENT_COLOR, FACE_COLOR, NEEDLE_COLOR, TEXT_COLOR, WARNING_COLOR};
use crate::config::GaugeConfig;
use crate::gauge::{Evaluation, RedrawGate, Zone, needle_base, needle_tip, polar_point, value_to_angle};
use crate::layout::*;
use crate::styles::{CENTERED_TOP, TextSize};

// =============================================================================
// Canvas
// =============================================================================

/// The drawing operations the gauge needs.
///
/// Implemented for every `DrawTarget<Color = Rgb565>`; draw errors are
/// dropped the same way for all of them.
pub trait GaugeCanvas {
    fn line(
        &mut self,
        from: Point,
        to: Point,
        color: Rgb565,
    );

    fn circle(
        &mut self,
        center: Point,
        radius: u32,
        color: Rgb565,
    );

    fn fill_circle(
        &mut self,
        center: Point,
        radius: u32,
        color: Rgb565,
    );

    fn fill_triangle(
        &mut self,
        a: Point,
        b: Point,
        c: Point,
        color: Rgb565,
    );

    fn fill_rect(
        &mut self,
        top_left: Point,
        size: Size,
        color: Rgb565,
    );

    fn rect(
        &mut self,
        top_left: Point,
        size: Size,
        color: Rgb565,
    );

    /// Draw `text` horizontally centered on `anchor`, glyph tops at `anchor.y`.
    fn text(
        &mut self,
        text: &str,
        anchor: Point,
        size: TextSize,
        color: Rgb565,
    );
}

#[inline]
fn diameter(radius: u32) -> u32 { radius * 2 + 1 }

impl<D> GaugeCanvas for D
where
    D: DrawTarget<Color = Rgb565>,
{
    fn line(
        &mut self,
        from: Point,
        to: Point,
        color: Rgb565,
    ) {
        Line::new(from, to).into_styled(PrimitiveStyle::with_stroke(color, 1)).draw(self).ok();
    }

    fn circle(
        &mut self,
        center: Point,
        radius: u32,
        color: Rgb565,
    ) {
        Circle::with_center(center, diameter(radius))
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(self)
            .ok();
    }

    fn fill_circle(
        &mut self,
        center: Point,
        radius: u32,
        color: Rgb565,
    ) {
        Circle::with_center(center, diameter(radius))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(self)
            .ok();
    }

    fn fill_triangle(
        &mut self,
        a: Point,
        b: Point,
        c: Point,
        color: Rgb565,
    ) {
        Triangle::new(a, b, c).into_styled(PrimitiveStyle::with_fill(color)).draw(self).ok();
    }

    fn fill_rect(
        &mut self,
        top_left: Point,
        size: Size,
        color: Rgb565,
    ) {
        Rectangle::new(top_left, size).into_styled(PrimitiveStyle::with_fill(color)).draw(self).ok();
    }

    fn rect(
        &mut self,
        top_left: Point,
        size: Size,
        color: Rgb565,
    ) {
        Rectangle::new(top_left, size)
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(self)
            .ok();
    }

    fn text(
        &mut self,
        text: &str,
        anchor: Point,
        size: TextSize,
        color: Rgb565,
    ) {
        let style = embedded_graphics::mono_font::MonoTextStyle::new(size.font(), color);
        Text::with_text_style(text, anchor, style, CENTERED_TOP).draw(self).ok();
    }
}

// =============================================================================
// Static Face
// =============================================================================

/// Psi marks from zero to full scale at `step`.
fn marks(step: u32) -> impl Iterator<Item = u32> { (0..=FULL_SCALE_PSI as u32).step_by(step as usize) }

fn draw_ticks<C: GaugeCanvas>(canvas: &mut C) {
    for psi in marks(MAJOR_TICK_STEP) {
        let angle = value_to_angle(psi as f32);
        let outer = polar_point(MAJOR_TICK_OUTER, angle);
        let inner = polar_point(MAJOR_TICK_INNER, angle);

        // Three strokes for a bold mark
        for dx in [0, 1, -1] {
            let shift = Point::new(dx, 0);
            canvas.line(outer + shift, inner + shift, TEXT_COLOR);
        }

        if psi < FULL_SCALE_PSI as u32 {
            let minor = value_to_angle((psi + MINOR_TICK_OFFSET) as f32);
            canvas.line(
                polar_point(MAJOR_TICK_OUTER, minor),
                polar_point(MINOR_TICK_INNER, minor),
                TEXT_COLOR,
            );
        }
    }
}

fn draw_numerals<C: GaugeCanvas>(canvas: &mut C) {
    let half_height = (TextSize::Medium.height() / 2) as i32;

    for psi in marks(LABEL_STEP) {
        let center = polar_point(LABEL_RADIUS, value_to_angle(psi as f32));
        let mut label: String<4> = String::new();
        write!(label, "{psi}").ok();
        canvas.text(&label, center - Point::new(0, half_height), TextSize::Medium, TEXT_COLOR);
    }
}

fn draw_legends<C: GaugeCanvas>(canvas: &mut C) {
    canvas.text("OIL", LEGEND_TITLE_POS, TextSize::Small, TEXT_COLOR);
    canvas.text("x1 PSI", LEGEND_UNIT_POS, TextSize::Small, TEXT_COLOR);
}

fn draw_hub<C: GaugeCanvas>(canvas: &mut C) {
    canvas.fill_circle(CENTER, HUB_OUTER_RADIUS, ACCENT_COLOR);
    canvas.fill_circle(CENTER, HUB_INNER_RADIUS, FACE_COLOR);
    canvas.circle(CENTER, HUB_INNER_RADIUS, TEXT_COLOR);
}

/// Red band from zero up to the warning threshold, one stroke per degree.
fn draw_warning_arc<C: GaugeCanvas>(
    canvas: &mut C,
    min_warn: f32,
) {
    let end = value_to_angle(min_warn);
    let mut angle = START_ANGLE_DEG;
    while angle <= end {
        canvas.line(
            polar_point(WARNING_ARC_OUTER, angle),
            polar_point(WARNING_ARC_INNER, angle),
            WARNING_COLOR,
        );
        angle += 1.0;
    }
}

/// Everything the needle eraser can overlap.
fn restore_decorations<C: GaugeCanvas>(canvas: &mut C) {
    draw_ticks(canvas);
    draw_numerals(canvas);
    draw_legends(canvas);
    draw_hub(canvas);
}

fn draw_needle<C: GaugeCanvas>(
    canvas: &mut C,
    angle_deg: f32,
    color: Rgb565,
) {
    let (a, b) = needle_base(angle_deg, NEEDLE_HALF_WIDTH);
    canvas.fill_triangle(a, b, needle_tip(angle_deg), color);
}

fn erase_needle<C: GaugeCanvas>(
    canvas: &mut C,
    angle_deg: f32,
) {
    let (a, b) = needle_base(angle_deg, ERASER_HALF_WIDTH);
    let tip = needle_tip(angle_deg);
    canvas.fill_triangle(a, b, tip, FACE_COLOR);
    // Outline catches edge pixels the fill rasterizes differently
    canvas.line(a, b, FACE_COLOR);
    canvas.line(b, tip, FACE_COLOR);
    canvas.line(tip, a, FACE_COLOR);
}

// =============================================================================
// Coordinator
// =============================================================================

/// What is currently on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderState {
    pub pressure_gate: RedrawGate,
    pub coolant_gate: RedrawGate,
    /// Angle of the needle currently drawn, if any.
    needle_angle: Option<f32>,
}

impl RenderState {
    pub const fn new() -> Self {
        Self {
            pressure_gate: RedrawGate::new(),
            coolant_gate: RedrawGate::new(),
            needle_angle: None,
        }
    }

    #[inline]
    pub const fn needle_angle(&self) -> Option<f32> { self.needle_angle }
}

/// Issues every draw call for the gauge.
#[derive(Debug, Default)]
pub struct RenderCoordinator {
    state: RenderState,
}

impl RenderCoordinator {
    pub const fn new() -> Self { Self { state: RenderState::new() } }

    #[inline]
    pub const fn state(&self) -> &RenderState { &self.state }

    /// Boot splash.
    pub fn draw_splash<C: GaugeCanvas>(
        &mut self,
        canvas: &mut C,
    ) {
        clear(canvas);
        canvas.text("MR2", SPLASH_TEXT_POS, TextSize::Large, TEXT_COLOR);
        self.state = RenderState::new();
    }

    /// Clear the panel and draw the static face for `config`.
    ///
    /// Forgets the needle and both readouts, so the next evaluation draws.
    pub fn draw_face<C: GaugeCanvas>(
        &mut self,
        canvas: &mut C,
        config: &GaugeConfig,
    ) {
        clear(canvas);

        canvas.circle(CENTER, GAUGE_RADIUS as u32, TEXT_COLOR);
        canvas.circle(CENTER, GAUGE_RADIUS as u32 - 1, TEXT_COLOR);
        canvas.circle(CENTER, INNER_RING_RADIUS as u32, ACCENT_COLOR);

        draw_warning_arc(canvas, config.oil_pressure_min_warn);
        draw_ticks(canvas);
        draw_numerals(canvas);
        draw_legends(canvas);

        canvas.rect(READOUT_BOX_POS, READOUT_BOX_SIZE, TEXT_COLOR);
        canvas.fill_rect(READOUT_CLEAR_POS, READOUT_CLEAR_SIZE, FACE_COLOR);

        draw_hub(canvas);

        self.state = RenderState::new();
    }

    /// Move the needle to `value` without touching the readout.
    pub fn draw_needle_at<C: GaugeCanvas>(
        &mut self,
        canvas: &mut C,
        value: f32,
        color: Rgb565,
    ) {
        let angle = value_to_angle(value);
        if let Some(previous) = self.state.needle_angle.take() {
            erase_needle(canvas, previous);
            restore_decorations(canvas);
        }
        draw_needle(canvas, angle, color);
        self.state.needle_angle = Some(angle);
    }

    /// Apply a pressure evaluation. Returns true when anything was drawn.
    pub fn draw_pressure<C: GaugeCanvas>(
        &mut self,
        canvas: &mut C,
        eval: &Evaluation,
    ) -> bool {
        if !eval.redraw {
            return false;
        }

        let color = eval.zone.color();
        self.draw_needle_at(canvas, eval.value, color);
        draw_readout(canvas, eval.value, color);
        self.state.pressure_gate.mark_drawn(eval.value);
        true
    }

    /// Refresh the coolant readout when it moved enough.
    pub fn draw_coolant<C: GaugeCanvas>(
        &mut self,
        canvas: &mut C,
        value: f32,
        zone: Zone,
    ) -> bool {
        if !self.state.coolant_gate.should_redraw(value) {
            return false;
        }

        let mut text: String<8> = String::new();
        write!(text, "{}C", value as i32).ok();
        canvas.fill_rect(COOLANT_CLEAR_POS, COOLANT_CLEAR_SIZE, FACE_COLOR);
        canvas.text(&text, COOLANT_TEXT_POS, TextSize::Small, zone_text_color(zone));

        self.state.coolant_gate.mark_drawn(value);
        true
    }

    /// Gate used for pressure redraw decisions.
    #[inline]
    pub const fn pressure_gate(&self) -> &RedrawGate { &self.state.pressure_gate }
}

/// Coolant stays white until it runs hot.
const fn zone_text_color(zone: Zone) -> Rgb565 {
    match zone {
        Zone::Normal => TEXT_COLOR,
        other => other.color(),
    }
}

fn clear<C: GaugeCanvas>(canvas: &mut C) {
    canvas.fill_rect(Point::zero(), Size::new(SCREEN_WIDTH, SCREEN_HEIGHT), FACE_COLOR);
}

/// Whole-psi digital readout inside the box.
fn draw_readout<C: GaugeCanvas>(
    canvas: &mut C,
    value: f32,
    color: Rgb565,
) {
    let mut text: String<8> = String::new();
    write!(text, "{}", value as i32).ok();
    canvas.fill_rect(READOUT_CLEAR_POS, READOUT_CLEAR_SIZE, FACE_COLOR);
    canvas.text(&text, READOUT_TEXT_POS, TextSize::Medium, color);
}

// =============================================================================
// Startup Sweep
// =============================================================================

/// Needle positions for the boot sweep: zero to full scale and back in
/// 2 psi steps.
#[derive(Clone, Debug)]
pub struct SweepAnimation {
    step: u32,
}

impl SweepAnimation {
    pub const STEP_PSI: u32 = 2;
    const UP_STEPS: u32 = FULL_SCALE_PSI as u32 / Self::STEP_PSI;

    pub const fn new() -> Self { Self { step: 0 } }
}

impl Default for SweepAnimation {
    fn default() -> Self { Self::new() }
}

impl Iterator for SweepAnimation {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let total = Self::UP_STEPS * 2;
        if self.step > total {
            return None;
        }
        let position = if self.step <= Self::UP_STEPS { self.step } else { total - self.step };
        self.step += 1;
        Some((position * Self::STEP_PSI) as f32)
    }
}

/// Needle color used during the boot sweep.
pub const SWEEP_COLOR: Rgb565 = NEEDLE_COLOR;
