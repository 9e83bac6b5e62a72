use crate::{
    color::Rgba,
    settings::Settings,
    song::Marker,
    surface::{Layer, Paint, Rect, Shape, Stroke, Style, Surface},
};

const BAR_Y: f32 = 4.0;
const BAR_HEIGHT: f32 = 12.0;
const BAR_RADIUS: f32 = 6.0;
const MARKER_HOVER_PX: f32 = 10.0;
const LABEL_MARGIN: f32 = 5.0;

const TRACK: Rgba = Rgba::rgba(40, 44, 52, 0.7);
const FILL_FROM: Rgba = Rgba::rgb(0x61, 0xDA, 0xFB);
const FILL_TO: Rgba = Rgba::rgb(0x8A, 0x2B, 0xE2);
const TICK: Rgba = Rgba::rgba(255, 255, 255, 0.7);

pub fn progress_fraction(time_s: f64, total_ms: f64) -> f64 {
    if !(total_ms > 0.0 && total_ms.is_finite() && time_s.is_finite()) {
        return 0.0;
    }
    (time_s * 1000.0 / total_ms).clamp(0.0, 1.0)
}

/// `m:ss`, or `m:ss.mmm` with milliseconds.
pub fn format_time(seconds: f64, millis: bool) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let whole_ms = (seconds * 1000.0).floor() as u64;
    let (min, sec, ms) = (whole_ms / 60_000, (whole_ms / 1000) % 60, whole_ms % 1000);

    if millis {
        format!("{min}:{sec:02}.{ms:03}")
    } else {
        format!("{min}:{sec:02}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MarkerMark {
    Tick { x: f32 },
    Label { x: f32 },
}

pub fn hit_test(
    marker: &Marker,
    total_ms: f64,
    width: f32,
    pointer_x: Option<f32>,
) -> Option<MarkerMark> {
    if !(total_ms > 0.0 && marker.timestamp_ms.is_finite()) {
        return None;
    }

    let x = (marker.timestamp_ms / total_ms) as f32 * width;
    match pointer_x {
        Some(p) if (x - p).abs() < MARKER_HOVER_PX => Some(MarkerMark::Label { x }),
        _ => Some(MarkerMark::Tick { x }),
    }
}

pub fn seek_target_s(x: f32, width: f32, total_ms: f64) -> f64 {
    if !(width > 0.0 && total_ms > 0.0) {
        return 0.0;
    }
    (x / width).clamp(0.0, 1.0) as f64 * total_ms / 1000.0
}

pub fn bar_contains(y: f32) -> bool {
    (0.0..BAR_Y * 2.0 + BAR_HEIGHT).contains(&y)
}

#[derive(Debug, Default)]
pub struct ProgressBar;

impl ProgressBar {
    pub fn new() -> Self {
        Self
    }

    pub fn render<S: Surface>(
        &self,
        surface: &mut S,
        settings: &Settings,
        time_s: f64,
        total_ms: f64,
        markers: &[Marker],
        pointer_x: Option<f32>,
    ) -> Result<(), String> {
        let (width, _) = surface.size();
        let fraction = progress_fraction(time_s, total_ms) as f32;
        let filled = width * fraction;

        surface.draw(
            &Shape::RoundRect {
                rect: Rect::new(0.0, BAR_Y, width, BAR_HEIGHT),
                radius: BAR_RADIUS,
            },
            &Style::fill(Layer::Hud, Paint::Solid(TRACK)),
        )?;

        if filled > 0.0 {
            surface.draw(
                &Shape::RoundRect {
                    rect: Rect::new(0.0, BAR_Y, filled, BAR_HEIGHT),
                    radius: BAR_RADIUS.min(filled / 2.0),
                },
                &Style::fill(Layer::Hud, Paint::HorizontalGradient(FILL_FROM, FILL_TO)),
            )?;
            surface.draw(
                &Shape::Circle {
                    x: filled,
                    y: BAR_Y + BAR_HEIGHT / 2.0,
                    r: BAR_HEIGHT / 1.5,
                },
                &Style::fill(Layer::Hud, Paint::Solid(Rgba::WHITE)),
            )?;
        }

        if settings.show_markers_timeline {
            for marker in markers {
                match hit_test(marker, total_ms, width, pointer_x) {
                    Some(MarkerMark::Label { x }) => {
                        let text_w = surface.text_width(&marker.text);
                        let left = (x - text_w / 2.0)
                            .min(width - text_w - LABEL_MARGIN)
                            .max(LABEL_MARGIN);
                        surface.draw(
                            &Shape::Text {
                                text: marker.text.clone(),
                                x: left,
                                y: BAR_Y + BAR_HEIGHT + 10.0,
                            },
                            &Style::fill(Layer::Hud, Paint::Solid(Rgba::WHITE)),
                        )?;
                    }
                    Some(MarkerMark::Tick { x }) => {
                        surface.draw(
                            &Shape::Line {
                                x1: x,
                                y1: BAR_Y,
                                x2: x,
                                y2: BAR_Y + BAR_HEIGHT,
                            },
                            &Style::stroke(Layer::Hud, TICK, 1.0),
                        )?;
                    }
                    None => (),
                }
            }
        }

        let total_s = if total_ms.is_finite() { total_ms.max(0.0) / 1000.0 } else { 0.0 };
        let text = format!(
            "{} / {}",
            format_time(time_s.min(total_s), settings.show_milliseconds),
            format_time(total_s, settings.show_milliseconds)
        );
        let text_w = surface.text_width(&text);

        surface.draw(
            &Shape::Text {
                text,
                x: width / 2.0 - text_w / 2.0,
                y: BAR_Y,
            },
            &Style::fill(Layer::Hud, Paint::Solid(Rgba::WHITE)).with_stroke(Some(Stroke {
                color: Rgba::rgba(0, 0, 0, 0.8),
                width: 1.0,
            })),
        )
    }
}
