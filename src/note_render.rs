use crate::{
    color::Rgba,
    highlight::KeyTracker,
    keyboard::{self, KeyHighlight},
    lifecycle::{self, FrameNotes, RenderInfo},
    mapper::Mapper,
    note::{NoteId, note_name},
    particles::{Emitter, PARTICLE_STEP},
    settings::Settings,
    surface::{Layer, Paint, Rect, Shape, Stroke, Style, Surface},
};
use std::collections::HashSet;

const GLOW_ALPHA: f32 = 0.7;
const GRADIENT_LIGHTEN: u8 = 40;
const NAME_FONT_MAX: f32 = 12.0;

struct Palette {
    note_stroke: Option<Stroke>,
    active_stroke: Stroke,
    input_fill: Rgba,
}

impl Palette {
    fn new(settings: &Settings) -> Self {
        Self {
            note_stroke: settings.stroke_notes.then(|| Stroke {
                color: settings.color_or(&settings.stroke_notes_color, Rgba::BLACK),
                width: settings.stroke_notes_width.max(0.0),
            }),
            active_stroke: Stroke {
                color: settings.color_or(&settings.stroke_active_notes_color, Rgba::WHITE),
                width: settings.stroke_active_notes_width.max(0.0),
            },
            input_fill: settings.color_or(&settings.input_note_color, Rgba::rgb(40, 155, 155)),
        }
    }

    fn stroke_for(&self, info: &RenderInfo) -> Option<Stroke> {
        if info.is_on {
            Some(self.active_stroke)
        } else {
            self.note_stroke
        }
    }
}

pub struct NoteRender {
    tracker: KeyTracker,
    note_particles: Emitter,
    key_particles: Emitter,
}

impl Default for NoteRender {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteRender {
    pub fn new() -> Self {
        Self {
            tracker: KeyTracker::new(),
            note_particles: Emitter::notes(),
            key_particles: Emitter::keys(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            tracker: KeyTracker::new(),
            note_particles: Emitter::notes().with_seed(seed),
            key_particles: Emitter::keys().with_seed(seed.wrapping_add(1)),
        }
    }

    pub fn note_particles(&self) -> &Emitter {
        &self.note_particles
    }

    pub fn key_particles(&self) -> &Emitter {
        &self.key_particles
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render<S: Surface>(
        &mut self,
        surface: &mut S,
        mapper: &Mapper,
        settings: &Settings,
        notes: &FrameNotes,
        active_input: &[RenderInfo],
        played_input: &[RenderInfo],
    ) -> Result<Vec<NoteId>, String> {
        let palette = Palette::new(settings);

        self.note_particles.update(PARTICLE_STEP);
        self.note_particles.render(surface)?;

        if settings.show_sustained_notes {
            self.draw_sustained_notes(surface, settings, notes)?;
        }

        if settings.show_hit_keys {
            for info in notes.values().flat_map(|track| track.active()) {
                draw_active_glow(surface, mapper, info)?;
            }
        }

        for track in notes.values() {
            let c = lifecycle::classify(track, settings.show_played_notes);

            let incoming = mapper.incoming_region();
            for info in c.incoming_white.iter().chain(&c.incoming_black) {
                draw_note(surface, settings, &palette, info, info.rect, incoming)?;
            }

            let played = mapper.played_region();
            if !played.is_empty() {
                let shift = mapper.played_shift();
                for info in c.played_white.iter().chain(&c.played_black) {
                    draw_note(surface, settings, &palette, info, info.rect.shifted(shift), played)?;
                }
            }
        }

        let active = notes
            .values()
            .flat_map(|track| track.active())
            .collect::<Vec<_>>();
        let onsets = self.tracker.observe(active.iter().map(|info| info.note_id));
        let fresh = onsets.iter().copied().collect::<HashSet<_>>();

        let mut highlights = Vec::new();
        if settings.highlight_active_piano_keys {
            highlights.extend(active.iter().map(|info| KeyHighlight {
                number: info.note_number,
                color: info.fill,
                fresh: settings.draw_piano_key_hit_effect && fresh.contains(&info.note_id),
            }));
        }
        highlights.extend(
            active_input
                .iter()
                .filter(|info| info.has_geometry())
                .map(|info| KeyHighlight {
                    number: info.note_number,
                    color: palette.input_fill,
                    fresh: false,
                }),
        );
        keyboard::render(surface, mapper, &highlights, palette.active_stroke)?;

        if settings.show_particles_top || settings.show_particles_bottom {
            for info in &active {
                self.emit_note_particles(mapper, settings, info, info.fill);
            }
        }

        if settings.highlight_active_piano_keys && settings.draw_piano_key_hit_effect {
            for info in active.iter().filter(|info| fresh.contains(&info.note_id)) {
                if let Some(key) = mapper.key_rect(info.note_number) {
                    self.key_particles.emit_impact(key, info.fill);
                }
            }
        }

        self.key_particles.update(PARTICLE_STEP);
        if settings.draw_piano_key_hit_effect {
            self.key_particles.render(surface)?;
        }

        self.draw_input_notes(surface, mapper, settings, &palette, active_input, played_input)?;

        Ok(onsets)
    }

    fn draw_sustained_notes<S: Surface>(
        &self,
        surface: &mut S,
        settings: &Settings,
        notes: &FrameNotes,
    ) -> Result<(), String> {
        let alpha = (settings.sustained_notes_opacity / 100.0).clamp(0.0, 1.0);
        let edge = Some(Stroke {
            color: Rgba::BLACK,
            width: 1.0,
        });

        for info in notes.values().flat_map(|track| track.iter()) {
            let Some(tail) = info.sustain else {
                continue;
            };
            let w = info.rect.w / 2.0;
            let rect = Rect::new(info.rect.x + w / 2.0, tail.y, w, tail.h);

            if rect.is_empty() || !rect.y.is_finite() {
                continue;
            }

            let style = Style::fill(Layer::Notes, Paint::Solid(info.fill))
                .with_stroke(edge)
                .with_alpha(alpha);
            surface.draw(&Shape::Rect(rect), &style)?;
        }

        Ok(())
    }

    fn emit_note_particles(
        &mut self,
        mapper: &Mapper,
        settings: &Settings,
        info: &RenderInfo,
        color: Rgba,
    ) {
        let row = mapper.key_row();
        self.note_particles.emit_note(
            info.rect.x,
            row.y,
            info.rect.w,
            row.h,
            color,
            info.velocity,
            settings.show_particles_top,
            settings.show_particles_bottom,
        );
    }

    fn draw_input_notes<S: Surface>(
        &mut self,
        surface: &mut S,
        mapper: &Mapper,
        settings: &Settings,
        palette: &Palette,
        active_input: &[RenderInfo],
        played_input: &[RenderInfo],
    ) -> Result<(), String> {
        let shift = mapper.played_shift();
        let fill = Paint::Solid(palette.input_fill);

        for info in active_input {
            self.emit_note_particles(mapper, settings, info, palette.input_fill);
        }

        for info in active_input.iter().chain(played_input) {
            let rect = info.rect.shifted(shift);
            if rect.is_empty() || !rect.y.is_finite() {
                continue;
            }

            let shape = Shape::RoundRect {
                rect,
                radius: corner_radius(info, rect, settings),
            };
            let style = Style::fill(Layer::Notes, fill).with_stroke(palette.note_stroke);
            surface.draw(&shape, &style)?;
        }

        Ok(())
    }
}

fn corner_radius(info: &RenderInfo, rect: Rect, settings: &Settings) -> f32 {
    info.radius
        .max(settings.note_border_radius)
        .min(rect.w / 2.0)
        .min(rect.h / 2.0)
        .max(0.0)
}

fn draw_active_glow<S: Surface>(
    surface: &mut S,
    mapper: &Mapper,
    info: &RenderInfo,
) -> Result<(), String> {
    let ratio = info.done_ratio.clamp(0.0, 1.0);
    let alpha = (GLOW_ALPHA - ratio.min(GLOW_ALPHA)).max(0.0);

    if alpha <= 0.0 || !info.has_geometry() {
        return Ok(());
    }

    let key_h = mapper.white_key_height();
    let w_offset = (mapper.white_key_width() / 2.0).powf(1.0 + ratio);
    let rect = Rect::new(
        info.rect.x - w_offset / 2.0,
        info.rect.y - if mapper.is_reversed() { key_h } else { 0.0 },
        info.rect.w + w_offset,
        info.rect.h + key_h,
    );

    if !(rect.x.is_finite() && rect.y.is_finite()) || rect.is_empty() {
        return Ok(());
    }

    surface.draw(
        &Shape::RoundRect {
            rect,
            radius: info.radius.min(rect.w / 2.0),
        },
        &Style::fill(Layer::Notes, Paint::Solid(info.fill)).with_alpha(alpha),
    )
}

fn draw_note<S: Surface>(
    surface: &mut S,
    settings: &Settings,
    palette: &Palette,
    info: &RenderInfo,
    rect: Rect,
    clip: Rect,
) -> Result<(), String> {
    if !rect.y.is_finite() || rect.intersection(&clip).is_none() {
        return Ok(());
    }

    let paint = if settings.gradient_notes {
        Paint::VerticalGradient(info.fill, info.fill.lighten(GRADIENT_LIGHTEN))
    } else {
        Paint::Solid(info.fill)
    };

    let style = Style::fill(Layer::Notes, paint)
        .with_stroke(palette.stroke_for(info))
        .with_clip(clip);
    surface.draw(
        &Shape::RoundRect {
            rect,
            radius: corner_radius(info, rect, settings),
        },
        &style,
    )?;

    if rect.h > 20.0 && rect.w > 4.0 {
        let shine = Rect::new(rect.x + 2.0, rect.y + 2.0, rect.w - 4.0, (rect.h * 0.2).min(5.0));
        let style = Style::fill(Layer::Notes, Paint::Solid(Rgba::rgba(255, 255, 255, 0.3)))
            .with_clip(clip);
        surface.draw(
            &Shape::RoundRect {
                rect: shine,
                radius: (info.radius - 1.0).clamp(0.0, 3.0),
            },
            &style,
        )?;
    }

    if settings.show_falling_note_names {
        let font = (rect.w * 0.6).min(NAME_FONT_MAX);
        if rect.h > font * 1.5 {
            let name = note_name(info.note_number);
            let x = rect.x + rect.w / 2.0 - surface.text_width(&name) / 2.0;
            let style =
                Style::fill(Layer::Notes, Paint::Solid(info.fill.contrast())).with_clip(clip);
            surface.draw(
                &Shape::Text {
                    text: name,
                    x,
                    y: rect.y + font * 0.5,
                },
                &style,
            )?;
        }
    }

    Ok(())
}
