use crate::{
    color::Rgba,
    lifecycle::{self, RenderInfo},
    log::{Log, log},
    mapper::Mapper,
    measure_lines::MeasureLines,
    note::NoteId,
    note_render::NoteRender,
    progress::ProgressBar,
    settings::Settings,
    song::{Marker, PlayerState},
    surface::Surface,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput<'a> {
    pub active_input: &'a [RenderInfo],
    pub played_input: &'a [RenderInfo],
    pub markers: &'a [Marker],
    pub pointer_x: Option<f32>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub notes: usize,
    pub onsets: Vec<NoteId>,
    pub measure_lines: usize,
    pub particles: usize,
}

pub struct Render {
    notes: NoteRender,
    progress: ProgressBar,
    measure_lines: MeasureLines,
    checked_colors: Option<Vec<String>>,
}

impl Default for Render {
    fn default() -> Self {
        Self::new()
    }
}

impl Render {
    pub fn new() -> Self {
        Self::with_note_render(NoteRender::new())
    }

    pub fn with_note_render(notes: NoteRender) -> Self {
        Self {
            notes,
            progress: ProgressBar::new(),
            measure_lines: MeasureLines::new(),
            checked_colors: None,
        }
    }

    pub fn render<S: Surface>(
        &mut self,
        surface: &mut S,
        state: &PlayerState,
        settings: &Settings,
        input: &FrameInput,
    ) -> Result<FrameReport, String> {
        self.check_settings(settings);

        let state = PlayerState::new(state.time, state.song);
        let (width, height) = surface.size();
        let mapper = Mapper::new(width, height, settings);
        let notes = lifecycle::build_frame_notes(&state, &mapper, settings);

        let onsets = self.notes.render(
            surface,
            &mapper,
            settings,
            &notes,
            input.active_input,
            input.played_input,
        )?;

        let total_ms = state.song.map_or(0.0, |song| song.end_ms());
        self.progress.render(
            surface,
            settings,
            state.time,
            total_ms,
            input.markers,
            input.pointer_x,
        )?;

        let measure_lines = self.measure_lines.render(surface, &mapper, &state)?;

        Ok(FrameReport {
            notes: notes.values().map(|track| track.white.len() + track.black.len()).sum(),
            onsets,
            measure_lines,
            particles: self.notes.note_particles().len() + self.notes.key_particles().len(),
        })
    }

    fn check_settings(&mut self, settings: &Settings) -> usize {
        let named = color_fields(settings);
        let current = named.iter().map(|(_, css)| css.to_string()).collect::<Vec<_>>();

        if self.checked_colors.as_ref() == Some(&current) {
            return 0;
        }

        let mut bad = 0;
        for (name, css) in named {
            if let Err(e) = Rgba::parse(css) {
                log(Log::Warning, format!("{name}: {e}, using fallback"));
                bad += 1;
            }
        }

        self.checked_colors = Some(current);
        bad
    }
}

fn color_fields(settings: &Settings) -> Vec<(&'static str, &str)> {
    let mut named = vec![
        ("stroke_notes_color", settings.stroke_notes_color.as_str()),
        ("stroke_active_notes_color", settings.stroke_active_notes_color.as_str()),
        ("input_note_color", settings.input_note_color.as_str()),
    ];
    for c in &settings.track_colors {
        named.push(("track_colors.white", c.white.as_str()));
        named.push(("track_colors.black", c.black.as_str()));
    }
    named
}
