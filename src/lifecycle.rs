use crate::{
    color::Rgba,
    mapper::Mapper,
    note::{Note, NoteId, TrackId},
    settings::Settings,
    song::PlayerState,
    surface::Rect,
};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sustain {
    pub y: f32,
    pub h: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderInfo {
    pub note_id: NoteId,
    pub note_number: u8,
    pub velocity: u8,
    pub rect: Rect,
    pub radius: f32,
    pub fill: Rgba,
    pub is_on: bool,
    pub done_ratio: f32,
    pub sustain: Option<Sustain>,
}

impl RenderInfo {
    pub fn with_rect(&self, rect: Rect) -> Self {
        Self {
            rect,
            ..self.clone()
        }
    }

    pub fn has_geometry(&self) -> bool {
        !self.rect.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackNotes {
    pub white: Vec<RenderInfo>,
    pub black: Vec<RenderInfo>,
}

impl TrackNotes {
    pub fn is_empty(&self) -> bool {
        self.white.is_empty() && self.black.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderInfo> {
        self.white.iter().chain(self.black.iter())
    }

    pub fn active(&self) -> impl Iterator<Item = &RenderInfo> {
        self.iter().filter(|info| info.is_on && info.has_geometry())
    }
}

pub type FrameNotes = BTreeMap<TrackId, TrackNotes>;

#[derive(Debug, Default)]
pub struct Classified<'a> {
    pub incoming_white: Vec<&'a RenderInfo>,
    pub incoming_black: Vec<&'a RenderInfo>,
    pub played_white: Vec<&'a RenderInfo>,
    pub played_black: Vec<&'a RenderInfo>,
}

// at exactly 1 a note is only played, at exactly 0 only incoming
pub fn classify<'a>(notes: &'a TrackNotes, show_played: bool) -> Classified<'a> {
    let mut out = Classified::default();

    let split = |list: &'a [RenderInfo],
                 incoming: &mut Vec<&'a RenderInfo>,
                 played: &mut Vec<&'a RenderInfo>| {
        for info in list.iter().filter(|info| info.has_geometry()) {
            if info.done_ratio < 1.0 {
                incoming.push(info);
            }
            if show_played && info.done_ratio > 0.0 {
                played.push(info);
            }
        }
    };

    split(&notes.white, &mut out.incoming_white, &mut out.played_white);
    split(&notes.black, &mut out.incoming_black, &mut out.played_black);
    out
}

pub fn render_info(
    note: &Note,
    time_ms: f64,
    mapper: &Mapper,
    settings: &Settings,
    fill: Rgba,
) -> Option<RenderInfo> {
    let (x, w) = mapper.key_x(note.number)?;
    let ppm = mapper.pixels_per_ms();
    let h = note.duration_ms() * ppm;

    let y = if mapper.is_reversed() {
        mapper.y_for_time_f64(note.start_ms - time_ms)
    } else {
        mapper.y_for_time_f64(note.end_ms - time_ms)
    };

    if !(y.is_finite() && h.is_finite()) {
        return None;
    }

    let sustain = note
        .sustain_end_ms
        .filter(|end| settings.show_sustained_notes && *end > note.end_ms)
        .map(|end| {
            let sh = (end - note.end_ms) * ppm;
            let sy = if mapper.is_reversed() {
                mapper.y_for_time_f64(note.end_ms - time_ms)
            } else {
                mapper.y_for_time_f64(end - time_ms)
            };
            Sustain {
                y: sy as f32,
                h: sh as f32,
            }
        });

    Some(RenderInfo {
        note_id: note.id,
        note_number: note.number,
        velocity: note.velocity,
        rect: Rect::new(x, y as f32, w, h as f32),
        radius: (w / 4.0).min(settings.note_border_radius.max(0.0)),
        fill,
        is_on: note.is_on(time_ms),
        done_ratio: note.done_ratio(time_ms) as f32,
        sustain,
    })
}

pub fn build_frame_notes(
    state: &PlayerState,
    mapper: &Mapper,
    settings: &Settings,
) -> FrameNotes {
    let mut frame = FrameNotes::new();
    let Some(song) = state.song else {
        return frame;
    };

    let now = state.time_ms();
    let (back, ahead) = mapper.visible_window_ms();
    let (from, to) = (now - back, now + ahead);

    for (track, _) in song.tracks() {
        let (white_fill, black_fill) = settings
            .track_fill(track)
            .unwrap_or_else(|(white, black, _)| (white, black));

        let mut notes = TrackNotes::default();

        for note in song.notes_between(track, from, to) {
            let (fill, list) = if note.is_black() {
                (black_fill, &mut notes.black)
            } else {
                (white_fill, &mut notes.white)
            };

            if let Some(info) = render_info(note, now, mapper, settings, fill) {
                list.push(info);
            }
        }

        if !notes.is_empty() {
            frame.insert(track, notes);
        }
    }

    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::Song;

    fn settings() -> Settings {
        Settings {
            white_key_height: 100.0,
            look_ahead_ms: 1000.0,
            piano_position: 50.0,
            ..Settings::default()
        }
    }

    fn track() -> TrackId {
        TrackId::new(0).unwrap()
    }

    fn info(done_ratio: f32) -> RenderInfo {
        RenderInfo {
            note_id: NoteId(1),
            note_number: 60,
            velocity: 100,
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            radius: 2.0,
            fill: Rgba::WHITE,
            is_on: false,
            done_ratio,
            sustain: None,
        }
    }

    #[test]
    fn done_note_is_played_only() {
        let notes = TrackNotes {
            white: vec![info(0.0), info(0.5), info(1.0)],
            black: vec![],
        };
        let c = classify(&notes, true);

        let incoming = c.incoming_white.iter().map(|i| i.done_ratio).collect::<Vec<_>>();
        let played = c.played_white.iter().map(|i| i.done_ratio).collect::<Vec<_>>();
        assert_eq!(incoming, vec![0.0, 0.5]);
        assert_eq!(played, vec![0.5, 1.0]);
    }

    #[test]
    fn played_notes_hidden_when_mode_off() {
        let notes = TrackNotes {
            white: vec![info(0.5), info(1.0)],
            black: vec![info(1.0)],
        };
        let c = classify(&notes, false);
        assert!(c.played_white.is_empty());
        assert!(c.played_black.is_empty());
        assert_eq!(c.incoming_white.len(), 1);
    }

    #[test]
    fn zero_size_notes_are_not_classified() {
        let notes = TrackNotes {
            white: vec![info(0.5).with_rect(Rect::new(0.0, 0.0, 10.0, 0.0))],
            black: vec![],
        };
        let c = classify(&notes, true);
        assert!(c.incoming_white.is_empty());
        assert!(c.played_white.is_empty());
    }

    #[test]
    fn crossing_part_matches_done_ratio() {
        let s = settings();
        let m = Mapper::new(520.0, 600.0, &s);
        let note = Note::new(7, 60, 100, 1000.0, 1400.0, track());

        for t in [900.0, 1000.0, 1100.0, 1250.0, 1400.0, 1500.0] {
            let i = render_info(&note, t, &m, &s, Rgba::WHITE).unwrap();
            let crossed = (i.rect.bottom() - m.hit_line_y()).clamp(0.0, i.rect.h);
            assert!((crossed / i.rect.h - i.done_ratio).abs() < 1e-4, "t={t}");
        }
    }

    #[test]
    fn reverse_rect_starts_at_hit_line() {
        let s = Settings {
            reverse_direction: true,
            ..settings()
        };
        let m = Mapper::new(520.0, 600.0, &s);
        let note = Note::new(7, 60, 100, 1000.0, 1400.0, track());

        let i = render_info(&note, 1000.0, &m, &s, Rgba::WHITE).unwrap();
        assert_eq!(i.rect.y, m.hit_line_y());
        assert!(i.is_on);
        assert_eq!(i.done_ratio, 0.0);
    }

    #[test]
    fn off_keyboard_notes_are_skipped() {
        let s = settings();
        let m = Mapper::new(520.0, 600.0, &s);
        let note = Note::new(0, 10, 100, 0.0, 100.0, track());
        assert!(render_info(&note, 0.0, &m, &s, Rgba::WHITE).is_none());
    }

    #[test]
    fn builder_splits_white_and_black_and_culls() {
        let s = settings();
        let m = Mapper::new(520.0, 600.0, &s);
        let song = Song::new(
            vec![
                Note::new(0, 60, 100, 0.0, 400.0, track()),
                Note::new(1, 61, 100, 100.0, 400.0, track()),
                Note::new(2, 62, 100, 60_000.0, 60_400.0, track()),
            ],
            [],
        );

        let frame = build_frame_notes(&PlayerState::new(0.2, Some(&song)), &m, &s);
        let notes = &frame[&track()];
        assert_eq!(notes.white.len(), 1);
        assert_eq!(notes.black.len(), 1);
        assert!(notes.white[0].is_on);
        assert!(notes.black[0].is_on);
    }

    #[test]
    fn no_song_means_no_notes() {
        let s = settings();
        let m = Mapper::new(520.0, 600.0, &s);
        assert!(build_frame_notes(&PlayerState::new(3.0, None), &m, &s).is_empty());
    }

    #[test]
    fn sustain_tail_follows_note_end() {
        let s = settings();
        let m = Mapper::new(520.0, 600.0, &s);
        let note = Note::new(0, 60, 100, 0.0, 200.0, track()).with_sustain(600.0);

        let i = render_info(&note, 0.0, &m, &s, Rgba::WHITE).unwrap();
        let tail = i.sustain.unwrap();
        assert!((tail.y + tail.h - i.rect.y).abs() < 1e-3);
        assert!((tail.h - 400.0 * m.pixels_per_ms() as f32).abs() < 1e-3);
    }
}
