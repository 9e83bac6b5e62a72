use crate::{
    color::Rgba,
    log::{Log, log},
    note::TrackId,
    strerr::Strerr,
};
use serde::Deserialize;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TrackColors {
    pub white: String,
    pub black: String,
}

impl TrackColors {
    fn new(white: &str, black: &str) -> Self {
        Self {
            white: white.to_string(),
            black: black.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub reverse_direction: bool,
    /// Percent of the scroll area below the key row. `0` puts the keys at the bottom.
    pub piano_position: f32,
    pub white_key_height: f32,
    /// Time a note takes to travel the full scroll height.
    pub look_ahead_ms: f32,
    pub show_played_notes: bool,

    pub show_sustained_notes: bool,
    /// Percent.
    pub sustained_notes_opacity: f32,
    pub show_hit_keys: bool,
    pub highlight_active_piano_keys: bool,
    pub draw_piano_key_hit_effect: bool,
    pub show_particles_top: bool,
    pub show_particles_bottom: bool,

    pub stroke_notes: bool,
    pub stroke_notes_color: String,
    pub stroke_notes_width: f32,
    pub stroke_active_notes_color: String,
    pub stroke_active_notes_width: f32,
    pub note_border_radius: f32,
    pub gradient_notes: bool,
    pub show_falling_note_names: bool,
    pub input_note_color: String,
    pub track_colors: Vec<TrackColors>,

    pub show_markers_timeline: bool,
    pub show_milliseconds: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reverse_direction: false,
            piano_position: 0.0,
            white_key_height: 90.0,
            look_ahead_ms: 3000.0,
            show_played_notes: true,
            show_sustained_notes: true,
            sustained_notes_opacity: 50.0,
            show_hit_keys: true,
            highlight_active_piano_keys: true,
            draw_piano_key_hit_effect: true,
            show_particles_top: true,
            show_particles_bottom: false,
            stroke_notes: true,
            stroke_notes_color: "rgba(0, 0, 0, 1)".into(),
            stroke_notes_width: 1.0,
            stroke_active_notes_color: "rgba(255, 255, 255, 0.8)".into(),
            stroke_active_notes_width: 2.0,
            note_border_radius: 4.0,
            gradient_notes: true,
            show_falling_note_names: false,
            input_note_color: "rgba(40, 155, 155, 1)".into(),
            track_colors: vec![
                TrackColors::new("rgba(97, 218, 251, 1)", "rgba(33, 150, 190, 1)"),
                TrackColors::new("rgba(240, 120, 80, 1)", "rgba(190, 70, 40, 1)"),
                TrackColors::new("rgba(138, 43, 226, 1)", "rgba(95, 20, 165, 1)"),
                TrackColors::new("rgba(120, 220, 110, 1)", "rgba(60, 160, 60, 1)"),
            ],
            show_markers_timeline: true,
            show_milliseconds: false,
        }
    }
}

impl Settings {
    pub fn from_toml(text: &str) -> Result<Self, String> {
        toml::from_str(text).context("settings")
    }

    pub fn load<P>(path: P) -> Self
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let loaded = std::fs::read_to_string(path)
            .context(&path.display().to_string())
            .and_then(|text| Self::from_toml(&text));

        match loaded {
            Ok(settings) => {
                log(Log::Info, format!("settings loaded from {}", path.display()));
                settings
            }
            Err(e) => {
                log(Log::Warning, format!("using default settings ({e})"));
                Self::default()
            }
        }
    }

    pub fn track_fill(&self, track: TrackId) -> Result<(Rgba, Rgba), (Rgba, Rgba, String)> {
        let fallback = fallback_fill(track);

        let Some(colors) = (!self.track_colors.is_empty())
            .then(|| &self.track_colors[track.index() % self.track_colors.len()])
        else {
            return Ok(fallback);
        };

        match (Rgba::parse(&colors.white), Rgba::parse(&colors.black)) {
            (Ok(white), Ok(black)) => Ok((white, black)),
            (Err(e), _) | (_, Err(e)) => Err((fallback.0, fallback.1, e)),
        }
    }

    pub fn color_or(&self, css: &str, fallback: Rgba) -> Rgba {
        Rgba::parse(css).unwrap_or(fallback)
    }
}

fn fallback_fill(track: TrackId) -> (Rgba, Rgba) {
    const PALETTE: [(Rgba, Rgba); 2] = [
        (Rgba::rgb(97, 218, 251), Rgba::rgb(33, 150, 190)),
        (Rgba::rgb(240, 120, 80), Rgba::rgb(190, 70, 40)),
    ];
    PALETTE[track.index() % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let s = Settings::from_toml("reverse_direction = true\nlook_ahead_ms = 1500.0\n").unwrap();
        assert!(s.reverse_direction);
        assert_eq!(s.look_ahead_ms, 1500.0);
        assert_eq!(s.white_key_height, Settings::default().white_key_height);
    }

    #[test]
    fn track_colors_from_toml() {
        let s = Settings::from_toml(
            "[[track_colors]]\nwhite = \"#ff0000\"\nblack = \"#800000\"\n",
        )
        .unwrap();
        let t = TrackId::new(5).unwrap();
        assert_eq!(
            s.track_fill(t),
            Ok((Rgba::rgb(255, 0, 0), Rgba::rgb(128, 0, 0)))
        );
    }

    #[test]
    fn malformed_track_color_falls_back() {
        let s = Settings {
            track_colors: vec![TrackColors::new("chartreuse-ish", "#000")],
            ..Settings::default()
        };
        let t = TrackId::new(0).unwrap();
        let (white, black, _) = s.track_fill(t).unwrap_err();
        assert_eq!((white, black), fallback_fill(t));
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(Settings::from_toml("look_ahead_ms = \"soon\"").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let s = Settings::load("/definitely/not/here.toml");
        assert_eq!(s, Settings::default());
    }
}
