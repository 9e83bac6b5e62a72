//! Falling-notes piano visualizer drawn onto any [`surface::Surface`].

pub mod color;
#[cfg(feature = "sdl")]
pub mod engine;
pub mod highlight;
pub mod keyboard;
pub mod lifecycle;
pub mod log;
pub mod mapper;
pub mod measure_lines;
pub mod note;
pub mod note_render;
pub mod particles;
pub mod playback;
pub mod progress;
pub mod render;
pub mod settings;
pub mod smooth;
pub mod song;
pub mod strerr;
pub mod surface;

pub use mapper::Mapper;
pub use note::{Note, NoteId, TrackId};
pub use render::{FrameInput, FrameReport, Render};
pub use settings::Settings;
pub use song::{Marker, PlayerState, Song};
