use crate::{
    color::Rgba,
    mapper::Mapper,
    song::PlayerState,
    surface::{Layer, Shape, Style, Surface},
};

/// Whole seconds of guide lines looked up per frame, starting at the current second.
pub const WINDOW_SECONDS: i64 = 6;

const LINE: Rgba = Rgba::rgba(255, 255, 255, 0.3);

#[derive(Debug, Default)]
pub struct MeasureLines;

impl MeasureLines {
    pub fn new() -> Self {
        Self
    }

    pub fn render<S: Surface>(
        &self,
        surface: &mut S,
        mapper: &Mapper,
        state: &PlayerState,
    ) -> Result<usize, String> {
        let Some(song) = state.song else {
            return Ok(0);
        };

        let now_ms = state.time_ms();
        let second = state.time.floor() as i64;
        let style = Style::stroke(Layer::Background, LINE, 1.0);
        let mut drawn = 0;

        for bucket in second..second + WINDOW_SECONDS {
            for line in song.measure_lines_in_second(bucket) {
                let y = mapper.y_for_time(line - now_ms);
                surface.draw(
                    &Shape::Line {
                        x1: 0.0,
                        y1: y,
                        x2: mapper.window_width(),
                        y2: y,
                    },
                    &style,
                )?;
                drawn += 1;
            }
        }

        Ok(drawn)
    }
}
