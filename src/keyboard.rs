use crate::{
    color::Rgba,
    mapper::{HIGHEST_KEY, LOWEST_KEY, Mapper},
    note::is_black_key,
    surface::{Layer, Paint, Rect, Shape, Stroke, Style, Surface},
};

const WHITE_KEY: Rgba = Rgba::rgb(0xF4, 0xF4, 0xF0);
const BLACK_KEY: Rgba = Rgba::rgb(0x1A, 0x1A, 0x1E);
const KEY_EDGE: Rgba = Rgba::rgba(0, 0, 0, 0.6);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyHighlight {
    pub number: u8,
    pub color: Rgba,
    /// Struck this frame.
    pub fresh: bool,
}

pub fn render<S: Surface>(
    surface: &mut S,
    mapper: &Mapper,
    highlights: &[KeyHighlight],
    hit_stroke: Stroke,
) -> Result<(), String> {
    for black in [false, true] {
        for number in (LOWEST_KEY..=HIGHEST_KEY).filter(|n| is_black_key(*n) == black) {
            let Some(rect) = mapper.key_rect(number) else {
                continue;
            };
            let base = if black { BLACK_KEY } else { WHITE_KEY };
            let edge = Some(Stroke {
                color: KEY_EDGE,
                width: 1.0,
            });

            surface.draw(
                &key_shape(rect, black),
                &Style::fill(Layer::Keys, Paint::Solid(base)).with_stroke(edge),
            )?;

            // last highlight for a key wins
            if let Some(h) = highlights.iter().rev().find(|h| h.number == number) {
                draw_highlight(surface, rect, black, h, hit_stroke)?;
            }
        }
    }

    Ok(())
}

fn key_shape(rect: Rect, black: bool) -> Shape {
    Shape::RoundRect {
        rect,
        radius: if black { 2.0 } else { 3.0 },
    }
}

fn draw_highlight<S: Surface>(
    surface: &mut S,
    rect: Rect,
    black: bool,
    highlight: &KeyHighlight,
    hit_stroke: Stroke,
) -> Result<(), String> {
    let paint = Paint::VerticalGradient(highlight.color, highlight.color.lighten(50));
    let stroke = highlight.fresh.then_some(hit_stroke);

    surface.draw(
        &key_shape(rect, black),
        &Style::fill(Layer::Keys, paint).with_stroke(stroke),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{settings::Settings, surface::recorder::Recorder};

    fn stroke() -> Stroke {
        Stroke {
            color: Rgba::WHITE,
            width: 2.0,
        }
    }

    #[test]
    fn draws_every_key_whites_first() {
        let m = Mapper::new(520.0, 600.0, &Settings::default());
        let mut r = Recorder::new(520.0, 600.0);
        render(&mut r, &m, &[], stroke()).unwrap();

        assert_eq!(r.calls.len(), 88);
        let first_black = r
            .calls
            .iter()
            .position(|(_, s)| s.fill == Some(Paint::Solid(BLACK_KEY)))
            .unwrap();
        assert_eq!(first_black, 52);
    }

    #[test]
    fn fresh_keys_get_the_hit_stroke() {
        let m = Mapper::new(520.0, 600.0, &Settings::default());
        let mut r = Recorder::new(520.0, 600.0);
        let highlights = [
            KeyHighlight {
                number: 60,
                color: Rgba::rgb(200, 0, 0),
                fresh: true,
            },
            KeyHighlight {
                number: 61,
                color: Rgba::rgb(0, 200, 0),
                fresh: false,
            },
        ];
        render(&mut r, &m, &highlights, stroke()).unwrap();

        assert_eq!(r.calls.len(), 90);
        let lit = r
            .calls
            .iter()
            .filter(|(_, s)| matches!(s.fill, Some(Paint::VerticalGradient(..))))
            .collect::<Vec<_>>();
        assert_eq!(lit.len(), 2);
        assert_eq!(lit[0].1.stroke, Some(stroke()));
        assert_eq!(lit[1].1.stroke, None);
    }
}
