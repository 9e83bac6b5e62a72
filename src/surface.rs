use crate::color::Rgba;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn shifted(self, dy: f32) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let r = Rect::new(
            x,
            y,
            self.right().min(other.right()) - x,
            self.bottom().min(other.bottom()) - y,
        );

        (!r.is_empty()).then_some(r)
    }
}

/// Back to front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Background,
    Notes,
    Keys,
    KeyEffects,
    Foreground,
    Hud,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    /// Top to bottom.
    VerticalGradient(Rgba, Rgba),
    /// Left to right.
    HorizontalGradient(Rgba, Rgba),
}

impl Paint {
    pub fn at(&self, t: f32) -> Rgba {
        match *self {
            Paint::Solid(c) => c,
            Paint::VerticalGradient(from, to) | Paint::HorizontalGradient(from, to) => {
                from.lerp(to, t)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Rect(Rect),
    RoundRect { rect: Rect, radius: f32 },
    Circle { x: f32, y: f32, r: f32 },
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },
    Text { text: String, x: f32, y: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub layer: Layer,
    pub fill: Option<Paint>,
    pub stroke: Option<Stroke>,
    pub alpha: f32,
    pub clip: Option<Rect>,
}

impl Style {
    pub fn fill(layer: Layer, paint: Paint) -> Self {
        Self {
            layer,
            fill: Some(paint),
            stroke: None,
            alpha: 1.0,
            clip: None,
        }
    }

    pub fn stroke(layer: Layer, color: Rgba, width: f32) -> Self {
        Self {
            layer,
            fill: None,
            stroke: Some(Stroke { color, width }),
            alpha: 1.0,
            clip: None,
        }
    }

    pub fn with_stroke(self, stroke: Option<Stroke>) -> Self {
        Self { stroke, ..self }
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn with_clip(self, clip: Rect) -> Self {
        Self {
            clip: Some(clip),
            ..self
        }
    }
}

pub trait Surface {
    fn size(&self) -> (f32, f32);

    fn draw(&mut self, shape: &Shape, style: &Style) -> Result<(), String>;

    fn text_width(&self, text: &str) -> f32;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_of_disjoint_rects_is_none() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersection(&b), None);
        assert_eq!(
            a.intersection(&Rect::new(5.0, 5.0, 10.0, 10.0)),
            Some(Rect::new(5.0, 5.0, 5.0, 5.0))
        );
    }

    #[test]
    fn nan_rect_is_empty() {
        assert!(Rect::new(0.0, 0.0, f32::NAN, 4.0).is_empty());
        assert!(Rect::new(0.0, 0.0, 0.0, 4.0).is_empty());
    }
}
