use crate::{settings::Settings, surface::Rect};

pub const LOWEST_KEY: u8 = 21;
pub const HIGHEST_KEY: u8 = 108;
pub const WHITE_KEY_COUNT: f32 = 52.0;

const BLACK_WIDTH_RATIO: f32 = 0.6;
const BLACK_HEIGHT_RATIO: f32 = 0.63;

const WHITES_BEFORE: [u32; 12] = [0, 1, 1, 2, 2, 3, 4, 4, 5, 5, 6, 6];

fn whites_below(number: u8) -> u32 {
    (number as u32 / 12) * 7 + WHITES_BEFORE[(number % 12) as usize]
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mapper {
    width: f32,
    height: f32,
    key_height: f32,
    white_key_width: f32,
    piano_y: f64,
    pixels_per_ms: f64,
    reverse: bool,
}

impl Mapper {
    pub fn new(width: f32, height: f32, settings: &Settings) -> Self {
        let width = if width.is_finite() { width.max(1.0) } else { 1.0 };
        let height = if height.is_finite() { height.max(2.0) } else { 2.0 };
        let key_height = if settings.white_key_height.is_finite() {
            settings.white_key_height.clamp(1.0, height / 2.0)
        } else {
            height / 5.0
        };
        let position = if settings.piano_position.is_finite() {
            settings.piano_position.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let look_ahead = if settings.look_ahead_ms.is_finite() {
            settings.look_ahead_ms.max(1.0)
        } else {
            3000.0
        };

        let scroll = (height - key_height) as f64;

        Self {
            width,
            height,
            key_height,
            white_key_width: width / WHITE_KEY_COUNT,
            piano_y: scroll * (1.0 - position as f64 / 100.0),
            pixels_per_ms: scroll / look_ahead as f64,
            reverse: settings.reverse_direction,
        }
    }

    pub fn window_width(&self) -> f32 {
        self.width
    }

    pub fn window_height(&self) -> f32 {
        self.height
    }

    pub fn white_key_height(&self) -> f32 {
        self.key_height
    }

    pub fn white_key_width(&self) -> f32 {
        self.white_key_width
    }

    pub fn black_key_width(&self) -> f32 {
        self.white_key_width * BLACK_WIDTH_RATIO
    }

    pub fn black_key_height(&self) -> f32 {
        self.key_height * BLACK_HEIGHT_RATIO
    }

    pub fn is_reversed(&self) -> bool {
        self.reverse
    }

    pub fn piano_y(&self) -> f32 {
        self.piano_y as f32
    }

    pub fn pixels_per_ms(&self) -> f64 {
        self.pixels_per_ms
    }

    pub fn hit_line_y(&self) -> f32 {
        self.hit_line() as f32
    }

    fn hit_line(&self) -> f64 {
        if self.reverse {
            self.piano_y + self.key_height as f64
        } else {
            self.piano_y
        }
    }

    /// `offset_ms` is note time minus current time; zero lands on the hit line.
    pub fn y_for_time(&self, offset_ms: f64) -> f32 {
        self.y_for_time_f64(offset_ms) as f32
    }

    pub(crate) fn y_for_time_f64(&self, offset_ms: f64) -> f64 {
        let dy = offset_ms * self.pixels_per_ms;

        if self.reverse {
            self.hit_line() + dy
        } else {
            self.hit_line() - dy
        }
    }

    pub fn played_shift(&self) -> f32 {
        if self.reverse {
            -self.key_height
        } else {
            self.key_height
        }
    }

    pub fn key_row(&self) -> Rect {
        Rect::new(0.0, self.piano_y(), self.width, self.key_height)
    }

    fn above_piano(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.piano_y())
    }

    fn below_piano(&self) -> Rect {
        let top = self.piano_y() + self.key_height;
        Rect::new(0.0, top, self.width, (self.height - top).max(0.0))
    }

    pub fn incoming_region(&self) -> Rect {
        if self.reverse {
            self.below_piano()
        } else {
            self.above_piano()
        }
    }

    pub fn played_region(&self) -> Rect {
        if self.reverse {
            self.above_piano()
        } else {
            self.below_piano()
        }
    }

    pub fn visible_window_ms(&self) -> (f64, f64) {
        let back = self.played_region().h as f64 / self.pixels_per_ms;
        let ahead = self.incoming_region().h as f64 / self.pixels_per_ms;
        (back, ahead)
    }

    pub fn key_x(&self, number: u8) -> Option<(f32, f32)> {
        if !(LOWEST_KEY..=HIGHEST_KEY).contains(&number) {
            return None;
        }

        let wkw = self.white_key_width;

        if crate::note::is_black_key(number) {
            let boundary = (whites_below(number + 1) - whites_below(LOWEST_KEY)) as f32 * wkw;
            let bkw = self.black_key_width();
            Some((boundary - bkw / 2.0, bkw))
        } else {
            let index = (whites_below(number) - whites_below(LOWEST_KEY)) as f32;
            Some((index * wkw, wkw))
        }
    }

    pub fn key_rect(&self, number: u8) -> Option<Rect> {
        let (x, w) = self.key_x(number)?;
        let h = if crate::note::is_black_key(number) {
            self.black_key_height()
        } else {
            self.key_height
        };
        Some(Rect::new(x, self.piano_y(), w, h))
    }
}
