use crate::strerr::Strerr;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn parse(css: &str) -> Result<Self, String> {
        let css = css.trim();

        if let Some(hex) = css.strip_prefix('#') {
            return parse_hex(hex).context(css);
        }

        let (body, wants_alpha) = if let Some(body) = css.strip_prefix("rgba(") {
            (body, true)
        } else if let Some(body) = css.strip_prefix("rgb(") {
            (body, false)
        } else {
            return Err(format!("unknown color format \"{css}\""));
        };

        let parts = body
            .strip_suffix(')')
            .ok_or_else(|| format!("unterminated color \"{css}\""))?
            .split(',')
            .map(str::trim)
            .collect::<Vec<_>>();

        match (parts.as_slice(), wants_alpha) {
            ([r, g, b], false) => Ok(Self::rgb(channel(r)?, channel(g)?, channel(b)?)),
            ([r, g, b, a], true) => {
                let a = a.parse::<f32>().context(css)?;
                if !a.is_finite() {
                    return Err(format!("non-finite alpha in \"{css}\""));
                }
                Ok(Self::rgba(channel(r)?, channel(g)?, channel(b)?, a.clamp(0.0, 1.0)))
            }
            _ => Err(format!("wrong channel count in \"{css}\"")),
        }
    }

    pub fn lighten(self, amount: u8) -> Self {
        Self {
            r: self.r.saturating_add(amount),
            g: self.g.saturating_add(amount),
            b: self.b.saturating_add(amount),
            a: self.a,
        }
    }

    pub fn luma(self) -> f32 {
        (self.r as f32 + self.g as f32 + self.b as f32) / 3.0
    }

    pub fn contrast(self) -> Self {
        if self.luma() > 128.0 {
            Self::BLACK
        } else {
            Self::WHITE
        }
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;

        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

fn channel(s: &str) -> Result<u8, String> {
    s.parse::<u8>().context("color channel")
}

fn parse_hex(hex: &str) -> Result<Rgba, String> {
    let digit = |i: usize| {
        hex.get(i..i + 2)
            .ok_or("short hex color")
            .and_then(|s| u8::from_str_radix(s, 16).map_err(|_| "bad hex digit"))
    };

    match hex.len() {
        3 => {
            let mut c = [0u8; 3];
            for (i, ch) in hex.chars().enumerate() {
                let v = ch.to_digit(16).ok_or("bad hex digit")? as u8;
                c[i] = v * 16 + v;
            }
            Ok(Rgba::rgb(c[0], c[1], c[2]))
        }
        6 => Ok(Rgba::rgb(digit(0)?, digit(2)?, digit(4)?)),
        8 => Ok(Rgba::rgba(
            digit(0)?,
            digit(2)?,
            digit(4)?,
            digit(6)? as f32 / 255.0,
        )),
        _ => Err("hex color must have 3, 6 or 8 digits".to_string()),
    }
}
