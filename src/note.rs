#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoteId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackId(u16);

impl TrackId {
    pub const MAX_TRACKS: u16 = 256;

    pub fn new(index: u16) -> Result<Self, String> {
        if index < Self::MAX_TRACKS {
            Ok(Self(index))
        } else {
            Err(format!("track index {index} out of range"))
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

const NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

#[derive(Clone, Debug, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub number: u8,
    pub velocity: u8,
    pub start_ms: f64,
    pub end_ms: f64,
    pub track: TrackId,
    pub sustain_end_ms: Option<f64>,
}

impl Note {
    pub fn new(
        id: u32,
        number: u8,
        velocity: u8,
        start_ms: f64,
        end_ms: f64,
        track: TrackId,
    ) -> Self {
        Self {
            id: NoteId(id),
            number: number.min(127),
            velocity: velocity.min(127),
            start_ms,
            end_ms,
            track,
            sustain_end_ms: None,
        }
    }

    pub fn with_sustain(self, sustain_end_ms: f64) -> Self {
        Self {
            sustain_end_ms: Some(sustain_end_ms),
            ..self
        }
    }

    pub const fn is_black(&self) -> bool {
        is_black_key(self.number)
    }

    pub fn duration_ms(&self) -> f64 {
        (self.end_ms - self.start_ms).max(0.0)
    }

    /// Sounding at `time_ms`: `[start, end)`.
    pub fn is_on(&self, time_ms: f64) -> bool {
        self.start_ms <= time_ms && time_ms < self.end_ms
    }

    pub fn done_ratio(&self, time_ms: f64) -> f64 {
        let duration = self.duration_ms();

        if time_ms.is_nan() {
            0.0
        } else if duration > 0.0 {
            ((time_ms - self.start_ms) / duration).clamp(0.0, 1.0)
        } else if time_ms >= self.start_ms {
            1.0
        } else {
            0.0
        }
    }

    pub fn visible_until_ms(&self) -> f64 {
        self.sustain_end_ms.map_or(self.end_ms, |s| s.max(self.end_ms))
    }
}

pub const fn is_black_key(number: u8) -> bool {
    matches!(number % 12, 1 | 3 | 6 | 8 | 10)
}

/// `60` is `C4`.
pub fn note_name(number: u8) -> String {
    let octave = (number / 12) as i32 - 1;
    format!("{}{octave}", NAMES[(number % 12) as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(start: f64, end: f64) -> Note {
        Note::new(0, 60, 100, start, end, TrackId::new(0).unwrap())
    }

    #[test]
    fn is_on_is_half_open() {
        let n = note(1000.0, 2000.0);
        assert!(!n.is_on(999.999));
        assert!(n.is_on(1000.0));
        assert!(n.is_on(1999.999));
        assert!(!n.is_on(2000.0));
    }

    #[test]
    fn done_ratio_is_clamped_and_monotonic() {
        let n = note(1000.0, 3000.0);
        let mut prev = 0.0;

        for step in 0..500 {
            let t = step as f64 * 10.0;
            let r = n.done_ratio(t);
            assert!((0.0..=1.0).contains(&r));
            assert!(r >= prev);
            prev = r;
        }

        assert_eq!(n.done_ratio(2000.0), 0.5);
    }

    #[test]
    fn zero_length_note_flips_at_start() {
        let n = note(500.0, 500.0);
        assert_eq!(n.done_ratio(499.0), 0.0);
        assert_eq!(n.done_ratio(500.0), 1.0);
        assert!(!n.is_on(500.0));
    }

    #[test]
    fn names_and_colors_of_keys() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(61), "C#4");
        assert_eq!(note_name(21), "A0");
        assert!(is_black_key(61));
        assert!(!is_black_key(64));
    }

    #[test]
    fn track_ids_are_validated() {
        assert!(TrackId::new(3).is_ok());
        assert!(TrackId::new(TrackId::MAX_TRACKS).is_err());
    }
}
