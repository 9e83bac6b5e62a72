use crate::note::{Note, TrackId};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub timestamp_ms: f64,
    pub text: String,
}

impl Marker {
    pub fn new(timestamp_ms: f64, text: impl Into<String>) -> Self {
        Self {
            timestamp_ms,
            text: text.into(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Song {
    tracks: BTreeMap<TrackId, TrackIndex>,
    measure_lines: BTreeMap<i64, Vec<f64>>,
    markers: Vec<Marker>,
    end_ms: f64,
}

#[derive(Clone, Debug, Default)]
struct TrackIndex {
    notes: Vec<Note>,
    // running max of `visible_until_ms`, non-decreasing
    reach: Vec<f64>,
}

impl TrackIndex {
    fn new(mut notes: Vec<Note>) -> Self {
        notes.sort_by(|a, b| a.start_ms.total_cmp(&b.start_ms));

        let reach = notes
            .iter()
            .scan(f64::NEG_INFINITY, |max, note| {
                *max = max.max(note.visible_until_ms());
                Some(*max)
            })
            .collect();

        Self { notes, reach }
    }
}

impl Song {
    pub fn new(notes: Vec<Note>, measure_lines_ms: impl IntoIterator<Item = f64>) -> Self {
        let mut grouped: BTreeMap<TrackId, Vec<Note>> = BTreeMap::new();
        let mut end_ms = 0.0f64;

        for note in notes {
            if !(note.start_ms.is_finite() && note.end_ms.is_finite()) {
                continue;
            }
            end_ms = end_ms.max(note.visible_until_ms());
            grouped.entry(note.track).or_default().push(note);
        }

        let tracks = grouped
            .into_iter()
            .map(|(id, notes)| (id, TrackIndex::new(notes)))
            .collect();

        let mut measure_lines: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
        for line in measure_lines_ms {
            if !(line.is_finite() && line >= 0.0) {
                continue;
            }
            // saturates for huge timestamps
            let bucket = (line / 1000.0).floor() as i64;
            measure_lines.entry(bucket).or_default().push(line);
        }

        Self {
            tracks,
            measure_lines,
            markers: Vec::new(),
            end_ms,
        }
    }

    pub fn with_markers(self, mut markers: Vec<Marker>) -> Self {
        markers.sort_by(|a, b| a.timestamp_ms.total_cmp(&b.timestamp_ms));
        Self { markers, ..self }
    }

    pub fn end_ms(&self) -> f64 {
        self.end_ms
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn tracks(&self) -> impl Iterator<Item = (TrackId, &[Note])> {
        self.tracks
            .iter()
            .map(|(id, track)| (*id, track.notes.as_slice()))
    }

    pub fn measure_lines_in_second(&self, second: i64) -> &[f64] {
        self.measure_lines
            .get(&second)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Notes of `track` overlapping `[from_ms, to_ms]`, sustain tails included.
    pub fn notes_between(
        &self,
        track: TrackId,
        from_ms: f64,
        to_ms: f64,
    ) -> impl Iterator<Item = &Note> {
        let (notes, reach) = self
            .tracks
            .get(&track)
            .map_or((&[][..], &[][..]), |t| (t.notes.as_slice(), t.reach.as_slice()));

        let from = reach.partition_point(|r| *r < from_ms);
        let upto = notes.partition_point(|n| n.start_ms <= to_ms).max(from);

        notes[from..upto]
            .iter()
            .filter(move |n| n.visible_until_ms() >= from_ms)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PlayerState<'a> {
    /// Seconds.
    pub time: f64,
    pub song: Option<&'a Song>,
}

impl<'a> PlayerState<'a> {
    pub fn new(time: f64, song: Option<&'a Song>) -> Self {
        Self {
            time: if time.is_finite() { time } else { 0.0 },
            song,
        }
    }

    pub fn time_ms(&self) -> f64 {
        self.time * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(i: u16) -> TrackId {
        TrackId::new(i).unwrap()
    }

    #[test]
    fn groups_and_sorts_notes() {
        let song = Song::new(
            vec![
                Note::new(0, 60, 90, 2000.0, 2500.0, track(1)),
                Note::new(1, 62, 90, 0.0, 500.0, track(1)),
                Note::new(2, 64, 90, 100.0, 900.0, track(0)),
            ],
            [],
        );

        let tracks = song.tracks().collect::<Vec<_>>();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].0, track(0));
        assert_eq!(tracks[1].1[0].start_ms, 0.0);
        assert_eq!(song.end_ms(), 2500.0);
    }

    #[test]
    fn buckets_measure_lines_by_second() {
        let song = Song::new(vec![], [0.0, 500.0, 2000.0, 2999.0, -1.0, f64::NAN]);
        assert_eq!(song.measure_lines_in_second(0), &[0.0, 500.0]);
        assert!(song.measure_lines_in_second(1).is_empty());
        assert_eq!(song.measure_lines_in_second(2), &[2000.0, 2999.0]);
        assert!(song.measure_lines_in_second(-3).is_empty());
        assert!(song.measure_lines_in_second(99).is_empty());
    }

    #[test]
    fn window_query_includes_sustain_tails() {
        let song = Song::new(
            vec![
                Note::new(0, 60, 90, 0.0, 100.0, track(0)).with_sustain(5000.0),
                Note::new(1, 62, 90, 0.0, 100.0, track(0)),
                Note::new(2, 64, 90, 9000.0, 9100.0, track(0)),
            ],
            [],
        );

        let ids = song
            .notes_between(track(0), 1000.0, 4000.0)
            .map(|n| n.id.0)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![0]);
    }

    #[test]
    fn far_measure_lines_do_not_blow_up() {
        let song = Song::new(vec![], [1e12, f64::MAX, 1500.0]);
        assert_eq!(song.measure_lines_in_second(1), &[1500.0]);
        assert_eq!(song.measure_lines_in_second(1_000_000_000), &[1e12]);
        assert_eq!(song.measure_lines_in_second(i64::MAX), &[f64::MAX]);
    }

    #[test]
    fn window_query_skips_notes_long_finished() {
        let mut notes = (0..1000)
            .map(|i| Note::new(i, 60, 90, i as f64 * 10.0, i as f64 * 10.0 + 5.0, track(0)))
            .collect::<Vec<_>>();
        notes.push(Note::new(5000, 48, 90, 0.0, 10.0, track(0)).with_sustain(9_000.0));
        let song = Song::new(notes, []);

        let ids = song
            .notes_between(track(0), 8_000.0, 8_020.0)
            .map(|n| n.id.0)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![5000, 800, 801, 802]);

        assert_eq!(song.notes_between(track(0), 20_000.0, 30_000.0).count(), 0);
        assert_eq!(song.notes_between(track(1), 0.0, 30_000.0).count(), 0);
    }

    #[test]
    fn non_finite_time_is_reset() {
        assert_eq!(PlayerState::new(f64::NAN, None).time, 0.0);
    }
}
