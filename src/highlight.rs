use crate::note::NoteId;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct KeyTracker {
    previous: HashSet<NoteId>,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids in `active` that were not active last frame.
    pub fn observe<I>(&mut self, active: I) -> Vec<NoteId>
    where
        I: IntoIterator<Item = NoteId>,
    {
        let mut current = HashSet::new();
        let mut onsets = Vec::new();

        for id in active {
            if current.insert(id) && !self.previous.contains(&id) {
                onsets.push(id);
            }
        }

        self.previous = current;
        onsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<NoteId> {
        raw.iter().copied().map(NoteId).collect()
    }

    #[test]
    fn held_note_fires_once() {
        let mut t = KeyTracker::new();
        let mut fired = Vec::new();

        for _ in 0..5 {
            fired.extend(t.observe(ids(&[4])));
        }
        assert_eq!(fired, ids(&[4]));
    }

    #[test]
    fn gap_retriggers() {
        let mut t = KeyTracker::new();
        assert_eq!(t.observe(ids(&[1])), ids(&[1]));
        assert!(t.observe(ids(&[])).is_empty());
        assert_eq!(t.observe(ids(&[1])), ids(&[1]));
    }

    #[test]
    fn seek_resyncs_in_one_frame() {
        let mut t = KeyTracker::new();
        t.observe(ids(&[1, 2, 3]));

        // jump somewhere else entirely
        assert_eq!(t.observe(ids(&[9, 2])), ids(&[9]));
        assert_eq!(t.observe(ids(&[9, 2])), ids(&[]));

        // and back, to notes dropped by the jump
        assert_eq!(t.observe(ids(&[1, 2, 3])), ids(&[1, 3]));
    }

    #[test]
    fn duplicates_in_one_frame_fire_once() {
        let mut t = KeyTracker::new();
        assert_eq!(t.observe(ids(&[5, 5, 6])), ids(&[5, 6]));
    }
}
