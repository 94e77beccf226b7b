use crate::config::WATERMARK_LENGTH;
use crate::core::voter::Vote;

/// What a vote did to the watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotUpdate {
    Filled,
    Unchanged,
    Overwritten { previous: u8 },
    /// Position outside the watermark; the vote was discarded.
    Dropped,
}

/// Fixed-length array of 6-bit slot values, filled in as frames agree on them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Watermark {
    slots: [Option<u8>; WATERMARK_LENGTH],
}

impl Watermark {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a watermark with every slot set, e.g. from an encoded message.
    pub fn from_values(values: [u8; WATERMARK_LENGTH]) -> Self {
        let mut slots = [None; WATERMARK_LENGTH];
        for (slot, v) in slots.iter_mut().zip(values) {
            *slot = Some(v & 0x3f);
        }
        Self { slots }
    }

    /// Latest vote wins for a slot.
    pub fn apply(&mut self, vote: Vote) -> SlotUpdate {
        let Some(slot) = self.slots.get_mut(vote.position as usize) else {
            return SlotUpdate::Dropped;
        };
        let payload = vote.payload & 0x3f;
        match slot.replace(payload) {
            None => SlotUpdate::Filled,
            Some(prev) if prev == payload => SlotUpdate::Unchanged,
            Some(prev) => SlotUpdate::Overwritten { previous: prev },
        }
    }

    pub fn get(&self, position: usize) -> Option<u8> {
        self.slots.get(position).copied().flatten()
    }

    pub fn slots(&self) -> &[Option<u8>] {
        &self.slots
    }

    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Number of slots, set or not.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// No slot has been voted on yet.
    pub fn is_blank(&self) -> bool {
        self.filled() == 0
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// All slot values, or `None` while any slot is unset.
    pub fn values(&self) -> Option<[u8; WATERMARK_LENGTH]> {
        let mut out = [0u8; WATERMARK_LENGTH];
        for (o, s) in out.iter_mut().zip(&self.slots) {
            *o = (*s)?;
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(position: u8, payload: u8) -> Vote {
        Vote { position, payload }
    }

    #[test]
    fn test_new_is_unset() {
        let wm = Watermark::new();
        assert_eq!(wm.capacity(), 32);
        assert_eq!(wm.filled(), 0);
        assert!(wm.is_blank());
        assert!(!wm.is_complete());
        assert_eq!(wm.values(), None);
    }

    #[test]
    fn test_apply_fills_slot() {
        let mut wm = Watermark::new();
        assert_eq!(wm.apply(v(3, 17)), SlotUpdate::Filled);
        assert_eq!(wm.get(3), Some(17));
        assert_eq!(wm.filled(), 1);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut once = Watermark::new();
        once.apply(v(7, 40));

        let mut twice = Watermark::new();
        twice.apply(v(7, 40));
        assert_eq!(twice.apply(v(7, 40)), SlotUpdate::Unchanged);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_latest_vote_wins() {
        let mut wm = Watermark::new();
        wm.apply(v(0, 1));
        assert_eq!(wm.apply(v(0, 2)), SlotUpdate::Overwritten { previous: 1 });
        assert_eq!(wm.get(0), Some(2));
    }

    #[test]
    fn test_out_of_range_dropped() {
        let mut wm = Watermark::new();
        assert_eq!(wm.apply(v(32, 5)), SlotUpdate::Dropped);
        assert_eq!(wm.apply(v(63, 5)), SlotUpdate::Dropped);
        assert_eq!(wm, Watermark::new());
    }

    #[test]
    fn test_completion() {
        let mut wm = Watermark::new();
        for pos in 0..31u8 {
            wm.apply(v(pos, pos));
            assert!(!wm.is_complete());
        }
        wm.apply(v(31, 0));
        assert!(wm.is_complete());
        assert_eq!(wm.values().map(|vals| vals[31]), Some(0));
    }
}
