use std::fmt;

/**
 * A named display cell that shows the latest value received, without history.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Attention,
    Meditation,
    HeartRate,
    Blink,
    RawSample,
}

pub const SLOT_COUNT: usize = 5;

pub const SLOTS: [Slot; SLOT_COUNT] = [
    Slot::Attention,
    Slot::Meditation,
    Slot::HeartRate,
    Slot::Blink,
    Slot::RawSample,
];

impl Slot {
    fn index(&self) -> usize {
        match self {
            Slot::Attention => 0,
            Slot::Meditation => 1,
            Slot::HeartRate => 2,
            Slot::Blink => 3,
            Slot::RawSample => 4,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = match self {
            Slot::Attention => "Attention",
            Slot::Meditation => "Meditation",
            Slot::HeartRate => "Heart rate",
            Slot::Blink => "Blink",
            Slot::RawSample => "Raw data",
        };

        write!(f, "{}", result)
    }
}

/// Last value of every slot. Empty slots show nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingSlots {
    values: [Option<i32>; SLOT_COUNT],
    // total number of writes, across all slots
    writes: u64,
}

impl ReadingSlots {
    pub fn new() -> Self {
        ReadingSlots::default()
    }

    pub fn write(&mut self, slot: Slot, value: i32) {
        self.values[slot.index()] = Some(value);
        self.writes += 1;
    }

    pub fn get(&self, slot: Slot) -> Option<i32> {
        self.values[slot.index()]
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// The slot rendered as plain integer text.
    pub fn text(&self, slot: Slot) -> String {
        match self.get(slot) {
            None => "".to_string(),
            Some(value) => value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_slots_are_empty() {
        let slots = ReadingSlots::new();
        for slot in SLOTS {
            assert_eq!(slots.get(slot), None);
            assert_eq!(slots.text(slot), "");
        }
        assert_eq!(slots.writes(), 0);
    }

    #[test]
    fn test_last_write_wins() {
        let mut slots = ReadingSlots::new();
        slots.write(Slot::Blink, 55);
        slots.write(Slot::Blink, -3);
        assert_eq!(slots.get(Slot::Blink), Some(-3));
        assert_eq!(slots.text(Slot::Blink), "-3");
        assert_eq!(slots.writes(), 2);
    }

    #[test]
    fn test_slots_are_independent() {
        let mut slots = ReadingSlots::new();
        for (value, slot) in SLOTS.iter().enumerate() {
            slots.write(*slot, value as i32 * 10);
        }
        for (value, slot) in SLOTS.iter().enumerate() {
            assert_eq!(slots.get(*slot), Some(value as i32 * 10));
        }
    }
}
