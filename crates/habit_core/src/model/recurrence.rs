//! Weekly recurrence pattern and its compact integer form.
//!
//! # Responsibility
//! - Convert between seven named weekday flags and a 7-bit mask.
//! - Render the pattern as a short human label.
//!
//! # Invariants
//! - Bit position is the weekday's distance from Sunday: Sunday = bit 0
//!   (value 1), Monday = bit 1 (2), ... Saturday = bit 6 (64).
//! - `decode(encode(x)) == x` for every pattern and `encode(decode(n)) == n`
//!   for every `n` in `0..=127`.
//! - Decoding masks to the low 7 bits and never fails.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Mask applied to stored recurrence integers before decoding.
pub const RECURRENCE_MASK: i64 = 0x7F;

/// Canonical week order used for bit positions and labels.
pub const WEEK_ORDER: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

const SHORT_LABELS: [&str; 7] = ["Su", "M", "Tu", "W", "Th", "F", "Sa"];

/// Weekdays on which a task is due.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveDays {
    pub sunday: bool,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
}

impl ActiveDays {
    pub const NONE: Self = Self::from_flags([false; 7]);
    pub const EVERY_DAY: Self = Self::from_flags([true; 7]);
    pub const WEEKDAYS: Self = Self::from_flags([false, true, true, true, true, true, false]);
    pub const WEEKEND: Self = Self::from_flags([true, false, false, false, false, false, true]);

    /// Builds a pattern from flags in canonical week order (Sunday first).
    pub const fn from_flags(flags: [bool; 7]) -> Self {
        Self {
            sunday: flags[0],
            monday: flags[1],
            tuesday: flags[2],
            wednesday: flags[3],
            thursday: flags[4],
            friday: flags[5],
            saturday: flags[6],
        }
    }

    /// Returns flags in canonical week order (Sunday first).
    pub const fn flags(&self) -> [bool; 7] {
        [
            self.sunday,
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
        ]
    }

    /// Builds a pattern with exactly the given weekdays active.
    pub fn from_weekdays(days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut active = Self::NONE;
        for day in days {
            active.set(day, true);
        }
        active
    }

    pub fn is_active_on(&self, day: Weekday) -> bool {
        self.flags()[day.num_days_from_sunday() as usize]
    }

    pub fn set(&mut self, day: Weekday, active: bool) {
        let slot = match day {
            Weekday::Sun => &mut self.sunday,
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
        };
        *slot = active;
    }

    /// Active weekdays in canonical week order.
    pub fn active_weekdays(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEK_ORDER
            .into_iter()
            .filter(move |day| self.is_active_on(*day))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// Encodes the pattern as a 7-bit mask in `0..=127`.
    pub fn encode(&self) -> u8 {
        self.flags()
            .iter()
            .enumerate()
            .filter(|(_, active)| **active)
            .fold(0u8, |mask, (position, _)| mask | (1 << position))
    }

    /// Decodes a stored mask, ignoring everything above the low 7 bits.
    pub fn decode(bits: i64) -> Self {
        let masked = bits & RECURRENCE_MASK;
        let mut flags = [false; 7];
        for (position, flag) in flags.iter_mut().enumerate() {
            *flag = masked & (1 << position) != 0;
        }
        Self::from_flags(flags)
    }

    /// Human label for the pattern.
    ///
    /// Precedence: every day, then weekend only, then weekdays only, then the
    /// comma-joined short labels in week order. An empty pattern yields `""`.
    pub fn label(&self) -> String {
        if *self == Self::EVERY_DAY {
            return "Every day".to_string();
        }
        if *self == Self::WEEKEND {
            return "Every weekend".to_string();
        }
        if *self == Self::WEEKDAYS {
            return "Every weekday".to_string();
        }

        self.flags()
            .iter()
            .zip(SHORT_LABELS)
            .filter(|(active, _)| **active)
            .map(|(_, label)| label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Display for ActiveDays {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::{ActiveDays, WEEK_ORDER};
    use chrono::Weekday;

    #[test]
    fn sunday_is_low_bit_and_saturday_high_bit() {
        assert_eq!(ActiveDays::from_weekdays([Weekday::Sun]).encode(), 1);
        assert_eq!(ActiveDays::from_weekdays([Weekday::Sat]).encode(), 64);
        assert_eq!(ActiveDays::WEEKDAYS.encode(), 0b011_1110);
    }

    #[test]
    fn set_and_is_active_on_agree_for_every_weekday() {
        for day in WEEK_ORDER {
            let mut active = ActiveDays::NONE;
            active.set(day, true);
            assert!(active.is_active_on(day));
            assert_eq!(active.active_weekdays().collect::<Vec<_>>(), vec![day]);
        }
    }
}
