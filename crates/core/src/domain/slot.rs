use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Minutes per delivery bucket. Extracted times are floored onto this grid.
pub const SLOT_GRID_MINUTES: u8 = 15;

/// A 15-minute delivery time bucket, rendered as `HH:MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    hour: u8,
    minute: u8,
}

impl Slot {
    pub fn new(hour: u8, minute: u8) -> Result<Self, DomainError> {
        if hour > 23 || minute > 59 || minute % SLOT_GRID_MINUTES != 0 {
            return Err(DomainError::InvalidSlot {
                hour: u32::from(hour),
                minute: u32::from(minute),
            });
        }
        Ok(Self { hour, minute })
    }

    /// Builds a slot from a raw extracted hour/minute pair: out-of-range
    /// values are rejected, in-range minutes are floored to the grid.
    pub fn from_extracted(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        let floored = (minute as u8 / SLOT_GRID_MINUTES) * SLOT_GRID_MINUTES;
        Some(Self { hour: hour as u8, minute: floored })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// The next slot on the grid, or `None` past the end of day.
    pub fn succ(&self) -> Option<Self> {
        let mut hour = self.hour;
        let mut minute = self.minute + SLOT_GRID_MINUTES;
        if minute >= 60 {
            minute = 0;
            hour += 1;
        }
        if hour > 23 {
            return None;
        }
        Some(Self { hour, minute })
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for Slot {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvariantViolation(format!("malformed slot `{value}`"));
        let (hour, minute) = value.split_once(':').ok_or_else(invalid)?;
        let hour = hour.parse::<u8>().map_err(|_| invalid())?;
        let minute = minute.parse::<u8>().map_err(|_| invalid())?;
        Slot::new(hour, minute)
    }
}

#[cfg(test)]
mod tests {
    use super::Slot;

    #[test]
    fn renders_zero_padded() {
        let slot = Slot::new(19, 0).expect("valid slot");
        assert_eq!(slot.to_string(), "19:00");
    }

    #[test]
    fn rejects_off_grid_minutes() {
        assert!(Slot::new(19, 10).is_err());
        assert!(Slot::new(24, 0).is_err());
    }

    #[test]
    fn extraction_floors_to_grid() {
        let slot = Slot::from_extracted(19, 37).expect("in range");
        assert_eq!(slot.to_string(), "19:30");
        assert!(Slot::from_extracted(25, 10).is_none());
        assert!(Slot::from_extracted(20, 60).is_none());
    }

    #[test]
    fn succ_walks_the_grid_and_stops_at_midnight() {
        let slot = Slot::new(22, 45).expect("valid slot");
        assert_eq!(slot.succ(), Some(Slot::new(23, 0).expect("valid slot")));
        assert_eq!(Slot::new(23, 45).expect("valid slot").succ(), None);
    }

    #[test]
    fn round_trips_through_display_and_from_str() {
        let slot = Slot::new(20, 15).expect("valid slot");
        assert_eq!(slot.to_string().parse::<Slot>().expect("parse"), slot);
        assert!("19:10".parse::<Slot>().is_err());
        assert!("19".parse::<Slot>().is_err());
    }
}
