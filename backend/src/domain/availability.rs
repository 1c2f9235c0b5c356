//! Bookable slot calculation.
//!
//! A doctor's day is the fixed clinic window split into 30-minute slots. A
//! slot is unavailable when an existing appointment starts at exactly that
//! time of day; everything else is returned in ascending order.

use std::collections::HashSet;

use chrono::NaiveDate;

use super::appointment::SLOT_MINUTES;
use super::ids::DoctorId;
use super::schedule::TimeOfDay;

const MINUTES_PER_HOUR: u32 = 60;

/// Opening hours used for every doctor and date, in minutes after midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyWindow {
    opens_at: u32,
    closes_at: u32,
    slot_minutes: u32,
}

impl Default for DailyWindow {
    fn default() -> Self {
        Self::clinic_hours()
    }
}

impl DailyWindow {
    /// 09:00 to 17:00 in 30-minute slots.
    pub const fn clinic_hours() -> Self {
        Self {
            opens_at: 9 * MINUTES_PER_HOUR,
            closes_at: 17 * MINUTES_PER_HOUR,
            slot_minutes: SLOT_MINUTES.unsigned_abs() as u32,
        }
    }

    /// Every slot start in the window, ascending. The last slot ends at or
    /// before closing time.
    pub fn slots(&self) -> Vec<TimeOfDay> {
        if self.slot_minutes == 0 {
            return Vec::new();
        }
        (self.opens_at..self.closes_at)
            .step_by(self.slot_minutes as usize)
            .filter(|start| start + self.slot_minutes <= self.closes_at)
            .filter_map(|start| {
                TimeOfDay::from_hm(start / MINUTES_PER_HOUR, start % MINUTES_PER_HOUR)
            })
            .collect()
    }

    /// Slots whose start matches none of the booked start times.
    pub fn available_slots<I>(&self, booked: I) -> Vec<TimeOfDay>
    where
        I: IntoIterator<Item = TimeOfDay>,
    {
        let taken: HashSet<TimeOfDay> = booked.into_iter().collect();
        self.slots()
            .into_iter()
            .filter(|slot| !taken.contains(slot))
            .collect()
    }
}

/// Bookable slots for one doctor on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub doctor_id: DoctorId,
    pub date: NaiveDate,
    pub available_slots: Vec<TimeOfDay>,
}
