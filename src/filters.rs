use crate::course::*;
use crate::error::FilterError;
use crate::time_slot::*;
use ::serde::*;
use log::debug;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// One blocked hour of the week: `"0-8"` is Sunday 8:00-8:59.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct BlockedHour {
    pub day: Day,
    pub hour: u32,
}

impl BlockedHour {
    /// Whether the slot touches this hour. A slot ending exactly on the hour
    /// does not touch the following hour.
    pub fn touches(&self, slot: &TimeSlot) -> bool {
        if slot.get_day() != self.day {
            return false;
        }

        let first_hour = slot.get_start() / 60;
        let last_hour = (slot.get_end() - 1) / 60;

        first_hour <= self.hour && self.hour <= last_hour
    }
}

impl FromStr for BlockedHour {
    type Err = FilterError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let malformed = || FilterError::MalformedSlot {
            key: key.to_string(),
        };

        let (day, hour) = key.trim().split_once('-').ok_or_else(malformed)?;
        let day = day.trim().parse::<u8>().map_err(|_| malformed())?;
        let hour = hour.trim().parse::<u32>().map_err(|_| malformed())?;

        match Day::from_index(day) {
            Some(day) if hour < 24 => Ok(BlockedHour { day, hour }),
            _ => Err(FilterError::SlotOutOfRange {
                key: key.to_string(),
            }),
        }
    }
}

impl fmt::Display for BlockedHour {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.day.to_index(), self.hour)
    }
}

/// Student preferences applied to course sections before a search.
#[derive(Clone, Debug, Default)]
pub struct SectionFilter {
    allowed_instructors: HashMap<String, Vec<String>>,
    blocked_hours: HashSet<BlockedHour>,
}

impl SectionFilter {
    pub fn new(
        allowed_instructors: HashMap<String, Vec<String>>,
        blocked_hours: HashSet<BlockedHour>,
    ) -> Self {
        SectionFilter {
            allowed_instructors,
            blocked_hours,
        }
    }

    /// Builds a filter from `"day-hour"` keys as sent by clients.
    pub fn from_keys(
        allowed_instructors: HashMap<String, Vec<String>>,
        blocked_keys: &[String],
    ) -> Result<Self, FilterError> {
        let blocked_hours = blocked_keys
            .iter()
            .map(|key| key.parse::<BlockedHour>())
            .collect::<Result<HashSet<_>, _>>()?;

        Ok(SectionFilter::new(allowed_instructors, blocked_hours))
    }

    /// A course without an instructor list accepts every instructor.
    pub fn allows(&self, course: &Course, section: &Section) -> bool {
        if let Some(allowed) = self.allowed_instructors.get(course.get_code()) {
            if !allowed.contains(section.get_instructor()) {
                return false;
            }
        }

        !section.get_slots().iter().any(|slot| {
            self.blocked_hours
                .iter()
                .any(|blocked| blocked.touches(slot))
        })
    }

    /// Narrows each course to its allowed sections. Courses are kept even
    /// when nothing is left, so the search reports that no schedule exists.
    pub fn apply(&self, courses: &[Course]) -> Vec<Course> {
        courses
            .iter()
            .map(|course| {
                let sections: Vec<Section> = course
                    .get_sections()
                    .iter()
                    .filter(|section| self.allows(course, section))
                    .cloned()
                    .collect();

                debug!(
                    "{}: {} of {} section(s) pass filters",
                    course.get_code(),
                    sections.len(),
                    course.get_sections().len()
                );

                course.with_sections(sections)
            })
            .collect()
    }
}
