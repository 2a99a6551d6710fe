use crate::course::*;
use crate::time_slot::*;
use ::serde::*;
use std::collections::{BTreeMap, BTreeSet};

pub const NO_SLOTS_PLACEHOLDER: &str = "TBA";

const GROUP_SEPARATOR: &str = " | ";

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct InstructorSummary {
    pub instructor: String,
    pub sections: Vec<String>,
    pub summary: String,
}

/// Describes the weekly pattern of a set of sections, e.g.
/// `"Sun/Tue 8:00 AM-9:50 AM | Mon 1:00 PM-2:15 PM"`.
///
/// Slots sharing a start and end time are merged into one group listing
/// their days. Groups are ordered by time of day.
pub fn summarize<'a, I>(sections: I) -> String
where
    I: IntoIterator<Item = &'a Section>,
{
    let mut groups: BTreeMap<(u32, u32), BTreeSet<Day>> = BTreeMap::new();

    for section in sections {
        for slot in section.get_slots() {
            groups
                .entry((slot.get_start(), slot.get_end()))
                .or_default()
                .insert(slot.get_day());
        }
    }

    if groups.is_empty() {
        return NO_SLOTS_PLACEHOLDER.to_string();
    }

    groups
        .iter()
        .map(|((start, end), days)| {
            let days = days
                .iter()
                .map(|day| day.short_name())
                .collect::<Vec<&str>>()
                .join("/");

            format!("{} {}-{}", days, format_time(*start), format_time(*end))
        })
        .collect::<Vec<String>>()
        .join(GROUP_SEPARATOR)
}

/// One summary per instructor of a course, in the order instructors first
/// appear in the section list.
pub fn instructor_summaries(course: &Course) -> Vec<InstructorSummary> {
    let mut by_instructor: Vec<(&String, Vec<&Section>)> = Vec::new();

    for section in course.get_sections() {
        match by_instructor
            .iter()
            .position(|(instructor, _)| *instructor == section.get_instructor())
        {
            Some(index) => by_instructor[index].1.push(section),
            None => by_instructor.push((section.get_instructor(), vec![section])),
        }
    }

    by_instructor
        .into_iter()
        .map(|(instructor, sections)| InstructorSummary {
            instructor: instructor.clone(),
            sections: sections
                .iter()
                .map(|section| section.get_section_id().clone())
                .collect(),
            summary: summarize(sections),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(id: &str, instructor: &str, time: &str) -> Section {
        Section::new(
            id.to_string(),
            instructor.to_string(),
            time.to_string(),
            String::new(),
            String::new(),
        )
    }

    #[test]
    fn merges_days_with_the_same_times() {
        let sections = vec![
            section("10", "A", "TUE 08:00-09:50 | SUN 08:00-09:50"),
            section("20", "A", "MON 13:00-14:15"),
        ];

        assert_eq!(
            summarize(&sections),
            "Sun/Tue 8:00 AM-9:50 AM | Mon 1:00 PM-2:15 PM"
        );
    }

    #[test]
    fn repeated_days_are_listed_once() {
        let sections = vec![
            section("10", "A", "SUN 08:00-09:00"),
            section("20", "A", "SUN 08:00-09:00"),
        ];

        assert_eq!(summarize(&sections), "Sun 8:00 AM-9:00 AM");
    }

    #[test]
    fn no_slots_gives_placeholder() {
        let sections = vec![section("10", "A", "TBA")];

        assert_eq!(summarize(&sections), NO_SLOTS_PLACEHOLDER);
        assert_eq!(summarize(&Vec::<Section>::new()), NO_SLOTS_PLACEHOLDER);
    }

    #[test]
    fn groups_sections_by_instructor() {
        let course = Course::new(
            "COMP2101".to_string(),
            "Data Structures".to_string(),
            vec![
                section("10", "Dr. Salim", "SUN TUE 08:00-09:50"),
                section("20", "Dr. Huda", "MON WED 10:00-11:15"),
                section("30", "Dr. Salim", "SUN TUE 12:00-13:50"),
            ],
        );

        let summaries = instructor_summaries(&course);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].instructor, "Dr. Salim");
        assert_eq!(summaries[0].sections, vec!["10", "30"]);
        assert_eq!(
            summaries[0].summary,
            "Sun/Tue 8:00 AM-9:50 AM | Sun/Tue 12:00 PM-1:50 PM"
        );
        assert_eq!(summaries[1].instructor, "Dr. Huda");
        assert_eq!(summaries[1].summary, "Mon/Wed 10:00 AM-11:15 AM");
    }
}
