use crate::course::*;
use ::serde::*;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

// "05/01/2026 Monday 08:00-10:00" -> "05/01/2026 Monday"
const EXAM_DATE_REGEX: &str = r"^(\d{2}/\d{2}/\d{4}\s+\w+)";

const EXAM_PLACEHOLDER: &str = "TBA";

lazy_static! {
    static ref EXAM_DATE: Regex = Regex::new(EXAM_DATE_REGEX).unwrap();
}

/// Two or more courses holding their exams on the same day.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ExamConflict {
    pub date: String,
    pub courses: Vec<String>,
}

/// The day part of an exam description, or the whole description when it
/// does not start with a date. `None` for blank and TBA exams.
pub fn exam_date_key(exam: &str) -> Option<String> {
    let exam = exam.trim();

    if exam.is_empty() || exam.eq_ignore_ascii_case(EXAM_PLACEHOLDER) {
        return None;
    }

    match EXAM_DATE.captures(exam).and_then(|captures| captures.get(1)) {
        Some(date) => Some(date.as_str().to_string()),
        None => Some(exam.to_string()),
    }
}

fn group_by_exam_date<'a, I>(entries: I) -> BTreeMap<String, Vec<String>>
where
    I: IntoIterator<Item = (&'a String, &'a Section)>,
{
    let mut by_date: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (code, section) in entries {
        if let Some(date) = exam_date_key(section.get_exam_info()) {
            let codes = by_date.entry(date).or_default();

            if !codes.contains(code) {
                codes.push(code.clone());
            }
        }
    }

    by_date
}

/// Exam days shared by more than one course of a schedule, ordered by date
/// text. Exams on the same day conflict even when their hours differ.
pub fn find_exam_conflicts(schedule: &ScheduleCandidate) -> Vec<ExamConflict> {
    let entries = schedule
        .get_sections()
        .iter()
        .map(|scheduled| (scheduled.get_code(), scheduled.get_section()));

    group_by_exam_date(entries)
        .into_iter()
        .filter(|(_, courses)| courses.len() >= 2)
        .map(|(date, courses)| ExamConflict { date, courses })
        .collect()
}

/// Exam days shared across a whole catalog, busiest day first.
pub fn find_catalog_exam_conflicts(courses: &[Course]) -> Vec<ExamConflict> {
    let entries = courses.iter().flat_map(|course| {
        course
            .get_sections()
            .iter()
            .map(move |section| (course.get_code(), section))
    });

    let mut conflicts: Vec<ExamConflict> = group_by_exam_date(entries)
        .into_iter()
        .filter(|(_, courses)| courses.len() >= 2)
        .map(|(date, courses)| ExamConflict { date, courses })
        .collect();

    conflicts.sort_by(|a, b| b.courses.len().cmp(&a.courses.len()));

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::generate_schedules;

    fn section_with_exam(id: &str, time: &str, exam: &str) -> Section {
        Section::new(
            id.to_string(),
            "Staff".to_string(),
            time.to_string(),
            String::new(),
            exam.to_string(),
        )
    }

    fn course(code: &str, sections: Vec<Section>) -> Course {
        Course::new(code.to_string(), String::new(), sections)
    }

    #[test]
    fn date_key_takes_the_leading_date() {
        assert_eq!(
            exam_date_key("05/01/2026 Monday 08:00-10:00"),
            Some("05/01/2026 Monday".to_string())
        );
        assert_eq!(exam_date_key(" Take-home "), Some("Take-home".to_string()));
        assert_eq!(exam_date_key("TBA"), None);
        assert_eq!(exam_date_key(""), None);
    }

    #[test]
    fn same_day_exams_in_a_schedule_conflict() {
        let courses = vec![
            course(
                "A",
                vec![section_with_exam("10", "SUN 08:00-09:00", "05/01/2026 Monday 08:00-10:00")],
            ),
            course(
                "B",
                vec![section_with_exam("10", "MON 08:00-09:00", "05/01/2026 Monday 13:00-15:00")],
            ),
            course(
                "C",
                vec![section_with_exam("10", "TUE 08:00-09:00", "07/01/2026 Wednesday 08:00-10:00")],
            ),
            course("D", vec![section_with_exam("10", "WED 08:00-09:00", "TBA")]),
        ];

        let schedules = generate_schedules(&courses);
        assert_eq!(schedules.len(), 1);

        assert_eq!(
            find_exam_conflicts(&schedules[0]),
            vec![ExamConflict {
                date: "05/01/2026 Monday".to_string(),
                courses: vec!["A".to_string(), "B".to_string()],
            }]
        );
    }

    #[test]
    fn schedule_without_shared_days_has_no_conflicts() {
        let courses = vec![
            course("A", vec![section_with_exam("10", "SUN 08:00-09:00", "TBA")]),
            course("B", vec![section_with_exam("10", "MON 08:00-09:00", "")]),
        ];

        let schedules = generate_schedules(&courses);

        assert!(find_exam_conflicts(&schedules[0]).is_empty());
    }

    #[test]
    fn catalog_conflicts_are_unique_and_busiest_first() {
        let courses = vec![
            course(
                "A",
                vec![
                    section_with_exam("10", "", "05/01/2026 Monday 08:00-10:00"),
                    section_with_exam("20", "", "05/01/2026 Monday 08:00-10:00"),
                ],
            ),
            course("B", vec![section_with_exam("10", "", "05/01/2026 Monday 13:00-15:00")]),
            course("C", vec![section_with_exam("10", "", "07/01/2026 Wednesday 08:00-10:00")]),
            course("D", vec![section_with_exam("10", "", "07/01/2026 Wednesday 13:00-15:00")]),
            course("E", vec![section_with_exam("10", "", "05/01/2026 Monday 16:00-18:00")]),
        ];

        let conflicts = find_catalog_exam_conflicts(&courses);

        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].date, "05/01/2026 Monday");
        assert_eq!(conflicts[0].courses, vec!["A", "B", "E"]);
        assert_eq!(conflicts[1].date, "07/01/2026 Wednesday");
        assert_eq!(conflicts[1].courses, vec!["C", "D"]);
    }
}
