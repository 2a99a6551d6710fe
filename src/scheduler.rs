use crate::course::*;
use crate::time_slot::*;
use log::debug;

/// True if any meeting of `candidate` overlaps any meeting of a section
/// already in the schedule.
pub fn conflicts<'a, I>(candidate: &Section, schedule_so_far: I) -> bool
where
    I: IntoIterator<Item = &'a Section>,
{
    schedule_so_far.into_iter().any(|scheduled| {
        candidate.get_slots().iter().any(|new_slot| {
            scheduled
                .get_slots()
                .iter()
                .any(|existing_slot| overlaps(new_slot, existing_slot))
        })
    })
}

/// Number of section combinations a search would visit without pruning,
/// saturating at `u64::MAX`. Bounds the number of schedules it can return.
pub fn search_space(courses: &[Course]) -> u64 {
    courses.iter().fold(1u64, |total, course| {
        total.saturating_mul(course.get_sections().len() as u64)
    })
}

/// Enumerates every conflict-free choice of one section per course.
///
/// Courses with fewer sections are assigned first so that dead branches are
/// cut early; ties keep their input order. Within a course, sections are
/// tried in catalog order, so the output order is fully determined by the
/// input.
///
/// An empty course list yields a single empty schedule. A course without
/// sections makes every schedule impossible and yields no schedules.
pub fn generate_schedules(courses: &[Course]) -> Vec<ScheduleCandidate> {
    let mut ordered: Vec<&Course> = courses.iter().collect();
    ordered.sort_by_key(|course| course.get_sections().len());

    debug!(
        "Search order: {:?}",
        ordered.iter().map(|course| course.get_code()).collect::<Vec<_>>()
    );

    let mut results = Vec::new();
    let mut partial: Vec<(&Course, &Section)> = Vec::with_capacity(ordered.len());

    backtrack(&ordered, &mut partial, &mut results);

    debug!(
        "Found {} schedule(s) for {} course(s)",
        results.len(),
        ordered.len()
    );

    results
}

fn backtrack<'a>(
    courses: &[&'a Course],
    partial: &mut Vec<(&'a Course, &'a Section)>,
    results: &mut Vec<ScheduleCandidate>,
) {
    let depth = partial.len();

    if depth == courses.len() {
        let sections = partial
            .iter()
            .map(|(course, section)| ScheduledSection::new(course, section))
            .collect();

        results.push(ScheduleCandidate::new(sections));
        return;
    }

    let course = courses[depth];

    for section in course.get_sections() {
        if conflicts(section, partial.iter().map(|(_, chosen)| *chosen)) {
            continue;
        }

        partial.push((course, section));
        backtrack(courses, partial, results);
        partial.pop();
    }
}
