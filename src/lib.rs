//! Weekly timetable generation from course sections.
//!
//! Meeting times such as `"SUN 08:00-09:50 | TUE 08:00-09:50"` are parsed
//! into [`TimeSlot`]s when a [`Section`] is built. [`generate_schedules`]
//! then enumerates every choice of one section per [`Course`] in which no
//! two meetings overlap.
//!
//! The search is synchronous and always runs to completion. Callers that
//! need a deadline should run it on a worker thread and stop waiting.

pub mod catalog;
pub mod config;
pub mod course;
pub mod error;
pub mod exams;
pub mod filters;
pub mod scheduler;
pub mod summary;
pub mod time_slot;

pub use catalog::{load_catalog, Catalog};
pub use config::Config;
pub use course::{Course, ScheduleCandidate, ScheduledSection, Section};
pub use error::{CatalogError, ConfigError, FilterError};
pub use exams::{find_catalog_exam_conflicts, find_exam_conflicts, ExamConflict};
pub use filters::{BlockedHour, SectionFilter};
pub use scheduler::{conflicts, generate_schedules, search_space};
pub use summary::{instructor_summaries, summarize, InstructorSummary};
pub use time_slot::{format_time, overlaps, parse_time_slots, Day, TimeSlot};
