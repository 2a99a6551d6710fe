use crate::time_slot::*;
use ::serde::*;

pub const TBA_INSTRUCTOR: &str = "To Be Announced";

/// Catalog shape of a section, before its meeting times are parsed.
#[derive(Clone, Debug, Deserialize)]
struct RawSection {
    #[serde(default)]
    section: String,
    #[serde(default = "default_instructor")]
    instructor: String,
    #[serde(default)]
    time: String,
    #[serde(default)]
    room: String,
    #[serde(default)]
    exam: String,
}

fn default_instructor() -> String {
    TBA_INSTRUCTOR.to_string()
}

/// One enrollable offering of a course. The meeting times are parsed once
/// when the section is built and never change afterwards.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "RawSection")]
pub struct Section {
    #[serde(rename = "section")]
    section_id: String,
    instructor: String,
    #[serde(rename = "time")]
    raw_time: String,
    room: String,
    #[serde(rename = "exam")]
    exam_info: String,
    #[serde(rename = "slots")]
    parsed_slots: Vec<TimeSlot>,
}

impl From<RawSection> for Section {
    fn from(raw: RawSection) -> Self {
        Section::new(raw.section, raw.instructor, raw.time, raw.room, raw.exam)
    }
}

impl Section {
    pub fn new(
        section_id: String,
        instructor: String,
        raw_time: String,
        room: String,
        exam_info: String,
    ) -> Self {
        let parsed_slots = parse_time_slots(&raw_time);

        Section {
            section_id,
            instructor,
            raw_time,
            room,
            exam_info,
            parsed_slots,
        }
    }

    /// Shorthand for a section that only carries an id and a meeting time.
    pub fn with_time(section_id: &str, raw_time: &str) -> Self {
        Section::new(
            section_id.to_string(),
            TBA_INSTRUCTOR.to_string(),
            raw_time.to_string(),
            String::new(),
            String::new(),
        )
    }

    pub fn get_section_id(&self) -> &String {
        &self.section_id
    }

    pub fn get_instructor(&self) -> &String {
        &self.instructor
    }

    pub fn get_raw_time(&self) -> &String {
        &self.raw_time
    }

    pub fn get_room(&self) -> &String {
        &self.room
    }

    pub fn get_exam_info(&self) -> &String {
        &self.exam_info
    }

    pub fn get_slots(&self) -> &[TimeSlot] {
        &self.parsed_slots
    }
}

/// A catalog entry. Its sections are mutually exclusive choices.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Course {
    code: String,
    #[serde(rename = "name", alias = "title", default)]
    title: String,
    #[serde(default)]
    sections: Vec<Section>,
}

impl Course {
    pub fn new(code: String, title: String, sections: Vec<Section>) -> Self {
        Course {
            code,
            title,
            sections,
        }
    }

    pub fn get_code(&self) -> &String {
        &self.code
    }

    pub fn get_title(&self) -> &String {
        &self.title
    }

    pub fn get_sections(&self) -> &[Section] {
        &self.sections
    }

    /// Same course, different section list. Used by filters that narrow
    /// the choices before a search.
    pub fn with_sections(&self, sections: Vec<Section>) -> Course {
        Course {
            code: self.code.clone(),
            title: self.title.clone(),
            sections,
        }
    }
}

/// A section picked into a schedule, carrying its course's code and title
/// so consumers never need to look the course up again.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct ScheduledSection {
    code: String,
    #[serde(rename = "name")]
    title: String,
    #[serde(flatten)]
    section: Section,
}

impl ScheduledSection {
    pub fn new(course: &Course, section: &Section) -> Self {
        ScheduledSection {
            code: course.code.clone(),
            title: course.title.clone(),
            section: section.clone(),
        }
    }

    pub fn get_code(&self) -> &String {
        &self.code
    }

    pub fn get_title(&self) -> &String {
        &self.title
    }

    pub fn get_section(&self) -> &Section {
        &self.section
    }
}

/// One complete, conflict-free timetable: one section per requested course.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize)]
#[serde(transparent)]
pub struct ScheduleCandidate {
    sections: Vec<ScheduledSection>,
}

impl ScheduleCandidate {
    pub fn new(sections: Vec<ScheduledSection>) -> Self {
        ScheduleCandidate { sections }
    }

    pub fn get_sections(&self) -> &[ScheduledSection] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
