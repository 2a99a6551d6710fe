use ::serde::*;
use chrono::NaiveTime;
use lazy_static::lazy_static;
use regex::Regex;
use std::convert::TryFrom;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

// H:MM or H:MM:SS on both sides of a hyphen, seconds are dropped
const TIME_RANGE_REGEX: &str = r"(\d{1,2}):(\d{2})(?::\d{2})?\s*-\s*(\d{1,2}):(\d{2})(?::\d{2})?";

const CLAUSE_DELIMITER: char = '|';

const TIME_FMT: &str = "%-I:%M %p";

lazy_static! {
    static ref TIME_RANGE: Regex = Regex::new(TIME_RANGE_REGEX).unwrap();
}

/// Day of the week, indexed from Sunday = 0 to Saturday = 6.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Day {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Sunday,
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    /// Looks up a lowercase day token. Single letters follow the catalog
    /// convention: `u` is Sunday, `s` is Saturday, `t` is Tuesday and `r`
    /// is Thursday.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "sun" | "u" | "sunday" => Some(Day::Sunday),
            "mon" | "m" | "monday" => Some(Day::Monday),
            "tue" | "t" | "tuesday" => Some(Day::Tuesday),
            "wed" | "w" | "wednesday" => Some(Day::Wednesday),
            "thu" | "r" | "thursday" => Some(Day::Thursday),
            "fri" | "f" | "friday" => Some(Day::Friday),
            "sat" | "s" | "saturday" => Some(Day::Saturday),
            _ => None,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Day::ALL.get(index as usize).copied()
    }

    pub fn to_index(&self) -> u8 {
        match self {
            Day::Sunday => 0,
            Day::Monday => 1,
            Day::Tuesday => 2,
            Day::Wednesday => 3,
            Day::Thursday => 4,
            Day::Friday => 5,
            Day::Saturday => 6,
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Day::Sunday => "Sun",
            Day::Monday => "Mon",
            Day::Tuesday => "Tue",
            Day::Wednesday => "Wed",
            Day::Thursday => "Thu",
            Day::Friday => "Fri",
            Day::Saturday => "Sat",
        }
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> u8 {
        day.to_index()
    }
}

impl TryFrom<u8> for Day {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Day::from_index(index).ok_or_else(|| format!("day index {} is out of range 0-6", index))
    }
}

/// One weekly meeting: a day plus a half-open `[start, end)` range in
/// minutes from midnight.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct TimeSlot {
    day: Day,
    start: u32,
    end: u32,
}

impl TimeSlot {
    /// Returns `None` unless `start < end < MINUTES_PER_DAY`.
    pub fn new(day: Day, start: u32, end: u32) -> Option<Self> {
        if start < end && end < MINUTES_PER_DAY {
            Some(TimeSlot { day, start, end })
        } else {
            None
        }
    }

    pub fn get_day(&self) -> Day {
        self.day
    }

    pub fn get_start(&self) -> u32 {
        self.start
    }

    pub fn get_end(&self) -> u32 {
        self.end
    }
}

/// Parses a catalog meeting-time string such as
/// `"SUN 08:00-09:50 | TUE 08:00-09:50"` into time slots.
///
/// Each `|`-separated clause contributes one slot per recognised day token,
/// all sharing the clause's time range. Clauses without a time range
/// ("TBA", "To Be Announced") contribute nothing. Never fails.
pub fn parse_time_slots(raw: &str) -> Vec<TimeSlot> {
    raw.split(CLAUSE_DELIMITER).flat_map(parse_clause).collect()
}

pub fn parse_time_slots_opt(raw: Option<&str>) -> Vec<TimeSlot> {
    raw.map(parse_time_slots).unwrap_or_default()
}

fn parse_clause(clause: &str) -> Vec<TimeSlot> {
    let lower = clause.to_lowercase();

    let captures = match TIME_RANGE.captures(&lower) {
        Some(captures) => captures,
        None => return Vec::new(),
    };

    let start = to_minutes(captures.get(1), captures.get(2));
    let end = to_minutes(captures.get(3), captures.get(4));

    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => return Vec::new(),
    };

    let remainder = TIME_RANGE.replace(&lower, "");

    remainder
        .split(|c: char| !c.is_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .filter_map(Day::from_token)
        .filter_map(|day| TimeSlot::new(day, start, end))
        .collect()
}

fn to_minutes(hour: Option<regex::Match>, minute: Option<regex::Match>) -> Option<u32> {
    let hour = hour?.as_str().parse::<u32>().ok()?;
    let minute = minute?.as_str().parse::<u32>().ok()?;

    Some(hour * 60 + minute)
}

/// Half-open intersection test; slots on different days never overlap.
pub fn overlaps(a: &TimeSlot, b: &TimeSlot) -> bool {
    if a.day != b.day {
        return false;
    }

    a.start.max(b.start) < a.end.min(b.end)
}

/// Renders minutes from midnight as 12-hour text, e.g. `"1:30 PM"`.
pub fn format_time(minutes: u32) -> String {
    let minutes = minutes % MINUTES_PER_DAY;

    match NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0) {
        Some(time) => format!("{}", time.format(TIME_FMT)),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: Day, start: u32, end: u32) -> TimeSlot {
        TimeSlot::new(day, start, end).unwrap()
    }

    #[test]
    fn parses_two_clauses() {
        let slots = parse_time_slots("SUN 08:00-09:50 | TUE 08:00-09:50");

        assert_eq!(
            slots,
            vec![slot(Day::Sunday, 480, 590), slot(Day::Tuesday, 480, 590)]
        );
    }

    #[test]
    fn one_slot_per_day_token() {
        let slots = parse_time_slots("SUN MON 08:00-09:00");

        assert_eq!(
            slots,
            vec![slot(Day::Sunday, 480, 540), slot(Day::Monday, 480, 540)]
        );
    }

    #[test]
    fn seconds_are_truncated() {
        assert_eq!(
            parse_time_slots("TUE 08:00:00-09:50:00"),
            vec![slot(Day::Tuesday, 480, 590)]
        );
    }

    #[test]
    fn placeholder_and_empty_input_yield_nothing() {
        assert!(parse_time_slots("TBA").is_empty());
        assert!(parse_time_slots("To Be Announced").is_empty());
        assert!(parse_time_slots("").is_empty());
        assert!(parse_time_slots_opt(None).is_empty());
    }

    #[test]
    fn bad_clause_does_not_spoil_the_rest() {
        let slots = parse_time_slots("TBA | thu 13:00 - 14:15");

        assert_eq!(slots, vec![slot(Day::Thursday, 780, 855)]);
    }

    #[test]
    fn single_letter_and_full_day_names() {
        let slots = parse_time_slots("U,R 8:00-9:00 | saturday 10:00-11:00");

        assert_eq!(
            slots,
            vec![
                slot(Day::Sunday, 480, 540),
                slot(Day::Thursday, 480, 540),
                slot(Day::Saturday, 600, 660),
            ]
        );
    }

    #[test]
    fn day_after_the_range_is_recognised() {
        assert_eq!(
            parse_time_slots("8:00-9:15 Wed"),
            vec![slot(Day::Wednesday, 480, 555)]
        );
    }

    #[test]
    fn unknown_tokens_are_ignored() {
        assert_eq!(
            parse_time_slots("Lecture MON 08:00-09:00 Room"),
            vec![slot(Day::Monday, 480, 540)]
        );
    }

    #[test]
    fn inverted_or_out_of_day_ranges_are_skipped() {
        assert!(parse_time_slots("MON 10:00-09:00").is_empty());
        assert!(parse_time_slots("MON 23:00-24:30").is_empty());
    }

    #[test]
    fn parsing_is_deterministic() {
        let raw = "SUN TUE 08:00-09:50 | W 14:00-15:15";

        assert_eq!(parse_time_slots(raw), parse_time_slots(raw));
    }

    #[test]
    fn day_table_has_no_collisions() {
        let tokens = [
            ("sun", "u", "sunday"),
            ("mon", "m", "monday"),
            ("tue", "t", "tuesday"),
            ("wed", "w", "wednesday"),
            ("thu", "r", "thursday"),
            ("fri", "f", "friday"),
            ("sat", "s", "saturday"),
        ];

        for (index, (short, letter, full)) in tokens.iter().enumerate() {
            let expected = Day::from_index(index as u8);
            assert_eq!(Day::from_token(short), expected);
            assert_eq!(Day::from_token(letter), expected);
            assert_eq!(Day::from_token(full), expected);
        }
    }

    #[test]
    fn touching_slots_do_not_overlap() {
        let a = slot(Day::Sunday, 480, 540);
        let b = slot(Day::Sunday, 540, 600);

        assert!(!overlaps(&a, &b));
        assert!(!overlaps(&b, &a));
    }

    #[test]
    fn intersecting_slots_overlap() {
        let a = slot(Day::Sunday, 480, 540);
        let b = slot(Day::Sunday, 500, 560);

        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn different_days_never_overlap() {
        let a = slot(Day::Sunday, 480, 540);
        let b = slot(Day::Monday, 480, 540);

        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn formats_twelve_hour_time() {
        assert_eq!(format_time(0), "12:00 AM");
        assert_eq!(format_time(480), "8:00 AM");
        assert_eq!(format_time(590), "9:50 AM");
        assert_eq!(format_time(720), "12:00 PM");
        assert_eq!(format_time(810), "1:30 PM");
    }

    #[test]
    fn day_serializes_as_index() {
        let json = serde_json::to_string(&slot(Day::Tuesday, 480, 590)).unwrap();

        assert_eq!(json, r#"{"day":2,"start":480,"end":590}"#);
        assert_eq!(serde_json::from_str::<Day>("6").unwrap(), Day::Saturday);
        assert!(serde_json::from_str::<Day>("7").is_err());
    }
}
