use crate::*;
use actix_web::{get, post, web, HttpResponse};
use log::{error, info, warn};
use section_scheduler::{
    find_catalog_exam_conflicts, find_exam_conflicts, generate_schedules, instructor_summaries,
    search_space, Course, ExamConflict, InstructorSummary, ScheduleCandidate, SectionFilter,
};
use ::serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

#[derive(Debug, Serialize)]
struct ReturnCourses<'a> {
    timestamp: u64,
    courses: &'a [Course],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReturnCourse<'a> {
    course: &'a Course,
    instructor_summaries: Vec<InstructorSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReturnSchedule {
    sections: ScheduleCandidate,
    exam_conflicts: Vec<ExamConflict>,
}

#[derive(Debug, Serialize)]
struct ReturnSchedules {
    total: usize,
    schedules: Vec<ReturnSchedule>,
}

#[derive(Debug, Serialize)]
struct Status {
    alive: bool,
    timestamp: u64,
    courses: usize,
}

#[derive(Debug, Serialize)]
struct ErrorMessage {
    error: String,
}

impl ErrorMessage {
    fn new(error: impl Display) -> Self {
        ErrorMessage {
            error: error.to_string(),
        }
    }
}

/// Courses the student wants scheduled, plus the filters the search should
/// respect.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    courses: Vec<String>,
    /// Course code -> allowed instructors; absent codes allow everyone
    #[serde(default)]
    instructor_filters: HashMap<String, Vec<String>>,
    /// "day-hour" keys, e.g. "0-8" for Sunday 8 AM
    #[serde(default)]
    blocked_slots: Vec<String>,
}

/// @returns every course in the catalog with the time it was loaded
#[get("/fullUpdate")]
pub async fn update_all_courses(state: web::Data<AppState>) -> HttpResponse {
    let lock = state.database.lock().await;

    let catalog = lock.catalog.clone();
    let last_change = lock.last_change;

    drop(lock);

    HttpResponse::Ok().json(ReturnCourses {
        timestamp: last_change,
        courses: catalog.courses(),
    })
}

/// Since the catalog changes only occasionally, this endpoint is used to
/// send it only if the client's copy is out of date.
#[get("/updateIfStale/{unix_timestamp_seconds}")]
pub async fn update_if_stale(path: web::Path<u64>, state: web::Data<AppState>) -> HttpResponse {
    let unix_timestamp_seconds = path.into_inner();

    let lock = state.database.lock().await;

    if lock.last_change != unix_timestamp_seconds {
        info!("Serving course update!");
        let catalog = lock.catalog.clone();
        let last_change = lock.last_change;

        drop(lock);

        HttpResponse::Ok().json(ReturnCourses {
            timestamp: last_change,
            courses: catalog.courses(),
        })
    } else {
        info!("No course update needed!");
        HttpResponse::Ok().json("No update needed")
    }
}

#[get("/course/{code}")]
pub async fn get_course(path: web::Path<String>, state: web::Data<AppState>) -> HttpResponse {
    let code = path.into_inner().to_uppercase();

    let lock = state.database.lock().await;
    let catalog = lock.catalog.clone();
    drop(lock);

    match catalog.get(&code) {
        Some(course) => HttpResponse::Ok().json(ReturnCourse {
            course,
            instructor_summaries: instructor_summaries(course),
        }),
        None => HttpResponse::NotFound().json(ErrorMessage::new(format!(
            "Unknown course code: {}",
            code
        ))),
    }
}

#[get("/examConflicts")]
pub async fn get_exam_conflicts(state: web::Data<AppState>) -> HttpResponse {
    let lock = state.database.lock().await;
    let catalog = lock.catalog.clone();
    drop(lock);

    HttpResponse::Ok().json(find_catalog_exam_conflicts(catalog.courses()))
}

/// Filters the requested courses and enumerates every conflict-free
/// schedule. Course codes are matched case-insensitively, as in
/// `/course/{code}`.
///
/// A search that could exceed `max_search_space` combinations is refused up
/// front, since a running search cannot be stopped. The rest run on the
/// blocking pool; if one outlives the configured timeout the request fails
/// and the result is discarded.
#[post("/generateSchedules")]
pub async fn post_generate_schedules(
    post: web::Json<GenerateRequest>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let request = post.into_inner();

    if request.courses.is_empty() {
        return HttpResponse::BadRequest().json(ErrorMessage::new("No courses selected"));
    }

    let codes: Vec<String> = request
        .courses
        .iter()
        .map(|code| code.to_uppercase())
        .collect();

    let instructor_filters = request
        .instructor_filters
        .into_iter()
        .map(|(code, instructors)| (code.to_uppercase(), instructors))
        .collect();

    let filter = match SectionFilter::from_keys(instructor_filters, &request.blocked_slots) {
        Ok(filter) => filter,
        Err(e) => return HttpResponse::BadRequest().json(ErrorMessage::new(e)),
    };

    let lock = state.database.lock().await;
    let catalog = lock.catalog.clone();
    drop(lock);

    let selected = match catalog.select(&codes) {
        Ok(selected) => selected,
        Err(e) => return HttpResponse::NotFound().json(ErrorMessage::new(e)),
    };

    let courses = filter.apply(&selected);

    let combinations = search_space(&courses);
    if combinations > state.config.max_search_space {
        warn!(
            "Refusing search over {} combinations (limit {})",
            combinations, state.config.max_search_space
        );
        return HttpResponse::PayloadTooLarge().json(ErrorMessage::new(format!(
            "Too many section combinations ({}), select fewer courses or add filters",
            combinations
        )));
    }

    info!(
        "Generating schedules for {} course(s), {} combination(s)...",
        courses.len(),
        combinations
    );

    let timeout = state.config.generation_timeout();
    let search = web::block(move || generate_schedules(&courses));

    let schedules = match tokio::time::timeout(timeout, search).await {
        Ok(Ok(schedules)) => schedules,
        Ok(Err(e)) => {
            error!("Schedule generation failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorMessage::new("Schedule generation failed"));
        }
        Err(_) => {
            warn!("Schedule generation timed out after {:?}", timeout);
            return HttpResponse::ServiceUnavailable()
                .json(ErrorMessage::new("Schedule generation timed out"));
        }
    };

    let total = schedules.len();
    info!("Generated {} schedule(s)!", total);

    let schedules = schedules
        .into_iter()
        .take(state.config.max_schedules)
        .map(|schedule| ReturnSchedule {
            exam_conflicts: find_exam_conflicts(&schedule),
            sections: schedule,
        })
        .collect();

    HttpResponse::Ok().json(ReturnSchedules { total, schedules })
}

#[get("/status")]
pub async fn get_status(state: web::Data<AppState>) -> HttpResponse {
    let lock = state.database.lock().await;

    let status = Status {
        alive: true,
        timestamp: lock.last_change,
        courses: lock.catalog.len(),
    };

    drop(lock);

    HttpResponse::Ok().json(status)
}
