//! Timetable pipeline: faculty resolution, feed retrieval, iCalendar
//! parsing and message rendering.

pub mod faculty;
pub mod fetcher;
pub mod formatter;
pub mod parser;

use chrono::NaiveTime;
use thiserror::Error;

/// Errors of the fetch/parse pipeline. User-facing text for these lives in
/// [`crate::bot::texts`]; the variants themselves go to the tracing log.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// The group number's leading digit(s) map to no known faculty.
    #[error("unknown faculty for group {group}")]
    UnknownFaculty { group: String },

    /// Transport failure retrieving the feed.
    #[error("failed to fetch timetable: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Local cache I/O failure.
    #[error("cache I/O error: {0}")]
    CacheIo(#[from] std::io::Error),

    /// The response body is not an iCalendar document.
    #[error("feed is not a calendar document")]
    InvalidCalendar,
}

/// Lesson kind derived from the first field of the event description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonKind {
    Lecture,
    Practice,
    Lab,
    SelfStudy,
    /// Anything the feed labels differently; keeps the raw label.
    Other(String),
}

impl LessonKind {
    pub fn from_feed(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("лекци") {
            LessonKind::Lecture
        } else if lower.contains("практи") || lower.contains("семинар") {
            LessonKind::Practice
        } else if lower.contains("лаборатор") {
            LessonKind::Lab
        } else if lower.contains("самостоятельн") {
            LessonKind::SelfStudy
        } else {
            LessonKind::Other(label.trim().to_string())
        }
    }
}

impl std::fmt::Display for LessonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LessonKind::Lecture => write!(f, "Лекция"),
            LessonKind::Practice => write!(f, "Практика"),
            LessonKind::Lab => write!(f, "Лабораторная работа"),
            LessonKind::SelfStudy => write!(f, "Самостоятельная работа"),
            LessonKind::Other(label) => write!(f, "{label}"),
        }
    }
}

/// One scheduled class occurrence. Request-scoped: built fresh for every
/// (group, date) query and handed straight to the formatter.
#[derive(Debug, Clone)]
pub struct Lesson {
    pub summary: String,
    pub kind: LessonKind,
    pub teacher: String,
    pub classroom: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_feed_labels() {
        assert_eq!(LessonKind::from_feed("Лекция"), LessonKind::Lecture);
        assert_eq!(LessonKind::from_feed("Практика"), LessonKind::Practice);
        assert_eq!(
            LessonKind::from_feed("Лабораторная работа"),
            LessonKind::Lab
        );
        assert_eq!(
            LessonKind::from_feed("Самостоятельная работа"),
            LessonKind::SelfStudy
        );
    }

    #[test]
    fn kind_keeps_unknown_label() {
        let kind = LessonKind::from_feed("Экзамен");
        assert_eq!(kind, LessonKind::Other("Экзамен".to_string()));
        assert_eq!(kind.to_string(), "Экзамен");
    }
}
