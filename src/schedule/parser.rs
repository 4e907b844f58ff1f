use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

use super::fetcher::CalendarFetcher;
use super::{Lesson, LessonKind, ScheduleError};

/// The feed stores "kind, teacher" in one DESCRIPTION field, with the comma
/// escaped per RFC 5545.
const DESCRIPTION_DELIMITER: &str = "\\, ";

/// Fetches the freshest feed for `group_number` and returns that day's
/// lessons sorted by start time. Always re-fetches: the remote timetable
/// changes without notice, so there is no stale-read path.
pub async fn day_schedule(
    fetcher: &CalendarFetcher,
    group_number: &str,
    date: NaiveDate,
) -> Result<Vec<Lesson>, ScheduleError> {
    let document = fetcher.fetch(group_number).await?;
    day_lessons(&document, date)
}

/// Extracts the lessons of one calendar day from an iCalendar document.
///
/// Events whose description does not carry the expected two fields are
/// skipped with a log line; a single malformed event never aborts the
/// whole parse. The result is sorted ascending by start time; ties keep
/// feed order (stable sort).
pub fn day_lessons(document: &str, date: NaiveDate) -> Result<Vec<Lesson>, ScheduleError> {
    if !document.contains("BEGIN:VCALENDAR") {
        return Err(ScheduleError::InvalidCalendar);
    }

    let unfolded = unfold(document);
    let mut lessons = Vec::new();
    let mut event: Option<EventFields> = None;

    for line in unfolded.lines() {
        if line == "BEGIN:VEVENT" {
            event = Some(EventFields::default());
            continue;
        }
        if line == "END:VEVENT" {
            if let Some(fields) = event.take() {
                if let Some(lesson) = lesson_for_date(fields, date) {
                    lessons.push(lesson);
                }
            }
            continue;
        }
        let Some(fields) = event.as_mut() else {
            continue;
        };
        // Property parameters after ';' (e.g. DTSTART;TZID=...) are ignored;
        // the feed uses local civil times.
        if let Some((name, value)) = line.split_once(':') {
            let name = name.split(';').next().unwrap_or(name).to_ascii_uppercase();
            match name.as_str() {
                "DTSTART" => fields.dtstart = Some(value.to_string()),
                "DTEND" => fields.dtend = Some(value.to_string()),
                "SUMMARY" => fields.summary = Some(value.to_string()),
                "DESCRIPTION" => fields.description = Some(value.to_string()),
                "LOCATION" => fields.location = Some(value.to_string()),
                _ => {}
            }
        }
    }

    lessons.sort_by_key(|lesson| lesson.start);
    Ok(lessons)
}

#[derive(Default)]
struct EventFields {
    dtstart: Option<String>,
    dtend: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    location: Option<String>,
}

fn lesson_for_date(fields: EventFields, date: NaiveDate) -> Option<Lesson> {
    let start = fields.dtstart.as_deref().and_then(parse_ics_datetime)?;
    if start.date() != date {
        return None;
    }

    let description = fields.description.unwrap_or_default();
    // Tolerant split-first: the first field is the kind, everything after
    // the first delimiter is the teacher (escaped commas inside the name
    // survive and are unescaped below).
    let mut parts = description.splitn(2, DESCRIPTION_DELIMITER);
    let kind_label = parts.next().unwrap_or_default();
    let Some(teacher) = parts.next() else {
        warn!(
            ?date,
            %description,
            "skipping event with unparseable description"
        );
        return None;
    };

    let end = fields
        .dtend
        .as_deref()
        .and_then(parse_ics_datetime)
        .map(|dt| dt.time())
        .unwrap_or_else(|| start.time());

    Some(Lesson {
        summary: unescape_text(fields.summary.as_deref().unwrap_or_default()),
        kind: LessonKind::from_feed(kind_label),
        teacher: unescape_text(teacher),
        classroom: fields.location.unwrap_or_default().replace('\\', ""),
        start: start.time(),
        end,
    })
}

/// Reassembles RFC 5545 folded lines (continuations start with a space or
/// a tab).
fn unfold(document: &str) -> String {
    let mut out = String::with_capacity(document.len());
    for raw in document.split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if let Some(rest) = line.strip_prefix(' ').or_else(|| line.strip_prefix('\t')) {
            out.push_str(rest);
        } else {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(line);
        }
    }
    out
}

fn parse_ics_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim().trim_end_matches('Z');
    NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y%m%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') | Some('N') => out.push('\n'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}
