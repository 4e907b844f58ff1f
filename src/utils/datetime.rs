use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Which day a schedule request targets relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryDay {
    Today,
    Tomorrow,
}

/// The date a query or broadcast should render, plus whether the Sunday
/// roll-forward fired (the caller prefixes the Sunday notice when it did).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleTarget {
    pub date: NaiveDate,
    pub rolled_over_sunday: bool,
}

/// Resolves the target date for `day` starting from `base` (the current
/// civil date). Sundays have no classes, so a Sunday target advances one
/// more day to Monday.
pub fn resolve_target(day: QueryDay, base: NaiveDate) -> ScheduleTarget {
    let candidate = match day {
        QueryDay::Today => base,
        QueryDay::Tomorrow => next_day(base),
    };

    if candidate.weekday() == Weekday::Sun {
        ScheduleTarget {
            date: next_day(candidate),
            rolled_over_sunday: true,
        }
    } else {
        ScheduleTarget {
            date: candidate,
            rolled_over_sunday: false,
        }
    }
}

pub fn ru_weekday(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "понедельник",
        Weekday::Tue => "вторник",
        Weekday::Wed => "среда",
        Weekday::Thu => "четверг",
        Weekday::Fri => "пятница",
        Weekday::Sat => "суббота",
        Weekday::Sun => "воскресенье",
    }
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}
