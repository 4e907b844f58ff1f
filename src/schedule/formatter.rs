use chrono::NaiveDate;

use super::Lesson;
use crate::utils::datetime::ru_weekday;

/// Fixed notice appended when the day has no lessons.
pub const NO_LESSONS_NOTICE: &str = "Занятий нет, можно отдыхать.";

/// Renders a day's schedule into the outgoing message text.
///
/// Pure formatting: deterministic for identical inputs, no I/O, and the
/// lesson order is taken as-is from the parser (no re-sorting here).
pub fn format_schedule(group_number: &str, date: NaiveDate, lessons: &[Lesson]) -> String {
    let mut message = format!(
        "Расписание группы {} на {} ({}).\nПар: {}\n\n",
        group_number,
        date.format("%d.%m.%Y"),
        ru_weekday(date),
        lessons.len()
    );

    if lessons.is_empty() {
        message.push_str(NO_LESSONS_NOTICE);
        return message;
    }

    for (i, lesson) in lessons.iter().enumerate() {
        message.push_str(&format!(
            "{}. {} ({})\n Преподаватель: {}\n Аудитория: {}\n Время: {}-{}\n\n",
            i + 1,
            lesson.summary,
            lesson.kind,
            lesson.teacher,
            lesson.classroom,
            lesson.start.format("%H:%M"),
            lesson.end.format("%H:%M"),
        ));
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::LessonKind;
    use chrono::NaiveTime;

    fn lesson(summary: &str, start: (u32, u32), end: (u32, u32)) -> Lesson {
        Lesson {
            summary: summary.to_string(),
            kind: LessonKind::Lecture,
            teacher: "Иванов И.И.".to_string(),
            classroom: "401".to_string(),
            start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        }
    }

    #[test]
    fn header_has_group_date_weekday_and_count() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        let text = format_schedule("151-1", date, &[lesson("Физика", (8, 50), (10, 25))]);

        assert!(text.starts_with("Расписание группы 151-1 на 02.09.2024 (понедельник).\nПар: 1\n\n"));
        assert!(text.contains("1. Физика (Лекция)"));
        assert!(text.contains(" Время: 08:50-10:25"));
    }

    #[test]
    fn empty_day_gets_fixed_notice() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        let text = format_schedule("151-1", date, &[]);

        assert!(text.ends_with(NO_LESSONS_NOTICE));
        assert!(!text.contains("1."));
    }

    #[test]
    fn is_deterministic() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        let lessons = vec![
            lesson("Физика", (8, 50), (10, 25)),
            lesson("Математика", (10, 40), (12, 15)),
        ];

        assert_eq!(
            format_schedule("151-1", date, &lessons),
            format_schedule("151-1", date, &lessons)
        );
    }

    #[test]
    fn keeps_parser_order() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        let lessons = vec![
            lesson("Вторая", (10, 40), (12, 15)),
            lesson("Первая", (8, 50), (10, 25)),
        ];

        let text = format_schedule("151-1", date, &lessons);
        assert!(text.contains("1. Вторая"));
        assert!(text.contains("2. Первая"));
    }
}
