//! Intent recognition over raw message text.
//!
//! Commands are matched by case-insensitive substring containment rather
//! than strict slash-command parsing, so "покажи расписос 151-1" works the
//! same as a bare "расписос". Group and date tokens are extracted with
//! fixed regexes wherever they appear in the message.

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::datetime::QueryDay;

/// Group number token: digit, alphanumeric/Cyrillic, digit, optional dash
/// plus up to two trailing characters (e.g. "151-1", "589-м2").
#[allow(clippy::expect_used)]
static GROUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d\w\d(?:-\w{1,2})?").expect("Invalid regex"));

/// Explicit date token, DD.MM; the year is defaulted by the caller.
#[allow(clippy::expect_used)]
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2})\.(\d{2})").expect("Invalid regex"));

/// Broadcast text is whatever follows the /upd token.
#[allow(clippy::expect_used)]
static UPD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/upd\s*").expect("Invalid regex"));

/// What a raw message asks the bot to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Help,
    Bind { group: Option<String> },
    Unbind,
    Query {
        day: QueryDay,
        group: Option<String>,
        /// Explicit (day, month) token, if the message carried one.
        date: Option<(u32, u32)>,
    },
    /// Admin: list every binding.
    ListBindings,
    /// Admin: push arbitrary text to every bound chat.
    Broadcast { text: String },
}

/// Classifies a raw message. Returns `None` for messages the bot should
/// ignore (it lives in group chats and must not answer ordinary talk).
pub fn classify(text: &str) -> Option<Intent> {
    let lower = text.to_lowercase();

    if lower.contains("/help") {
        return Some(Intent::Help);
    }
    if lower.contains("/unbind") {
        return Some(Intent::Unbind);
    }
    if lower.contains("/bind") {
        return Some(Intent::Bind {
            group: extract_group(&lower),
        });
    }
    if lower.contains("/db") {
        return Some(Intent::ListBindings);
    }
    if lower.contains("/upd ") {
        return Some(Intent::Broadcast {
            text: UPD_RE.replace(text, "").trim().to_string(),
        });
    }
    if lower.contains("расписос на завтра") {
        return Some(Intent::Query {
            day: QueryDay::Tomorrow,
            group: extract_group(&lower),
            date: extract_date(&lower),
        });
    }
    if lower.contains("расписос") {
        return Some(Intent::Query {
            day: QueryDay::Today,
            group: extract_group(&lower),
            date: extract_date(&lower),
        });
    }

    None
}

fn extract_group(text: &str) -> Option<String> {
    // The date token also matches \d\w\d ("12.09" -> "2.0"), so the date
    // is cut out before looking for a group number.
    let without_date = DATE_RE.replace_all(text, " ");
    GROUP_RE
        .find(&without_date)
        .map(|m| m.as_str().to_string())
}

fn extract_date(text: &str) -> Option<(u32, u32)> {
    let caps = DATE_RE.captures(text)?;
    let day = caps.get(1)?.as_str().parse().ok()?;
    let month = caps.get(2)?.as_str().parse().ok()?;
    Some((day, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_is_matched_anywhere() {
        assert_eq!(classify("дай /help плз"), Some(Intent::Help));
    }

    #[test]
    fn bind_extracts_group_token() {
        assert_eq!(
            classify("/bind 151-1"),
            Some(Intent::Bind {
                group: Some("151-1".to_string())
            })
        );
        assert_eq!(classify("/bind"), Some(Intent::Bind { group: None }));
    }

    #[test]
    fn unbind_is_not_swallowed_by_bind() {
        assert_eq!(classify("/unbind"), Some(Intent::Unbind));
    }

    #[test]
    fn query_today_with_defaults() {
        assert_eq!(
            classify("расписос"),
            Some(Intent::Query {
                day: QueryDay::Today,
                group: None,
                date: None
            })
        );
    }

    #[test]
    fn query_tomorrow_wins_over_today() {
        assert_eq!(
            classify("расписос на завтра"),
            Some(Intent::Query {
                day: QueryDay::Tomorrow,
                group: None,
                date: None
            })
        );
    }

    #[test]
    fn query_with_explicit_group_and_date() {
        assert_eq!(
            classify("Расписос 589-м2 12.09"),
            Some(Intent::Query {
                day: QueryDay::Today,
                group: Some("589-м2".to_string()),
                date: Some((12, 9)),
            })
        );
    }

    #[test]
    fn date_token_is_not_mistaken_for_a_group() {
        assert_eq!(
            classify("расписос 12.09"),
            Some(Intent::Query {
                day: QueryDay::Today,
                group: None,
                date: Some((12, 9)),
            })
        );
    }

    #[test]
    fn cyrillic_group_suffix_is_accepted() {
        assert_eq!(extract_group("расписос 1в1-юб"), Some("1в1-юб".to_string()));
    }

    #[test]
    fn admin_intents() {
        assert_eq!(classify("/db"), Some(Intent::ListBindings));
        assert_eq!(
            classify("/upd Пары отменили, расходимся"),
            Some(Intent::Broadcast {
                text: "Пары отменили, расходимся".to_string()
            })
        );
    }

    #[test]
    fn plain_chatter_is_ignored() {
        assert_eq!(classify("когда пары?"), None);
        assert_eq!(classify(""), None);
    }
}
