use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use teloxide::prelude::*;
use tracing::{error, info, warn};

use crate::bot::commands::{classify, Intent};
use crate::bot::texts;
use crate::database::connection::DatabaseManager;
use crate::database::models::Binding;
use crate::schedule::fetcher::CalendarFetcher;
use crate::schedule::formatter::format_schedule;
use crate::schedule::parser::day_schedule;
use crate::schedule::ScheduleError;
use crate::utils::datetime::{resolve_target, QueryDay};

pub async fn handle_message(
    bot: Bot,
    msg: Message,
    db: DatabaseManager,
    fetcher: Arc<CalendarFetcher>,
    admin_chat_id: i64,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(intent) = classify(text) else {
        return Ok(());
    };
    let chat_id = msg.chat.id;

    match intent {
        Intent::Help => {
            bot.send_message(chat_id, texts::HELP).await?;
        }
        Intent::Bind { group } => {
            handle_bind(&bot, chat_id, &db, group).await?;
        }
        Intent::Unbind => {
            handle_unbind(&bot, chat_id, &db).await?;
        }
        Intent::Query { day, group, date } => {
            handle_query(&bot, chat_id, &db, &fetcher, day, group, date).await?;
        }
        Intent::ListBindings => {
            handle_list_bindings(&bot, chat_id, &db, admin_chat_id).await?;
        }
        Intent::Broadcast { text } => {
            handle_admin_broadcast(&bot, chat_id, &db, admin_chat_id, &text).await?;
        }
    }

    Ok(())
}

async fn handle_bind(
    bot: &Bot,
    chat_id: ChatId,
    db: &DatabaseManager,
    group: Option<String>,
) -> ResponseResult<()> {
    let existing = match Binding::find_by_chat_id(&db.pool, chat_id.0).await {
        Ok(existing) => existing,
        Err(e) => {
            error!(chat = chat_id.0, error = %e, "binding lookup failed");
            bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
            return Ok(());
        }
    };

    let Some(group) = group else {
        let usage = texts::bind_usage(existing.as_ref().map(|b| b.group_number.as_str()));
        bot.send_message(chat_id, usage).await?;
        return Ok(());
    };

    match Binding::upsert(&db.pool, chat_id.0, &group).await {
        Ok(()) => {
            info!(chat = chat_id.0, group = %group, "chat bound to group");
            let reply = match existing {
                Some(old) => texts::successful_rebind(&old.group_number, &group),
                None => texts::successful_bind(&group),
            };
            bot.send_message(chat_id, reply).await?;
        }
        Err(e) => {
            error!(chat = chat_id.0, group = %group, error = %e, "binding insert failed");
            bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
        }
    }

    Ok(())
}

async fn handle_unbind(bot: &Bot, chat_id: ChatId, db: &DatabaseManager) -> ResponseResult<()> {
    match Binding::find_by_chat_id(&db.pool, chat_id.0).await {
        Ok(None) => {
            bot.send_message(chat_id, texts::NO_BINDING).await?;
        }
        Ok(Some(_)) => match Binding::remove(&db.pool, chat_id.0).await {
            Ok(()) => {
                info!(chat = chat_id.0, "binding removed");
                bot.send_message(chat_id, texts::UNBOUND).await?;
            }
            Err(e) => {
                error!(chat = chat_id.0, error = %e, "binding removal failed");
                bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
            }
        },
        Err(e) => {
            error!(chat = chat_id.0, error = %e, "binding lookup failed");
            bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
        }
    }

    Ok(())
}

async fn handle_query(
    bot: &Bot,
    chat_id: ChatId,
    db: &DatabaseManager,
    fetcher: &CalendarFetcher,
    day: QueryDay,
    group: Option<String>,
    date: Option<(u32, u32)>,
) -> ResponseResult<()> {
    // Explicit group wins; otherwise fall back to this chat's binding.
    let group = match group {
        Some(group) => group,
        None => match Binding::find_by_chat_id(&db.pool, chat_id.0).await {
            Ok(Some(binding)) => binding.group_number,
            Ok(None) => {
                bot.send_message(chat_id, texts::QUERY_USAGE).await?;
                return Ok(());
            }
            Err(e) => {
                error!(chat = chat_id.0, error = %e, "binding lookup failed");
                bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
                return Ok(());
            }
        },
    };

    let today = Local::now().date_naive();
    // An explicit DD.MM is used as-is (current year, no Sunday roll);
    // otherwise today/tomorrow with the weekend roll-forward.
    let (target_date, sunday_notice) = match date {
        Some((d, m)) => match NaiveDate::from_ymd_opt(today.year(), m, d) {
            Some(explicit) => (explicit, None),
            None => {
                bot.send_message(chat_id, texts::BAD_DATE).await?;
                return Ok(());
            }
        },
        None => {
            let target = resolve_target(day, today);
            let notice = if target.rolled_over_sunday {
                Some(match day {
                    QueryDay::Today => texts::TODAY_IS_SUNDAY,
                    QueryDay::Tomorrow => texts::TOMORROW_IS_SUNDAY,
                })
            } else {
                None
            };
            (target.date, notice)
        }
    };

    match day_schedule(fetcher, &group, target_date).await {
        Ok(lessons) => {
            let mut reply = sunday_notice.unwrap_or("").to_string();
            reply.push_str(&format_schedule(&group, target_date, &lessons));
            bot.send_message(chat_id, reply).await?;
        }
        Err(ScheduleError::UnknownFaculty { .. }) => {
            bot.send_message(chat_id, texts::UNKNOWN_FACULTY).await?;
        }
        Err(e) => {
            error!(chat = chat_id.0, group = %group, date = %target_date, error = %e, "schedule query failed");
            bot.send_message(chat_id, texts::FETCH_FAILED).await?;
        }
    }

    Ok(())
}

async fn handle_list_bindings(
    bot: &Bot,
    chat_id: ChatId,
    db: &DatabaseManager,
    admin_chat_id: i64,
) -> ResponseResult<()> {
    if chat_id.0 != admin_chat_id {
        bot.send_message(chat_id, texts::NO_ACCESS).await?;
        return Ok(());
    }

    match Binding::list_all(&db.pool).await {
        Ok(bindings) if bindings.is_empty() => {
            bot.send_message(chat_id, texts::NO_BINDINGS_YET).await?;
        }
        Ok(bindings) => {
            let mut reply = String::from("Актуальные ассоциации:\n");
            for (i, binding) in bindings.iter().enumerate() {
                reply.push_str(&format!(
                    "{}. Чат {} — группа {}\n",
                    i + 1,
                    binding.chat_id,
                    binding.group_number
                ));
            }
            bot.send_message(chat_id, reply).await?;
        }
        Err(e) => {
            error!(error = %e, "bindings listing failed");
            bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
        }
    }

    Ok(())
}

async fn handle_admin_broadcast(
    bot: &Bot,
    chat_id: ChatId,
    db: &DatabaseManager,
    admin_chat_id: i64,
    text: &str,
) -> ResponseResult<()> {
    if chat_id.0 != admin_chat_id {
        bot.send_message(chat_id, texts::NO_ACCESS).await?;
        return Ok(());
    }

    let bindings = match Binding::list_all(&db.pool).await {
        Ok(bindings) => bindings,
        Err(e) => {
            error!(error = %e, "bindings listing failed");
            bot.send_message(chat_id, texts::GENERIC_ERROR).await?;
            return Ok(());
        }
    };

    let mut delivered = Vec::new();
    for binding in &bindings {
        match bot.send_message(ChatId(binding.chat_id), text).await {
            Ok(_) => delivered.push(binding.chat_id.to_string()),
            Err(e) => {
                warn!(chat = binding.chat_id, error = %e, "admin broadcast delivery failed");
            }
        }
    }

    let report = if delivered.is_empty() {
        format!("Сообщение:\n\"{text}\"\n\nДоставить никуда не удалось.")
    } else {
        format!(
            "Сообщение:\n\"{text}\"\n\nОтправлено в чаты: {}",
            delivered.join(", ")
        )
    };
    bot.send_message(chat_id, report).await?;

    Ok(())
}
