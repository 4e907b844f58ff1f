//! Twice-daily schedule broadcasts.
//!
//! Two cron jobs, one per slot: mornings send today's schedule, evenings
//! send tomorrow's. Off-schedule ticks cannot happen — the scheduler only
//! fires at the configured instants, so there is no "wrong hour" branch.

use std::future::Future;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use teloxide::prelude::*;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::bot::texts;
use crate::database::connection::DatabaseManager;
use crate::database::models::Binding;
use crate::schedule::fetcher::CalendarFetcher;
use crate::schedule::formatter::format_schedule;
use crate::schedule::parser::day_schedule;
use crate::utils::datetime::{resolve_target, QueryDay};

const MORNING_SCHEDULE: &str = "0 0 8 * * *";
const EVENING_SCHEDULE: &str = "0 0 20 * * *";

pub struct BroadcastService {
    bot: Bot,
    db: Arc<DatabaseManager>,
    fetcher: Arc<CalendarFetcher>,
    scheduler: JobScheduler,
}

impl BroadcastService {
    pub async fn new(
        bot: Bot,
        db: Arc<DatabaseManager>,
        fetcher: Arc<CalendarFetcher>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            bot,
            db,
            fetcher,
            scheduler,
        })
    }

    pub async fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let morning = self.slot_job(MORNING_SCHEDULE, QueryDay::Today)?;
        let evening = self.slot_job(EVENING_SCHEDULE, QueryDay::Tomorrow)?;

        self.scheduler.add(morning).await?;
        self.scheduler.add(evening).await?;
        self.scheduler.start().await?;

        info!("Broadcast service started - schedules go out at 08:00 and 20:00");
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.scheduler.shutdown().await?;
        Ok(())
    }

    // Manual trigger for testing
    pub async fn broadcast_now(&self, day: QueryDay) {
        broadcast_schedules(self.bot.clone(), self.db.clone(), self.fetcher.clone(), day).await;
    }

    fn slot_job(
        &self,
        schedule: &str,
        day: QueryDay,
    ) -> Result<Job, Box<dyn std::error::Error + Send + Sync>> {
        let bot = self.bot.clone();
        let db = self.db.clone();
        let fetcher = self.fetcher.clone();

        let job = Job::new_async(schedule, move |_uuid, _l| {
            let bot = bot.clone();
            let db = db.clone();
            let fetcher = fetcher.clone();
            Box::pin(async move {
                broadcast_schedules(bot, db, fetcher, day).await;
            })
        })?;

        Ok(job)
    }
}

/// Fans a freshly rendered schedule out to every bound chat. A failure for
/// one binding is logged and never aborts the rest of the batch.
async fn broadcast_schedules(
    bot: Bot,
    db: Arc<DatabaseManager>,
    fetcher: Arc<CalendarFetcher>,
    day: QueryDay,
) {
    let target = resolve_target(day, Local::now().date_naive());
    let sunday_notice = if target.rolled_over_sunday {
        Some(match day {
            QueryDay::Today => texts::TODAY_IS_SUNDAY,
            QueryDay::Tomorrow => texts::TOMORROW_IS_SUNDAY,
        })
    } else {
        None
    };

    let bindings = match Binding::list_all(&db.pool).await {
        Ok(bindings) => bindings,
        Err(e) => {
            error!(error = %e, "broadcast aborted: bindings listing failed");
            return;
        }
    };

    info!(
        count = bindings.len(),
        date = %target.date,
        "broadcasting schedules"
    );

    let delivered = fan_out_schedules(
        bindings,
        target.date,
        sunday_notice,
        |group, date| {
            let fetcher = fetcher.clone();
            async move { day_schedule(&fetcher, &group, date).await }
        },
        |chat_id, message| {
            let bot = bot.clone();
            async move { bot.send_message(ChatId(chat_id), message).await.map(|_| ()) }
        },
    )
    .await;

    info!(delivered, date = %target.date, "broadcast finished");
}

/// Runs the per-binding step of a broadcast: fetch lessons, render the
/// message (with the Sunday notice prefix, when set) and deliver it. A
/// failure for one binding is logged and never aborts the rest of the
/// batch. Returns the number of chats that got their schedule.
///
/// Fetching and sending are passed in so the fan-out can be driven
/// without a live feed or transport.
async fn fan_out_schedules<F, FFut, S, SFut, E>(
    bindings: Vec<Binding>,
    target_date: NaiveDate,
    sunday_notice: Option<&str>,
    mut fetch_lessons: F,
    mut send: S,
) -> usize
where
    F: FnMut(String, NaiveDate) -> FFut,
    FFut: Future<Output = Result<Vec<crate::schedule::Lesson>, crate::schedule::ScheduleError>>,
    S: FnMut(i64, String) -> SFut,
    SFut: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    let mut delivered = 0;

    for binding in bindings {
        let lessons = match fetch_lessons(binding.group_number.clone(), target_date).await {
            Ok(lessons) => lessons,
            Err(e) => {
                warn!(
                    chat = binding.chat_id,
                    group = %binding.group_number,
                    error = %e,
                    "skipping binding in broadcast"
                );
                continue;
            }
        };

        let mut message = sunday_notice.unwrap_or("").to_string();
        message.push_str(&format_schedule(
            &binding.group_number,
            target_date,
            &lessons,
        ));

        match send(binding.chat_id, message).await {
            Ok(()) => delivered += 1,
            Err(e) => {
                warn!(
                    chat = binding.chat_id,
                    group = %binding.group_number,
                    error = %e,
                    "broadcast delivery failed"
                );
            }
        }
    }

    delivered
}
