//! # Raspisos Bot
//!
//! A Telegram bot that delivers university group timetables. A chat binds
//! itself to a group number once; after that the bot answers schedule
//! queries and pushes the day's schedule twice a day (mornings for today,
//! evenings for tomorrow) to every bound chat.
//!
//! ## Features
//! - Bind/unbind a chat to an academic group number
//! - On-demand schedule queries for today, tomorrow or an explicit date
//! - Twice-daily scheduled broadcasts with Sunday roll-forward
//! - iCalendar feed retrieval with a per-group local cache
//! - Persistent bindings in SQLite

/// Message routing, intent recognition and reply handlers
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// Timetable feed retrieval, parsing and rendering
pub mod schedule;
/// Background services: scheduled broadcasts and the health endpoint
pub mod services;
/// Date helpers shared by the router and the broadcaster
pub mod utils;
