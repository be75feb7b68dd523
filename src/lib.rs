//! # Dobrocoin Bot
//!
//! A Telegram bot for a volunteering rewards program. Volunteers register,
//! then earn virtual coins for attending events (one-time code words),
//! submitting photo proof of good deeds, and completing a daily quiz.
//!
//! ## Features
//! - Registration with full name and volunteering experience
//! - One-time event code words worth 50 coins
//! - Good-deed photo submissions with admin review (30 coins on approval)
//! - Daily quiz with 20 coins per correct answer
//! - Auction lot listing and admin statistics export

/// Bot command handlers, per-chat sessions, and interactive flows
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// Operational services (health endpoints)
pub mod services;
/// Utility functions for dates and input validation
pub mod utils;
