pub mod commands;
pub mod flows;
pub mod handlers;
pub mod quiz;
pub mod session;
pub mod texts;
