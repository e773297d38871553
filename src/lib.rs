//! Command line client for a digital detox server. Records daily screen time per category,
//! compares weekly and monthly averages with a daily limit, and keeps a prioritized todo list.
//!

pub mod api;
pub mod cli;
pub mod config;
pub mod screen_time;
pub mod state;
pub mod todo;
pub mod utils;
