//! Himsols CLI - Storefront pages in the terminal.
//!
//! The binary drives [`himsols_core`] page state from one-shot commands or an
//! interactive [`session`]. This library half holds everything except
//! argument parsing and subscriber setup so integration tests can reach it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod commands;
pub mod config;
pub mod output;
pub mod render;
pub mod scheduler;
pub mod session;

pub use config::{CliConfig, ConfigError};
pub use output::Output;
pub use scheduler::TokioResetScheduler;
pub use session::{Page, Session, Step};
