pub mod backend;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod input;
pub mod interactive;
pub mod logging;
pub mod progress;
pub mod session;
