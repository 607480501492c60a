pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod monitor;
pub mod notify;
pub mod record;
pub mod report;
pub mod store;
