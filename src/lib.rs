pub mod api;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod detail;
pub mod logging;
pub mod output;
pub mod page;
pub mod record;
pub mod scroll;
pub mod search;
pub mod utils;

#[cfg(test)]
mod tests;
