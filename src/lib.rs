pub mod cli;
pub mod config;
pub mod error;
pub mod progress;
pub mod repackage;
pub mod report;
pub mod spreadsheet;
