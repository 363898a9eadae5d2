pub mod bootstrap;
pub mod checklist;
pub mod config;
pub mod error;
pub mod generator;
pub mod io;
pub mod language;
pub mod paths;
pub mod progress;
pub mod readme;
pub mod repo;
pub mod runner;
pub mod scaffold;
pub mod status;
pub mod store;
pub mod symbol;

pub use error::{Result, TddError};
