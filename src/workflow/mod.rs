pub mod runner;
pub mod scenarios;
pub mod state;
