pub mod browser;
pub mod cli;
pub mod error;
pub mod interact;
pub mod locator;
pub mod report;
pub mod scan;
pub mod trace;
pub mod wait;
pub mod workflow;
