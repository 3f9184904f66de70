pub mod locator_model;
pub mod registry;
pub mod report_builder;
