//! Command-line host: turns CLI input into a project context and a trigger.

pub mod orchestration;
