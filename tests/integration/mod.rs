// tests/integration/mod.rs

mod command_tasks;
mod config_loading;
mod failures;
mod orchestrator;
mod postrequisites;
mod support;
mod unresolved;
