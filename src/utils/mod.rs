//! Small helpers shared by the engine and the CLI.

pub mod exec;
pub mod plural;
