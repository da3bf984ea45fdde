// Library half of the `crease` binary, so integration tests can drive the
// commands without spawning a process.

pub mod cli;
pub mod commands;
pub mod settings;
