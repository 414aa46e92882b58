//! Road trip CLI library.
//!
//! Subcommand handlers, output renderers and terminal styling for the
//! `roadtrip` binary. Handlers write to a caller-supplied writer so they can be
//! exercised without spawning the binary.

pub mod commands;
pub mod output;
pub mod terminal;
