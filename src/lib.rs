//! A host-driven Z-Machine interpreter core.
//!
//! The machine consumes a story file image and queued input lines, and
//! produces a transcript. The host owns the instance and drives it by
//! calling [zmachine::ZMachine::update] between input events; rendering,
//! line editing and file storage are the host's concern.
#![crate_name = "zorkmid"]

#[macro_use]
extern crate log;

pub mod config;
pub mod error;
pub mod instruction;
pub mod object;
pub mod text;
pub mod zmachine;

#[cfg(test)]
pub mod test_util;
