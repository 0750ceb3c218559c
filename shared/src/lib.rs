//! # Turret Shared
//! Command table, command encoder and wire protocol definitions shared
//! between the turret relay server & the operator console client.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod command;
pub mod protocol;

pub use command::{
    CommandEncoder, CommandError, CommandTable, ResolvedCommand, TableError,
};
