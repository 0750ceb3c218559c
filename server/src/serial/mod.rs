mod link;
mod reader;

pub use link::{log_unsent_commands, write_serial_commands, CommandSink, SerialLink, SinkClosed};
pub use reader::drain_turret_output;
