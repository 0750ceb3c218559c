mod encoder;
mod error;
mod table;

pub use encoder::{CommandEncoder, ResolvedCommand};
pub use error::{CommandError, TableError};
pub use table::CommandTable;
