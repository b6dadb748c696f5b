pub mod error;
pub mod header;
pub mod memory;
pub mod source;
pub mod table;
pub mod tally;
pub mod text;

pub use error::TableError;
pub use header::Header;
pub use memory::{MemorySink, MemorySource};
pub use source::{TabularSink, TabularSource};
pub use table::{Record, Table};
pub use tally::{Tally, TallyEntry};
