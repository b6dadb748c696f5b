mod options;
mod sink;
mod source;

pub use options::CsvOptions;
pub use sink::{CsvSink, DeferredFile};
pub use source::CsvSource;
