use serde::{Deserialize, Serialize};

/// Dialect settings shared by [`CsvSource`](crate::CsvSource) and
/// [`CsvSink`](crate::CsvSink).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Field delimiter. Must be a single-byte character.
    pub delimiter: char,
    /// Allow rows with a different number of fields than the header.
    pub flexible: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            flexible: true,
        }
    }
}

impl CsvOptions {
    /// The delimiter as a byte, or `None` if it is not single-byte.
    pub fn delimiter_byte(&self) -> Option<u8> {
        u8::try_from(self.delimiter).ok().filter(u8::is_ascii)
    }
}
