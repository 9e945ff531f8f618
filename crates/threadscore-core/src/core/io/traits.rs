use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// A line-oriented text format produced by an upstream tool.
///
/// Implementors parse from any buffered reader; opening a path is provided on top.
pub trait RecordFile {
    /// Parsed content of one file.
    type Records;

    type Error: Error + From<io::Error>;

    /// Parses records from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the content does not follow the format or reading fails.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Records, Self::Error>;

    /// Opens and parses the file at `path`.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Records, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
