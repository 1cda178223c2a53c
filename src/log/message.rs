use super::{Error, ErrorKind};

pub const UNTERMINATED_TAG: &str = "unterminated tag";
pub const EMPTY_IDENTIFIER: &str = "empty identifier";
pub const UNSERIALIZABLE_VALUE: &str = "unserializable value";
pub const WRITE_FAILURE: &str = "write failure";

/// Return an [`Error`] explaining that the write operation failed.
///
/// This is likely caused by a failure during a `write!` macro operation.
pub fn error_write() -> Error {
    Error::build(ErrorKind::Write)
        .with_help("failed to write render output, are you low on memory?")
}
