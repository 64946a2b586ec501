use std::string::String;

use crate::Tag;

/// A specialized `Result` type for font decoding.
pub type Result<T> = core::result::Result<T, Error>;

/// A broad category of a decoding [`Error`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ErrorKind {
    /// Bad magic, truncated directory, out-of-bounds table range or checksum mismatch.
    MalformedContainer,
    /// A table required by the font flavor is absent.
    MissingRequiredTable,
    /// A table's internal layout violates its format.
    MalformedTable,
    /// A recognized but unimplemented sub-format.
    UnsupportedVariant,
    /// A segment count or recursion cap was hit.
    ResourceLimitExceeded,
}

/// A font decoding error.
///
/// Every variant identifies the offending table, so the `Display` output
/// is enough to locate the problem.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error("unknown SFNT version 0x{0:08X}")]
    UnknownMagic(u32),

    #[error("malformed table directory: {0}")]
    MalformedDirectory(&'static str),

    #[error("'{0}' table is out of bounds")]
    TableOutOfBounds(Tag),

    #[error("'{0}' table is listed more than once")]
    DuplicateTable(Tag),

    #[error("'{0}' and '{1}' tables overlap")]
    OverlappingTables(Tag, Tag),

    #[error("'{table}' table checksum mismatch: stored 0x{stored:08X}, computed 0x{computed:08X}")]
    ChecksumMismatch {
        table: Tag,
        stored: u32,
        computed: u32,
    },

    #[error("required '{0}' table is missing")]
    MissingTable(Tag),

    #[error("'{0}' and '{1}' tables cannot be present at the same time")]
    ConflictingTables(Tag, Tag),

    #[error("malformed '{table}' table: {reason}")]
    MalformedTable {
        table: Tag,
        reason: String,
    },

    #[error("'{table}' table: {reason} is not supported")]
    Unsupported {
        table: Tag,
        reason: String,
    },

    #[error("'{table}' table: {reason}")]
    LimitExceeded {
        table: Tag,
        reason: String,
    },
}

impl Error {
    pub(crate) fn malformed(table: Tag, reason: impl Into<String>) -> Self {
        Error::MalformedTable { table, reason: reason.into() }
    }

    pub(crate) fn unsupported(table: Tag, reason: impl Into<String>) -> Self {
        Error::Unsupported { table, reason: reason.into() }
    }

    pub(crate) fn limit(table: Tag, reason: impl Into<String>) -> Self {
        Error::LimitExceeded { table, reason: reason.into() }
    }

    /// Returns the error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownMagic(..)
            | Error::MalformedDirectory(..)
            | Error::TableOutOfBounds(..)
            | Error::DuplicateTable(..)
            | Error::OverlappingTables(..)
            | Error::ChecksumMismatch { .. } => ErrorKind::MalformedContainer,
            Error::MissingTable(..)
            | Error::ConflictingTables(..) => ErrorKind::MissingRequiredTable,
            Error::MalformedTable { .. } => ErrorKind::MalformedTable,
            Error::Unsupported { .. } => ErrorKind::UnsupportedVariant,
            Error::LimitExceeded { .. } => ErrorKind::ResourceLimitExceeded,
        }
    }

    /// Returns the table the error is attributed to, if any.
    pub fn table(&self) -> Option<Tag> {
        match *self {
            Error::UnknownMagic(..) | Error::MalformedDirectory(..) => None,
            Error::TableOutOfBounds(tag)
            | Error::DuplicateTable(tag)
            | Error::OverlappingTables(tag, _)
            | Error::MissingTable(tag)
            | Error::ConflictingTables(tag, _) => Some(tag),
            Error::ChecksumMismatch { table, .. }
            | Error::MalformedTable { table, .. }
            | Error::Unsupported { table, .. }
            | Error::LimitExceeded { table, .. } => Some(table),
        }
    }
}


/// Turns a failed read into a located error.
pub(crate) trait Context<T> {
    fn context(self, table: Tag, reason: &str) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    #[inline]
    fn context(self, table: Tag, reason: &str) -> Result<T> {
        match self {
            Some(v) => Ok(v),
            None => Err(Error::malformed(table, reason)),
        }
    }
}
