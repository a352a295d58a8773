use std::ffi::OsString;

/// 1-based line and column of a character in the parsed stream.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SourceLocation {
    lineno: usize,
    column: usize,
}

impl SourceLocation {
    #[inline]
    pub fn new(lineno: usize, column: usize) -> Self {
        Self { lineno, column }
    }

    #[inline]
    pub fn lineno(&self) -> usize {
        self.lineno
    }

    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }
}

impl std::fmt::Display for SourceLocation {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.lineno, self.column)
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ErrorKind {
    EmptyKeyOnAssignment,
    UnexpectedCharacter,
    EmptyKeyOnPush,
    OptionsParseError,
    IOError,
    ExecError,
    NotEnoughArguments,
}

impl std::fmt::Display for ErrorKind {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self, f)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An `=` was reached before any key character was gathered.
    #[error("{location}: equal sign reached, but no key gathered")]
    EmptyKeyOnAssignment { location: SourceLocation },

    /// A character outside a value that no production rule accepts.
    #[error("{location}: unexpected character {found:?}")]
    UnexpectedCharacter { found: char, location: SourceLocation },

    /// Internal invariant violation: an entry was pushed without a key and
    /// without allow-empty semantics. Signals a parser bug, not bad input.
    #[error("{location}: key empty when trying to push entry")]
    EmptyKeyOnPush { location: SourceLocation },

    #[error("illegal value for option {name:?}: {value:?}")]
    IllegalOption { name: OsString, value: OsString },

    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error("exec failed: {0}")]
    Exec(std::io::Error),

    #[error("not enough arguments")]
    NotEnoughArguments,
}

impl Error {
    #[inline]
    pub fn empty_key_on_assignment(lineno: usize, column: usize) -> Self {
        Error::EmptyKeyOnAssignment { location: SourceLocation::new(lineno, column) }
    }

    #[inline]
    pub fn unexpected_character(found: char, lineno: usize, column: usize) -> Self {
        Error::UnexpectedCharacter { found, location: SourceLocation::new(lineno, column) }
    }

    #[inline]
    pub fn empty_key_on_push(lineno: usize, column: usize) -> Self {
        Error::EmptyKeyOnPush { location: SourceLocation::new(lineno, column) }
    }

    #[inline]
    pub fn illegal_option(name: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        Error::IllegalOption { name: name.into(), value: value.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyKeyOnAssignment { .. } => ErrorKind::EmptyKeyOnAssignment,
            Error::UnexpectedCharacter { .. } => ErrorKind::UnexpectedCharacter,
            Error::EmptyKeyOnPush { .. } => ErrorKind::EmptyKeyOnPush,
            Error::IllegalOption { .. } => ErrorKind::OptionsParseError,
            Error::IO(_) => ErrorKind::IOError,
            Error::Exec(_) => ErrorKind::ExecError,
            Error::NotEnoughArguments => ErrorKind::NotEnoughArguments,
        }
    }

    /// Location of the offending character for parse errors, `None` for the
    /// IO and options glue.
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Error::EmptyKeyOnAssignment { location }
            | Error::UnexpectedCharacter { location, .. }
            | Error::EmptyKeyOnPush { location } => Some(*location),
            _ => None,
        }
    }
}
