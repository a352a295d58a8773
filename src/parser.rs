use indexmap::IndexMap;

use crate::decoder::Utf8Decoder;
use crate::env::GetEnv;
use crate::error::SourceLocation;
use crate::resolve::resolve_variables;
use crate::{Error, Result};

pub const ASSIGN: char = '=';
pub const COMMENT: char = '#';
pub const ESCAPE: char = '\\';
pub const SINGLE_QUOTE: char = '\'';
pub const DOUBLE_QUOTE: char = '"';

#[inline]
pub fn is_key_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

#[inline]
pub fn is_key_continuation(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[inline]
pub fn is_quote(ch: char) -> bool {
    ch == SINGLE_QUOTE || ch == DOUBLE_QUOTE
}

/// Ordered key to resolved value mapping of one parse session.
/// Last write wins for repeated keys.
pub type GatheredValues = IndexMap<String, String>;

/// The quote character a value was opened with, if any.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Quote {
    Single,
    Double,
}

impl Quote {
    #[inline]
    fn from_char(ch: char) -> Option<Self> {
        match ch {
            SINGLE_QUOTE => Some(Quote::Single),
            DOUBLE_QUOTE => Some(Quote::Double),
            _ => None,
        }
    }

    #[inline]
    fn char(self) -> char {
        match self {
            Quote::Single => SINGLE_QUOTE,
            Quote::Double => DOUBLE_QUOTE,
        }
    }
}

/// A completed assignment before variable resolution.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RawEntry {
    pub key: String,
    pub value: String,
    pub quote: Option<Quote>,
}

/// The character-driven state machine of one parse session, independent of
/// any stream plumbing. [`step`] consumes one character at a time and yields
/// a [`RawEntry`] whenever an assignment completes.
///
/// [`step`]: ParserState::step
#[derive(Debug)]
pub struct ParserState {
    in_value: bool,
    in_comment: bool,
    last_was_equal_sign: bool,
    last_was_escape: bool,
    current_quote: Option<Quote>,
    current_key: String,
    current_value: String,
    lineno: usize,
    column: usize,
}

impl Default for ParserState {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ParserState {
    pub fn new() -> Self {
        Self {
            in_value: false,
            in_comment: false,
            last_was_equal_sign: false,
            last_was_escape: false,
            current_quote: None,
            current_key: String::new(),
            current_value: String::new(),
            lineno: 1,
            column: 0,
        }
    }

    /// Position of the most recently consumed character.
    #[inline]
    pub fn position(&self) -> SourceLocation {
        SourceLocation::new(self.lineno, self.column)
    }

    pub fn step(&mut self, ch: char) -> Result<Option<RawEntry>> {
        if ch == '\n' {
            self.lineno += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }

        if self.in_comment {
            self.in_comment = ch != '\n';
            return Ok(None);
        }

        if !self.in_value {
            if ch == ASSIGN {
                if self.current_key.is_empty() {
                    return Err(Error::empty_key_on_assignment(self.lineno, self.column));
                }
                self.last_was_equal_sign = true;
                Ok(None)
            } else if ch == COMMENT {
                let entry = self.push_entry(true)?;
                self.in_comment = true;
                Ok(entry)
            } else if ch == '\n' && self.last_was_equal_sign {
                // KEY= with nothing behind the equal sign, the value is empty
                self.push_entry(false)
            } else if ch.is_whitespace() {
                Ok(None)
            } else if self.last_was_equal_sign {
                // first character behind the equal sign begins the value
                if let Some(quote) = Quote::from_char(ch) {
                    self.current_quote = Some(quote);
                } else {
                    self.current_value.push(ch);
                    self.last_was_equal_sign = false;
                }
                self.in_value = true;
                Ok(None)
            } else if self.is_key_char(ch) {
                self.current_key.push(ch);
                Ok(None)
            } else {
                Err(Error::unexpected_character(ch, self.lineno, self.column))
            }
        } else if self.last_was_escape {
            // the escape consumed exactly this character, appended verbatim
            self.last_was_escape = false;
            self.current_value.push(ch);
            Ok(None)
        } else if ch == ESCAPE {
            self.last_was_escape = true;
            Ok(None)
        } else if self.current_quote.map_or(ch == '\n', |quote| ch == quote.char()) {
            self.in_value = false;
            self.push_entry(false)
        } else {
            self.current_value.push(ch);
            Ok(None)
        }
    }

    /// End of stream. Acts like an implicit unquoted value terminator and
    /// forces a final push with allow-empty semantics, so a stream ending
    /// mid-value still emits its entry and an empty stream emits nothing.
    pub fn finish(&mut self) -> Result<Option<RawEntry>> {
        self.in_value = false;
        self.push_entry(true)
    }

    #[inline]
    fn is_key_char(&self, ch: char) -> bool {
        if self.current_key.is_empty() {
            is_key_start(ch)
        } else {
            is_key_continuation(ch)
        }
    }

    fn push_entry(&mut self, allow_empty: bool) -> Result<Option<RawEntry>> {
        if self.current_key.is_empty() {
            if !allow_empty {
                return Err(Error::empty_key_on_push(self.lineno, self.column));
            }
            self.reset_entry();
            return Ok(None);
        }

        let entry = RawEntry {
            key: std::mem::take(&mut self.current_key),
            value: std::mem::take(&mut self.current_value),
            quote: self.current_quote,
        };
        self.reset_entry();

        Ok(Some(entry))
    }

    fn reset_entry(&mut self) {
        self.current_key.clear();
        self.current_value.clear();
        self.current_quote = None;
        self.in_value = false;
        self.in_comment = false;
        self.last_was_equal_sign = false;
        self.last_was_escape = false;
    }
}

/// One parse session: incremental byte decoding, the state machine and the
/// gathered mapping, wired together. Chunks can be fed at arbitrary
/// boundaries via [`feed`] (bytes) or [`consume`] (decoded text);
/// [`finish`] flushes both layers and hands out the result.
///
/// [`feed`]: Parser::feed
/// [`consume`]: Parser::consume
/// [`finish`]: Parser::finish
pub struct Parser<'p> {
    state: ParserState,
    decoder: Utf8Decoder,
    decoded: String,
    gathered: GatheredValues,
    parent: &'p dyn GetEnv,
}

impl<'p> Parser<'p> {
    pub fn new(parent: &'p dyn GetEnv) -> Self {
        Self {
            state: ParserState::new(),
            decoder: Utf8Decoder::new(),
            decoded: String::new(),
            gathered: GatheredValues::new(),
            parent,
        }
    }

    #[inline]
    pub fn position(&self) -> SourceLocation {
        self.state.position()
    }

    /// Entries gathered so far, in source order.
    #[inline]
    pub fn values(&self) -> &GatheredValues {
        &self.gathered
    }

    pub fn feed(&mut self, bytes: &[u8]) -> Result<()> {
        self.decoded.clear();
        self.decoder.feed(bytes, &mut self.decoded);

        let decoded = std::mem::take(&mut self.decoded);
        let result = self.consume(&decoded);
        self.decoded = decoded;
        result
    }

    pub fn consume(&mut self, text: &str) -> Result<()> {
        for ch in text.chars() {
            if let Some(entry) = self.state.step(ch)? {
                self.emit(entry);
            }
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<GatheredValues> {
        self.decoded.clear();
        self.decoder.finish(&mut self.decoded);

        let decoded = std::mem::take(&mut self.decoded);
        self.consume(&decoded)?;

        if let Some(entry) = self.state.finish()? {
            self.emit(entry);
        }

        Ok(self.gathered)
    }

    fn emit(&mut self, entry: RawEntry) {
        let value = match entry.quote {
            // single quoted values pass through byte for byte
            Some(Quote::Single) => entry.value,
            _ => resolve_variables(&entry.value, &self.gathered, self.parent),
        };
        self.gathered.insert(entry.key, value);
    }
}
