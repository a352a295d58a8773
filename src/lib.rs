//! Streaming parser for `.env` files.
//!
//! Text arrives as raw byte chunks cut at arbitrary boundaries, is decoded
//! incrementally and run through a character-driven state machine that emits
//! resolved key/value entries as soon as each assignment completes. The
//! gathered mapping can then be exported into the process environment (or
//! any other [`Env`] implementation).

use std::{fs::File, io::{BufReader, Read}, path::Path};

pub mod error;
pub use error::Error;
pub use error::ErrorKind;
pub use error::SourceLocation;

pub mod result;
pub use result::Result;

pub mod env;
pub use env::{Env, GetEnv, SystemEnv, EmptyEnv, SYSTEM_ENV};

pub mod options;
pub use options::{Builder, Options};

pub mod decoder;
pub use decoder::Utf8Decoder;

pub mod parser;
pub use parser::{GatheredValues, Parser, ParserState, Quote, RawEntry};

pub mod resolve;
pub use resolve::resolve_variables;

pub const DEBUG_PREFIX: &str = concat!("[tropfen@", env!("CARGO_PKG_VERSION"), "][DEBUG] ");

/// Parses the configured env file and exports it into the process
/// environment. Configuration is read from `DOTENV_CONFIG_*` variables.
#[inline]
pub fn config() -> Result<()> {
    let options = Options::try_from_env()?;
    config_with_options(&mut SystemEnv(), &SYSTEM_ENV, &options)
}

/// Like [`config`], but exports into the given environment instead of the
/// process environment. The target environment doubles as the interpolation
/// fallback, so references can resolve against what it already contains.
#[inline]
pub fn config_env(env: &mut impl Env) -> Result<()> {
    let options = Options::try_from_env()?;
    options.config_env(env)
}

#[inline]
pub fn build() -> Builder {
    Builder::new()
}

/// Parses the file named by `options.path` and, only after the whole stream
/// parsed successfully, exports every entry into `env` in source order.
/// `parent` is the ambient environment used as interpolation fallback.
pub fn config_with_options<P>(env: &mut dyn Env, parent: &dyn GetEnv, options: &Options<P>) -> Result<()>
where P: AsRef<Path> + Clone {
    let values = parse_file_with_options(parent, options)?;
    options.export(env, &values);
    Ok(())
}

/// Like [`config_with_options`], but reads the stream from `reader` instead
/// of opening the configured file path.
pub fn config_with_reader<P>(env: &mut dyn Env, parent: &dyn GetEnv, reader: &mut dyn Read, options: &Options<P>) -> Result<()>
where P: AsRef<Path> + Clone {
    let values = parse_reader_with_options(reader, parent, options)?;
    options.export(env, &values);
    Ok(())
}

pub fn parse_reader_with_options<P>(reader: &mut dyn Read, parent: &dyn GetEnv, options: &Options<P>) -> Result<GatheredValues>
where P: AsRef<Path> + Clone {
    match parse_reader(reader, parent) {
        Err(err) => {
            if options.debug {
                eprintln!("{DEBUG_PREFIX}{err}");
            }
            Err(err)
        }
        Ok(values) => Ok(values),
    }
}

pub fn parse_file_with_options<P>(parent: &dyn GetEnv, options: &Options<P>) -> Result<GatheredValues>
where P: AsRef<Path> + Clone {
    let path = options.path.as_ref();

    let file = match File::open(path) {
        Err(err) => {
            if options.debug {
                eprintln!("{DEBUG_PREFIX}{}: {err}", path.to_string_lossy());
            }
            return Err(err.into());
        }
        Ok(file) => file,
    };

    let mut reader = BufReader::new(file);
    match parse_reader(&mut reader, parent) {
        Err(err) => {
            if options.debug {
                eprintln!("{DEBUG_PREFIX}{}: {err}", path.to_string_lossy());
            }
            Err(err)
        }
        Ok(values) => Ok(values),
    }
}

/// Feeds `reader` chunk by chunk through one parse session and returns the
/// gathered mapping. Any parse error aborts the session with no partial
/// result.
pub fn parse_reader(reader: &mut dyn Read, parent: &dyn GetEnv) -> Result<GatheredValues> {
    let mut parser = Parser::new(parent);
    let mut buf = [0u8; 4096];

    loop {
        let count = reader.read(&mut buf)?;
        if count == 0 {
            break;
        }
        parser.feed(&buf[..count])?;
    }

    parser.finish()
}

/// One-shot parse of an in-memory string.
pub fn parse_str(src: &str, parent: &dyn GetEnv) -> Result<GatheredValues> {
    let mut parser = Parser::new(parent);
    parser.consume(src)?;
    parser.finish()
}
