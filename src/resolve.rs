use std::ffi::OsStr;

use crate::env::GetEnv;
use crate::parser::{is_key_continuation, is_key_start, GatheredValues};

/// Replaces every `$NAME` reference in `src` in a single left to right pass.
/// Lookup order: entries already gathered this session, then the ambient
/// environment, then the empty string. Substituted text is never re-scanned
/// and a `$` not followed by an identifier start stays literal.
pub fn resolve_variables(mut src: &str, gathered: &GatheredValues, parent: &dyn GetEnv) -> String {
    let mut buf = String::with_capacity(src.len());

    while !src.is_empty() {
        let Some(index) = src.find('$') else {
            buf.push_str(src);
            break;
        };

        buf.push_str(&src[..index]);
        src = &src[index + 1..];

        let Some(first) = src.chars().next() else {
            buf.push('$');
            break;
        };

        if !is_key_start(first) {
            buf.push('$');
            continue;
        }

        let end = find_name_end(src);
        let name = &src[..end];
        src = &src[end..];

        if let Some(value) = gathered.get(name) {
            buf.push_str(value);
        } else if let Some(value) = parent.get(OsStr::new(name)) {
            buf.push_str(value.to_string_lossy().as_ref());
        }
        // unknown names resolve to nothing
    }

    buf
}

#[inline]
fn find_name_end(src: &str) -> usize {
    src.find(|ch: char| !is_key_continuation(ch)).unwrap_or(src.len())
}
