mod common;

use pretty_assertions::assert_eq;
use tropfen::{parse_str, EmptyEnv, GatheredValues, Result};

fn parse(content: &str) -> Result<GatheredValues> {
    parse_str(content, &EmptyEnv())
}

#[test]
fn test_dangling_key_at_end_of_stream() -> Result<()> {
    let values = parse("ABC")?;
    assert_values_eq!(values, [("ABC", "")]);
    assert_eq!(values.len(), 1);
    Ok(())
}

#[test]
fn test_comment_directly_after_equal_sign() -> Result<()> {
    // the '#' wins over starting a value, the entry is pushed empty
    let values = parse("A=#x\nB=1")?;
    assert_values_eq!(values, [("A", ""), ("B", "1")]);
    Ok(())
}

#[test]
fn test_comment_after_dangling_key() -> Result<()> {
    let values = parse("ABC #comment\nX=1")?;
    assert_values_eq!(values, [("ABC", ""), ("X", "1")]);
    Ok(())
}

#[test]
fn test_double_equal_sign_collapses() -> Result<()> {
    let values = parse("A==b\n")?;
    assert_values_eq!(values, [("A", "b")]);
    Ok(())
}

#[test]
fn test_whitespace_behind_equal_sign_is_skipped() -> Result<()> {
    let values = parse("A= b\n")?;
    assert_values_eq!(values, [("A", "b")]);
    assert_eq!(values.len(), 1);
    Ok(())
}

#[test]
fn test_text_after_closing_quote_starts_next_key() -> Result<()> {
    let values = parse("A='x'B=2\n")?;
    assert_values_eq!(values, [("A", "x"), ("B", "2")]);
    Ok(())
}

#[test]
fn test_empty_unquoted_value() -> Result<()> {
    let values = parse("A=\nB=2\n")?;
    assert_values_eq!(values, [("A", ""), ("B", "2")]);
    assert_eq!(values.len(), 2);
    Ok(())
}

#[test]
fn test_empty_single_quoted_value() -> Result<()> {
    let values = parse("K=''")?;
    assert_values_eq!(values, [("K", "")]);
    Ok(())
}

#[test]
fn test_unterminated_double_quote_flushed_at_end_of_stream() -> Result<()> {
    let values = parse("A=1\nK=\"abc $A")?;
    assert_values_eq!(values, [("A", "1"), ("K", "abc 1")]);
    Ok(())
}

#[test]
fn test_hash_inside_value_is_literal() -> Result<()> {
    let values = parse("K=a#b\n")?;
    assert_values_eq!(values, [("K", "a#b")]);
    Ok(())
}

#[test]
fn test_multibyte_value() -> Result<()> {
    let values = parse("K=töst ✓\n")?;
    assert_values_eq!(values, [("K", "töst ✓")]);
    Ok(())
}

#[test]
fn test_comment_only_file() -> Result<()> {
    let values = parse("# just a comment\n# and another\n")?;
    assert_eq!(values.len(), 0);
    Ok(())
}

#[test]
fn test_blank_lines_are_skipped() -> Result<()> {
    let values = parse("\n\nA=1\n\n\nB=2\n")?;
    assert_values_eq!(values, [("A", "1"), ("B", "2")]);
    assert_eq!(values.len(), 2);
    Ok(())
}

#[test]
fn test_underscore_keys_and_digits() -> Result<()> {
    let values = parse("_KEY_1=x\nK2=y\n")?;
    assert_values_eq!(values, [("_KEY_1", "x"), ("K2", "y")]);
    Ok(())
}
