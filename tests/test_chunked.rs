use pretty_assertions::assert_eq;
use tropfen::{parse_str, EmptyEnv, GatheredValues, Parser};

const CONTENT: &str = "TEST1=content\n\
    UML=\"ä ö ü $TEST1 ß\"\n\
    CRAB='🦀 literal $TEST1'\n\
    ESC=\"a \\\" b\"\n\
    # comment with ünicode\n\
    LAST=trailing $TEST1";

fn parse_chunked(content: &str, size: usize) -> GatheredValues {
    let parent = EmptyEnv();
    let mut parser = Parser::new(&parent);
    for chunk in content.as_bytes().chunks(size) {
        parser.feed(chunk).unwrap();
    }
    parser.finish().unwrap()
}

#[test]
fn test_chunk_boundary_independence() {
    let expected = parse_str(CONTENT, &EmptyEnv()).unwrap();
    assert_eq!(expected.len(), 5);

    for size in 1..=CONTENT.len() {
        let actual = parse_chunked(CONTENT, size);
        assert_eq!(actual, expected, "chunk size {size} changed the result");
    }
}

#[test]
fn test_split_inside_multibyte_character() {
    // "K=ä\n" with the two bytes of 'ä' fed separately
    let parent = EmptyEnv();
    let mut parser = Parser::new(&parent);
    parser.feed(b"K=\xc3").unwrap();
    parser.feed(b"\xa4\n").unwrap();

    let values = parser.finish().unwrap();
    assert_eq!(values.get("K").map(|value| value.as_str()), Some("ä"));
}

#[test]
fn test_split_inside_escape_sequence() {
    let parent = EmptyEnv();
    let mut parser = Parser::new(&parent);
    parser.feed(b"K=\"a\\").unwrap();
    parser.feed(b"\"b\"\n").unwrap();

    let values = parser.finish().unwrap();
    assert_eq!(values.get("K").map(|value| value.as_str()), Some("a\"b"));
}

#[test]
fn test_split_at_assignment_boundary() {
    let parent = EmptyEnv();
    let mut parser = Parser::new(&parent);
    parser.feed(b"KEY").unwrap();
    parser.feed(b"=").unwrap();
    parser.feed(b"value\n").unwrap();

    let values = parser.finish().unwrap();
    assert_eq!(values.get("KEY").map(|value| value.as_str()), Some("value"));
}

#[test]
fn test_consume_text_chunks() {
    let parent = EmptyEnv();
    let mut parser = Parser::new(&parent);
    parser.consume("A=1\nB=").unwrap();
    parser.consume("$A$A\n").unwrap();

    let values = parser.finish().unwrap();
    assert_eq!(values.get("B").map(|value| value.as_str()), Some("11"));
}
