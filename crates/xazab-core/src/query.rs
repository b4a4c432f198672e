//! Query-string splitting and percent-decoding.
//!
//! A single pass over the raw bytes drives two small state machines: one
//! tracks whether we are reading a key or a value, the other whether we are
//! inside a `%XX` escape. Keys and values are decoded the same way: `%XX`
//! becomes the byte `0xXX`, `+` becomes a space, and an incomplete or
//! non-hex escape is kept literally.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Key,
    Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Escape {
    #[default]
    Idle,
    Percent,
    /// `%` and one hex digit seen; holds the raw digit.
    High(u8),
}

#[derive(Debug, Default)]
struct Component {
    bytes: Vec<u8>,
    escape: Escape,
}

impl Component {
    fn push(&mut self, byte: u8) {
        match self.escape {
            Escape::Idle => match byte {
                b'%' => self.escape = Escape::Percent,
                b'+' => self.bytes.push(b' '),
                _ => self.bytes.push(byte),
            },
            Escape::Percent => {
                if hex_digit(byte).is_some() {
                    self.escape = Escape::High(byte);
                } else {
                    self.bytes.push(b'%');
                    self.escape = Escape::Idle;
                    self.push(byte);
                }
            }
            Escape::High(high) => {
                self.escape = Escape::Idle;
                match (hex_digit(high), hex_digit(byte)) {
                    (Some(h), Some(l)) => self.bytes.push((h << 4) | l),
                    _ => {
                        self.bytes.extend_from_slice(&[b'%', high]);
                        self.push(byte);
                    }
                }
            }
        }
    }

    fn finish(mut self) -> String {
        match self.escape {
            Escape::Idle => {}
            Escape::Percent => self.bytes.push(b'%'),
            Escape::High(high) => self.bytes.extend_from_slice(&[b'%', high]),
        }
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    fn is_empty(&self) -> bool {
        self.bytes.is_empty() && self.escape == Escape::Idle
    }
}

fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Decodes one URI component. Invalid UTF-8 in the decoded bytes is replaced
/// with U+FFFD.
pub fn percent_decode(text: &str) -> String {
    let mut component = Component::default();
    for byte in text.bytes() {
        component.push(byte);
    }
    component.finish()
}

/// Splits `query` on `&` into decoded `(key, value)` pairs in source order.
///
/// Only the first `=` of a segment separates key from value. A segment
/// without `=` yields an empty value. Segments whose key is empty (including
/// empty segments from `&&`) are skipped. Duplicate keys are preserved so
/// the caller can reject them.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut field = Field::Key;
    let mut key = Component::default();
    let mut value = Component::default();

    for byte in query.bytes() {
        match (field, byte) {
            (_, b'&') => {
                push_pair(&mut pairs, std::mem::take(&mut key), std::mem::take(&mut value));
                field = Field::Key;
            }
            (Field::Key, b'=') => field = Field::Value,
            (Field::Key, _) => key.push(byte),
            (Field::Value, _) => value.push(byte),
        }
    }
    push_pair(&mut pairs, key, value);

    pairs
}

fn push_pair(pairs: &mut Vec<(String, String)>, key: Component, value: Component) {
    if key.is_empty() {
        return;
    }
    pairs.push((key.finish(), value.finish()));
}

#[cfg(test)]
mod tests {
    use super::{parse_query, percent_decode};

    fn pairs(query: &str) -> Vec<(String, String)> {
        parse_query(query)
    }

    fn owned(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn decodes_escapes_and_plus() {
        assert_eq!(percent_decode("electrum%20test"), "electrum test");
        assert_eq!(percent_decode("electrum+test"), "electrum test");
        assert_eq!(percent_decode("h%3D2a8628fc2fbe"), "h=2a8628fc2fbe");
        assert_eq!(percent_decode("%e2%82%ac"), "\u{20ac}");
        assert_eq!(percent_decode("%2B"), "+");
    }

    #[test]
    fn keeps_malformed_escapes_literally() {
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%4"), "%4");
        assert_eq!(percent_decode("%zz"), "%zz");
        assert_eq!(percent_decode("%4g"), "%4g");
        assert_eq!(percent_decode("%%41"), "%A");
    }

    #[test]
    fn replaces_invalid_utf8() {
        assert_eq!(percent_decode("%ff"), "\u{fffd}");
    }

    #[test]
    fn splits_pairs_in_order() {
        assert_eq!(
            pairs("amount=0.00004&label=electrum-test&message=electrum%20test"),
            owned(&[
                ("amount", "0.00004"),
                ("label", "electrum-test"),
                ("message", "electrum test"),
            ])
        );
    }

    #[test]
    fn only_first_equals_separates() {
        assert_eq!(
            pairs("r=http://domain.tld/page?h=1&x"),
            owned(&[("r", "http://domain.tld/page?h=1"), ("x", "")])
        );
    }

    #[test]
    fn keeps_duplicates_and_skips_empty_segments() {
        assert_eq!(
            pairs("&amount=1&&amount=2&=orphan&"),
            owned(&[("amount", "1"), ("amount", "2")])
        );
        assert!(pairs("").is_empty());
    }

    #[test]
    fn decodes_keys_too() {
        assert_eq!(pairs("am%6Funt=1"), owned(&[("amount", "1")]));
    }
}
