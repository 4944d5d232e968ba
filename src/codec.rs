//! Encoding of values inside the serialized field.
//!
//! Multi-value controls submit their selection as one comma-joined string, so
//! every value is percent-encoded before joining.

/// Separator between encoded values in a multi-value field.
pub const SEPARATOR: char = ',';

/// Encodes single values for inclusion in a serialized field.
pub trait Codec: std::fmt::Debug {
    /// Encode a raw value.
    fn encode(&self, value: &str) -> String;

    /// Decode an encoded value. Must never fail: undecodable input is
    /// returned unchanged.
    fn decode(&self, encoded: &str) -> String;
}

/// Percent-encoding codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PercentCodec;

impl Codec for PercentCodec {
    fn encode(&self, value: &str) -> String {
        urlencoding::encode(value).into_owned()
    }

    fn decode(&self, encoded: &str) -> String {
        match urlencoding::decode(encoded) {
            Ok(decoded) => decoded.into_owned(),
            Err(err) => {
                tracing::debug!(%encoded, error = %err, "Undecodable value, keeping raw text");
                encoded.to_string()
            }
        }
    }
}

/// Encode each value and join them with [`SEPARATOR`].
pub fn join<'a>(codec: &dyn Codec, values: impl IntoIterator<Item = &'a str>) -> String {
    let separator = SEPARATOR.to_string();
    values
        .into_iter()
        .map(|value| codec.encode(value))
        .collect::<Vec<_>>()
        .join(separator.as_str())
}

/// Split a serialized field and decode each value.
///
/// An empty field holds no values.
pub fn split(codec: &dyn Codec, serialized: &str) -> Vec<String> {
    if serialized.is_empty() {
        return Vec::new();
    }
    serialized
        .split(SEPARATOR)
        .map(|part| codec.decode(part))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_values_unchanged() {
        assert_eq!(PercentCodec.encode("Cherry"), "Cherry");
        assert_eq!(PercentCodec.encode("a-b_c.d~e"), "a-b_c.d~e");
    }

    #[test]
    fn test_separator_is_escaped() {
        assert_eq!(PercentCodec.encode("a,b"), "a%2Cb");
        assert_eq!(PercentCodec.encode("new york"), "new%20york");
    }

    #[test]
    fn test_decode_reverses_encode() {
        for value in ["a,b", "Crème brûlée", "100%", "x=y&z", ""] {
            let encoded = PercentCodec.encode(value);
            assert_eq!(PercentCodec.decode(&encoded), value);
        }
    }

    #[test]
    fn test_decode_failure_returns_raw() {
        // %FF is not valid UTF-8 on its own
        assert_eq!(PercentCodec.decode("%FF"), "%FF");
    }

    #[test]
    fn test_join_and_split() {
        let joined = join(&PercentCodec, ["1", "a,b", "Cherry"]);
        assert_eq!(joined, "1,a%2Cb,Cherry");
        assert_eq!(split(&PercentCodec, &joined), vec!["1", "a,b", "Cherry"]);
    }

    #[test]
    fn test_join_empty() {
        assert_eq!(join(&PercentCodec, std::iter::empty::<&str>()), "");
        assert!(split(&PercentCodec, "").is_empty());
    }
}
