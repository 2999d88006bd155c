//! This module provides custom serde implementations.

/// Serialize a number as a string.
pub mod number_as_string {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Implements the serde `serialize` function for a number.
    /// # Errors
    /// Returns an error if the number cannot be serialized.
    /// # Returns
    /// Returns if the number is serialized as a string successfully.
    pub fn serialize<T, S>(number: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: ToString,
        S: Serializer,
    {
        serializer.serialize_str(&number.to_string())
    }

    /// Implements the serde `deserialize` function for a number.
    /// # Errors
    /// Returns an error if the string cannot be deserialized to a number.
    /// # Returns
    /// Returns the number deserialized from a string.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Serialize a byte vector as a hex string.
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Implements the serde `serialize` function for bytes.
    /// # Errors
    /// Returns an error if the bytes cannot be serialized.
    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    /// Implements the serde `deserialize` function for bytes.
    /// Accepts an optional `0x` prefix.
    /// # Errors
    /// Returns an error if the string is not valid hex.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
    struct Sample {
        #[serde(with = "super::number_as_string")]
        height: u64,
        #[serde(with = "super::hex_bytes")]
        root: Vec<u8>,
    }

    #[test]
    fn numbers_and_bytes_are_strings_in_json() {
        let sample = Sample {
            height: u64::MAX,
            root: vec![0xde, 0xad],
        };
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, r#"{"height":"18446744073709551615","root":"dead"}"#);
        assert_eq!(serde_json::from_str::<Sample>(&json).unwrap(), sample);
    }

    #[test]
    fn hex_accepts_prefixed_input() {
        let sample: Sample = serde_json::from_str(r#"{"height":"1","root":"0xbeef"}"#).unwrap();
        assert_eq!(sample.root, vec![0xbe, 0xef]);
    }
}
