//! Serde adapter: binary payloads as base64 strings
//!
//! Deserialization also accepts `data:<mime>;base64,` URLs, which is how
//! browsers hand over canvas exports and file reads.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

use crate::placement::decode_base64_payload;

pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&B64.encode(bytes))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let encoded = String::deserialize(deserializer)?;
    if encoded.trim().is_empty() {
        return Ok(Vec::new());
    }
    decode_base64_payload(&encoded).map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        #[serde(with = "super")]
        data: Vec<u8>,
    }

    #[test]
    fn test_plain_and_data_url() {
        let plain: Payload = serde_json::from_str(r#"{"data":"AQID"}"#).unwrap();
        assert_eq!(plain.data, vec![1, 2, 3]);

        let url: Payload =
            serde_json::from_str(r#"{"data":"data:image/png;base64,AQID"}"#).unwrap();
        assert_eq!(url, plain);

        assert_eq!(serde_json::to_string(&plain).unwrap(), r#"{"data":"AQID"}"#);
        assert!(serde_json::from_str::<Payload>(r#"{"data":"%%%"}"#).is_err());
    }

    #[test]
    fn test_blank_is_empty() {
        let blank: Payload = serde_json::from_str(r#"{"data":""}"#).unwrap();
        assert!(blank.data.is_empty());
    }
}
