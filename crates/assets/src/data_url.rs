//! `data:` URL decoding for payloads handed over by file pickers.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::error::{AssetError, AssetResult};

/// A decoded `data:[<mime>][;base64],<payload>` URL.
#[derive(Clone, Debug, PartialEq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Whether `source` looks like a data URL rather than a path.
pub fn is_data_url(source: &str) -> bool {
    source.starts_with("data:")
}

/// Decode a data URL. Only base64 payloads are accepted.
pub fn decode_data_url(url: &str) -> AssetResult<DataUrl> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| AssetError::DataUrl("missing 'data:' scheme".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| AssetError::DataUrl("missing ',' before payload".into()))?;

    let mut params = meta.split(';');
    let mime = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(AssetError::DataUrl("payload is not base64-encoded".into()));
    }

    let bytes = BASE64.decode(payload.trim())?;
    Ok(DataUrl { mime, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_base64_payload() {
        let url = format!("data:image/png;base64,{}", BASE64.encode(b"hello"));
        let decoded = decode_data_url(&url).unwrap();
        assert_eq!(decoded.mime, "image/png");
        assert_eq!(decoded.bytes, b"hello");
    }

    #[test]
    fn mime_is_optional() {
        let url = format!("data:;base64,{}", BASE64.encode([1u8, 2, 3]));
        let decoded = decode_data_url(&url).unwrap();
        assert_eq!(decoded.mime, "");
        assert_eq!(decoded.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn rejects_malformed_urls() {
        assert!(matches!(decode_data_url("image.png"), Err(AssetError::DataUrl(_))));
        assert!(matches!(decode_data_url("data:image/png;base64"), Err(AssetError::DataUrl(_))));
        assert!(matches!(decode_data_url("data:text/plain,hi"), Err(AssetError::DataUrl(_))));
        assert!(matches!(
            decode_data_url("data:image/png;base64,@@@"),
            Err(AssetError::Base64(_))
        ));
    }

    #[test]
    fn detects_scheme() {
        assert!(is_data_url("data:video/mp4;base64,AAAA"));
        assert!(!is_data_url("/tmp/clip.mp4"));
    }
}
