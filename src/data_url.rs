use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::ExportError;

pub const PNG_MIME: &str = "image/png";

const DEFAULT_MIME: &str = "application/octet-stream";

/// A parsed `data:` URL, kept in its original string form so it can be handed
/// to the browser untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    raw: String,
    mime: String,
    base64: bool,
    payload_start: usize,
}

impl DataUrl {
    /// Splits `data:<mime>[;base64],<payload>` into its parts.
    ///
    /// 사유 문자열에는 원본 URL을 넣지 않는다. 페이로드가 수 MB일 수 있다.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ExportError> {
        let raw = raw.into();
        let rest = raw
            .strip_prefix("data:")
            .ok_or_else(|| ExportError::DataUrl("missing data: scheme".into()))?;
        let comma = rest
            .find(',')
            .ok_or_else(|| ExportError::DataUrl("missing ',' separator".into()))?;

        let header = &rest[..comma];
        let mime = header
            .split(';')
            .next()
            .filter(|part| !part.is_empty())
            .unwrap_or(DEFAULT_MIME)
            .to_string();
        let base64 = header.contains(";base64");
        let payload_start = "data:".len() + comma + 1;

        Ok(Self {
            raw,
            mime,
            base64,
            payload_start,
        })
    }

    /// The full URL, exactly as produced by the encoder.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn is_base64(&self) -> bool {
        self.base64
    }

    pub fn payload(&self) -> &str {
        &self.raw[self.payload_start..]
    }

    /// Recovers the payload bytes, undoing the base64 transfer encoding when
    /// the header declares one.
    pub fn decode_payload(&self) -> Result<Vec<u8>, ExportError> {
        if self.base64 {
            STANDARD
                .decode(self.payload())
                .map_err(|e| ExportError::DataUrl(format!("payload is not valid base64: {e}")))
        } else {
            Ok(self.payload().as_bytes().to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_extracts_mime_and_payload() {
        let url = DataUrl::parse("data:image/png;base64,aGk=").unwrap();
        assert_eq!(url.mime(), "image/png");
        assert!(url.is_base64());
        assert_eq!(url.payload(), "aGk=");
        assert_eq!(url.as_str(), "data:image/png;base64,aGk=");
    }

    #[test]
    fn parse_rejects_other_schemes() {
        assert!(DataUrl::parse("https://example.com/report.png").is_err());
        assert!(DataUrl::parse("image/png;base64,aGk=").is_err());
    }

    #[test]
    fn parse_rejects_missing_separator() {
        assert!(DataUrl::parse("data:image/png;base64").is_err());
    }

    #[test]
    fn parse_defaults_missing_mime() {
        let url = DataUrl::parse("data:;base64,aGk=").unwrap();
        assert_eq!(url.mime(), "application/octet-stream");
        assert!(url.is_base64());
    }

    #[test]
    fn decode_recovers_base64_payload() {
        let url = DataUrl::parse("data:text/plain;base64,cmVwb3J0").unwrap();
        assert_eq!(url.decode_payload().unwrap(), b"report");
    }

    #[test]
    fn decode_passes_verbatim_payload_through() {
        let url = DataUrl::parse("data:text/plain,hello").unwrap();
        assert!(!url.is_base64());
        assert_eq!(url.decode_payload().unwrap(), b"hello");
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        let url = DataUrl::parse("data:image/png;base64,not base64!").unwrap();
        assert!(url.decode_payload().is_err());
    }

    #[test]
    fn png_signature_survives_the_round_trip() {
        let signature: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let url = DataUrl::parse(format!("data:image/png;base64,{}", STANDARD.encode(signature)))
            .unwrap();
        let decoded = url.decode_payload().unwrap();
        assert_eq!(&decoded[..], b"\x89PNG\r\n\x1a\n");
    }
}
