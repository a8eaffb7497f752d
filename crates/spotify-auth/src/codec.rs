//! Credential artifact encoding
//!
//! Turns a [`CredentialRecord`] into an opaque string the caller can park in
//! a cookie or any other size-limited string slot, and back.
//!
//! Format: `v1.<payload>.<checksum>`
//! - `payload` is the record as JSON, URL-safe base64 without padding
//! - `checksum` is the first 8 bytes of SHA-256 over that JSON, same encoding
//!
//! The alphabet is `[A-Za-z0-9_-.]`, so no cookie or URL escaping is needed.
//! The checksum catches truncation and corruption; it is not a signature.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

use crate::constants::MAX_ARTIFACT_LEN;
use crate::credential::CredentialRecord;
use crate::error::{Error, Result};

const VERSION: &str = "v1";
const CHECKSUM_LEN: usize = 8;

/// Encode `record` as an opaque, cookie-safe artifact.
///
/// Fails only if the artifact would exceed [`MAX_ARTIFACT_LEN`].
pub fn encode(record: &CredentialRecord) -> Result<String> {
    let json = serde_json::to_vec(record)
        .map_err(|e| Error::Codec(format!("serializing credential: {e}")))?;

    let artifact = format!(
        "{VERSION}.{}.{}",
        URL_SAFE_NO_PAD.encode(&json),
        URL_SAFE_NO_PAD.encode(checksum(&json)),
    );

    if artifact.len() > MAX_ARTIFACT_LEN {
        return Err(Error::Codec(format!(
            "encoded credential is {} bytes, limit is {MAX_ARTIFACT_LEN}",
            artifact.len()
        )));
    }
    Ok(artifact)
}

/// Decode an artifact produced by [`encode`].
///
/// Any malformation yields [`Error::Codec`]; callers treat that exactly like
/// "no credential present". Never returns a partially populated record.
pub fn decode(artifact: &str) -> Result<CredentialRecord> {
    if artifact.len() > MAX_ARTIFACT_LEN {
        return Err(Error::Codec(format!(
            "credential artifact exceeds {MAX_ARTIFACT_LEN} bytes"
        )));
    }

    let mut parts = artifact.split('.');
    let (Some(version), Some(payload), Some(tag), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(Error::Codec("expected three dot-separated segments".into()));
    };

    if version != VERSION {
        return Err(Error::Codec(format!("unsupported artifact version: {version:?}")));
    }

    let json = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| Error::Codec(format!("payload is not base64url: {e}")))?;
    let tag = URL_SAFE_NO_PAD
        .decode(tag)
        .map_err(|e| Error::Codec(format!("checksum is not base64url: {e}")))?;

    if tag != checksum(&json) {
        return Err(Error::Codec("checksum mismatch".into()));
    }

    // The error's Display names the offending field or position, not values
    serde_json::from_slice(&json)
        .map_err(|e| Error::Codec(format!("payload is not a credential: {e}")))
}

fn checksum(json: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::digest(json);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(refresh: Option<&str>) -> CredentialRecord {
        CredentialRecord::new(
            "BQDx-access.token/with+odd=chars".into(),
            "Bearer".into(),
            3600,
            1_700_003_600,
            refresh.map(str::to_owned),
            "user-read-private user-read-email".into(),
        )
    }

    fn reencode_payload(json: &str) -> String {
        format!(
            "v1.{}.{}",
            URL_SAFE_NO_PAD.encode(json),
            URL_SAFE_NO_PAD.encode(checksum(json.as_bytes()))
        )
    }

    #[test]
    fn decode_restores_every_field_including_expires_at() {
        for original in [record(Some("AQD-refresh")), record(None)] {
            let decoded = decode(&encode(&original).unwrap()).unwrap();
            assert_eq!(decoded, original);
            assert_eq!(decoded.expires_at(), 1_700_003_600);
        }
    }

    #[test]
    fn artifact_is_cookie_and_url_safe() {
        let artifact = encode(&record(Some("AQD-refresh"))).unwrap();
        assert!(artifact.starts_with("v1."));
        assert!(
            artifact
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')),
            "unexpected character in artifact: {artifact}"
        );
        assert_eq!(artifact.matches('.').count(), 2);
    }

    #[test]
    fn artifact_does_not_contain_plaintext_tokens() {
        let artifact = encode(&record(Some("AQD-refresh"))).unwrap();
        assert!(!artifact.contains("AQD-refresh"));
    }

    #[test]
    fn truncated_artifact_is_rejected() {
        let artifact = encode(&record(Some("rt"))).unwrap();
        let (payload_end, _) = artifact.rsplit_once('.').unwrap();
        for cut in [artifact.len() - 1, payload_end.len() - 3, 5, 0] {
            let err = decode(&artifact[..cut]).unwrap_err();
            assert!(matches!(err, Error::Codec(_)), "cut at {cut}: {err:?}");
        }
    }

    #[test]
    fn disallowed_characters_are_rejected() {
        let artifact = encode(&record(Some("rt"))).unwrap();
        let tampered = format!("{}%{}", &artifact[..10], &artifact[10..]);
        assert!(matches!(decode(&tampered), Err(Error::Codec(_))));
        assert!(matches!(decode("v1.{\"a\":1}.xx"), Err(Error::Codec(_))));
    }

    #[test]
    fn checksum_mismatch_is_rejected() {
        let original = record(Some("rt"));
        let artifact = encode(&original).unwrap();
        let other = encode(&record(None)).unwrap();
        let (_, other_tag) = other.rsplit_once('.').unwrap();
        let (head, _) = artifact.rsplit_once('.').unwrap();

        let err = decode(&format!("{head}.{other_tag}")).unwrap_err();
        assert!(matches!(err, Error::Codec(ref m) if m.contains("checksum")));
    }

    #[test]
    fn wrong_version_and_segment_count_are_rejected() {
        let artifact = encode(&record(None)).unwrap();
        let v2 = artifact.replacen("v1.", "v2.", 1);
        assert!(matches!(decode(&v2), Err(Error::Codec(ref m)) if m.contains("version")));
        assert!(matches!(decode(""), Err(Error::Codec(_))));
        assert!(matches!(decode(&format!("{artifact}.extra")), Err(Error::Codec(_))));
    }

    #[test]
    fn missing_or_unknown_fields_are_rejected() {
        let missing = reencode_payload(r#"{"access_token":"a","token_type":"Bearer","expires_in":1,"scope":""}"#);
        assert!(matches!(decode(&missing), Err(Error::Codec(_))));

        let unknown = reencode_payload(
            r#"{"access_token":"a","token_type":"Bearer","expires_in":1,"expires_at":2,"scope":"","admin":true}"#,
        );
        assert!(matches!(decode(&unknown), Err(Error::Codec(_))));
    }

    #[test]
    fn codec_errors_do_not_echo_token_values() {
        let bad = reencode_payload(
            r#"{"access_token":"secret-at","token_type":"Bearer","expires_in":"soon","expires_at":2,"scope":""}"#,
        );
        let err = decode(&bad).unwrap_err();
        assert!(!err.to_string().contains("secret-at"), "{err}");
    }

    #[test]
    fn oversized_record_and_input_are_rejected() {
        let huge = CredentialRecord::new(
            "a".repeat(MAX_ARTIFACT_LEN),
            "Bearer".into(),
            1,
            1,
            None,
            String::new(),
        );
        assert!(matches!(encode(&huge), Err(Error::Codec(_))));
        assert!(matches!(
            decode(&"A".repeat(MAX_ARTIFACT_LEN + 1)),
            Err(Error::Codec(_))
        ));
    }
}
