// QR token authority
// Tokens are 128-bit random values; comparisons run in constant time.

use rand::rngs::OsRng;
use rand::RngCore;
use subtle::ConstantTimeEq;

use crate::entities::Checkpoint;
use crate::value_objects::CheckpointId;

pub const TOKEN_BYTES: usize = 16;
const PAYLOAD_PREFIX: &str = "ronda";
const PAYLOAD_VERSION: &str = "v1";

pub fn issue_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn encode_payload(checkpoint_id: &CheckpointId, token: &str) -> String {
    format!(
        "{}:{}:{}:{}",
        PAYLOAD_PREFIX, PAYLOAD_VERSION, checkpoint_id, token
    )
}

/// Accepts either the bare token or a full QR payload. A payload issued for a
/// different checkpoint yields None.
pub fn extract_token<'a>(checkpoint_id: &CheckpointId, submitted: &'a str) -> Option<&'a str> {
    let submitted = submitted.trim();
    let prefix = format!("{}:", PAYLOAD_PREFIX);
    if !submitted.starts_with(&prefix) {
        return Some(submitted);
    }
    let mut parts = submitted.splitn(4, ':').skip(1);
    let version = parts.next()?;
    let id = parts.next()?;
    let token = parts.next()?;
    if version != PAYLOAD_VERSION || id != checkpoint_id.as_str() {
        return None;
    }
    Some(token)
}

pub fn tokens_match(expected: &str, submitted: &str) -> bool {
    if expected.is_empty() || submitted.is_empty() {
        return false;
    }
    expected.as_bytes().ct_eq(submitted.as_bytes()).unwrap_u8() == 1
}

pub fn validate_token(checkpoint: &Checkpoint, submitted: &str) -> bool {
    match extract_token(&checkpoint.id, submitted) {
        Some(token) => tokens_match(&checkpoint.qr_token, token),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn checkpoint(token: &str) -> Checkpoint {
        let now = Utc::now();
        Checkpoint {
            id: CheckpointId::from("cp-north"),
            name: "Pos Utara".to_string(),
            lat: -6.2,
            lng: 106.8,
            radius_meters: 50.0,
            qr_token: token.to_string(),
            token_rotated_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn issued_tokens_are_128_bit_hex_and_unique() {
        let a = issue_token();
        let b = issue_token();
        assert_eq!(a.len(), TOKEN_BYTES * 2);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn validates_bare_token_and_payload() {
        let token = issue_token();
        let cp = checkpoint(&token);
        assert!(validate_token(&cp, &token));
        assert!(validate_token(&cp, &cp.qr_payload()));
        assert!(!validate_token(&cp, &issue_token()));
        assert!(!validate_token(&cp, ""));
    }

    #[test]
    fn payload_for_other_checkpoint_is_rejected() {
        let token = issue_token();
        let cp = checkpoint(&token);
        let foreign = encode_payload(&CheckpointId::from("cp-south"), &token);
        assert!(!validate_token(&cp, &foreign));
    }

    #[test]
    fn rotation_invalidates_previous_token() {
        let old = issue_token();
        let mut cp = checkpoint(&old);
        cp.qr_token = issue_token();
        assert!(!validate_token(&cp, &old));
    }

    #[test]
    fn prefix_mismatch_in_length_never_matches() {
        assert!(!tokens_match("abcd", "abc"));
        assert!(!tokens_match("abc", "abcd"));
        assert!(tokens_match("abcd", "abcd"));
    }
}
