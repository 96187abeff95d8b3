//! Inbound webhook verification and parsing.
//!
//! LINE signs each delivery with `x-line-signature`: the base64-encoded
//! HMAC-SHA256 of the raw request body keyed by the channel secret.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use gymdesk_types::chat::InboundText;
use gymdesk_types::error::GatewayError;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use tracing::debug;

use super::types::WebhookPayload;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Verify a base64 HMAC-SHA256 signature against a raw body in constant time.
pub fn verify_signature(secret: &[u8], body: &[u8], signature_b64: &str) -> Result<(), GatewayError> {
    let expected = STANDARD
        .decode(signature_b64.trim())
        .map_err(|_| GatewayError::InvalidSignature)?;

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| GatewayError::Config(format!("invalid channel secret: {e}")))?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| GatewayError::InvalidSignature)
}

/// Extract text messages sent by individual users.
///
/// Other event types (follow, postback, ...) and non-text messages are
/// ignored. Malformed JSON is an error.
pub fn parse_text_messages(body: &[u8]) -> Result<Vec<InboundText>, GatewayError> {
    let payload: WebhookPayload =
        serde_json::from_slice(body).map_err(|e| GatewayError::InvalidPayload(e.to_string()))?;

    let total = payload.events.len();
    let texts: Vec<InboundText> = payload
        .events
        .into_iter()
        .filter(|e| e.kind == "message")
        .filter_map(|event| {
            let source = event.source?;
            if source.kind != "user" {
                return None;
            }
            let message = event.message?;
            if message.kind != "text" {
                return None;
            }
            Some(InboundText {
                sender_id: source.user_id?,
                text: message.text?,
                received_at: DateTime::<Utc>::from_timestamp_millis(event.timestamp)
                    .unwrap_or_else(Utc::now),
                event_id: event.webhook_event_id.or(message.id),
            })
        })
        .collect();

    debug!(events = total, texts = texts.len(), "parsed webhook delivery");
    Ok(texts)
}

/// Verifies deliveries for one channel.
#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    channel_secret: SecretString,
}

impl WebhookVerifier {
    pub fn new(channel_secret: SecretString) -> Self {
        Self { channel_secret }
    }

    /// Check the signature header, then parse the body.
    pub fn verify_and_parse(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<Vec<InboundText>, GatewayError> {
        let signature = signature
            .filter(|s| !s.trim().is_empty())
            .ok_or(GatewayError::MissingSignature)?;
        verify_signature(self.channel_secret.expose_secret().as_bytes(), body, signature)?;
        parse_text_messages(body)
    }

    /// Base64 signature for `body`, as LINE would send it.
    pub fn sign(&self, body: &[u8]) -> Result<String, GatewayError> {
        let mut mac = HmacSha256::new_from_slice(self.channel_secret.expose_secret().as_bytes())
            .map_err(|e| GatewayError::Config(format!("invalid channel secret: {e}")))?;
        mac.update(body);
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const BODY: &str = r#"{"destination":"Ubot","events":[
        {"type":"message","timestamp":1714555800000,"replyToken":"r1",
         "webhookEventId":"01HWEV0000000000000000000A",
         "source":{"type":"user","userId":"U1"},
         "message":{"type":"text","id":"100","text":"Can I book Friday?"}},
        {"type":"message","timestamp":1714555801000,
         "source":{"type":"group","groupId":"G1","userId":"U2"},
         "message":{"type":"text","id":"101","text":"group chatter"}},
        {"type":"message","timestamp":1714555802000,
         "source":{"type":"user","userId":"U3"},
         "message":{"type":"image","id":"102"}},
        {"type":"follow","timestamp":1714555803000,"source":{"type":"user","userId":"U4"}}
    ]}"#;

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new(SecretString::from("channel-secret".to_string()))
    }

    #[test]
    fn valid_signature_yields_user_text_messages() {
        let v = verifier();
        let sig = v.sign(BODY.as_bytes()).unwrap();
        let texts = v.verify_and_parse(BODY.as_bytes(), Some(&sig)).unwrap();

        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].sender_id, "U1");
        assert_eq!(texts[0].text, "Can I book Friday?");
        assert_eq!(
            texts[0].received_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn tampered_body_fails_verification() {
        let v = verifier();
        let sig = v.sign(BODY.as_bytes()).unwrap();
        let tampered = BODY.replace("Friday", "Sunday");
        assert!(matches!(
            v.verify_and_parse(tampered.as_bytes(), Some(&sig)),
            Err(GatewayError::InvalidSignature)
        ));
    }

    #[test]
    fn missing_or_garbage_signature() {
        let v = verifier();
        assert!(matches!(
            v.verify_and_parse(BODY.as_bytes(), None),
            Err(GatewayError::MissingSignature)
        ));
        assert!(matches!(
            v.verify_and_parse(BODY.as_bytes(), Some("not base64!!")),
            Err(GatewayError::InvalidSignature)
        ));
    }

    #[test]
    fn signature_from_other_secret_is_rejected() {
        let other = WebhookVerifier::new(SecretString::from("other".to_string()));
        let sig = other.sign(BODY.as_bytes()).unwrap();
        assert!(matches!(
            verifier().verify_and_parse(BODY.as_bytes(), Some(&sig)),
            Err(GatewayError::InvalidSignature)
        ));
    }

    #[test]
    fn malformed_json_is_invalid_payload() {
        let v = verifier();
        let body = b"{not json";
        let sig = v.sign(body).unwrap();
        assert!(matches!(
            v.verify_and_parse(body, Some(&sig)),
            Err(GatewayError::InvalidPayload(_))
        ));
    }

    #[test]
    fn event_id_prefers_webhook_event_id_over_message_id() {
        let texts = parse_text_messages(BODY.as_bytes()).unwrap();
        assert_eq!(texts[0].event_id.as_deref(), Some("01HWEV0000000000000000000A"));

        let body = br#"{"events":[{"type":"message","timestamp":1714555800000,
            "source":{"type":"user","userId":"U1"},
            "message":{"type":"text","id":"555","text":"hi"}}]}"#;
        let texts = parse_text_messages(body).unwrap();
        assert_eq!(texts[0].event_id.as_deref(), Some("555"));
    }

    #[test]
    fn empty_event_list_is_ok() {
        // LINE sends this when verifying the webhook URL from the console.
        let texts = parse_text_messages(br#"{"destination":"Ubot","events":[]}"#).unwrap();
        assert!(texts.is_empty());
    }
}
