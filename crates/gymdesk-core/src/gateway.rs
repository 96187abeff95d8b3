//! MessagingGateway trait for outbound push messages.
//!
//! Defined in gymdesk-core so the conversation service can send messages
//! without coupling to a specific platform. The LINE adapter lives in
//! gymdesk-infra and is constructed with its credentials at startup.

use gymdesk_types::error::GatewayError;

/// Abstraction over an external chat platform's push API.
///
/// One call is one best-effort delivery attempt: implementations must not
/// retry internally.
pub trait MessagingGateway: Send + Sync {
    /// Push a single text message to the given recipient.
    fn push_text(
        &self,
        recipient_id: &str,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), GatewayError>> + Send;
}
