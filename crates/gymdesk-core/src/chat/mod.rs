//! Member conversations: read state, staff replies, and the unread badge.

pub mod badge;
pub mod conversation;
pub mod poller;
pub mod read_state;
