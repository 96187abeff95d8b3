//! In-memory fakes for service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use gymdesk_types::chat::{ChatMessage, ConversationSummary, MessageSender};
use gymdesk_types::error::{GatewayError, RepositoryError};
use gymdesk_types::training::{ClearedTraining, SetSample, TrainingLog, TrainingSet};
use gymdesk_types::user::User;
use uuid::Uuid;

use crate::gateway::MessagingGateway;
use crate::repository::chat::ChatRepository;
use crate::repository::session::{SessionRecord, SessionRepository};
use crate::repository::training::TrainingRepository;
use crate::repository::user::UserRepository;
use crate::service::credentials::Credentials;

fn injected_failure() -> RepositoryError {
    RepositoryError::Query("injected failure".to_string())
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct FakeChatRepository {
    messages: Arc<Mutex<Vec<ChatMessage>>>,
    failing: Arc<AtomicBool>,
}

impl FakeChatRepository {
    pub fn push(&self, message: ChatMessage) {
        self.messages.lock().unwrap().push(message);
    }

    pub fn all(&self) -> Vec<ChatMessage> {
        let mut all = self.messages.lock().unwrap().clone();
        all.sort_by_key(|m| m.created_at);
        all
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(injected_failure())
        } else {
            Ok(())
        }
    }
}

impl ChatRepository for FakeChatRepository {
    async fn save_message(&self, message: &ChatMessage) -> Result<bool, RepositoryError> {
        self.check()?;
        if let Some(external_id) = &message.external_id {
            if self.all().iter().any(|m| m.external_id.as_ref() == Some(external_id)) {
                return Ok(false);
            }
        }
        self.push(message.clone());
        Ok(true)
    }

    async fn list_messages(
        &self,
        user_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        self.check()?;
        let mut matching: Vec<ChatMessage> =
            self.all().into_iter().filter(|m| m.user_id == user_id).collect();
        if let Some(limit) = limit {
            let excess = matching.len().saturating_sub(limit.max(0) as usize);
            matching.drain(..excess);
        }
        Ok(matching)
    }

    async fn count_unread_inbound(&self) -> Result<u64, RepositoryError> {
        self.check()?;
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.sender == MessageSender::User && !m.is_read)
            .count() as u64)
    }

    async fn mark_inbound_read(&self, user_id: &str) -> Result<u64, RepositoryError> {
        self.check()?;
        let mut updated = 0;
        for m in self.messages.lock().unwrap().iter_mut() {
            if m.user_id == user_id && m.sender == MessageSender::User && !m.is_read {
                m.is_read = true;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn unread_by_conversation(&self) -> Result<Vec<ConversationSummary>, RepositoryError> {
        self.check()?;
        let mut by_user: HashMap<String, ConversationSummary> = HashMap::new();
        for m in self.all() {
            if m.sender != MessageSender::User || m.is_read {
                continue;
            }
            let entry = by_user.entry(m.user_id.clone()).or_insert(ConversationSummary {
                user_id: m.user_id.clone(),
                display_name: None,
                unread_count: 0,
                last_message_at: m.created_at,
            });
            entry.unread_count += 1;
            entry.last_message_at = entry.last_message_at.max(m.created_at);
        }
        let mut summaries: Vec<_> = by_user.into_values().collect();
        summaries.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        Ok(summaries)
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct FakeGateway {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    next_error: Arc<Mutex<Option<GatewayError>>>,
}

impl FakeGateway {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Fail the next push with the given error.
    pub fn fail_with(&self, error: GatewayError) {
        *self.next_error.lock().unwrap() = Some(error);
    }
}

impl MessagingGateway for FakeGateway {
    async fn push_text(&self, recipient_id: &str, text: &str) -> Result<(), GatewayError> {
        if let Some(err) = self.next_error.lock().unwrap().take() {
            return Err(err);
        }
        self.sent
            .lock()
            .unwrap()
            .push((recipient_id.to_string(), text.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Training
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct FakeTrainingRepository {
    logs: Arc<Mutex<Vec<TrainingLog>>>,
    sets: Arc<Mutex<Vec<TrainingSet>>>,
    failing: Arc<AtomicBool>,
}

impl FakeTrainingRepository {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(injected_failure())
        } else {
            Ok(())
        }
    }

    fn member_of(&self, log_id: &Uuid) -> Option<String> {
        self.logs
            .lock()
            .unwrap()
            .iter()
            .find(|l| &l.id == log_id)
            .map(|l| l.member_id.clone())
    }
}

impl TrainingRepository for FakeTrainingRepository {
    async fn create_log(&self, log: &TrainingLog, sets: &[TrainingSet]) -> Result<(), RepositoryError> {
        self.check()?;
        self.logs.lock().unwrap().push(log.clone());
        self.sets.lock().unwrap().extend_from_slice(sets);
        Ok(())
    }

    async fn list_samples(
        &self,
        member_id: &str,
        exercise_name: &str,
    ) -> Result<Vec<SetSample>, RepositoryError> {
        self.check()?;
        let sets = self.sets.lock().unwrap().clone();
        Ok(sets
            .into_iter()
            .filter(|s| {
                s.exercise_name == exercise_name
                    && self.member_of(&s.training_log_id).as_deref() == Some(member_id)
            })
            .map(|s| SetSample {
                weight: s.weight,
                reps: s.reps,
                created_at: s.created_at,
            })
            .collect())
    }

    async fn list_exercise_names(&self, member_id: &str) -> Result<Vec<String>, RepositoryError> {
        self.check()?;
        let sets = self.sets.lock().unwrap().clone();
        let mut names: Vec<String> = sets
            .into_iter()
            .filter(|s| self.member_of(&s.training_log_id).as_deref() == Some(member_id))
            .map(|s| s.exercise_name)
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn clear_all(&self) -> Result<ClearedTraining, RepositoryError> {
        self.check()?;
        let sets = std::mem::take(&mut *self.sets.lock().unwrap()).len() as u64;
        let logs = std::mem::take(&mut *self.logs.lock().unwrap()).len() as u64;
        Ok(ClearedTraining { sets, logs })
    }
}

// ---------------------------------------------------------------------------
// Users and sessions
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct FakeUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl UserRepository for FakeUserRepository {
    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(user.email.clone()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().unwrap().iter().find(|u| &u.id == id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_profile(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email && u.id != user.id) {
            return Err(RepositoryError::Conflict(user.email.clone()));
        }
        let existing = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepositoryError::NotFound)?;
        let password_hash = existing.password_hash.clone();
        *existing = User {
            password_hash,
            ..user.clone()
        };
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeSessionRepository {
    sessions: Arc<Mutex<HashMap<String, SessionRecord>>>,
}

impl SessionRepository for FakeSessionRepository {
    async fn create(&self, session: &SessionRecord) -> Result<(), RepositoryError> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.token_hash.clone(), session.clone());
        Ok(())
    }

    async fn get(&self, token_hash: &str) -> Result<Option<SessionRecord>, RepositoryError> {
        Ok(self.sessions.lock().unwrap().get(token_hash).cloned())
    }

    async fn delete(&self, token_hash: &str) -> Result<bool, RepositoryError> {
        Ok(self.sessions.lock().unwrap().remove(token_hash).is_some())
    }
}

/// Reversible, obviously-fake credentials.
#[derive(Clone, Copy, Default)]
pub struct FakeCredentials;

impl Credentials for FakeCredentials {
    fn hash_password(&self, password: &str) -> Result<String, String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        hash == format!("hashed:{password}")
    }

    fn new_session_token(&self) -> String {
        Uuid::now_v7().to_string()
    }

    fn token_digest(&self, token: &str) -> String {
        format!("digest:{token}")
    }
}
