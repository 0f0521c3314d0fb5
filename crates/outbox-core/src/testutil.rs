//! Shared in-memory test doubles for the core traits.
//!
//! Mirrors the production implementations closely enough that manager, queue,
//! and engine tests exercise real control flow: the mock transport delivers
//! events over the same mpsc channel a real transport would, and the
//! in-memory repositories honor the same upsert/conflict semantics as the
//! SQLite ones.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use dashmap::DashMap;
use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

use outbox_types::error::{ChannelError, RepositoryError};
use outbox_types::event::SessionEvent;
use outbox_types::message::{DeliveryStatus, ScheduledMessage};
use outbox_types::session::{ChannelSession, SendOutcome, SessionStatus};

use crate::channel::{ChannelClient, ChannelFactory, EVENT_CHANNEL_CAPACITY};
use crate::dispatch::queue::OutboundSender;
use crate::dispatch::repository::ScheduledMessageRepository;
use crate::session::repository::SessionRepository;

// ---------------------------------------------------------------------------
// Channel doubles
// ---------------------------------------------------------------------------

/// Transport client double: records sends, optionally fails connect/send.
pub(crate) struct MockClient {
    fail_connect: AtomicBool,
    fail_send: AtomicBool,
    sent: std::sync::Mutex<Vec<(String, String)>>,
    counter: AtomicUsize,
}

impl MockClient {
    pub(crate) fn new() -> Self {
        Self {
            fail_connect: AtomicBool::new(false),
            fail_send: AtomicBool::new(false),
            sent: std::sync::Mutex::new(Vec::new()),
            counter: AtomicUsize::new(0),
        }
    }

    pub(crate) fn fail_connects(&self) {
        self.fail_connect.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_sends(&self) {
        self.fail_send.store(true, Ordering::SeqCst);
    }

    pub(crate) fn allow_sends(&self) {
        self.fail_send.store(false, Ordering::SeqCst);
    }

    /// Snapshot of `(recipient, body)` pairs sent so far.
    pub(crate) fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl ChannelClient for MockClient {
    async fn connect(&self) -> Result<(), ChannelError> {
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(ChannelError::Connect("mock connect refused".to_string()));
        }
        Ok(())
    }

    async fn send_text(&self, recipient: &str, body: &str) -> Result<String, ChannelError> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(ChannelError::Send("mock send refused".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), body.to_string()));
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(format!("MOCK-{n}"))
    }
}

/// Transport factory double.
///
/// Retains the event sender per session so tests can inject lifecycle and
/// message events into a running event loop.
pub(crate) struct MockFactory {
    fail_connect: AtomicBool,
    fail_open: AtomicBool,
    opened: AtomicUsize,
    clients: DashMap<String, Arc<MockClient>>,
    senders: DashMap<String, mpsc::Sender<SessionEvent>>,
}

impl MockFactory {
    pub(crate) fn new() -> Self {
        Self {
            fail_connect: AtomicBool::new(false),
            fail_open: AtomicBool::new(false),
            opened: AtomicUsize::new(0),
            clients: DashMap::new(),
            senders: DashMap::new(),
        }
    }

    /// Every client opened from now on refuses to connect.
    pub(crate) fn fail_connects(&self) {
        self.fail_connect.store(true, Ordering::SeqCst);
    }

    pub(crate) fn allow_connects(&self) {
        self.fail_connect.store(false, Ordering::SeqCst);
    }

    pub(crate) fn fail_opens(&self) {
        self.fail_open.store(true, Ordering::SeqCst);
    }

    /// How many clients were ever opened.
    pub(crate) fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub(crate) fn client(&self, session_id: &str) -> Option<Arc<MockClient>> {
        self.clients.get(session_id).map(|c| Arc::clone(c.value()))
    }

    /// Inject an event into the session's event loop.
    pub(crate) async fn emit(&self, session_id: &str, event: SessionEvent) {
        let sender = self
            .senders
            .get(session_id)
            .map(|s| s.value().clone())
            .expect("no event channel for session");
        sender.send(event).await.expect("event loop gone");
    }

    /// Drop the event sender, ending the session's event loop.
    pub(crate) fn close_events(&self, session_id: &str) {
        self.senders.remove(session_id);
    }
}

impl ChannelFactory for MockFactory {
    type Client = MockClient;

    fn open(
        &self,
        session_id: &str,
    ) -> Result<(Arc<MockClient>, mpsc::Receiver<SessionEvent>), ChannelError> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(ChannelError::Connect("mock open refused".to_string()));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);

        let client = Arc::new(MockClient::new());
        if self.fail_connect.load(Ordering::SeqCst) {
            client.fail_connects();
        }

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        self.clients
            .insert(session_id.to_string(), Arc::clone(&client));
        self.senders.insert(session_id.to_string(), tx);
        Ok((client, rx))
    }
}

// ---------------------------------------------------------------------------
// Repository doubles
// ---------------------------------------------------------------------------

/// In-memory `SessionRepository` with failure toggles.
pub(crate) struct InMemorySessionRepository {
    records: DashMap<String, ChannelSession>,
    fail_create: AtomicBool,
    fail_upsert: AtomicBool,
}

impl InMemorySessionRepository {
    pub(crate) fn new() -> Self {
        Self {
            records: DashMap::new(),
            fail_create: AtomicBool::new(false),
            fail_upsert: AtomicBool::new(false),
        }
    }

    pub(crate) fn fail_creates(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_upserts(&self) {
        self.fail_upsert.store(true, Ordering::SeqCst);
    }

    pub(crate) fn status_of(&self, session_id: &str) -> Option<SessionStatus> {
        self.records.get(session_id).map(|r| r.status)
    }

    pub(crate) fn insert(&self, session: ChannelSession) {
        self.records.insert(session.session_id.clone(), session);
    }
}

impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: &ChannelSession) -> Result<(), RepositoryError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        if self.records.contains_key(&session.session_id) {
            return Err(RepositoryError::Conflict(session.session_id.clone()));
        }
        self.records
            .insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn find_by_id(&self, session_id: &str) -> Result<Option<ChannelSession>, RepositoryError> {
        Ok(self.records.get(session_id).map(|r| r.clone()))
    }

    async fn find_all(&self) -> Result<Vec<ChannelSession>, RepositoryError> {
        Ok(self.records.iter().map(|r| r.clone()).collect())
    }

    async fn find_by_status(
        &self,
        status: SessionStatus,
    ) -> Result<Vec<ChannelSession>, RepositoryError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.status == status)
            .map(|r| r.clone())
            .collect())
    }

    async fn upsert_status(
        &self,
        session_id: &str,
        status: SessionStatus,
    ) -> Result<(), RepositoryError> {
        if self.fail_upsert.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        let now = chrono::Utc::now();
        self.records
            .entry(session_id.to_string())
            .and_modify(|r| {
                r.status = status;
                r.updated_at = now;
            })
            .or_insert_with(|| {
                let mut record = ChannelSession::new_pending(session_id);
                record.status = status;
                record
            });
        Ok(())
    }
}

/// In-memory `ScheduledMessageRepository` with failure toggles.
pub(crate) struct InMemoryMessageRepository {
    records: DashMap<Uuid, ScheduledMessage>,
    fail_create: AtomicBool,
    fail_update: AtomicBool,
}

impl InMemoryMessageRepository {
    pub(crate) fn new() -> Self {
        Self {
            records: DashMap::new(),
            fail_create: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
        }
    }

    pub(crate) fn fail_creates(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_updates(&self) {
        self.fail_update.store(true, Ordering::SeqCst);
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn status_of(&self, id: &Uuid) -> Option<DeliveryStatus> {
        self.records.get(id).map(|r| r.status)
    }

    pub(crate) fn insert(&self, message: ScheduledMessage) {
        self.records.insert(message.id, message);
    }
}

impl ScheduledMessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: &ScheduledMessage) -> Result<(), RepositoryError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        self.records.insert(message.id, message.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ScheduledMessage>, RepositoryError> {
        Ok(self.records.get(id).map(|r| r.clone()))
    }

    async fn find_by_status(
        &self,
        status: DeliveryStatus,
    ) -> Result<Vec<ScheduledMessage>, RepositoryError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.status == status)
            .map(|r| r.clone())
            .collect())
    }

    async fn update_status(&self, id: &Uuid, status: DeliveryStatus) -> Result<(), RepositoryError> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        match self.records.get_mut(id) {
            Some(mut record) => {
                record.status = status;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound sender double
// ---------------------------------------------------------------------------

/// Records sends and fails for a configurable set of recipients.
pub(crate) struct MockOutbound {
    sent: Mutex<Vec<(String, String, String)>>,
    failing: std::sync::Mutex<HashSet<String>>,
}

impl MockOutbound {
    pub(crate) fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: std::sync::Mutex::new(HashSet::new()),
        }
    }

    /// Sends to this recipient will return an error outcome.
    pub(crate) fn fail_for(&self, recipient: &str) {
        self.failing.lock().unwrap().insert(recipient.to_string());
    }

    /// Snapshot of `(session_id, recipient, body)` triples.
    pub(crate) async fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().await.clone()
    }
}

impl OutboundSender for MockOutbound {
    async fn send(&self, session_id: &str, recipient: &str, body: &str) -> SendOutcome {
        self.sent.lock().await.push((
            session_id.to_string(),
            recipient.to_string(),
            body.to_string(),
        ));
        if self.failing.lock().unwrap().contains(recipient) {
            SendOutcome::error(format!("refused for {recipient}"))
        } else {
            SendOutcome::success(format!("OUT-{recipient}"))
        }
    }
}

// ---------------------------------------------------------------------------
// Polling helper
// ---------------------------------------------------------------------------

/// Await `condition` turning true, panicking after ~2 seconds.
pub(crate) async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("condition not reached within timeout");
}
