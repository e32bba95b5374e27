//! Chat session and message controller.
//!
//! [`ChatState`] holds everything the widget shows and only changes through
//! its methods. [`ChatController`] drives those transitions around calls to a
//! [`ChatApi`]. Every outbound request carries a [`RequestId`] together with
//! the session it was issued for, and a response is applied only while that
//! request is still the current one for the still-active session.

use std::cell::{Cell, Ref, RefCell};

use log::{debug, info, warn};
use rand::Rng;
use yew::Callback;

use crate::api::ChatApi;
use crate::error::ApiError;
use crate::types::{Message, SessionId};

pub type RequestId = u64;

pub const PROCESSING_TEXT: &str = "Processing your request...";

#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptEntry {
    pub message: Message,
    /// Set on the placeholder bot message while its send is in flight.
    pub pending: Option<RequestId>,
}

impl TranscriptEntry {
    fn settled(message: Message) -> Self {
        Self { message, pending: None }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HistoryRequest {
    pub id: RequestId,
    pub session_id: SessionId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SendRequest {
    pub id: RequestId,
    pub session_id: SessionId,
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    Applied { refresh_sessions: bool },
    Discarded,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatState {
    transcript: Vec<TranscriptEntry>,
    input: String,
    active_session: Option<SessionId>,
    sessions: Vec<SessionId>,
    sessions_loading: bool,
    refresh_queued: bool,
    notice: Option<String>,
    pending_send: Option<RequestId>,
    pending_history: Option<RequestId>,
    next_request: RequestId,
}

impl ChatState {
    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.transcript.iter().map(|entry| &entry.message)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn active_session(&self) -> Option<&SessionId> {
        self.active_session.as_ref()
    }

    pub fn sessions(&self) -> &[SessionId] {
        &self.sessions
    }

    pub fn sessions_loading(&self) -> bool {
        self.sessions_loading
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_sending(&self) -> bool {
        self.pending_send.is_some()
    }

    pub fn is_loading_history(&self) -> bool {
        self.pending_history.is_some()
    }

    /// Whether the composer accepts a new message right now.
    pub fn can_send(&self) -> bool {
        !self.is_sending() && !self.is_loading_history()
    }

    pub fn set_input(&mut self, text: String) {
        self.input = text;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    fn next_request_id(&mut self) -> RequestId {
        self.next_request += 1;
        self.next_request
    }

    fn abandon_in_flight(&mut self) {
        if let Some(id) = self.pending_send.take() {
            debug!("abandoning pending send #{}", id);
        }
        self.pending_history = None;
        self.transcript.retain(|entry| !entry.is_pending());
    }

    /// Activates a freshly generated session with an empty transcript. The
    /// backend learns about it on the first send.
    pub fn start_new_session<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SessionId {
        let id = SessionId::generate(rng);
        self.abandon_in_flight();
        self.transcript.clear();
        self.active_session = Some(id.clone());
        info!("started new session {}", id);
        id
    }

    /// Activates `session_id`. The transcript keeps its content until the
    /// returned history request settles.
    pub fn select_session(&mut self, session_id: SessionId) -> HistoryRequest {
        self.abandon_in_flight();
        self.active_session = Some(session_id.clone());
        let id = self.next_request_id();
        self.pending_history = Some(id);
        HistoryRequest { id, session_id }
    }

    /// Stale responses (another session selected since) are dropped.
    pub fn apply_history(&mut self, request: &HistoryRequest, result: Result<Vec<Message>, ApiError>) {
        if self.pending_history != Some(request.id)
            || self.active_session.as_ref() != Some(&request.session_id)
        {
            debug!("dropping stale history #{} for {}", request.id, request.session_id);
            return;
        }
        self.pending_history = None;
        match result {
            Ok(history) => {
                self.transcript = history.into_iter().map(TranscriptEntry::settled).collect();
            }
            Err(e) => {
                warn!("Error fetching chat history for {}: {}", request.session_id, e);
                self.notice = Some(format!("Could not load history for {}: {}", request.session_id, e));
            }
        }
    }

    /// Marks the session list as loading. Returns `false` if a refresh is
    /// already running; that refresh then runs once more when it settles, since
    /// its list may predate whatever prompted this call.
    pub fn begin_sessions_refresh(&mut self) -> bool {
        if self.sessions_loading {
            self.refresh_queued = true;
            return false;
        }
        self.sessions_loading = true;
        true
    }

    /// Returns `true` when a queued refresh must be issued now; the list then
    /// stays in the loading state.
    pub fn apply_sessions(&mut self, result: Result<Vec<SessionId>, ApiError>) -> bool {
        match result {
            Ok(sessions) => self.sessions = sessions,
            Err(e) => {
                warn!("Error fetching sessions: {}", e);
                self.notice = Some(format!("Could not load sessions: {}", e));
            }
        }
        let again = std::mem::take(&mut self.refresh_queued);
        self.sessions_loading = again;
        again
    }

    /// Appends the user message and the pending placeholder, clears the input
    /// and returns the request to issue. Blank input, or a send or history
    /// load already in flight, leave the state untouched.
    pub fn begin_send<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<SendRequest> {
        if self.input.trim().is_empty() || !self.can_send() {
            return None;
        }
        let session_id = match &self.active_session {
            Some(id) => id.clone(),
            None => self.start_new_session(rng),
        };
        let text = std::mem::take(&mut self.input);
        let id = self.next_request_id();

        self.transcript.push(TranscriptEntry::settled(Message::user(text.clone())));
        self.transcript.push(TranscriptEntry {
            message: Message::bot(PROCESSING_TEXT),
            pending: Some(id),
        });
        self.pending_send = Some(id);

        Some(SendRequest { id, session_id, text })
    }

    /// Replaces the request's placeholder with the reply, or with the error
    /// text on failure.
    pub fn apply_send(&mut self, request: &SendRequest, result: Result<String, ApiError>) -> SendOutcome {
        if self.pending_send != Some(request.id)
            || self.active_session.as_ref() != Some(&request.session_id)
        {
            info!(
                "discarding reply #{} for {}: session no longer active",
                request.id, request.session_id
            );
            return SendOutcome::Discarded;
        }
        self.pending_send = None;

        let succeeded = result.is_ok();
        let content = match result {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Error sending message: {}", e);
                e.transcript_text()
            }
        };

        match self
            .transcript
            .iter_mut()
            .find(|entry| entry.pending == Some(request.id))
        {
            Some(entry) => *entry = TranscriptEntry::settled(Message::bot(content)),
            None => self.transcript.push(TranscriptEntry::settled(Message::bot(content))),
        }

        SendOutcome::Applied {
            refresh_sessions: succeeded && !self.sessions.contains(&request.session_id),
        }
    }
}

/// Owns the widget state and runs the chat operations against `A`.
///
/// `on_change` fires after every state transition; the view re-reads
/// [`ChatController::state`] when it does.
pub struct ChatController<A: ChatApi> {
    api: A,
    state: RefCell<ChatState>,
    on_change: Callback<()>,
    detached: Cell<bool>,
}

impl<A: ChatApi> ChatController<A> {
    pub fn new(api: A, on_change: Callback<()>) -> Self {
        Self {
            api,
            state: RefCell::new(ChatState::default()),
            on_change,
            detached: Cell::new(false),
        }
    }

    pub fn state(&self) -> Ref<'_, ChatState> {
        self.state.borrow()
    }

    fn update<R>(&self, f: impl FnOnce(&mut ChatState) -> R) -> R {
        let result = {
            let mut state = self.state.borrow_mut();
            f(&mut state)
        };
        if !self.detached.get() {
            self.on_change.emit(());
        }
        result
    }

    /// Stops applying responses. Used when the widget unmounts.
    pub fn detach(&self) {
        self.detached.set(true);
    }

    pub fn set_input(&self, text: String) {
        self.update(|state| state.set_input(text));
    }

    pub fn dismiss_notice(&self) {
        self.update(ChatState::dismiss_notice);
    }

    pub fn start_new_session(&self) -> SessionId {
        self.update(|state| state.start_new_session(&mut rand::thread_rng()))
    }

    pub async fn select_session(&self, session_id: SessionId) {
        let request = self.update(|state| state.select_session(session_id));
        self.fetch_history(request).await;
    }

    async fn fetch_history(&self, request: HistoryRequest) {
        let result = self.api.fetch_history(&request.session_id).await;
        if self.detached.get() {
            return;
        }
        self.update(|state| state.apply_history(&request, result));
    }

    pub async fn fetch_available_sessions(&self) {
        if !self.update(ChatState::begin_sessions_refresh) {
            debug!("session list refresh already running; queued another");
            return;
        }
        loop {
            let result = self.api.list_sessions().await;
            if self.detached.get() {
                return;
            }
            if !self.update(|state| state.apply_sessions(result)) {
                break;
            }
            debug!("running queued session list refresh");
        }
    }

    pub async fn send_message(&self) {
        let Some(request) = self.update(|state| state.begin_send(&mut rand::thread_rng())) else {
            return;
        };
        debug!("sending #{} to {}", request.id, request.session_id);
        let result = self.api.send_message(&request.session_id, &request.text).await;
        if self.detached.get() {
            return;
        }
        let outcome = self.update(|state| state.apply_send(&request, result));
        if let SendOutcome::Applied { refresh_sessions: true } = outcome {
            self.fetch_available_sessions().await;
        }
    }
}
