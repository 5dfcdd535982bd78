//! Session state and the controller that mediates every backend call.
//!
//! ## Lifecycle
//! 1. [`SessionController::new`] starts a session in upload mode
//! 2. [`SessionController::upload_document`] obtains a document id and
//!    switches to chat mode, greeting the user
//! 3. [`SessionController::send_message`] runs one chat round trip
//! 4. [`SessionController::reset`] ends the session
//!
//! [`SessionController::analyze_document`] is the one-shot alternative to 2–3.
//!
//! Every operation takes `&mut self`, so at most one request is in flight
//! per controller. Failures never escape as errors: they become status text
//! flagged with [`UiState::error`] (upload, analyze) or a model turn in the
//! transcript (chat).

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::{ChatRequest, ChatResponse, ConversationTurn};
use crate::document::DocumentFile;
use crate::error::ClientError;
use crate::sections::{split_sections, AnalysisSection};
use crate::transport::Backend;

pub const GREETING: &str = "Hello! I've finished reading the document. How can I help you?";
pub const UPLOAD_FALLBACK: &str = "File upload failed.";
pub const CHAT_FALLBACK: &str = "Failed to get a response.";
pub const ANALYZE_FALLBACK: &str = "Analysis failed.";

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Conversation state for one front end.
///
/// `awaiting_response` is only ever true between dispatch and resolution of
/// a chat request, which requires a document id.
#[derive(Debug, Clone)]
pub struct SessionState {
    session_id: Uuid,
    document_id: Option<String>,
    filename: Option<String>,
    history: Vec<ConversationTurn>,
    awaiting_response: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            document_id: None,
            filename: None,
            history: Vec::new(),
            awaiting_response: false,
        }
    }

    /// Identifier used to correlate log records; not sent to the backend.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn document_id(&self) -> Option<&str> {
        self.document_id.as_deref()
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting_response
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Which panel the front end shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Upload,
    Chat,
    Results,
}

/// Control enablement and visible text driven by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub mode: UiMode,
    pub upload_enabled: bool,
    pub input_enabled: bool,
    pub input_focused: bool,
    pub loading: bool,
    pub status: String,
    /// Whether `status` reports a failure.
    pub error: bool,
    pub header: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: UiMode::Upload,
            upload_enabled: true,
            input_enabled: false,
            input_focused: false,
            loading: false,
            status: String::new(),
            error: false,
            header: None,
        }
    }
}

/// Notifications for a front end that renders incrementally.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    TurnAppended(ConversationTurn),
    LoadingChanged(bool),
    StatusChanged { status: String, is_error: bool },
    ModeChanged(UiMode),
}

/// A chat turn that has been dispatched but not resolved.
///
/// Only [`SessionController::begin_turn`] creates one.
#[derive(Debug)]
pub struct PendingTurn {
    request: ChatRequest,
}

impl PendingTurn {
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct SessionController<B> {
    backend: B,
    state: SessionState,
    ui: UiState,
    require_pdf: bool,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl<B: Backend> SessionController<B> {
    pub fn new(backend: B, require_pdf: bool) -> Self {
        Self {
            backend,
            state: SessionState::new(),
            ui: UiState::default(),
            require_pdf,
            events: None,
        }
    }

    /// Publish [`SessionEvent`]s to `tx` from now on.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// End the current session and start a fresh one in upload mode.
    pub fn reset(&mut self) {
        info!(session_id = %self.state.session_id, turns = self.state.history.len(), "session reset");
        self.state = SessionState::new();
        self.ui = UiState::default();
        self.emit(SessionEvent::ModeChanged(UiMode::Upload));
        self.emit(SessionEvent::StatusChanged {
            status: String::new(),
            is_error: false,
        });
    }

    // -- upload --------------------------------------------------------------

    /// Upload `file` and open a chat session on it. Returns whether the
    /// session is now in chat mode.
    pub async fn upload_document(&mut self, file: &DocumentFile) -> bool {
        if !self.ui.upload_enabled {
            return false;
        }
        if self.require_pdf && !file.is_pdf() {
            let err = ClientError::NotPdf(file.name.clone());
            self.set_error_status(err.user_message(UPLOAD_FALLBACK));
            return false;
        }

        self.set_status(format!("Uploading {}...", file.name));
        self.ui.upload_enabled = false;

        match self.backend.upload(file).await {
            Ok(resp) => {
                info!(
                    session_id = %self.state.session_id,
                    document_id = %resp.document_id,
                    filename = %resp.filename,
                    "document uploaded"
                );
                self.ui.header = Some(format!("Chatting about {}", resp.filename));
                self.state.document_id = Some(resp.document_id);
                self.state.filename = Some(resp.filename);
                self.set_status(String::new());
                self.set_mode(UiMode::Chat);
                self.ui.input_enabled = true;
                self.ui.input_focused = true;
                self.push_turn(ConversationTurn::model(GREETING));
                true
            }
            Err(e) => {
                warn!(session_id = %self.state.session_id, error = %e, file = %file.name, "upload failed");
                self.set_error_status(format!("Error: {}", e.user_message(UPLOAD_FALLBACK)));
                self.ui.upload_enabled = true;
                false
            }
        }
    }

    // -- chat ----------------------------------------------------------------

    /// Record the user's message and build the request for it.
    ///
    /// Returns `None`, changing nothing, when the trimmed text is empty, no
    /// document has been uploaded, or a response is still outstanding.
    pub fn begin_turn(&mut self, text: &str) -> Option<PendingTurn> {
        let message = text.trim();
        if message.is_empty() || self.state.awaiting_response {
            return None;
        }
        let document_id = self.state.document_id.clone()?;

        let request = ChatRequest {
            document_id,
            message: message.to_string(),
            history: self.state.history.clone(),
        };
        self.push_turn(ConversationTurn::user(message));
        self.set_loading(true);
        debug!(
            session_id = %self.state.session_id,
            history_len = request.history.len(),
            "chat turn dispatched"
        );
        Some(PendingTurn { request })
    }

    /// Record the outcome of a dispatched turn and re-enable input.
    pub fn finish_turn(&mut self, pending: PendingTurn, result: Result<ChatResponse, ClientError>) {
        let turn = match result {
            Ok(resp) => ConversationTurn::model(resp.reply),
            Err(e) => {
                warn!(
                    session_id = %self.state.session_id,
                    document_id = %pending.request.document_id,
                    error = %e,
                    "chat turn failed"
                );
                ConversationTurn::model(format!(
                    "Sorry, an error occurred: {}",
                    e.user_message(CHAT_FALLBACK)
                ))
            }
        };
        self.push_turn(turn);
        self.set_loading(false);
    }

    /// Send one message and wait for the reply. Returns whether a request
    /// was issued.
    pub async fn send_message(&mut self, text: &str) -> bool {
        let Some(pending) = self.begin_turn(text) else {
            return false;
        };
        let result = self.backend.chat(pending.request()).await;
        self.finish_turn(pending, result);
        true
    }

    // -- one-shot analysis ---------------------------------------------------

    /// Upload `file` for a one-shot analysis and split the result into
    /// sections.
    ///
    /// On failure the returned message is also the current
    /// [`UiState::status`], with [`UiState::error`] set. A reply with no
    /// catalog headers yields no sections; its text is kept as the status so
    /// it still reaches the user, and a reply that starts with `Error:` is a
    /// failure reported in-band by the backend.
    pub async fn analyze_document(
        &mut self,
        file: &DocumentFile,
    ) -> Result<Vec<AnalysisSection>, String> {
        if !self.ui.upload_enabled {
            return Err("Close the open document before analyzing another.".to_string());
        }
        if self.require_pdf && !file.is_pdf() {
            let message = ClientError::NotPdf(file.name.clone()).user_message(ANALYZE_FALLBACK);
            self.set_error_status(message.clone());
            return Err(message);
        }

        self.set_status(format!("Analyzing {}...", file.name));
        self.ui.upload_enabled = false;
        self.set_loading_flag(true);

        let outcome = self.backend.analyze(file).await;
        self.set_loading_flag(false);
        self.ui.upload_enabled = true;

        let resp = match outcome {
            Ok(resp) => resp,
            Err(e) => {
                warn!(session_id = %self.state.session_id, error = %e, file = %file.name, "analysis failed");
                let message = format!("Error: {}", e.user_message(ANALYZE_FALLBACK));
                self.set_error_status(message.clone());
                return Err(message);
            }
        };

        let sections = split_sections(&resp.analysis);
        let raw = resp.analysis.trim();
        if sections.is_empty() && raw.starts_with("Error:") {
            warn!(session_id = %self.state.session_id, file = %file.name, reason = %raw, "backend reported analysis failure");
            self.set_error_status(raw.to_string());
            return Err(raw.to_string());
        }

        info!(
            session_id = %self.state.session_id,
            file = %file.name,
            sections = sections.len(),
            "analysis received"
        );
        self.state.filename = Some(file.name.clone());
        self.ui.header = Some(format!("Analysis of {}", file.name));
        if sections.is_empty() {
            self.set_status(raw.to_string());
        } else {
            self.set_status(String::new());
        }
        self.set_mode(UiMode::Results);
        Ok(sections)
    }

    // -- helpers -------------------------------------------------------------

    fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    fn push_turn(&mut self, turn: ConversationTurn) {
        self.state.history.push(turn.clone());
        self.emit(SessionEvent::TurnAppended(turn));
    }

    fn set_status(&mut self, status: String) {
        self.update_status(status, false);
    }

    fn set_error_status(&mut self, status: String) {
        self.update_status(status, true);
    }

    fn update_status(&mut self, status: String, is_error: bool) {
        if self.ui.status != status || self.ui.error != is_error {
            self.ui.status = status.clone();
            self.ui.error = is_error;
            self.emit(SessionEvent::StatusChanged { status, is_error });
        }
    }

    fn set_mode(&mut self, mode: UiMode) {
        if self.ui.mode != mode {
            self.ui.mode = mode;
            self.emit(SessionEvent::ModeChanged(mode));
        }
    }

    fn set_loading_flag(&mut self, loading: bool) {
        self.ui.loading = loading;
        self.emit(SessionEvent::LoadingChanged(loading));
    }

    /// Chat loading: toggles the in-flight flag and input controls together.
    fn set_loading(&mut self, loading: bool) {
        self.state.awaiting_response = loading;
        self.ui.input_enabled = !loading;
        self.ui.input_focused = !loading;
        self.set_loading_flag(loading);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
