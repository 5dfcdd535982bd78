//! Client for a PDF legal-document analysis backend.
//!
//! A document is uploaded once; the backend then either answers follow-up
//! questions about it (`/chat`) or returns a single markdown analysis
//! (`/analyze/`) that is split into themed sections for display.
//!
//! ```rust,ignore
//! let backend = HttpBackend::new(ClientConfig::new(LOCAL_BASE_URL));
//! let mut session = SessionController::new(backend, true);
//! let doc = DocumentFile::from_path("lease.pdf").await?;
//! if session.upload_document(&doc).await {
//!     session.send_message("When does the lease end?").await;
//! }
//! ```

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod display;
pub mod document;
pub mod error;
pub mod render;
pub mod sections;
pub mod session;
pub mod transport;

pub use api::{ConversationTurn, Role};
pub use config::{ClientConfig, DEPLOYED_BASE_URL, LOCAL_BASE_URL};
pub use document::DocumentFile;
pub use error::ClientError;
pub use sections::{split_sections, AnalysisSection, SECTION_CATALOG};
pub use session::{SessionController, SessionEvent, SessionState, UiMode, UiState};
pub use transport::{Backend, HttpBackend};
