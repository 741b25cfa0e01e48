//! Editing session state machine.
//!
//! Sequences the user journey: upload, frame extraction, region selection,
//! inpainting, optional video generation, result. Session state is a tagged
//! union carrying exactly the artifacts valid in each phase; remote and
//! local collaborators sit behind trait seams so the machine is testable
//! without a network or FFmpeg.

pub mod error;
pub mod progress;
pub mod session;
pub mod state;
pub mod traits;

pub use error::SessionError;
pub use progress::ProgressTicker;
pub use session::{Session, MIN_ACTIONABLE_EDGE};
pub use state::{ErrorKind, ProcessingKind, SessionPhase, SessionSnapshot, SessionState};
pub use traits::{CredentialStore, FfmpegFrameSource, FrameSource, RemoteEditor};
