//! Maxwell infrastructure: paths, configuration/secret storage, and the
//! side-effect backends the command dispatcher acts on.

pub mod calendar;
pub mod config_storage;
pub mod note_log;
pub mod paths;
pub mod secret_storage;
pub mod session_store;
pub mod workspace;

pub use calendar::{CalendarEvent, CalendarStore};
pub use config_storage::ConfigStorage;
pub use note_log::NoteLog;
pub use paths::MaxwellPaths;
pub use secret_storage::SecretStorage;
pub use session_store::{FileSessionStore, SessionSummary};
pub use workspace::{DirListing, FileWorkspace};
