//! Client for a remote show player: status and directory decoding, command
//! payloads, and a session that reconciles the rendered view with the player.

pub mod command;
pub mod directory_codec;
pub mod error;
pub mod session;
pub mod status_codec;
pub mod transport;
pub mod view;

pub use error::{DirectoryError, TransportError};
pub use session::{ControlSession, ErrorRecord, RefreshOutcome, SessionEvent, SessionOperation};
pub use transport::{HttpTransport, ShowfileEndpoints, ShowfileTransport};
pub use view::{DirectoryOption, LoopButtonLabel, StatusView};
