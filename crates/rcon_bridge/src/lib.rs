//! # RCON Bridge
//!
//! Bridges a game server's RCON console session to a chat platform.
//!
//! The RCON session delivers one unordered stream of text messages. Some are
//! replies to administrative commands, the rest are unsolicited console lines
//! such as chat and player connects. Only the identifier the transport put on
//! each message tells them apart, so the bridge keeps its own bookkeeping:
//!
//! 1. Every inbound message is first offered to the [`CommandCorrelator`]. If
//!    its identifier belongs to a command still waiting for a reply, the
//!    waiting caller gets the text and nothing else sees it.
//! 2. Everything else is classified by [`classify`] into a
//!    [`ClassifiedEvent`].
//! 3. The [`EventDispatcher`] renders the event and sends it to the
//!    destination configured for its category.
//!
//! Log lines are mirrored to a system-log destination through the
//! [`LogMirrorLayer`] tracing layer.
//!
//! ## Collaborators
//!
//! The RCON wire protocol and the chat platform client live outside this
//! crate, behind the [`RconTransport`] and [`ChatPlatform`] traits.
//!
//! ## Error Handling
//!
//! Only [`RconBridge::execute_command`] returns errors ([`CommandError`]).
//! Dispatch failures are logged and the notification is dropped; nothing in
//! the bridge takes the process down.

pub use bridge::{spawn_log_mirror, RconBridge};
pub use classifier::{classify, classify_at, CHAT_CHANNEL_TAGS};
pub use config::{BridgeConfig, EventChannelSettings};
pub use correlator::{CommandCorrelator, DEFAULT_COMMAND_TIMEOUT};
pub use dispatcher::{DestinationCache, EventDispatcher, MIRROR_TARGET};
pub use error::{CommandError, DispatchError, PlatformError, TransportError};
pub use mirror::{log_mirror, LogMirrorLayer};
pub use platform::{ChatPlatform, Color, Destination, Embed, Notification};
pub use transport::{transport_channel, RconTransport};
pub use types::*;

pub mod bridge;
pub mod classifier;
pub mod config;
pub mod correlator;
pub mod dispatcher;
pub mod error;
pub mod mirror;
pub mod platform;
pub mod render;
pub mod transport;
pub mod types;
