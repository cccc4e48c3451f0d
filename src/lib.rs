// SWIM Membership Engine
// Core library module

pub mod address;
pub mod detector;
pub mod engine;
pub mod error;
pub mod join;
pub mod log;
pub mod membership;
pub mod message;
pub mod params;
pub mod scheduler;
pub mod transport;

pub use address::Address;
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use log::{Log, TracingLog};
pub use membership::{MemberListEntry, MembershipList};
pub use message::Message;
pub use params::Params;
pub use transport::{ChannelTransport, Transport};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tick constants from the protocol spec, re-exported for convenience —
/// [`Params::default`] already uses these.
pub const T_FAIL: i32 = 4;
pub const T_REMOVE: i32 = 20;
