use crate::address::Address;

/// The structured event log the engine writes to. A shared, read-mostly
/// collaborator from the engine's point of view — the engine only ever
/// writes.
pub trait Log {
    fn log_node_add(&self, me: Address, peer: Address);
    fn log_node_remove(&self, me: Address, peer: Address);
    fn log(&self, me: Address, text: &str);
}

/// Default `Log` implementation: forwards to `tracing`, mirroring the
/// teacher's structured, field-based event logging
/// (`networking/membership/swim.rs`'s `tracing::trace!`/`warn!`/`error!`
/// calls) rather than interpolating peer ids into free-text messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl Log for TracingLog {
    fn log_node_add(&self, me: Address, peer: Address) {
        tracing::debug!(node_id = %me, peer = %peer, "member added");
    }

    fn log_node_remove(&self, me: Address, peer: Address) {
        tracing::error!(node_id = %me, peer = %peer, "member removed");
    }

    fn log(&self, me: Address, text: &str) {
        tracing::trace!(node_id = %me, "{text}");
    }
}
