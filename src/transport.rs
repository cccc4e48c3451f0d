use crate::address::Address;
use crate::error::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// The transport contract the engine consumes.
///
/// `send` is fire-and-forget with no ordering or delivery guarantees.
/// `recv` drains everything currently queued for `addr` and hands it back
/// as owned buffers — the engine appends them to its inbound queue in the
/// order returned, which is FIFO per the transport's own queue discipline.
///
/// This replaces the source's callback-plus-raw-pointer enqueue contract
/// (see the Design Note on the shared inbound queue): the mailbox is
/// owned by whichever side holds it, passed by reference, with a plain
/// `append`-shaped return value instead of an `enqueue_cb(queue_ptr, ..)`.
pub trait Transport {
    fn send(&mut self, from: Address, to: Address, bytes: &[u8]) -> Result<()>;
    fn recv(&mut self, addr: Address) -> Result<Vec<Vec<u8>>>;
}

/// Reference in-memory transport: one FIFO queue per destination address,
/// shared so that multiple [`Engine`](crate::engine::Engine)s in the same
/// process can address each other by [`Address`]. Grounded in the
/// teacher's channel-backed connection pooling (`networking/pool/channel.rs`):
/// a shared map of per-peer queues rather than real sockets.
#[derive(Clone, Default)]
pub struct ChannelTransport {
    queues: Arc<Mutex<HashMap<Address, Vec<Vec<u8>>>>>,
}

impl ChannelTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for ChannelTransport {
    fn send(&mut self, _from: Address, to: Address, bytes: &[u8]) -> Result<()> {
        let mut queues = self.queues.lock().unwrap();
        queues.entry(to).or_default().push(bytes.to_vec());
        Ok(())
    }

    fn recv(&mut self, addr: Address) -> Result<Vec<Vec<u8>>> {
        let mut queues = self.queues.lock().unwrap();
        Ok(queues.entry(addr).or_default().drain(..).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_then_recv_drains_fifo() {
        let mut t = ChannelTransport::new();
        let a = Address::new(2, 5);
        let b = Address::new(3, 5);
        t.send(a, b, b"one").unwrap();
        t.send(a, b, b"two").unwrap();

        let drained = t.recv(b).unwrap();
        assert_eq!(drained, vec![b"one".to_vec(), b"two".to_vec()]);

        // a second recv with nothing queued drains empty, not an error
        assert!(t.recv(b).unwrap().is_empty());
    }

    #[test]
    fn recv_on_untouched_address_is_empty() {
        let mut t = ChannelTransport::new();
        assert!(t.recv(Address::new(9, 0)).unwrap().is_empty());
    }
}
