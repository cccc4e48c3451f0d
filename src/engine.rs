use crate::address::Address;
use crate::error::{EngineError, Result};
use crate::log::Log;
use crate::membership::MembershipList;
use crate::message::{self, Message};
use crate::params::Params;
use crate::transport::Transport;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;

/// Per-node membership protocol engine.
///
/// A single-threaded cooperative state machine: all mutation happens
/// during a [`recv`](Engine::recv) drain or a [`tick`](Engine::tick) step,
/// both of which run to completion synchronously. There are no suspension
/// points and no internal shared-state contention — an external driver is
/// responsible for calling `recv`/`tick` on each engine in a simulation.
pub struct Engine<T: Transport, L: Log> {
    pub(crate) self_addr: Address,
    pub(crate) in_group: bool,
    pub(crate) failed: bool,
    pub(crate) members: MembershipList,
    pub(crate) pos: usize,
    pub(crate) ping_target: Address,
    pub(crate) finished_ping: bool,
    pub(crate) ping_counter: i32,
    pub(crate) timeout_counter: i32,

    pub(crate) params: Params,
    pub(crate) rng: StdRng,
    pub(crate) inbound: VecDeque<Vec<u8>>,

    transport: T,
    log: L,
}

impl<T: Transport, L: Log> Engine<T, L> {
    pub fn new(self_addr: Address, params: Params, transport: T, log: L) -> Self {
        let rng = StdRng::seed_from_u64(params.shuffle_seed ^ u64::from(self_addr.id));
        Self {
            self_addr,
            in_group: false,
            failed: false,
            members: MembershipList::new(),
            pos: 0,
            ping_target: Address::NULL,
            finished_ping: false,
            ping_counter: params.t_fail,
            timeout_counter: params.t_remove,
            params,
            rng,
            inbound: VecDeque::new(),
            transport,
            log,
        }
    }

    pub fn self_addr(&self) -> Address {
        self.self_addr
    }

    pub fn in_group(&self) -> bool {
        self.in_group
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn members(&self) -> &MembershipList {
        &self.members
    }

    /// Bootstrap: the introducer self-joins immediately; every other node
    /// sends exactly one JOINREQ to `join_addr`.
    ///
    /// A failure here is the one bootstrap-time fatal case in the error
    /// taxonomy (§7 item 4) — it is surfaced as `Err`, not a process exit;
    /// the caller (an outer driver) is expected to log it and terminate.
    pub fn start(&mut self, join_addr: Address) -> Result<()> {
        if self.failed {
            return Ok(());
        }
        if join_addr.is_null() {
            return Err(EngineError::Bootstrap(
                "join address must not be NULL".into(),
            ));
        }

        if self.self_addr == self.params.introducer {
            self.in_group = true;
            self.log.log(self.self_addr, "introducer self-joined");
            return Ok(());
        }

        let req = Message::JoinReq {
            src: self.self_addr,
            end: self.self_addr,
            members: Vec::new(),
        };
        self.send(join_addr, &req)
    }

    /// Marks the engine failed; subsequent `recv`/`tick` calls are no-ops.
    pub fn finish(&mut self) {
        self.failed = true;
    }

    /// Requests the transport to drain messages queued for this node's
    /// address into the inbound queue. A no-op on a failed engine.
    pub fn recv(&mut self) -> Result<()> {
        if self.failed {
            return Ok(());
        }
        let drained = self.transport.recv(self.self_addr)?;
        self.inbound.extend(drained);
        Ok(())
    }

    /// One scheduler step: drain and dispatch the inbound queue, then — if
    /// joined — advance the probe schedule. A no-op on a failed engine.
    ///
    /// Returns `Err` only for a scheduler-invariant violation (§7 error
    /// taxonomy item 4, e.g. `pos` out of bounds) — a defensive check that
    /// should never trigger given the invariants elsewhere in this module.
    /// The caller is expected to log it and terminate the process; the
    /// engine itself never exits the process.
    pub fn tick(&mut self) -> Result<()> {
        if self.failed {
            return Ok(());
        }

        while let Some(bytes) = self.inbound.pop_front() {
            match message::decode(&bytes) {
                Ok(msg) => self.dispatch(msg),
                Err(e) => {
                    self.log
                        .log(self.self_addr, &format!("dropping malformed message: {e}"));
                }
            }
        }

        if self.in_group && !self.members.is_empty() {
            self.scheduler_tick()?;
        }
        Ok(())
    }

    pub(crate) fn dispatch(&mut self, msg: Message) {
        match msg {
            Message::JoinReq { .. } => self.handle_joinreq(msg),
            Message::JoinRep { .. } => self.handle_joinrep(msg),
            Message::Ping { .. } => self.handle_ping(msg),
            Message::PingReq { .. } => self.handle_pingreq(msg),
            Message::Ack { .. } => self.handle_ack(msg),
            Message::Delete { .. } => self.handle_delete(msg),
        }
    }

    /// Fire-and-forget send through the transport. Failures are swallowed
    /// per §7's error taxonomy item 3 — the protocol is self-healing
    /// through retransmission on future ticks/rounds — except during
    /// `start`, where a send failure is propagated as a bootstrap error.
    pub(crate) fn send(&mut self, to: Address, msg: &Message) -> Result<()> {
        let bytes = message::encode(msg);
        self.transport.send(self.self_addr, to, &bytes)
    }

    pub(crate) fn send_best_effort(&mut self, to: Address, msg: &Message) {
        if let Err(e) = self.send(to, msg) {
            self.log
                .log(self.self_addr, &format!("send to {to} failed: {e}"));
        }
    }

    pub(crate) fn log_add(&self, peer: Address) {
        self.log.log_node_add(self.self_addr, peer);
    }

    pub(crate) fn log_remove(&self, peer: Address) {
        self.log.log_node_remove(self.self_addr, peer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::TracingLog;
    use crate::transport::ChannelTransport;

    fn engine(id: u32) -> Engine<ChannelTransport, TracingLog> {
        Engine::new(
            Address::new(id, 0),
            Params::default(),
            ChannelTransport::new(),
            TracingLog,
        )
    }

    #[test]
    fn introducer_self_joins_on_start() {
        let mut e = engine(1);
        e.start(Address::INTRODUCER).unwrap();
        assert!(e.in_group());
    }

    #[test]
    fn non_introducer_sends_joinreq_on_start() {
        let mut e = engine(2);
        e.start(Address::INTRODUCER).unwrap();
        assert!(!e.in_group());
    }

    #[test]
    fn start_rejects_null_join_address() {
        let mut e = engine(2);
        assert!(e.start(Address::NULL).is_err());
    }

    #[test]
    fn failed_engine_ignores_start_recv_tick() {
        let mut e = engine(2);
        e.finish();
        assert!(e.start(Address::INTRODUCER).is_ok());
        assert!(!e.in_group());
        assert!(e.recv().is_ok());
        assert!(e.tick().is_ok());
    }
}
