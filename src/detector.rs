use crate::log::Log;
use crate::message::Message;
use crate::transport::Transport;

use crate::engine::Engine;

/// Failure Detector message handlers: PING, PING-REQ, ACK, DELETE.
///
/// The same `Ping` variant carries both direct and indirect probes; `end`
/// distinguishes them. The probe *schedule* itself (when to send what) is
/// in `scheduler.rs` — this module only reacts to inbound messages.
impl<T: Transport, L: Log> Engine<T, L> {
    /// PING handler. Drop if `src` or `end` is NULL. Otherwise echo an ACK
    /// to `src` carrying the same `end` unchanged — the receiver never
    /// distinguishes whether it is the final probe target or merely being
    /// asked to relay.
    pub(crate) fn handle_ping(&mut self, msg: Message) {
        let src = msg.src();
        let end = msg.end();
        if src.is_null() || end.is_null() {
            return;
        }

        let ack = Message::Ack {
            src: self.self_addr,
            end,
        };
        self.send_best_effort(src, &ack);
    }

    /// PING-REQ handler. Specified but unreachable through the scheduler
    /// in `scheduler.rs` (the scheduler always uses PING, for both direct
    /// and indirect probes). If one ever arrives, forward a PING to the
    /// named target with `end` set back to the original requester, so the
    /// returning ACK routes to them.
    pub(crate) fn handle_pingreq(&mut self, msg: Message) {
        let (src, target) = match msg {
            Message::PingReq { src, end } => (src, end),
            _ => unreachable!("dispatch only routes PingReq here"),
        };
        if src.is_null() || target.is_null() {
            return;
        }

        let ping = Message::Ping {
            src: self.self_addr,
            end: src,
        };
        self.send_best_effort(target, &ping);
    }

    /// ACK handler. Drop only if both `src` and `end` are NULL.
    ///
    /// If `end == self`, the current probe round succeeded. Otherwise the
    /// ACK is traversing a relay and is re-sent toward `end` with `src`
    /// rewritten to self.
    ///
    /// This is the suspect behavior flagged in the Design Notes: an
    /// indirect probe sends `Ping { src: self, end: real_target }` to a
    /// relay. The relay's PING handler above echoes back
    /// `Ack { src: relay, end: real_target }` to the original prober, whose
    /// `end` is `real_target`, not `self` — so this branch never actually
    /// marks `finished_ping` for an indirect probe; it re-forwards the ACK
    /// toward `real_target` instead. Reproduced as specified rather than
    /// silently corrected.
    pub(crate) fn handle_ack(&mut self, msg: Message) {
        let src = msg.src();
        let end = msg.end();
        if src.is_null() && end.is_null() {
            return;
        }

        if end == self.self_addr {
            self.finished_ping = true;
            return;
        }

        let forwarded = Message::Ack {
            src: self.self_addr,
            end,
        };
        self.send_best_effort(end, &forwarded);
    }

    /// DELETE handler. Drop if `end` is NULL. Removing an id already
    /// absent is a silent no-op, making DELETE idempotent.
    pub(crate) fn handle_delete(&mut self, msg: Message) {
        let victim = msg.end();
        if victim.is_null() {
            return;
        }

        if self.members.remove_by_id(victim.id) {
            self.log_remove(victim);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::log::TracingLog;
    use crate::membership::MemberListEntry;
    use crate::message::decode;
    use crate::params::Params;
    use crate::transport::{ChannelTransport, Transport as _};

    fn engine(id: u32, transport: ChannelTransport) -> Engine<ChannelTransport, TracingLog> {
        Engine::new(Address::new(id, 0), Params::default(), transport, TracingLog)
    }

    #[test]
    fn ping_echoes_ack_preserving_end() {
        let shared = ChannelTransport::new();
        let mut n = engine(3, shared.clone());

        n.dispatch(Message::Ping {
            src: Address::new(2, 5),
            end: Address::new(9, 9),
        });

        let mut shared = shared;
        let out = shared.recv(Address::new(2, 5)).unwrap();
        assert_eq!(out.len(), 1);
        match decode(&out[0]).unwrap() {
            Message::Ack { src, end } => {
                assert_eq!(src, Address::new(3, 0));
                assert_eq!(end, Address::new(9, 9));
            }
            other => panic!("expected Ack, got {other:?}"),
        }
    }

    #[test]
    fn ping_drops_when_end_is_null() {
        let shared = ChannelTransport::new();
        let mut n = engine(3, shared.clone());
        n.dispatch(Message::Ping {
            src: Address::new(2, 5),
            end: Address::NULL,
        });
        let mut shared = shared;
        assert!(shared.recv(Address::new(2, 5)).unwrap().is_empty());
    }

    #[test]
    fn direct_ack_marks_finished_ping() {
        let shared = ChannelTransport::new();
        let mut n = engine(2, shared);
        n.ping_target = Address::new(3, 5);
        n.finished_ping = false;

        n.dispatch(Message::Ack {
            src: Address::new(3, 5),
            end: Address::new(2, 0),
        });
        assert!(n.finished_ping);
    }

    #[test]
    fn relayed_ack_does_not_mark_finished_and_is_forwarded() {
        let shared = ChannelTransport::new();
        let mut n = engine(2, shared.clone());
        n.finished_ping = false;

        // relay echoes end = real_target, not self
        n.dispatch(Message::Ack {
            src: Address::new(1, 0),
            end: Address::new(3, 5),
        });
        assert!(!n.finished_ping);

        let mut shared = shared;
        let forwarded = shared.recv(Address::new(3, 5)).unwrap();
        assert_eq!(forwarded.len(), 1);
        assert!(matches!(decode(&forwarded[0]).unwrap(), Message::Ack { .. }));
    }

    #[test]
    fn delete_removes_member_and_is_idempotent() {
        let shared = ChannelTransport::new();
        let mut n = engine(1, shared);
        n.members.insert_unique(MemberListEntry::new(3, 5));

        n.dispatch(Message::Delete {
            src: Address::new(1, 0),
            end: Address::new(3, 5),
        });
        assert!(!n.members.contains_id(3));

        // second delivery is a no-op, not an error
        n.dispatch(Message::Delete {
            src: Address::new(1, 0),
            end: Address::new(3, 5),
        });
        assert!(!n.members.contains_id(3));
    }

    #[test]
    fn delete_drops_when_end_is_null() {
        let shared = ChannelTransport::new();
        let mut n = engine(1, shared);
        n.members.insert_unique(MemberListEntry::new(3, 5));
        n.dispatch(Message::Delete {
            src: Address::new(1, 0),
            end: Address::NULL,
        });
        assert!(n.members.contains_id(3));
    }

    #[test]
    fn pingreq_forwards_ping_with_end_set_to_requester() {
        let shared = ChannelTransport::new();
        let mut relay = engine(2, shared.clone());

        relay.dispatch(Message::PingReq {
            src: Address::new(1, 0),
            end: Address::new(3, 5),
        });

        let mut shared = shared;
        let forwarded = shared.recv(Address::new(3, 5)).unwrap();
        assert_eq!(forwarded.len(), 1);
        match decode(&forwarded[0]).unwrap() {
            Message::Ping { src, end } => {
                assert_eq!(src, Address::new(2, 0));
                assert_eq!(end, Address::new(1, 0));
            }
            other => panic!("expected Ping, got {other:?}"),
        }
    }
}
