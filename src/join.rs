use crate::address::Address;
use crate::log::Log;
use crate::membership::MemberListEntry;
use crate::message::Message;
use crate::transport::Transport;

use crate::engine::Engine;

/// Join Coordinator: the JOINREQ/JOINREP handshake and initial list
/// seeding. Bootstrap itself (`start`) lives in `engine.rs`; this module
/// covers the two handlers driven by inbound messages.
impl<T: Transport, L: Log> Engine<T, L> {
    /// JOINREQ handler (any node).
    ///
    /// 1. Drop if `src` is NULL.
    /// 2. Insert `src.id` into `members` if absent.
    /// 3. Emit an add event to the log.
    /// 4. Reply with a JOINREP to `src` carrying the *current* members
    ///    snapshot (taken after step 2, so it includes `src` itself).
    pub(crate) fn handle_joinreq(&mut self, msg: Message) {
        let src = msg.src();
        if src.is_null() {
            return;
        }

        if self.members.insert_unique(MemberListEntry::new(src.id, src.port)) {
            self.log_add(src);
        }

        let reply = Message::JoinRep {
            src: self.self_addr,
            end: self.self_addr,
            members: self.members.snapshot(),
        };
        self.send_best_effort(src, &reply);
    }

    /// JOINREP handler (non-introducer).
    ///
    /// 1. Drop if `src` is NULL.
    /// 2. Insert `src.id` if absent; emit an add event.
    /// 3. If `src.id` equals the introducer's id, join is complete.
    /// 4. For every entry in the carried snapshot that is neither self nor
    ///    already known, insert it and send that peer a JOINREQ — this
    ///    triggers a pairwise handshake with every peer discovered through
    ///    the introducer, so a new joiner learns every other member
    ///    directly without a version vector.
    pub(crate) fn handle_joinrep(&mut self, msg: Message) {
        let (src, members) = match msg {
            Message::JoinRep { src, members, .. } => (src, members),
            _ => unreachable!("dispatch only routes JoinRep here"),
        };
        if src.is_null() {
            return;
        }

        if self.members.insert_unique(MemberListEntry::new(src.id, src.port)) {
            self.log_add(src);
        }

        if src.id == self.params.introducer.id {
            self.in_group = true;
        }

        for entry in members {
            if entry.id == self.self_addr.id {
                continue;
            }
            if self.members.insert_unique(entry) {
                let peer = Address::new(entry.id, entry.port);
                self.log_add(peer);
                let req = Message::JoinReq {
                    src: self.self_addr,
                    end: self.self_addr,
                    members: Vec::new(),
                };
                self.send_best_effort(peer, &req);
            }
        }
    }
}
