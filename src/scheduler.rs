use crate::address::Address;
use crate::error::{EngineError, Result};
use crate::log::Log;
use crate::message::Message;
use crate::transport::Transport;

use crate::engine::Engine;

/// Probe Scheduler: per-tick probe selection, timers, round rotation.
///
/// Driven once per tick when `in_group` is true and `members` is
/// non-empty (the caller in `engine.rs` guards both). Each round lasts
/// `t_remove` ticks: a direct PING is issued at the first tick of the
/// round, and if unacknowledged by tick `t_fail`, a relay is recruited to
/// re-probe every `t_fail` ticks until the round ends. If still
/// unacknowledged at round end, the target is declared failed.
impl<T: Transport, L: Log> Engine<T, L> {
    pub(crate) fn scheduler_tick(&mut self) -> Result<()> {
        // 1. Timeout expiry.
        if self.timeout_counter == 0 {
            self.timeout_counter = self.params.t_remove;
            if !self.finished_ping {
                self.declare_failed(self.ping_target);
            }
        }

        // 2. Round boundary.
        if self.pos == self.members.len() {
            self.members.shuffle(&mut self.rng);
            self.pos = 0;
        }

        if self.members.is_empty() {
            // the failed-probe removal above may have emptied the list
            return Ok(());
        }

        // 3. Start direct probe.
        if self.timeout_counter == self.params.t_remove {
            let target = *self
                .members
                .get(self.pos)
                .ok_or_else(|| EngineError::InvariantViolation("pos out of bounds".into()))?;
            let target_addr = Address::new(target.id, target.port);

            self.ping_target = target_addr;
            self.finished_ping = false;
            self.ping_counter = self.params.t_fail;

            let ping = Message::Ping {
                src: self.self_addr,
                end: self.self_addr,
            };
            self.send_best_effort(target_addr, &ping);
            self.pos += 1;
        } else if self.timeout_counter < self.params.t_remove
            && !self.finished_ping
            && self.ping_counter == 0
        {
            // 4. Escalate to indirect probe via a relay.
            let relay = *self
                .members
                .get(self.pos)
                .ok_or_else(|| EngineError::InvariantViolation("pos out of bounds".into()))?;
            let relay_addr = Address::new(relay.id, relay.port);

            let ping = Message::Ping {
                src: self.self_addr,
                end: self.ping_target,
            };
            self.send_best_effort(relay_addr, &ping);
            self.ping_counter = self.params.t_fail;
            self.pos += 1;
        }

        // 5. Advance timers.
        self.ping_counter -= 1;
        self.timeout_counter -= 1;

        Ok(())
    }

    fn declare_failed(&mut self, target: Address) {
        if self.members.remove_by_id(target.id) {
            self.log_remove(target);
        }
        let delete = Message::Delete {
            src: self.self_addr,
            end: target,
        };
        for entry in self.members.snapshot() {
            let addr = Address::new(entry.id, entry.port);
            self.send_best_effort(addr, &delete);
        }
        // fan-out includes self: harmlessly delivered and processed as a
        // removal (idempotent no-op, since we already removed it above).
        self.send_best_effort(self.self_addr, &delete);
    }
}
