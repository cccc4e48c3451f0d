use std::fmt;

/// A fixed 6-byte node identity: a 4-byte node id and a 2-byte port.
///
/// Equality is bytewise (`id` and `port` both compared) — full address
/// equality is only used for self-vs-other checks on delivery. Membership
/// bookkeeping distinguishes peers by `id` alone; see [`MemberListEntry`]
/// in `membership.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    pub id: u32,
    pub port: u16,
}

impl Address {
    pub const fn new(id: u32, port: u16) -> Self {
        Self { id, port }
    }

    /// The distinguished zero address.
    pub const NULL: Address = Address::new(0, 0);

    /// The well-known rendezvous address used for bootstrap.
    pub const INTRODUCER: Address = Address::new(1, 0);

    pub fn is_null(&self) -> bool {
        *self == Address::NULL
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.port)
    }
}
