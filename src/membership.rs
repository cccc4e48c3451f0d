use rand::seq::SliceRandom;
use rand::RngCore;

/// One entry in a [`MembershipList`].
///
/// Two entries are equal iff their `id`s are equal — the engine
/// distinguishes peers by id only, even though addresses carry a port.
#[derive(Debug, Clone, Copy)]
pub struct MemberListEntry {
    pub id: u32,
    pub port: u16,
}

impl MemberListEntry {
    pub fn new(id: u32, port: u16) -> Self {
        Self { id, port }
    }
}

impl PartialEq for MemberListEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for MemberListEntry {}

/// An ordered sequence of [`MemberListEntry`] with no duplicate `id`s.
///
/// Insertion appends; removal preserves the relative order of survivors.
/// Reshuffling (`shuffle`) is only ever invoked by the probe scheduler at
/// round boundaries, never mid-round, so iteration order stays stable
/// between reshuffles as required.
#[derive(Debug, Clone, Default)]
pub struct MembershipList {
    entries: Vec<MemberListEntry>,
}

impl MembershipList {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn contains_id(&self, id: u32) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Appends `entry` unless an entry with the same id is already present.
    /// Returns `true` if the entry was inserted.
    pub fn insert_unique(&mut self, entry: MemberListEntry) -> bool {
        if self.contains_id(entry.id) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Removes the entry with the given id, if present, preserving the
    /// relative order of the remaining entries. Returns `true` if an entry
    /// was removed.
    pub fn remove_by_id(&mut self, id: u32) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MemberListEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemberListEntry> {
        self.entries.iter()
    }

    /// Snapshot the list for transmission in a JOINREQ/JOINREP message.
    pub fn snapshot(&self) -> Vec<MemberListEntry> {
        self.entries.clone()
    }

    /// Uniform random permutation of the entries, using the supplied RNG.
    ///
    /// The engine plumbs a seedable generator through construction (see
    /// the Design Notes on random shuffle seeding) rather than reseeding a
    /// global generator from wall-clock time every round.
    pub fn shuffle(&mut self, rng: &mut dyn RngCore) {
        self.entries.shuffle(rng);
    }
}
