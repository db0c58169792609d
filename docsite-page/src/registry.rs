//! Tracks which code blocks already have their copy behavior attached.

use crate::mutation::BlockId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    New(BlockId),
    AlreadyWired(BlockId),
}

impl Registration {
    #[must_use]
    pub const fn id(self) -> BlockId {
        match self {
            Self::New(id) | Self::AlreadyWired(id) => id,
        }
    }

    #[must_use]
    pub const fn is_new(self) -> bool {
        matches!(self, Self::New(_))
    }
}

/// Wired elements keyed by identity.
///
/// Keys only need `PartialEq` so DOM handles (compared by reference) can be
/// stored directly. Lookups are linear; pages carry tens of blocks. Released
/// slots stay empty so ids held by pending timers never alias a new block.
#[derive(Debug)]
pub struct WiringRegistry<K> {
    wired: Vec<Option<K>>,
}

impl<K> Default for WiringRegistry<K> {
    fn default() -> Self {
        Self { wired: Vec::new() }
    }
}

impl<K: PartialEq> WiringRegistry<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: K) -> Registration {
        if let Some(idx) = self.wired.iter().position(|k| k.as_ref() == Some(&key)) {
            return Registration::AlreadyWired(BlockId(idx));
        }
        self.wired.push(Some(key));
        Registration::New(BlockId(self.wired.len() - 1))
    }

    /// Drop every key `keep` rejects. Returns how many were released.
    pub fn release_unless<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K) -> bool,
    {
        let mut released = 0;
        for slot in &mut self.wired {
            if slot.as_ref().is_some_and(|key| !keep(key)) {
                *slot = None;
                released += 1;
            }
        }
        released
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.wired.iter().any(|k| k.as_ref() == Some(key))
    }

    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<&K> {
        self.wired.get(id.0).and_then(Option::as_ref)
    }

    /// Live keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.wired.iter().filter(|k| k.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
