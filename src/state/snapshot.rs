use std::sync::Arc;

use tracing::{debug, warn};

/// Issued by [Snapshot::begin] before a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Single owned slot holding an immutable value. Values are only ever replaced as a whole, so a
/// reader holding an [Arc] from [Snapshot::current] always sees a complete value.
///
/// Fetches are ordered by ticket: a response for an older ticket never overwrites one for a newer
/// ticket, regardless of which resolves first.
#[derive(Debug)]
pub struct Snapshot<T> {
    value: Arc<T>,
    issued: u64,
    committed: u64,
}

impl<T> Snapshot<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: Arc::new(initial),
            issued: 0,
            committed: 0,
        }
    }

    pub fn current(&self) -> Arc<T> {
        self.value.clone()
    }

    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Installs `value` unless a newer ticket has already been committed. Returns whether the
    /// value was installed.
    pub fn commit(&mut self, ticket: Ticket, value: T) -> bool {
        if ticket.0 <= self.committed {
            warn!(
                "Dropping stale result of fetch {}, fetch {} already landed",
                ticket.0, self.committed
            );
            return false;
        }
        debug!("Committing fetch {}", ticket.0);
        self.committed = ticket.0;
        self.value = Arc::new(value);
        true
    }
}

impl<T: Default> Default for Snapshot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
