// ---------------------------------------------------------------------------
// Versioned display slots
// ---------------------------------------------------------------------------

/// Content of one display slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotState<T> {
    Empty,
    Loading,
    Ready(T),
    Failed(String),
}

/// Proof that a request was issued for a slot at a given version.
///
/// Results are applied only while the slot still carries the same version,
/// so a fetch that finishes after the listing was replaced is dropped instead
/// of landing on an unrelated item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotTicket {
    pub index: usize,
    pub version: u64,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    version: u64,
    key: Option<String>,
    state: SlotState<T>,
}

/// One slot per listing position.
#[derive(Debug, Clone)]
pub struct SlotTable<T> {
    slots: Vec<Slot<T>>,
    /// Monotonic across resets; a version is never handed out twice.
    next_version: u64,
}

impl<T> Default for SlotTable<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            next_version: 1,
        }
    }
}

impl<T> SlotTable<T> {
    /// Drop every slot and create `len` empty ones with fresh versions.
    pub fn reset(&mut self, len: usize) {
        let mut slots = Vec::with_capacity(len);
        for _ in 0..len {
            slots.push(Slot {
                version: self.bump(),
                key: None,
                state: SlotState::Empty,
            });
        }
        self.slots = slots;
    }

    fn bump(&mut self) -> u64 {
        let v = self.next_version;
        self.next_version += 1;
        v
    }

    /// Mark the slot as loading `key` and return a ticket for the request.
    ///
    /// Returns `None` when the slot does not exist or is already loading or
    /// holding `key`, so callers can ask every frame without re-fetching.
    /// Binding a different key (or retrying a failed one) invalidates older
    /// tickets.
    pub fn begin(&mut self, index: usize, key: &str) -> Option<SlotTicket> {
        let version = self.next_version;
        let slot = self.slots.get_mut(index)?;

        if slot.key.as_deref() == Some(key) {
            return None;
        }

        slot.version = version;
        slot.key = Some(key.to_string());
        slot.state = SlotState::Loading;
        self.next_version += 1;
        Some(SlotTicket { index, version })
    }

    /// Forget a failed load so the next `begin` for the slot fetches again.
    pub fn retry(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            if matches!(slot.state, SlotState::Failed(_)) {
                slot.key = None;
                slot.state = SlotState::Empty;
            }
        }
    }

    /// Apply a finished request. Returns `false` (and drops `outcome`) when
    /// the ticket is stale.
    pub fn fulfil(&mut self, ticket: SlotTicket, outcome: Result<T, String>) -> bool {
        match self.slots.get_mut(ticket.index) {
            Some(slot) if slot.version == ticket.version => {
                slot.state = match outcome {
                    Ok(value) => SlotState::Ready(value),
                    Err(reason) => SlotState::Failed(reason),
                };
                true
            }
            _ => {
                log::debug!(
                    "Discarding stale result for slot {} (version {})",
                    ticket.index,
                    ticket.version
                );
                false
            }
        }
    }

    /// Whether a result for `ticket` would still be applied.
    pub fn is_current(&self, ticket: SlotTicket) -> bool {
        self.slots
            .get(ticket.index)
            .is_some_and(|s| s.version == ticket.version)
    }

    pub fn get(&self, index: usize) -> Option<&SlotState<T>> {
        self.slots.get(index).map(|s| &s.state)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.len()
    }
}
