use super::error::StageError;
use super::status::Status;
use super::transition::Transition;

const LOG_LIMIT: usize = 500;

/// Handle for one recorded transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// Whether the outside world has acknowledged a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Applied locally, awaiting confirmation
    Pending,
    Confirmed,
}

#[derive(Debug, Clone)]
pub struct LogEntry<S: Status> {
    pub ticket: Ticket,
    pub transition: Transition<S>,
    pub state: EntryState,
}

/// Append-only log of applied transitions.
///
/// Moves are applied eagerly and recorded as pending. A confirmation marks
/// them settled. A failure signal hands back the transitions to compensate,
/// newest first. Undo pops the newest entry regardless of state.
#[derive(Debug, Clone)]
pub struct CommandLog<S: Status> {
    entries: Vec<LogEntry<S>>,
    next_ticket: u64,
}

impl<S: Status> Default for CommandLog<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Status> CommandLog<S> {
    pub fn new() -> Self {
        CommandLog {
            entries: Vec::new(),
            next_ticket: 1,
        }
    }

    /// Record an applied transition as pending.
    pub fn record(&mut self, transition: Transition<S>) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.entries.push(LogEntry {
            ticket,
            transition,
            state: EntryState::Pending,
        });
        // Only settled history is dropped; pending entries stay compensable.
        while self.entries.len() > LOG_LIMIT && self.entries[0].state == EntryState::Confirmed {
            self.entries.remove(0);
        }
        ticket
    }

    pub fn confirm(&mut self, ticket: Ticket) -> Result<(), StageError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.ticket == ticket)
            .ok_or_else(|| StageError::not_found(format!("ticket {}", ticket.0)))?;
        entry.state = EntryState::Confirmed;
        Ok(())
    }

    /// Remove a pending entry and every later pending entry on the same item.
    /// Returns the transitions to revert, newest first.
    ///
    /// Refused when a later move of the same item is already confirmed: the
    /// item no longer sits where the pending entry left it.
    pub fn take_for_rollback(&mut self, ticket: Ticket) -> Result<Vec<Transition<S>>, StageError> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.ticket == ticket && e.state == EntryState::Pending)
            .ok_or_else(|| StageError::not_found(format!("pending ticket {}", ticket.0)))?;
        let target = &self.entries[idx].transition;
        let item_id = target.item_id.clone();

        if let Some(settled) = self.entries[idx + 1..]
            .iter()
            .find(|e| e.state == EntryState::Confirmed && e.transition.item_id == item_id)
        {
            return Err(StageError::InvalidTransition {
                from: target.to.key().to_string(),
                to: target.from.key().to_string(),
                reason: format!(
                    "{} was since confirmed in {}",
                    item_id,
                    settled.transition.to.key()
                ),
            });
        }

        let mut taken = Vec::new();
        let mut i = idx;
        while i < self.entries.len() {
            let entry = &self.entries[i];
            if entry.state == EntryState::Pending && entry.transition.item_id == item_id {
                taken.push(self.entries.remove(i).transition);
            } else {
                i += 1;
            }
        }
        taken.reverse();
        Ok(taken)
    }

    /// Remove and return the newest entry
    pub fn pop_last(&mut self) -> Option<LogEntry<S>> {
        self.entries.pop()
    }

    pub fn entries(&self) -> &[LogEntry<S>] {
        &self.entries
    }

    pub fn pending(&self) -> impl Iterator<Item = &LogEntry<S>> + Clone {
        self.entries
            .iter()
            .filter(|e| e.state == EntryState::Pending)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
