use chrono::{DateTime, Utc};

use super::collection::{InsertPosition, StageCollection};
use super::command_log::{CommandLog, Ticket};
use super::error::StageError;
use super::item::StageItem;
use super::status::{Status, TransitionRules};
use super::transition::{Transition, TransitionMeta};

/// One kanban column: a status and the cards currently in it
#[derive(Debug, Clone)]
pub struct Column<'a, S: Status> {
    pub status: S,
    pub cards: Vec<&'a StageItem<S>>,
}

/// A kanban board: a collection whose columns are the statuses of `S`, in
/// `S::ALL` order. Dragging a card to another column is a status update.
///
/// Moves are optimistic. Each is applied immediately and logged as pending
/// until [`confirm`](Self::confirm) or [`rollback`](Self::rollback).
#[derive(Debug, Clone)]
pub struct KanbanBoard<S: Status> {
    title: String,
    cards: StageCollection<S>,
    log: CommandLog<S>,
}

impl<S: Status> KanbanBoard<S> {
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        KanbanBoard {
            cards: StageCollection::new(title.clone()),
            title,
            log: CommandLog::new(),
        }
    }

    pub fn from_collection(title: impl Into<String>, cards: StageCollection<S>) -> Self {
        KanbanBoard {
            title: title.into(),
            cards,
            log: CommandLog::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn cards(&self) -> &StageCollection<S> {
        &self.cards
    }

    pub fn log(&self) -> &CommandLog<S> {
        &self.log
    }

    pub fn rules(&self) -> &TransitionRules {
        self.cards.rules()
    }

    pub fn set_rules(&mut self, rules: TransitionRules) {
        self.cards.set_rules(rules);
    }

    pub fn revision(&self) -> u64 {
        self.cards.revision()
    }

    pub fn get(&self, id: &str) -> Option<&StageItem<S>> {
        self.cards.get(id)
    }

    /// All columns with their cards, in column order
    pub fn columns(&self) -> Vec<Column<'_, S>> {
        S::ALL
            .iter()
            .map(|&status| Column {
                status,
                cards: self.cards.items_by_status(status).collect(),
            })
            .collect()
    }

    pub fn column(&self, status: S) -> impl Iterator<Item = &StageItem<S>> + Clone {
        self.cards.items_by_status(status)
    }

    pub fn add_card(&mut self, card: StageItem<S>) -> Result<(), StageError> {
        self.cards.add_item(card)
    }

    pub fn remove_card(&mut self, id: &str) -> Result<StageItem<S>, StageError> {
        self.cards.remove_item(id)
    }

    pub fn edit_card<F>(&mut self, id: &str, edit: F) -> Result<(), StageError>
    where
        F: FnOnce(&mut StageItem<S>),
    {
        self.cards.edit_item(id, edit)
    }

    /// Reorder a card. Column order follows collection order.
    pub fn reorder(&mut self, id: &str, position: InsertPosition) -> Result<(), StageError> {
        self.cards.move_within(id, position)
    }

    /// Move a card to another column. Returns `None` when the card is already
    /// there.
    pub fn move_card(
        &mut self,
        id: &str,
        to: S,
        meta: TransitionMeta,
    ) -> Result<Option<Ticket>, StageError> {
        self.move_card_at(id, to, meta, Utc::now())
    }

    pub fn move_card_at(
        &mut self,
        id: &str,
        to: S,
        meta: TransitionMeta,
        now: DateTime<Utc>,
    ) -> Result<Option<Ticket>, StageError> {
        let applied = self.cards.update_status_at(id, to, meta, now)?;
        Ok(applied.map(|t| self.log.record(t)))
    }

    /// Move a card one column to the right along the forward stages
    pub fn advance(&mut self, id: &str) -> Result<Option<Ticket>, StageError> {
        let current = self.status_of(id)?;
        match current.next_stage() {
            Some(next) => self.move_card(id, next, TransitionMeta::none()),
            None => Ok(None),
        }
    }

    /// Move a card one column to the left along the forward stages
    pub fn retreat(&mut self, id: &str) -> Result<Option<Ticket>, StageError> {
        let current = self.status_of(id)?;
        match current.prev_stage() {
            Some(prev) => self.move_card(id, prev, TransitionMeta::none()),
            None => Ok(None),
        }
    }

    pub fn confirm(&mut self, ticket: Ticket) -> Result<(), StageError> {
        self.log.confirm(ticket)
    }

    /// Compensate a pending move (and any later pending moves of the same
    /// card). Returns how many transitions were reverted. Fails without
    /// touching the card when a later move of it is already confirmed.
    pub fn rollback(&mut self, ticket: Ticket) -> Result<usize, StageError> {
        let taken = self.log.take_for_rollback(ticket)?;
        for t in &taken {
            self.cards.revert(t)?;
        }
        tracing::info!(board = %self.title, reverted = taken.len(), "rolled back card move");
        Ok(taken.len())
    }

    /// Revert the most recent move, settled or not.
    pub fn undo(&mut self) -> Result<Option<Transition<S>>, StageError> {
        let Some(entry) = self.log.pop_last() else {
            return Ok(None);
        };
        self.cards.revert(&entry.transition)?;
        Ok(Some(entry.transition))
    }

    fn status_of(&self, id: &str) -> Result<S, StageError> {
        self.cards
            .get(id)
            .map(|c| c.status())
            .ok_or_else(|| StageError::not_found(id))
    }
}
