use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::StageError;
use super::item::{ItemId, StageItem};
use super::status::{Status, TransitionRules};
use super::transition::{self, Transition, TransitionMeta};

/// Where to place an item in a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertPosition {
    /// Append to the end
    Bottom,
    /// Prepend to the start
    Top,
    /// Insert after the item with this ID
    After(String),
}

/// An ordered, named group of stage items sharing one purpose
/// (e.g. the "Documentation" part of an onboarding checklist).
#[derive(Debug, Clone, Serialize)]
pub struct StageCollection<S: Status> {
    name: String,
    items: Vec<StageItem<S>>,
    #[serde(skip)]
    rules: TransitionRules,
    #[serde(skip)]
    revision: u64,
}

impl<S: Status> StageCollection<S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_rules(name, S::default_rules())
    }

    pub fn with_rules(name: impl Into<String>, rules: TransitionRules) -> Self {
        StageCollection {
            name: name.into(),
            items: Vec::new(),
            rules,
            revision: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &TransitionRules {
        &self.rules
    }

    pub fn set_rules(&mut self, rules: TransitionRules) {
        self.rules = rules;
        self.touch();
    }

    pub fn items(&self) -> &[StageItem<S>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bumped on every mutation; renderers compare it to decide on redraws
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: &str) -> Option<&StageItem<S>> {
        self.items.iter().find(|i| i.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.id.as_str() == id)
    }

    /// Append an item.
    pub fn add_item(&mut self, item: StageItem<S>) -> Result<(), StageError> {
        self.insert_item(item, InsertPosition::Bottom)
    }

    /// Insert an item at the given position.
    pub fn insert_item(
        &mut self,
        item: StageItem<S>,
        position: InsertPosition,
    ) -> Result<(), StageError> {
        if self.contains(item.id.as_str()) {
            return Err(StageError::duplicate(item.id.as_str()));
        }
        let idx = self.resolve_position(&position)?;
        self.items.insert(idx, item);
        self.touch();
        Ok(())
    }

    /// Remove an item permanently and hand it back.
    pub fn remove_item(&mut self, id: &str) -> Result<StageItem<S>, StageError> {
        let idx = self.position(id).ok_or_else(|| StageError::not_found(id))?;
        let item = self.items.remove(idx);
        self.touch();
        Ok(item)
    }

    /// Reorder an item within the collection.
    pub fn move_within(&mut self, id: &str, position: InsertPosition) -> Result<(), StageError> {
        let idx = self.position(id).ok_or_else(|| StageError::not_found(id))?;
        let item = self.items.remove(idx);
        match self.resolve_position(&position) {
            Ok(target) => self.items.insert(target, item),
            Err(e) => {
                self.items.insert(idx, item);
                return Err(e);
            }
        }
        self.touch();
        Ok(())
    }

    /// Change an item's status through the collection's transition rules.
    pub fn update_status(
        &mut self,
        id: &str,
        status: S,
        meta: TransitionMeta,
    ) -> Result<Option<Transition<S>>, StageError> {
        self.update_status_at(id, status, meta, Utc::now())
    }

    /// Same as [`update_status`](Self::update_status) with an explicit clock.
    pub fn update_status_at(
        &mut self,
        id: &str,
        status: S,
        meta: TransitionMeta,
        now: DateTime<Utc>,
    ) -> Result<Option<Transition<S>>, StageError> {
        let rules = self.rules;
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id.as_str() == id)
            .ok_or_else(|| StageError::not_found(id))?;
        let applied = transition::apply(item, status, meta, &rules, now)?;
        if applied.is_some() {
            self.touch();
        }
        Ok(applied)
    }

    /// Field-level edit. Status stays out of reach: it is private on
    /// [`StageItem`] and only moves through [`update_status`](Self::update_status).
    pub fn edit_item<F>(&mut self, id: &str, edit: F) -> Result<(), StageError>
    where
        F: FnOnce(&mut StageItem<S>),
    {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id.as_str() == id)
            .ok_or_else(|| StageError::not_found(id))?;
        let original_id = item.id.clone();
        edit(item);
        // Identity is stable for the lifetime of the collection.
        item.id = original_id;
        self.touch();
        Ok(())
    }

    /// Apply a compensating transition.
    pub(crate) fn revert(&mut self, t: &Transition<S>) -> Result<(), StageError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == t.item_id)
            .ok_or_else(|| StageError::not_found(t.item_id.as_str()))?;
        transition::revert(item, t);
        self.touch();
        Ok(())
    }

    /// Items currently in `status`, in display order
    pub fn items_by_status(&self, status: S) -> impl Iterator<Item = &StageItem<S>> + Clone {
        self.items.iter().filter(move |i| i.status() == status)
    }

    /// Items matching `pred`, in display order
    pub fn filter<'a, P>(&'a self, pred: P) -> impl Iterator<Item = &'a StageItem<S>> + Clone
    where
        P: Fn(&StageItem<S>) -> bool + Clone + 'a,
    {
        self.items.iter().filter(move |i| pred(*i))
    }

    pub fn ids(&self) -> impl Iterator<Item = &ItemId> + Clone {
        self.items.iter().map(|i| &i.id)
    }

    fn resolve_position(&self, position: &InsertPosition) -> Result<usize, StageError> {
        match position {
            InsertPosition::Bottom => Ok(self.items.len()),
            InsertPosition::Top => Ok(0),
            InsertPosition::After(after) => self
                .position(after)
                .map(|i| i + 1)
                .ok_or_else(|| StageError::not_found(format!("after target {}", after))),
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}
