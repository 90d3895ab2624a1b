use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use super::collection::{InsertPosition, StageCollection};
use super::error::StageError;
use super::item::StageItem;
use super::status::{Status, TransitionRules};
use super::transition::{Transition, TransitionMeta};

/// A titled set of categories, each a [`StageCollection`]. The onboarding
/// checklist is one group with a category per area (documentation, IT
/// setup, training...).
///
/// Item ids are unique across all categories of the group.
#[derive(Debug, Clone)]
pub struct StageGroup<S: Status> {
    title: String,
    categories: IndexMap<String, StageCollection<S>>,
    rules: TransitionRules,
    /// Structural changes (categories added, items moved across categories)
    revision: u64,
}

impl<S: Status> StageGroup<S> {
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_rules(title, S::default_rules())
    }

    pub fn with_rules(title: impl Into<String>, rules: TransitionRules) -> Self {
        StageGroup {
            title: title.into(),
            categories: IndexMap::new(),
            rules,
            revision: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rules(&self) -> &TransitionRules {
        &self.rules
    }

    /// Replace the rules on the group and every category
    pub fn set_rules(&mut self, rules: TransitionRules) {
        self.rules = rules;
        for c in self.categories.values_mut() {
            c.set_rules(rules);
        }
        self.revision += 1;
    }

    /// Sum of this group's structural revision and every category's
    pub fn revision(&self) -> u64 {
        self.revision + self.categories.values().map(|c| c.revision()).sum::<u64>()
    }

    /// Add an empty category.
    pub fn add_category(&mut self, name: impl Into<String>) -> Result<(), StageError> {
        let name = name.into();
        if self.categories.contains_key(&name) {
            return Err(StageError::duplicate(name));
        }
        let collection = StageCollection::with_rules(name.clone(), self.rules);
        self.categories.insert(name, collection);
        self.revision += 1;
        Ok(())
    }

    pub fn category(&self, name: &str) -> Option<&StageCollection<S>> {
        self.categories.get(name)
    }

    pub fn categories(&self) -> impl Iterator<Item = &StageCollection<S>> + Clone {
        self.categories.values()
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> + Clone {
        self.categories.keys().map(|k| k.as_str())
    }

    /// Each category with its items, in category order
    pub fn items_by_category(&self) -> impl Iterator<Item = (&str, &[StageItem<S>])> + Clone {
        self.categories
            .iter()
            .map(|(name, c)| (name.as_str(), c.items()))
    }

    /// Every item across categories, in category then display order
    pub fn items(&self) -> impl Iterator<Item = &StageItem<S>> + Clone {
        self.categories.values().flat_map(|c| c.items().iter())
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find an item and the category holding it
    pub fn find(&self, id: &str) -> Option<(&str, &StageItem<S>)> {
        self.categories
            .iter()
            .find_map(|(name, c)| c.get(id).map(|item| (name.as_str(), item)))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Add an item to the end of a category.
    pub fn add_item(&mut self, category: &str, item: StageItem<S>) -> Result<(), StageError> {
        self.insert_item(category, item, InsertPosition::Bottom)
    }

    /// Insert an item into a category at the given position.
    pub fn insert_item(
        &mut self,
        category: &str,
        item: StageItem<S>,
        position: InsertPosition,
    ) -> Result<(), StageError> {
        if self.contains(item.id.as_str()) {
            return Err(StageError::duplicate(item.id.as_str()));
        }
        self.category_mut(category)?.insert_item(item, position)
    }

    /// Remove an item from whichever category holds it.
    pub fn remove_item(&mut self, id: &str) -> Result<StageItem<S>, StageError> {
        let category = self.owning_category_mut(id)?;
        category.remove_item(id)
    }

    pub fn update_status(
        &mut self,
        id: &str,
        status: S,
        meta: TransitionMeta,
    ) -> Result<Option<Transition<S>>, StageError> {
        self.update_status_at(id, status, meta, Utc::now())
    }

    pub fn update_status_at(
        &mut self,
        id: &str,
        status: S,
        meta: TransitionMeta,
        now: DateTime<Utc>,
    ) -> Result<Option<Transition<S>>, StageError> {
        self.owning_category_mut(id)?
            .update_status_at(id, status, meta, now)
    }

    pub fn edit_item<F>(&mut self, id: &str, edit: F) -> Result<(), StageError>
    where
        F: FnOnce(&mut StageItem<S>),
    {
        self.owning_category_mut(id)?.edit_item(id, edit)
    }

    /// Move an item to another category: a remove followed by an append.
    /// Both ends are checked first so a failure leaves the group untouched.
    pub fn move_item(&mut self, id: &str, to_category: &str) -> Result<(), StageError> {
        let (from, _) = self.find(id).ok_or_else(|| StageError::not_found(id))?;
        if !self.categories.contains_key(to_category) {
            return Err(StageError::not_found(to_category));
        }
        if from == to_category {
            return Ok(());
        }
        let from = from.to_string();
        let item = self.category_mut(&from)?.remove_item(id)?;
        self.category_mut(to_category)?.add_item(item)?;
        self.revision += 1;
        Ok(())
    }

    pub(crate) fn revert(&mut self, t: &Transition<S>) -> Result<(), StageError> {
        self.owning_category_mut(t.item_id.as_str())?.revert(t)
    }

    fn category_mut(&mut self, name: &str) -> Result<&mut StageCollection<S>, StageError> {
        self.categories
            .get_mut(name)
            .ok_or_else(|| StageError::not_found(name))
    }

    fn owning_category_mut(&mut self, id: &str) -> Result<&mut StageCollection<S>, StageError> {
        self.categories
            .values_mut()
            .find(|c| c.contains(id))
            .ok_or_else(|| StageError::not_found(id))
    }
}
