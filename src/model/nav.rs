//! Navigation tree and the shell that owns its state.
//!
//! The tree is static configuration. Everything that changes while the user
//! clicks around (expanded nodes, the active leaf) lives in one
//! [`NavigationShell`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::StageError;

/// One entry of the sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavNode {
    pub id: String,
    pub label: String,
    /// Opaque icon token, passed through to the renderer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Opaque route handed to the router on selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Key of the workspace page this leaf shows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavNode>,
}

impl NavNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        NavNode {
            id: id.into(),
            label: label.into(),
            icon: None,
            route: None,
            page: None,
            children: Vec::new(),
        }
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_children(mut self, children: Vec<NavNode>) -> Self {
        self.children = children;
        self
    }

    /// Only leaves are navigable
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// An immutable navigation tree with unique node ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationTree {
    roots: Vec<NavNode>,
}

impl NavigationTree {
    pub fn new(roots: Vec<NavNode>) -> Result<Self, StageError> {
        let mut seen = HashSet::new();
        check_unique(&roots, &mut seen)?;
        Ok(NavigationTree { roots })
    }

    pub fn roots(&self) -> &[NavNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&NavNode> {
        self.path(id).and_then(|p| p.last().copied())
    }

    /// Nodes from a root down to `id`, inclusive
    pub fn path(&self, id: &str) -> Option<Vec<&NavNode>> {
        let mut path = Vec::new();
        if find_path(&self.roots, id, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    /// Every leaf in depth-first order
    pub fn leaves(&self) -> Vec<&NavNode> {
        let mut out = Vec::new();
        collect_leaves(&self.roots, &mut out);
        out
    }

    /// Every node in depth-first order
    pub fn nodes(&self) -> Vec<&NavNode> {
        let mut out = Vec::new();
        collect_nodes(&self.roots, &mut out);
        out
    }
}

fn check_unique<'a>(nodes: &'a [NavNode], seen: &mut HashSet<&'a str>) -> Result<(), StageError> {
    for node in nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(StageError::duplicate(node.id.as_str()));
        }
        check_unique(&node.children, seen)?;
    }
    Ok(())
}

fn find_path<'a>(nodes: &'a [NavNode], id: &str, path: &mut Vec<&'a NavNode>) -> bool {
    for node in nodes {
        path.push(node);
        if node.id == id || find_path(&node.children, id, path) {
            return true;
        }
        path.pop();
    }
    false
}

fn collect_leaves<'a>(nodes: &'a [NavNode], out: &mut Vec<&'a NavNode>) {
    for node in nodes {
        if node.is_leaf() {
            out.push(node);
        } else {
            collect_leaves(&node.children, out);
        }
    }
}

fn collect_nodes<'a>(nodes: &'a [NavNode], out: &mut Vec<&'a NavNode>) {
    for node in nodes {
        out.push(node);
        collect_nodes(&node.children, out);
    }
}

/// Emitted when a leaf is selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationEvent {
    pub node_id: String,
    pub route: Option<String>,
    pub page: Option<String>,
}

/// Receives navigation events. The routing framework sits behind this.
pub trait Router {
    fn navigate(&mut self, event: &NavigationEvent);
}

/// Records every event; useful when nothing else needs to react.
impl Router for Vec<NavigationEvent> {
    fn navigate(&mut self, event: &NavigationEvent) {
        self.push(event.clone());
    }
}

/// What a call to [`NavigationShell::select`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// A leaf became active
    Activated,
    /// A parent was expanded (`true`) or collapsed (`false`)
    Toggled(bool),
}

/// A sidebar row after flattening
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavRow {
    pub id: String,
    pub label: String,
    pub icon: Option<String>,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
    /// The row is the active leaf or one of its ancestors
    pub active_path: bool,
}

/// The single owner of navigation state
#[derive(Debug, Clone)]
pub struct NavigationShell {
    tree: NavigationTree,
    expanded: HashSet<String>,
    active_id: Option<String>,
    revision: u64,
}

impl NavigationShell {
    pub fn new(tree: NavigationTree) -> Self {
        NavigationShell {
            tree,
            expanded: HashSet::new(),
            active_id: None,
            revision: 0,
        }
    }

    pub fn tree(&self) -> &NavigationTree {
        &self.tree
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active_node(&self) -> Option<&NavNode> {
        self.tree.find(self.active_id.as_deref()?)
    }

    pub fn expanded(&self) -> &HashSet<String> {
        &self.expanded
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Clear expanded and active state
    pub fn reset(&mut self) {
        self.expanded.clear();
        self.active_id = None;
        self.revision += 1;
    }

    /// Flip a node's expanded flag. Returns the new flag.
    pub fn toggle_expand(&mut self, id: &str) -> Result<bool, StageError> {
        if self.tree.find(id).is_none() {
            return Err(StageError::not_found(id));
        }
        let now_expanded = if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        };
        self.revision += 1;
        Ok(now_expanded)
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Select a node. A leaf becomes active and is announced to `router`; a
    /// parent toggles instead. The ancestors of a newly active leaf are
    /// expanded so its row stays visible.
    pub fn select(&mut self, id: &str, router: &mut dyn Router) -> Result<Selection, StageError> {
        let node = self.tree.find(id).ok_or_else(|| StageError::not_found(id))?;
        if !node.is_leaf() {
            return self.toggle_expand(id).map(Selection::Toggled);
        }

        let event = NavigationEvent {
            node_id: node.id.clone(),
            route: node.route.clone(),
            page: node.page.clone(),
        };
        self.expand_ancestors(id);
        self.active_id = Some(event.node_id.clone());
        self.revision += 1;
        tracing::info!(node = %event.node_id, page = ?event.page, "navigate");
        router.navigate(&event);
        Ok(Selection::Activated)
    }

    fn expand_ancestors(&mut self, id: &str) {
        let Some(path) = self.tree.path(id) else {
            return;
        };
        if let Some((_, ancestors)) = path.split_last() {
            self.expanded
                .extend(ancestors.iter().map(|n| n.id.clone()));
        }
    }

    /// True for the active node and every ancestor of it
    pub fn is_active_path(&self, id: &str) -> bool {
        let Some(active) = self.active_id.as_deref() else {
            return false;
        };
        self.tree
            .path(active)
            .is_some_and(|path| path.iter().any(|n| n.id == id))
    }

    /// Depth-first rows honouring the expanded set
    pub fn visible_rows(&self) -> Vec<NavRow> {
        let active_path: HashSet<&str> = self
            .active_id
            .as_deref()
            .and_then(|a| self.tree.path(a))
            .map(|p| p.iter().map(|n| n.id.as_str()).collect())
            .unwrap_or_default();
        let mut rows = Vec::new();
        self.flatten(self.tree.roots(), 0, &active_path, &mut rows);
        rows
    }

    /// Every row, ignoring the expanded set
    pub fn all_rows(&self) -> Vec<NavRow> {
        let mut full = self.clone();
        full.expanded = self.tree.nodes().iter().map(|n| n.id.clone()).collect();
        full.visible_rows()
    }

    fn flatten(
        &self,
        nodes: &[NavNode],
        depth: usize,
        active_path: &HashSet<&str>,
        rows: &mut Vec<NavRow>,
    ) {
        for node in nodes {
            let has_children = !node.is_leaf();
            let expanded = has_children && self.expanded.contains(&node.id);
            rows.push(NavRow {
                id: node.id.clone(),
                label: node.label.clone(),
                icon: node.icon.clone(),
                depth,
                has_children,
                expanded,
                active_path: active_path.contains(node.id.as_str()),
            });
            if expanded {
                self.flatten(&node.children, depth + 1, active_path, rows);
            }
        }
    }

    /// Labels from root to the active node
    pub fn breadcrumb(&self) -> Vec<&str> {
        self.active_id
            .as_deref()
            .and_then(|a| self.tree.path(a))
            .map(|p| p.into_iter().map(|n| n.label.as_str()).collect())
            .unwrap_or_default()
    }

    /// Reapply persisted state. Ids no longer in the tree are dropped, as is
    /// an active id that is not a leaf. As with [`select`](Self::select), the
    /// ancestors of the active leaf end up expanded.
    pub fn restore<I>(&mut self, expanded: I, active: Option<&str>)
    where
        I: IntoIterator<Item = String>,
    {
        self.expanded = expanded
            .into_iter()
            .filter(|id| self.tree.find(id).is_some_and(|n| !n.is_leaf()))
            .collect();
        self.active_id = active
            .and_then(|id| self.tree.find(id))
            .filter(|n| n.is_leaf())
            .map(|n| n.id.clone());
        if let Some(active) = self.active_id.clone() {
            self.expand_ancestors(&active);
        }
        self.revision += 1;
    }
}
