//! Tree traversal, path addressing and upward arrangement.
//!
//! Views hold no parent pointers. A [`ViewPath`] names a view by the cell
//! handles leading to it from the root, so its ancestors are the path's
//! prefixes.

use crate::cell::CellId;
use crate::view::{EventResponse, PointerEvent, View};
use cellflow_core::LayoutError;
use std::fmt;
use tracing::{debug, warn};

/// Cell handles from the root to a view. Empty for the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ViewPath(Vec<CellId>);

impl ViewPath {
    /// Path of the root view.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Path from explicit handles.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = CellId>) -> Self {
        Self(ids.into_iter().collect())
    }

    /// The handles.
    #[must_use]
    pub fn ids(&self) -> &[CellId] {
        &self.0
    }

    /// Depth below the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Last handle, if any.
    #[must_use]
    pub fn last(&self) -> Option<CellId> {
        self.0.last().copied()
    }

    /// Path of the parent view.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    /// Path of child `id` of this view.
    #[must_use]
    pub fn child(&self, id: CellId) -> Self {
        let mut ids = self.0.clone();
        ids.push(id);
        Self(ids)
    }

    /// Strict ancestors, nearest first. The root comes last.
    pub fn ancestors(&self) -> impl Iterator<Item = Self> + '_ {
        (0..self.0.len()).rev().map(|n| Self(self.0[..n].to_vec()))
    }
}

impl fmt::Display for ViewPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for id in &self.0 {
            write!(f, "/{id}")?;
        }
        Ok(())
    }
}

/// View found by name, with where and when it was met.
pub struct Found<'a> {
    /// The view
    pub view: &'a dyn View,
    /// Its path from the search root
    pub path: ViewPath,
    /// Visit order, counting from zero
    pub index: usize,
}

impl fmt::Debug for Found<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Found")
            .field("view", &self.view.object_name())
            .field("path", &self.path)
            .field("index", &self.index)
            .finish()
    }
}

/// View at `path` below `root`.
#[must_use]
pub fn view_at<'a>(root: &'a dyn View, path: &[CellId]) -> Option<&'a dyn View> {
    let mut view = root;
    for id in path {
        view = view.as_cells_owner()?.container().cell(*id)?.view();
    }
    Some(view)
}

/// Mutable view at `path` below `root`.
pub fn view_at_mut<'a>(root: &'a mut dyn View, path: &[CellId]) -> Option<&'a mut dyn View> {
    let mut view = root;
    for id in path {
        view = view
            .as_cells_owner_mut()?
            .container_mut()
            .cell_mut(*id)?
            .view_mut();
    }
    Some(view)
}

// Level by level: every child of a container is visited before any of its
// grandchildren.
fn range_cells(
    view: &dyn View,
    path: &ViewPath,
    recursive: bool,
    include_collapsed: bool,
    visit: &mut dyn FnMut(&dyn View, &ViewPath) -> bool,
) -> bool {
    let Some(owner) = view.as_cells_owner() else {
        return true;
    };
    let children: Vec<_> = owner
        .container()
        .cells()
        .filter(|(_, c)| include_collapsed || !c.is_collapsed())
        .map(|(id, c)| (path.child(id), c.view()))
        .collect();
    for (child_path, child) in &children {
        if !visit(*child, child_path) {
            return false;
        }
    }
    if recursive {
        for (child_path, child) in children {
            if !range_cells(child, &child_path, true, include_collapsed, visit) {
                return false;
            }
        }
    }
    true
}

/// Visit the children of `view` (and, with `sub_views`, all descendants)
/// until `visit` returns false. Returns false if the walk was stopped.
pub fn view_range_children(
    view: &dyn View,
    sub_views: bool,
    include_collapsed: bool,
    visit: &mut dyn FnMut(&dyn View) -> bool,
) -> bool {
    range_cells(view, &ViewPath::root(), sub_views, include_collapsed, &mut |v, _| visit(v))
}

/// First descendant of `root` called `name`, collapsed ones included.
#[must_use]
pub fn find_view_with_name<'a>(root: &'a dyn View, name: &str, recursive: bool) -> Option<Found<'a>> {
    let mut index = 0;
    let mut hit = None;
    range_cells(root, &ViewPath::root(), recursive, true, &mut |v, path| {
        if v.object_name() == name {
            hit = Some((path.clone(), index));
            return false;
        }
        index += 1;
        true
    });
    let (path, index) = hit?;
    let view = view_at(root, path.ids())?;
    Some(Found { view, path, index })
}

fn resolve(root: &dyn View, at: ViewPath, parts: &[&str]) -> Option<ViewPath> {
    let Some((first, rest)) = parts.split_first() else {
        return Some(at);
    };
    match *first {
        "." => resolve(root, at, rest),
        ".." => resolve(root, at.parent()?, rest),
        "*" => {
            let owner = view_at(root, at.ids())?.as_cells_owner()?;
            owner
                .container()
                .ids()
                .find_map(|id| resolve(root, at.child(id), rest))
        }
        name => {
            let id = view_at(root, at.ids())?
                .as_cells_owner()?
                .container()
                .find_cell_with_name(name)?;
            resolve(root, at.child(id), rest)
        }
    }
}

/// Resolve a `/`-separated path of view names relative to `from`.
///
/// `*` matches any child (the first one under which the rest resolves),
/// `..` is the parent and `.` the view itself. A leading `/` starts at the
/// root.
#[must_use]
pub fn child_view(root: &dyn View, from: &ViewPath, path: &str) -> Option<ViewPath> {
    let start = if path.starts_with('/') {
        ViewPath::root()
    } else {
        from.clone()
    };
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    resolve(root, start, &parts)
}

/// Nearest strict ancestor of `path` that can arrange its children.
pub fn find_ancestor_arranger(root: &mut dyn View, path: &ViewPath) -> Option<ViewPath> {
    path.ancestors()
        .find(|a| view_at_mut(&mut *root, a.ids()).is_some_and(|v| v.as_arranger_mut().is_some()))
}

fn arrange_at(root: &mut dyn View, path: &ViewPath) -> Result<(), LayoutError> {
    let view = view_at_mut(root, path.ids()).ok_or_else(|| LayoutError::PathNotFound(path.to_string()))?;
    let name = view.object_name().to_string();
    let arranger = view
        .as_arranger_mut()
        .ok_or_else(|| LayoutError::NoArranger(name.clone()))?;
    arranger.arrange_children();
    debug!(view = %name, path = %path, "re-arranged");
    Ok(())
}

fn check_path(root: &dyn View, path: &ViewPath) -> Result<(), LayoutError> {
    match view_at(root, path.ids()) {
        Some(_) => Ok(()),
        None => Err(LayoutError::PathNotFound(path.to_string())),
    }
}

/// Re-arrange the nearest ancestor of `path` that can arrange. Returns its path.
pub fn arrange_ancestor_container(root: &mut dyn View, path: &ViewPath) -> Result<ViewPath, LayoutError> {
    check_path(root, path)?;
    let Some(ancestor) = find_ancestor_arranger(root, path) else {
        warn!(path = %path, "no arranger above view");
        return Err(LayoutError::NoArranger(path.to_string()));
    };
    arrange_at(root, &ancestor)?;
    Ok(ancestor)
}

/// Re-arrange from the outermost ancestor of `path` that can arrange, so the
/// whole affected subtree re-flows. Returns that ancestor's path.
pub fn arrange_children_at_root_container(
    root: &mut dyn View,
    path: &ViewPath,
) -> Result<ViewPath, LayoutError> {
    check_path(root, path)?;
    let mut outermost = None;
    for ancestor in path.ancestors() {
        if view_at_mut(&mut *root, ancestor.ids()).is_some_and(|v| v.as_arranger_mut().is_some()) {
            outermost = Some(ancestor);
        }
    }
    let Some(ancestor) = outermost else {
        warn!(path = %path, "no arranger above view");
        return Err(LayoutError::NoArranger(path.to_string()));
    };
    arrange_at(root, &ancestor)?;
    Ok(ancestor)
}

/// Whether any non-collapsed descendant of `view` is still loading.
#[must_use]
pub fn container_is_loading(view: &dyn View) -> bool {
    let mut loading = false;
    view_range_children(view, true, false, &mut |v| {
        loading = v.is_loading();
        !loading
    });
    loading
}

/// Route a pointer event to the view at `path`. If it answers
/// [`EventResponse::ArrangeParent`], its parent re-arranges.
pub fn dispatch_pointer(
    root: &mut dyn View,
    path: &ViewPath,
    event: &PointerEvent,
) -> Result<EventResponse, LayoutError> {
    let not_found = || LayoutError::PathNotFound(path.to_string());
    let id = path.last().ok_or_else(not_found)?;
    let parent_path = path.parent().ok_or_else(not_found)?;
    let parent = view_at_mut(root, parent_path.ids()).ok_or_else(not_found)?;
    let parent_name = parent.object_name().to_string();
    let response = {
        let owner = parent
            .as_cells_owner_mut()
            .ok_or_else(|| LayoutError::NotCellsOwner(parent_name.clone()))?;
        let c = owner.container_mut();
        let content = c.content_rect();
        match c.cell_mut(id) {
            Some(cell) => cell.view_mut().handle_pointer(event, content),
            None => return Err(not_found()),
        }
    };
    if response == EventResponse::ArrangeParent {
        if let Some(a) = parent.as_arranger_mut() {
            a.arrange_children();
        }
    }
    Ok(response)
}
