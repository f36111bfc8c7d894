use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::{AppError, Result};
use crate::format::format_size;

/// Kind of filesystem node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File,
}

/// Load state of a directory's children.
///
/// `Loaded(vec![])` is the legitimate empty-directory state; `Unloaded` means
/// expansion will trigger a real listing.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildState {
    /// Not listed yet.
    Unloaded,
    /// Listed: directories first, then files, case-insensitive within each group.
    Loaded(Vec<TreeNode>),
    /// Listing failed; the message is rendered as an inline leaf.
    Error(String),
}

/// A node in the lazily-loaded directory tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub name: String,
    pub path: PathBuf,
    pub kind: NodeKind,
    /// Files: stat'ed size (`None` = stat failed, rendered as an error
    /// annotation). Directories: cached aggregate size (`None` = unknown).
    pub size: Option<u64>,
    pub children: ChildState,
    pub expanded: bool,
}

impl TreeNode {
    fn dir(name: String, path: PathBuf) -> Self {
        Self {
            name,
            path,
            kind: NodeKind::Directory,
            size: None,
            children: ChildState::Unloaded,
            expanded: false,
        }
    }

    fn file(name: String, path: PathBuf, size: Option<u64>) -> Self {
        Self {
            name,
            path,
            kind: NodeKind::File,
            size,
            children: ChildState::Loaded(Vec::new()),
            expanded: false,
        }
    }

    /// Display label: name plus size annotation once known.
    fn label(&self) -> String {
        match (self.kind, self.size) {
            (NodeKind::Directory, Some(size)) => {
                format!("{} ({})", self.name, format_size(size))
            }
            (NodeKind::Directory, None) => self.name.clone(),
            (NodeKind::File, Some(size)) => format!("{} ({})", self.name, format_size(size)),
            (NodeKind::File, None) => format!("{} [error]", self.name),
        }
    }
}

/// Kind of a flattened row, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatKind {
    Directory,
    File,
    /// Inline listing-error leaf under an unreadable directory.
    Error,
}

/// A flattened representation of a tree row for rendering.
#[derive(Debug, Clone)]
pub struct FlatItem {
    pub label: String,
    pub path: PathBuf,
    pub kind: FlatKind,
    pub depth: usize,
    pub is_expanded: bool,
    pub is_last_sibling: bool,
}

/// Lazy tree model mirroring one directory subtree.
///
/// Owned by exactly one pane. All mutation happens on the main task;
/// background size scans hold a clone of the `cancel` flag and hand results
/// back through the event channel, so a torn-down tree is never written to.
pub struct DirTree {
    path: Option<PathBuf>,
    root: Option<TreeNode>,
    sizes: HashMap<PathBuf, u64>,
    cancel: Arc<AtomicBool>,
    loading: bool,
    pub flat_items: Vec<FlatItem>,
    pub selected_index: usize,
    pub scroll_offset: usize,
}

impl Default for DirTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DirTree {
    /// Create an unbound tree.
    pub fn new() -> Self {
        Self {
            path: None,
            root: None,
            sizes: HashMap::new(),
            cancel: Arc::new(AtomicBool::new(false)),
            loading: false,
            flat_items: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
        }
    }

    /// The bound root path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Root node accessor (mainly for rendering the panel title).
    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    /// Cancellation flag handed to background scans spawned for this tree.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Size discovered so far for a path, if any.
    pub fn size_of(&self, path: &Path) -> Option<u64> {
        self.sizes.get(path).copied()
    }

    /// Bind the tree to `path` and load its top level.
    ///
    /// Fails with `InvalidPath` (leaving previous state untouched) unless
    /// `path` is an existing directory. On success any in-flight scans for
    /// the previous binding are cancelled and a fresh flag is installed, so
    /// stale results can never land in the new tree. Returns the directory
    /// whose aggregate size should now be scanned.
    pub fn set_root(&mut self, path: &Path) -> Result<Option<PathBuf>> {
        if !path.is_dir() {
            return Err(AppError::InvalidPath(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        self.cancel.store(true, Ordering::Relaxed);
        self.cancel = Arc::new(AtomicBool::new(false));
        self.sizes.clear();
        self.loading = false;
        self.selected_index = 0;
        self.scroll_offset = 0;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let mut root = TreeNode::dir(name, path.to_path_buf());
        root.expanded = true;
        self.root = Some(root);
        self.path = Some(path.to_path_buf());

        debug!("tree bound to {}", path.display());
        Ok(self.load_directory(path))
    }

    /// List the immediate children of `dir` into its node.
    ///
    /// Re-entrancy-guarded: a no-op while another load is running or after
    /// cancellation. A listing failure becomes `ChildState::Error` on the
    /// affected node only; a failed stat on a single file becomes an error
    /// annotation on that leaf. Returns the path to size-scan, unless the
    /// load was skipped or cancelled mid-way.
    pub fn load_directory(&mut self, dir: &Path) -> Option<PathBuf> {
        if self.loading || self.cancel.load(Ordering::Relaxed) {
            return None;
        }
        self.loading = true;
        let request = self.load_directory_inner(dir);
        self.loading = false;
        self.flatten();
        request
    }

    fn load_directory_inner(&mut self, dir: &Path) -> Option<PathBuf> {
        let cancel = self.cancel.clone();

        // The whole listing happens before the tree is touched, so a failure
        // leaves everything but the affected node alone.
        let listed = match fs::read_dir(dir) {
            Ok(entries) => {
                let mut dirs: Vec<TreeNode> = Vec::new();
                let mut files: Vec<TreeNode> = Vec::new();
                let mut discovered: Vec<(PathBuf, u64)> = Vec::new();

                for entry in entries.flatten() {
                    if cancel.load(Ordering::Relaxed) {
                        return None;
                    }
                    let path = entry.path();
                    let name = entry.file_name().to_string_lossy().to_string();
                    let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                    if is_dir {
                        dirs.push(TreeNode::dir(name, path));
                    } else {
                        let size = entry.metadata().ok().map(|m| m.len());
                        if let Some(size) = size {
                            discovered.push((path.clone(), size));
                        }
                        files.push(TreeNode::file(name, path, size));
                    }
                }

                dirs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
                files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
                let mut children = dirs;
                children.append(&mut files);
                Ok((children, discovered))
            }
            Err(e) => {
                debug!("listing {} failed: {}", dir.display(), e);
                Err(e.to_string())
            }
        };

        let root = self.root.as_mut()?;
        let node = Self::find_node_mut(root, dir)?;
        if node.kind != NodeKind::Directory {
            return None;
        }

        match listed {
            Ok((children, discovered)) => {
                node.children = ChildState::Loaded(children);
                node.expanded = true;
                self.sizes.extend(discovered);
                if cancel.load(Ordering::Relaxed) {
                    None
                } else {
                    Some(dir.to_path_buf())
                }
            }
            Err(message) => {
                node.children = ChildState::Error(message);
                node.expanded = true;
                None
            }
        }
    }

    /// Expand the selected directory.
    ///
    /// An `Unloaded` directory gets a real listing (returning a scan
    /// request); a `Loaded` one just unfolds. Files and error rows no-op.
    pub fn expand_selected(&mut self) -> Option<PathBuf> {
        let item = self.flat_items.get(self.selected_index)?;
        if item.kind != FlatKind::Directory {
            return None;
        }
        let path = item.path.clone();

        let needs_load = {
            let root = self.root.as_mut()?;
            let node = Self::find_node_mut(root, &path)?;
            match node.children {
                ChildState::Unloaded => true,
                _ => {
                    node.expanded = true;
                    false
                }
            }
        };

        if needs_load {
            self.load_directory(&path)
        } else {
            self.flatten();
            None
        }
    }

    /// Collapse the selected directory, or jump to its parent.
    pub fn collapse_selected(&mut self) {
        let Some(item) = self.flat_items.get(self.selected_index) else {
            return;
        };
        let path = item.path.clone();

        if item.kind == FlatKind::Directory && item.is_expanded {
            if let Some(root) = self.root.as_mut() {
                if let Some(node) = Self::find_node_mut(root, &path) {
                    node.expanded = false;
                    self.flatten();
                }
            }
            return;
        }

        if let Some(parent) = path.parent() {
            let parent = parent.to_path_buf();
            if let Some(i) = self.flat_items.iter().position(|it| it.path == parent) {
                self.selected_index = i;
            }
        }
    }

    /// Tear the tree down.
    ///
    /// Sets the cancellation flag so in-flight scans stop applying updates,
    /// then discards root, bound path, cached sizes, and render state. Safe
    /// to call at any time.
    pub fn reset(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        self.loading = false;
        self.root = None;
        self.path = None;
        self.sizes.clear();
        self.flat_items.clear();
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    /// Record an aggregate size computed by a background scan.
    ///
    /// Looked up by path equality, not tree position. A no-op when
    /// cancellation is set or the node is gone (the binding changed in the
    /// meantime); a straggler scan must never resurrect state.
    pub fn record_size(&mut self, path: &Path, size: u64) {
        if self.cancel.load(Ordering::Relaxed) {
            return;
        }
        let Some(root) = self.root.as_mut() else {
            return;
        };
        let Some(node) = Self::find_node_mut(root, path) else {
            return;
        };
        if node.kind != NodeKind::Directory {
            return;
        }
        node.size = Some(size);
        self.sizes.insert(path.to_path_buf(), size);
        self.flatten();
    }

    /// Find a mutable reference to a node by path.
    fn find_node_mut<'a>(node: &'a mut TreeNode, target: &Path) -> Option<&'a mut TreeNode> {
        if node.path == target {
            return Some(node);
        }
        if let ChildState::Loaded(children) = &mut node.children {
            for child in children.iter_mut() {
                if let Some(found) = Self::find_node_mut(child, target) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Rebuild the flat render list from the tree.
    pub fn flatten(&mut self) {
        self.flat_items.clear();
        if let Some(root) = &self.root {
            Self::flatten_node(root, &mut self.flat_items, 0, true);
        }
        if !self.flat_items.is_empty() && self.selected_index >= self.flat_items.len() {
            self.selected_index = self.flat_items.len() - 1;
        }
    }

    fn flatten_node(node: &TreeNode, items: &mut Vec<FlatItem>, depth: usize, is_last: bool) {
        items.push(FlatItem {
            label: node.label(),
            path: node.path.clone(),
            kind: match node.kind {
                NodeKind::Directory => FlatKind::Directory,
                NodeKind::File => FlatKind::File,
            },
            depth,
            is_expanded: node.expanded,
            is_last_sibling: is_last,
        });

        if !node.expanded {
            return;
        }
        match &node.children {
            ChildState::Loaded(children) => {
                let count = children.len();
                for (i, child) in children.iter().enumerate() {
                    Self::flatten_node(child, items, depth + 1, i == count - 1);
                }
            }
            ChildState::Error(message) => {
                items.push(FlatItem {
                    label: format!("Error: {}", message),
                    path: node.path.clone(),
                    kind: FlatKind::Error,
                    depth: depth + 1,
                    is_expanded: false,
                    is_last_sibling: true,
                });
            }
            ChildState::Unloaded => {}
        }
    }

    // ── Selection ────────────────────────────────────────────────────────────

    pub fn select_next(&mut self) {
        let len = self.flat_items.len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        let len = self.flat_items.len();
        if len > 0 {
            self.selected_index = len - 1;
        }
    }

    /// Keep the selected item inside the viewport.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }
}
