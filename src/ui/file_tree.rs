//! Explorer file tree and folder expansion state
//!
//! The tree is an ordered, persisted structure of folders and files. Which
//! folders are expanded is tracked separately, per session, keyed by the bare
//! folder name.

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Folders expanded when a session starts
const DEFAULT_EXPANDED: &[&str] = &["src", "pages"];

/// Routed page files shipped in the initial tree
const INITIAL_PAGES: &[(&str, &str)] = &[
    ("alerts.tsx", "/alerts"),
    ("api-client.tsx", "/api-client"),
    ("dashboard.tsx", "/dashboard"),
    ("brokers.tsx", "/brokers"),
    ("cluster.tsx", "/cluster"),
    ("topics.tsx", "/topics"),
    ("health.tsx", "/health"),
    ("diff-viewer.tsx", "/diff-viewer"),
    ("log-explorer.tsx", "/log-explorer"),
    ("metrics.tsx", "/metrics"),
    ("gallery.tsx", "/gallery"),
    ("logs.tsx", "/logs"),
    ("markdown.tsx", "/markdown"),
    ("settings.tsx", "/settings"),
    ("terminal.tsx", "/terminal"),
    ("vs-demo.tsx", "/vs-demo"),
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("empty node path")]
    EmptyPath,
    #[error("parent folder not found: {0}")]
    ParentNotFound(String),
    #[error("node already exists: {0}")]
    AlreadyExists(String),
    #[error("node not found: {0}")]
    NotFound(String),
}

/// Kind of node to create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    File,
}

impl NodeKind {
    /// Guess the kind from a name: anything with a `.` is a file
    pub fn infer(name: &str) -> Self {
        if name.contains('.') {
            NodeKind::File
        } else {
            NodeKind::Folder
        }
    }
}

/// Ordered children of a folder, serialized as a JSON object in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Children(Vec<(String, FileNode)>);

impl Children {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FileNode> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, node)| node)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut FileNode> {
        self.0
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Append a child; the caller guarantees the name is unused
    fn push(&mut self, name: impl Into<String>, node: FileNode) {
        self.0.push((name.into(), node));
    }

    fn remove(&mut self, name: &str) -> Option<FileNode> {
        let index = self.0.iter().position(|(n, _)| n == name)?;
        Some(self.0.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileNode)> {
        self.0.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn with(mut self, name: &str, node: FileNode) -> Self {
        self.push(name, node);
        self
    }
}

impl Serialize for Children {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, node) in &self.0 {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Children {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ChildrenVisitor;

        impl<'de> Visitor<'de> for ChildrenVisitor {
            type Value = Children;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of node names to nodes")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Children, A::Error> {
                let mut children = Children::new();
                while let Some((name, node)) = access.next_entry::<String, FileNode>()? {
                    // Later duplicates replace earlier ones, like a JSON object
                    match children.get_mut(&name) {
                        Some(existing) => *existing = node,
                        None => children.push(name, node),
                    }
                }
                Ok(children)
            }
        }

        deserializer.deserialize_map(ChildrenVisitor)
    }
}

/// A folder or a file in the explorer tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileNode {
    Folder {
        children: Children,
    },
    File {
        /// Route opened when the file is clicked
        #[serde(default, skip_serializing_if = "Option::is_none")]
        route: Option<String>,
    },
}

impl FileNode {
    pub fn folder() -> Self {
        FileNode::Folder {
            children: Children::new(),
        }
    }

    pub fn file() -> Self {
        FileNode::File { route: None }
    }

    pub fn routed_file(route: impl Into<String>) -> Self {
        FileNode::File {
            route: Some(route.into()),
        }
    }

    fn of_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Folder => Self::folder(),
            NodeKind::File => Self::file(),
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, FileNode::Folder { .. })
    }

    pub fn route(&self) -> Option<&str> {
        match self {
            FileNode::File { route } => route.as_deref(),
            FileNode::Folder { .. } => None,
        }
    }
}

/// One visible line of the rendered tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub depth: usize,
    pub name: String,
    pub is_folder: bool,
    pub expanded: bool,
    pub route: Option<String>,
}

/// The explorer tree: an ordered set of top-level nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileTree {
    roots: Children,
}

impl Default for FileTree {
    fn default() -> Self {
        Self::initial()
    }
}

impl FileTree {
    /// The project tree shown on first launch
    pub fn initial() -> Self {
        let pages = INITIAL_PAGES
            .iter()
            .fold(Children::new(), |children, (name, route)| {
                children.with(name, FileNode::routed_file(*route))
            });

        let src = Children::new()
            .with("pages", FileNode::Folder { children: pages })
            .with(
                "components",
                FileNode::Folder {
                    children: Children::new().with("Header.tsx", FileNode::file()),
                },
            )
            .with("App.tsx", FileNode::file())
            .with("index.js", FileNode::file());

        let roots = Children::new()
            .with("src", FileNode::Folder { children: src })
            .with(
                "public",
                FileNode::Folder {
                    children: Children::new().with("index.html", FileNode::file()),
                },
            )
            .with("package.json", FileNode::file())
            .with("README.md", FileNode::file());

        Self { roots }
    }

    /// A tree with no nodes
    pub fn empty() -> Self {
        Self {
            roots: Children::new(),
        }
    }

    pub fn roots(&self) -> &Children {
        &self.roots
    }

    /// Restore the initial tree
    pub fn reset(&mut self) {
        *self = Self::initial();
    }

    /// Look up a node by its segment path
    pub fn find(&self, path: &[&str]) -> Option<&FileNode> {
        let (name, parent) = path.split_last()?;
        self.children_at(parent)?.get(name)
    }

    fn children_at(&self, path: &[&str]) -> Option<&Children> {
        let mut children = &self.roots;
        for segment in path {
            match children.get(segment)? {
                FileNode::Folder { children: next } => children = next,
                FileNode::File { .. } => return None,
            }
        }
        Some(children)
    }

    fn children_at_mut(&mut self, path: &[&str]) -> Option<&mut Children> {
        let mut children = &mut self.roots;
        for segment in path {
            match children.get_mut(segment)? {
                FileNode::Folder { children: next } => children = next,
                FileNode::File { .. } => return None,
            }
        }
        Some(children)
    }

    /// Add a node, inferring its kind from the final segment's name
    pub fn add_node(&mut self, path: &[&str]) -> Result<(), TreeError> {
        let kind = path
            .last()
            .map(|name| NodeKind::infer(name))
            .ok_or(TreeError::EmptyPath)?;
        self.add_node_with_kind(path, kind)
    }

    /// Add an empty folder or an unrouted file at `path`
    pub fn add_node_with_kind(&mut self, path: &[&str], kind: NodeKind) -> Result<(), TreeError> {
        let (name, parent) = path.split_last().ok_or(TreeError::EmptyPath)?;
        let siblings = self
            .children_at_mut(parent)
            .ok_or_else(|| TreeError::ParentNotFound(parent.join("/")))?;

        if siblings.contains(name) {
            return Err(TreeError::AlreadyExists(path.join("/")));
        }

        siblings.push(*name, FileNode::of_kind(kind));
        tracing::debug!(path = %path.join("/"), ?kind, "Added tree node");
        Ok(())
    }

    /// Remove the node at `path` together with its descendants
    pub fn delete_node(&mut self, path: &[&str]) -> Result<FileNode, TreeError> {
        let (name, parent) = path.split_last().ok_or(TreeError::EmptyPath)?;
        let siblings = self
            .children_at_mut(parent)
            .ok_or_else(|| TreeError::ParentNotFound(parent.join("/")))?;

        let removed = siblings
            .remove(name)
            .ok_or_else(|| TreeError::NotFound(path.join("/")))?;
        tracing::debug!(path = %path.join("/"), "Deleted tree node");
        Ok(removed)
    }

    /// Flatten the tree into the rows currently visible under `expansion`
    pub fn visible_rows(&self, expansion: &FolderExpansion) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        collect_rows(&self.roots, 0, expansion, &mut rows);
        rows
    }
}

fn collect_rows(
    children: &Children,
    depth: usize,
    expansion: &FolderExpansion,
    rows: &mut Vec<TreeRow>,
) {
    for (name, node) in children.iter() {
        match node {
            FileNode::Folder { children } => {
                let expanded = expansion.is_expanded(name);
                rows.push(TreeRow {
                    depth,
                    name: name.to_string(),
                    is_folder: true,
                    expanded,
                    route: None,
                });
                if expanded {
                    collect_rows(children, depth + 1, expansion, rows);
                }
            }
            FileNode::File { route } => rows.push(TreeRow {
                depth,
                name: name.to_string(),
                is_folder: false,
                expanded: false,
                route: route.clone(),
            }),
        }
    }
}

/// Expanded flags keyed by bare folder name; absent means collapsed.
///
/// Folders that share a name at different depths share a flag.
#[derive(Debug, Clone, Default)]
pub struct FolderExpansion {
    expanded: HashMap<String, bool>,
}

impl FolderExpansion {
    /// Everything collapsed
    pub fn new() -> Self {
        Self::default()
    }

    /// The session default: `src` and `pages` open
    pub fn with_defaults() -> Self {
        Self {
            expanded: DEFAULT_EXPANDED
                .iter()
                .map(|name| (name.to_string(), true))
                .collect(),
        }
    }

    /// Flip the flag for `name`; unknown names become expanded
    pub fn toggle_folder(&mut self, name: &str) {
        let next = !self.is_expanded(name);
        self.expanded.insert(name.to_string(), next);
    }

    pub fn is_expanded(&self, name: &str) -> bool {
        self.expanded.get(name).copied().unwrap_or(false)
    }
}

impl PartialEq for FolderExpansion {
    fn eq(&self, other: &Self) -> bool {
        self.expanded
            .keys()
            .chain(other.expanded.keys())
            .all(|name| self.is_expanded(name) == other.is_expanded(name))
    }
}

impl Eq for FolderExpansion {}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_names(tree: &FileTree) -> Vec<&str> {
        tree.roots().iter().map(|(name, _)| name).collect()
    }

    #[test]
    fn test_initial_tree_layout() {
        let tree = FileTree::initial();
        assert_eq!(
            root_names(&tree),
            vec!["src", "public", "package.json", "README.md"]
        );
        assert_eq!(
            tree.find(&["src", "pages", "dashboard.tsx"])
                .and_then(FileNode::route),
            Some("/dashboard")
        );
        assert!(tree.find(&["src", "components"]).unwrap().is_folder());
    }

    #[test]
    fn test_json_shape_preserves_order() {
        let tree = FileTree::initial();
        let json = serde_json::to_string(&tree).unwrap();

        assert!(json.starts_with(r#"{"src":{"type":"folder","children":{"pages""#));
        assert!(json.contains(r#""README.md":{"type":"file"}"#));

        let back: FileTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
        assert_eq!(root_names(&back), root_names(&tree));
    }

    #[test]
    fn test_add_infers_kind() {
        let mut tree = FileTree::initial();
        tree.add_node(&["src", "utils"]).unwrap();
        tree.add_node(&["src", "utils", "format.ts"]).unwrap();

        assert!(tree.find(&["src", "utils"]).unwrap().is_folder());
        assert_eq!(
            tree.find(&["src", "utils", "format.ts"]),
            Some(&FileNode::file())
        );
    }

    #[test]
    fn test_add_with_explicit_kind() {
        let mut tree = FileTree::empty();
        tree.add_node_with_kind(&["Makefile"], NodeKind::File).unwrap();
        tree.add_node_with_kind(&["v1.2"], NodeKind::Folder).unwrap();

        assert!(!tree.find(&["Makefile"]).unwrap().is_folder());
        assert!(tree.find(&["v1.2"]).unwrap().is_folder());
    }

    #[test]
    fn test_add_rejects_duplicates_and_missing_parents() {
        let mut tree = FileTree::initial();
        let before = tree.clone();

        assert_eq!(
            tree.add_node(&["src", "App.tsx"]),
            Err(TreeError::AlreadyExists("src/App.tsx".into()))
        );
        assert_eq!(
            tree.add_node(&["nope", "file.ts"]),
            Err(TreeError::ParentNotFound("nope".into()))
        );
        assert_eq!(
            tree.add_node(&["package.json", "x.ts"]),
            Err(TreeError::ParentNotFound("package.json".into()))
        );
        assert_eq!(tree.add_node(&[]), Err(TreeError::EmptyPath));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_delete_node() {
        let mut tree = FileTree::initial();
        let removed = tree.delete_node(&["src", "components"]).unwrap();

        assert!(removed.is_folder());
        assert!(tree.find(&["src", "components"]).is_none());
        assert_eq!(
            tree.delete_node(&["src", "components"]),
            Err(TreeError::NotFound("src/components".into()))
        );
        assert_eq!(
            tree.delete_node(&["missing", "x"]),
            Err(TreeError::ParentNotFound("missing".into()))
        );
    }

    #[test]
    fn test_reset_restores_initial() {
        let mut tree = FileTree::initial();
        tree.delete_node(&["src"]).unwrap();
        tree.reset();
        assert_eq!(tree, FileTree::initial());
    }

    #[test]
    fn test_toggle_folder_cycle() {
        let mut expansion = FolderExpansion::new();
        assert!(!expansion.is_expanded("src"));

        expansion.toggle_folder("src");
        assert!(expansion.is_expanded("src"));

        expansion.toggle_folder("src");
        assert!(!expansion.is_expanded("src"));

        expansion.toggle_folder("src");
        assert!(expansion.is_expanded("src"));
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        for start in [FolderExpansion::new(), FolderExpansion::with_defaults()] {
            for name in ["src", "pages", "public", "unknown"] {
                let mut expansion = start.clone();
                expansion.toggle_folder(name);
                expansion.toggle_folder(name);
                assert_eq!(expansion, start, "toggling {} twice", name);
            }
        }
    }

    #[test]
    fn test_visible_rows_follow_expansion() {
        let tree = FileTree::initial();
        let mut expansion = FolderExpansion::new();

        let collapsed = tree.visible_rows(&expansion);
        assert_eq!(collapsed.len(), 4);

        expansion.toggle_folder("src");
        let rows = tree.visible_rows(&expansion);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            &names[..6],
            &["src", "pages", "components", "App.tsx", "index.js", "public"]
        );
        assert_eq!(rows[1].depth, 1);
        assert!(!rows[1].expanded);
    }

    #[test]
    fn test_same_name_folders_share_flag() {
        let mut tree = FileTree::empty();
        tree.add_node(&["a"]).unwrap();
        tree.add_node(&["b"]).unwrap();
        tree.add_node(&["a", "lib"]).unwrap();
        tree.add_node(&["b", "lib"]).unwrap();

        let mut expansion = FolderExpansion::new();
        expansion.toggle_folder("a");
        expansion.toggle_folder("b");
        expansion.toggle_folder("lib");

        let rows = tree.visible_rows(&expansion);
        let lib_rows: Vec<&TreeRow> = rows.iter().filter(|r| r.name == "lib").collect();
        assert_eq!(lib_rows.len(), 2);
        assert!(lib_rows.iter().all(|r| r.expanded));
    }
}
