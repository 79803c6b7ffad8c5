//! Segment trie mapping mount paths to the slice that owns them.
//!
//! # Responsibilities
//! - Store registered path prefixes, one node per `/`-delimited segment
//! - Answer "which slice owns this path" in a single downward pass
//!
//! # Design Decisions
//! - Only nodes marked via `add` carry a value; intermediate nodes never resolve
//! - A walk that stops early falls back to the node it stopped at, and only
//!   that node (no climbing further up the ancestry)
//! - Write-once during boot, read-only afterwards (no interior mutability)

use std::collections::HashMap;

/// A single node of the trie.
#[derive(Debug, Clone)]
struct TrieNode<T> {
    children: HashMap<String, TrieNode<T>>,
    leaf: Option<T>,
}

impl<T> Default for TrieNode<T> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            leaf: None,
        }
    }
}

impl<T> TrieNode<T> {
    fn put(&mut self, segment: &str) -> &mut TrieNode<T> {
        self.children.entry(segment.to_string()).or_default()
    }

    fn get(&self, segment: &str) -> Option<&TrieNode<T>> {
        self.children.get(segment)
    }

    fn mark_terminal(&mut self, value: T) {
        self.leaf = Some(value);
    }
}

/// Prefix trie keyed by path segments.
#[derive(Debug, Clone)]
pub struct PathTrie<T> {
    root: TrieNode<T>,
}

impl<T> Default for PathTrie<T> {
    fn default() -> Self {
        Self {
            root: TrieNode::default(),
        }
    }
}

impl<T> PathTrie<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` as owned by `value`. Re-adding a path overwrites it.
    pub fn add(&mut self, path: &str, value: T) {
        let mut node = &mut self.root;
        for segment in segments(path) {
            node = node.put(segment);
        }
        node.mark_terminal(value);
    }

    /// Look up the owner of `path`.
    ///
    /// When a segment has no child the walk stops, and the value of the node
    /// reached so far is returned if that node is terminal.
    pub fn find(&self, path: &str) -> Option<&T> {
        let mut node = &self.root;
        for segment in segments(path) {
            match node.get(segment) {
                Some(next) => node = next,
                None => break,
            }
        }
        node.leaf.as_ref()
    }

    /// True when nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.root.leaf.is_none() && self.root.children.is_empty()
    }
}

/// Split a path into segments, dropping the empty segment produced by the
/// leading slash and any trailing slashes.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path).trim_end_matches('/');
    trimmed.split('/').filter(move |_| !trimmed.is_empty())
}
