//! Size-augmented binary search tree.
//!
//! Every node records how many nodes live in its subtree (itself included), which lets
//! [`OrderedTree::count_less_than`] skip whole left subtrees instead of walking them.
//! The tree is never rebalanced: its shape, and therefore the depth reported by
//! [`OrderedTree::find`], depends only on insertion order.

use std::cmp::Ordering;
use std::iter::FusedIterator;

use crate::entry::Entry;
use crate::error::InvariantError;

type Link = Option<Box<Node>>;

#[derive(Debug)]
struct Node {
    entry: Entry,
    size: usize,
    left: Link,
    right: Link,
}

impl Node {
    fn new(entry: Entry) -> Self {
        Self {
            entry,
            size: 1,
            left: None,
            right: None,
        }
    }

    fn update_size(&mut self) {
        self.size = 1 + size(&self.left) + size(&self.right);
    }
}

fn size(link: &Link) -> usize {
    link.as_ref().map_or(0, |node| node.size)
}

/// Result of [`OrderedTree::find`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// `depth` is the number of edges walked from the root to the matching node.
    Found { score: i64, depth: usize },
    NotFound,
}

/// Result of [`OrderedTree::decrease`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decrease {
    Updated(i64),
    NotFound,
}

#[derive(Debug, Default)]
pub struct OrderedTree {
    root: Link,
}

impl OrderedTree {
    pub fn new() -> Self {
        Self { root: None }
    }

    pub fn len(&self) -> usize {
        size(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match key.cmp(node.entry.key()) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => return Some(&node.entry),
            }
        }
        None
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn entry_mut(&mut self, key: &str) -> Option<&mut Entry> {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match key.cmp(node.entry.key()) {
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Greater => current = node.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.entry),
            }
        }
        None
    }

    /// Adds `delta` to the score of `key`, creating the entry with score `delta` if it
    /// does not exist yet. Returns the resulting score.
    ///
    /// A new key is attached as a leaf; every node on the way down gains one in size.
    pub fn insert_or_merge(&mut self, key: &str, delta: i64) -> i64 {
        if let Some(entry) = self.entry_mut(key) {
            return entry.add(delta);
        }

        let mut link = &mut self.root;
        while let Some(node) = link {
            node.size += 1;
            link = if key < node.entry.key() {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *link = Some(Box::new(Node::new(Entry::new(key, delta))));
        delta
    }

    /// Lowers the score of `key` by `amount`, stopping at zero.
    pub fn decrease(&mut self, key: &str, amount: i64) -> Decrease {
        match self.entry_mut(key) {
            Some(entry) => {
                let score = entry.score().saturating_sub(amount).max(0);
                entry.set_score(score);
                Decrease::Updated(score)
            }
            None => Decrease::NotFound,
        }
    }

    /// Overwrites the score of `key`. Does nothing when `key` is absent.
    pub fn set_score(&mut self, key: &str, score: i64) {
        if let Some(entry) = self.entry_mut(key) {
            entry.set_score(score);
        }
    }

    pub fn find(&self, key: &str) -> Lookup {
        let mut current = self.root.as_deref();
        let mut depth = 0;
        while let Some(node) = current {
            match key.cmp(node.entry.key()) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => {
                    return Lookup::Found {
                        score: node.entry.score(),
                        depth,
                    };
                }
            }
            depth += 1;
        }
        Lookup::NotFound
    }

    /// Number of stored keys strictly less than `key`. `key` itself need not be stored.
    ///
    /// Whenever the walk turns right, the current node and its whole left subtree are
    /// smaller than `key` and are counted in one step from the recorded subtree size.
    pub fn count_less_than(&self, key: &str) -> usize {
        let mut current = self.root.as_deref();
        let mut count = 0;
        while let Some(node) = current {
            if key > node.entry.key() {
                count += 1 + size(&node.left);
                current = node.right.as_deref();
            } else {
                current = node.left.as_deref();
            }
        }
        count
    }

    /// Removes `key` and returns whether it was present.
    ///
    /// A node with two children keeps its position in the tree: it takes over the entry
    /// of its in-order predecessor, whose node (which has no right child) is then
    /// spliced out of the left subtree. Subtree sizes along the path are decremented on
    /// the way down, so the walk only starts once the key is known to exist.
    pub fn delete(&mut self, key: &str) -> bool {
        if !self.contains(key) {
            return false;
        }

        // With the key known to be present, neither early return below is taken.
        let mut link = &mut self.root;
        loop {
            let ordering = match link.as_deref() {
                Some(node) => key.cmp(node.entry.key()),
                None => return false,
            };
            if ordering == Ordering::Equal {
                break;
            }
            let Some(node) = link.as_mut() else {
                return false;
            };
            node.size -= 1;
            link = if ordering == Ordering::Less {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        unlink(link);
        true
    }

    /// Entries in ascending key order, collected from a fresh traversal.
    pub fn extract_in_order(&self) -> Vec<&Entry> {
        self.iter().collect()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root.as_deref(), self.len())
    }

    /// Edges on the longest root-to-leaf path, or `None` for an empty tree.
    pub fn height(&self) -> Option<usize> {
        let mut pending: Vec<(&Node, usize)> = Vec::new();
        pending.extend(self.root.as_deref().map(|node| (node, 0)));
        let mut height = None;
        while let Some((node, depth)) = pending.pop() {
            height = height.max(Some(depth));
            pending.extend(node.left.as_deref().map(|n| (n, depth + 1)));
            pending.extend(node.right.as_deref().map(|n| (n, depth + 1)));
        }
        height
    }

    /// Checks the subtree-size and key-order invariants, returning the number of entries.
    ///
    /// Sizes are checked locally: if every node satisfies `size == 1 + left + right` on
    /// the recorded child sizes, every recorded size is also the true count.
    pub fn verify(&self) -> Result<usize, InvariantError> {
        let mut pending: Vec<&Node> = self.root.as_deref().into_iter().collect();
        while let Some(node) = pending.pop() {
            let actual = 1 + size(&node.left) + size(&node.right);
            if node.size != actual {
                return Err(InvariantError::SizeMismatch {
                    key: node.entry.key().to_string(),
                    recorded: node.size,
                    actual,
                });
            }
            pending.extend(node.left.as_deref());
            pending.extend(node.right.as_deref());
        }

        let mut previous: Option<&str> = None;
        for entry in self.iter() {
            if let Some(earlier) = previous {
                if earlier >= entry.key() {
                    return Err(InvariantError::OutOfOrder {
                        earlier: earlier.to_string(),
                        later: entry.key().to_string(),
                    });
                }
            }
            previous = Some(entry.key());
        }

        Ok(self.len())
    }

    /// Drops every node. Children are detached before their parent is freed so a
    /// list-shaped tree does not recurse once per level.
    pub fn clear(&mut self) {
        let mut pending: Vec<Box<Node>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

impl Drop for OrderedTree {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Replaces the node in `link` by its only child, or by nothing.
/// With two children the node stays and receives its predecessor's entry instead.
fn unlink(link: &mut Link) {
    let Some(mut node) = link.take() else {
        return;
    };
    *link = match (node.left.take(), node.right.take()) {
        (None, None) => None,
        (Some(child), None) | (None, Some(child)) => Some(child),
        (Some(left), Some(right)) => {
            node.left = Some(left);
            node.right = Some(right);
            if let Some(predecessor) = take_max(&mut node.left) {
                node.entry = predecessor;
            }
            node.update_size();
            Some(node)
        }
    };
}

/// Detaches the rightmost node under `link` and returns its entry.
fn take_max(mut link: &mut Link) -> Option<Entry> {
    while link.as_deref().is_some_and(|node| node.right.is_some()) {
        let node = link.as_mut()?;
        node.size -= 1;
        link = &mut node.right;
    }
    let mut node = link.take()?;
    *link = node.left.take();
    Some(node.entry)
}

/// In-order iterator over the entries of an [`OrderedTree`].
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    fn new(root: Option<&'a Node>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.descend_left(root);
        iter
    }

    fn descend_left(&mut self, mut current: Option<&'a Node>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend_left(node.right.as_deref());
        self.remaining -= 1;
        Some(&node.entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a OrderedTree {
    type Item = &'a Entry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
