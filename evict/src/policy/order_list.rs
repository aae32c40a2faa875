use crate::error::PolicyError;
use crate::snapshot::CacheSnapshot;

use std::collections::HashMap;
use std::hash::Hash;

use generational_arena::{Arena, Index};

#[derive(Debug)]
struct Node<K> {
  key: K,
  next: Option<Index>,
  prev: Option<Index>,
}

// An arena-backed doubly linked list of keys with O(1) lookup, used to keep
// keys in insertion or use order. Head is the newest key, tail the oldest.
#[derive(Debug)]
pub(super) struct OrderList<K: Eq + Hash + Clone> {
  nodes: Arena<Node<K>>,
  lookup: HashMap<K, Index, ahash::RandomState>,
  head: Option<Index>,
  tail: Option<Index>,
}

impl<K: Eq + Hash + Clone> OrderList<K> {
  pub fn new() -> Self {
    Self {
      nodes: Arena::new(),
      lookup: HashMap::with_hasher(ahash::RandomState::new()),
      head: None,
      tail: None,
    }
  }

  // Detaches a node from its neighbours without freeing it.
  fn unlink(&mut self, index: Index) {
    let (prev, next) = {
      let node = &self.nodes[index];
      (node.prev, node.next)
    };

    match prev {
      Some(prev_idx) => self.nodes[prev_idx].next = next,
      None => self.head = next,
    }
    match next {
      Some(next_idx) => self.nodes[next_idx].prev = prev,
      None => self.tail = prev,
    }
  }

  fn push_front_node(&mut self, index: Index) {
    let old_head = self.head;
    self.nodes[index].next = old_head;
    self.nodes[index].prev = None;
    self.head = Some(index);

    if let Some(old_head) = old_head {
      self.nodes[old_head].prev = Some(index);
    }
    if self.tail.is_none() {
      self.tail = Some(index);
    }
  }

  pub fn contains(&self, key: &K) -> bool {
    self.lookup.contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.lookup.len()
  }

  /// Adds `key` at the head. A key already present is moved to the head.
  pub fn push_front(&mut self, key: K) {
    if self.lookup.contains_key(&key) {
      self.move_to_front(&key);
      return;
    }
    let index = self.nodes.insert(Node {
      key: key.clone(),
      next: None,
      prev: None,
    });
    self.lookup.insert(key, index);
    self.push_front_node(index);
  }

  pub fn move_to_front(&mut self, key: &K) {
    if let Some(&index) = self.lookup.get(key) {
      if self.head != Some(index) {
        self.unlink(index);
        self.push_front_node(index);
      }
    }
  }

  /// The oldest key, without removing it.
  pub fn peek_back(&self) -> Option<&K> {
    self.tail.and_then(|index| self.nodes.get(index)).map(|node| &node.key)
  }

  /// Walks from the oldest key towards the newest.
  pub fn iter_from_back(&self) -> impl Iterator<Item = &K> {
    let mut current = self.tail;
    std::iter::from_fn(move || {
      let node = self.nodes.get(current?)?;
      current = node.prev;
      Some(&node.key)
    })
  }

  /// The oldest key that is also cached. Keys cached but never tracked are
  /// only chosen when no tracked key is cached.
  pub fn victim_in(&self, snapshot: &CacheSnapshot<'_, K>) -> Result<K, PolicyError> {
    if snapshot.is_empty() {
      return Err(PolicyError::EmptyCache);
    }
    if let Some(key) = self.peek_back().filter(|key| snapshot.contains(key)) {
      return Ok(key.clone());
    }
    self
      .iter_from_back()
      .find(|key| snapshot.contains(key))
      .or_else(|| {
        let untracked = snapshot.keys().next();
        tracing::debug!("no tracked key is cached, evicting an untracked key");
        untracked
      })
      .cloned()
      .ok_or(PolicyError::EmptyCache)
  }

  pub fn remove(&mut self, key: &K) -> bool {
    match self.lookup.remove(key) {
      Some(index) => {
        self.unlink(index);
        self.nodes.remove(index);
        true
      }
      None => false,
    }
  }

  pub fn clear(&mut self) {
    self.nodes.clear();
    self.lookup.clear();
    self.head = None;
    self.tail = None;
  }

  #[cfg(test)]
  pub(crate) fn keys_as_vec(&self) -> Vec<K> {
    let mut keys = Vec::new();
    let mut current = self.head;
    while let Some(index) = current {
      keys.push(self.nodes[index].key.clone());
      current = self.nodes[index].next;
    }
    keys
  }
}
