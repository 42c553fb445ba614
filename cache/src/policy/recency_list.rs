use std::{collections::HashMap, hash::Hash};

use generational_arena::{Arena, Index};

#[derive(Debug)]
struct Node<K> {
  key: K,
  next: Option<Index>,
  prev: Option<Index>,
}

// An ordered list of keys, head is the most recently pushed or promoted,
// tail is the first eviction candidate.
#[derive(Debug)]
pub(crate) struct RecencyList<K: Eq + Hash + Clone> {
  // Arena stores all nodes contiguously.
  nodes: Arena<Node<K>>,
  // O(1) lookup of a key to its node index in the arena.
  lookup: HashMap<K, Index>,
  head: Option<Index>,
  tail: Option<Index>,
}

impl<K: Eq + Hash + Clone> Default for RecencyList<K> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K: Eq + Hash + Clone> RecencyList<K> {
  pub(crate) fn new() -> Self {
    Self {
      nodes: Arena::new(),
      lookup: HashMap::new(),
      head: None,
      tail: None,
    }
  }

  // Detaches a node from its neighbours without freeing it.
  fn unlink(&mut self, index: Index) {
    let node = &self.nodes[index];
    let prev_node_idx = node.prev;
    let next_node_idx = node.next;

    if let Some(prev_idx) = prev_node_idx {
      self.nodes[prev_idx].next = next_node_idx;
    } else {
      self.head = next_node_idx;
    }

    if let Some(next_idx) = next_node_idx {
      self.nodes[next_idx].prev = prev_node_idx;
    } else {
      self.tail = prev_node_idx;
    }
  }

  // Links an already allocated node in as the new head.
  fn link_front(&mut self, index: Index) {
    let old_head_idx = self.head;
    self.nodes[index].next = old_head_idx;
    self.nodes[index].prev = None;
    self.head = Some(index);

    if let Some(old_head) = old_head_idx {
      self.nodes[old_head].prev = Some(index);
    }

    if self.tail.is_none() {
      self.tail = Some(index);
    }
  }

  pub(crate) fn contains(&self, key: &K) -> bool {
    self.lookup.contains_key(key)
  }

  #[cfg(test)]
  pub(crate) fn len(&self) -> usize {
    self.lookup.len()
  }

  /// Inserts `key` at the head, or promotes it there if already tracked.
  pub(crate) fn push_front(&mut self, key: K) {
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
    self.link_front(index);
  }

  pub(crate) fn move_to_front(&mut self, key: &K) {
    if let Some(&index) = self.lookup.get(key) {
      if self.head != Some(index) {
        self.unlink(index);
        self.link_front(index);
      }
    }
  }

  /// Stops tracking `key`. Returns whether it was present.
  pub(crate) fn remove(&mut self, key: &K) -> bool {
    match self.lookup.remove(key) {
      Some(index) => {
        self.unlink(index);
        self.nodes.remove(index);
        true
      }
      None => false,
    }
  }

  pub(crate) fn clear(&mut self) {
    self.nodes.clear();
    self.lookup.clear();
    self.head = None;
    self.tail = None;
  }

  /// Walks the list from the tail towards the head.
  pub(crate) fn iter_from_back(&self) -> IterFromBack<'_, K> {
    IterFromBack {
      list: self,
      current: self.tail,
    }
  }
}

pub(crate) struct IterFromBack<'a, K: Eq + Hash + Clone> {
  list: &'a RecencyList<K>,
  current: Option<Index>,
}

impl<'a, K: Eq + Hash + Clone> Iterator for IterFromBack<'a, K> {
  type Item = &'a K;

  fn next(&mut self) -> Option<Self::Item> {
    let index = self.current?;
    let node = &self.list.nodes[index];
    self.current = node.prev;
    Some(&node.key)
  }
}
