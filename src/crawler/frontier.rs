//! Breadth-first crawl frontier
//!
//! The frontier holds URLs waiting to be fetched (FIFO) together with the
//! visited set. Both sets are keyed by the enhanced normalization, so URLs
//! that differ only by tracking parameters, fragments or a trailing slash are
//! fetched at most once.

use crate::url::canonical_key;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// FIFO queue of pending URLs plus the visited set
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<Url>,
    queued: HashSet<String>,
    visited: HashSet<String>,
    capacity: usize,
}

impl Frontier {
    /// Creates a frontier seeded with a single URL
    ///
    /// `capacity` bounds the number of URLs waiting in the queue.
    pub fn new(seed: Url, capacity: usize) -> Self {
        let mut frontier = Self {
            queue: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
            capacity: capacity.max(1),
        };
        frontier.push(seed);
        frontier
    }

    /// Takes the oldest queued URL
    pub fn pop(&mut self) -> Option<Url> {
        let url = self.queue.pop_front()?;
        self.queued.remove(&canonical_key(&url));
        Some(url)
    }

    /// Marks a URL visited, returning false if it already was
    pub fn claim(&mut self, url: &Url) -> bool {
        self.visited.insert(canonical_key(url))
    }

    /// Marks a URL visited without fetching it (e.g. a redirect target)
    pub fn mark_visited(&mut self, url: &Url) {
        let key = canonical_key(url);
        if self.queued.remove(&key) {
            self.queue.retain(|queued| canonical_key(queued) != key);
        }
        self.visited.insert(key);
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(&canonical_key(url))
    }

    /// Enqueues a URL unless it is visited, already queued, or the queue is full
    pub fn push(&mut self, url: Url) -> bool {
        if self.queue.len() >= self.capacity {
            return false;
        }

        let key = canonical_key(&url);
        if self.visited.contains(&key) || self.queued.contains(&key) {
            return false;
        }

        self.queued.insert(key);
        self.queue.push_back(url);
        true
    }

    /// Number of URLs waiting to be fetched
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new(url("https://ex.com/"), 10);
        frontier.push(url("https://ex.com/a"));
        frontier.push(url("https://ex.com/b"));

        assert_eq!(frontier.pop().unwrap().as_str(), "https://ex.com/");
        assert_eq!(frontier.pop().unwrap().as_str(), "https://ex.com/a");
        assert_eq!(frontier.pop().unwrap().as_str(), "https://ex.com/b");
        assert!(frontier.pop().is_none());
    }

    #[test]
    fn test_queued_duplicates_rejected() {
        let mut frontier = Frontier::new(url("https://ex.com/"), 10);
        assert!(frontier.push(url("https://ex.com/a")));
        assert!(!frontier.push(url("https://ex.com/a?utm_source=x")));
        assert!(!frontier.push(url("https://ex.com/a/")));
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn test_visited_rejected() {
        let mut frontier = Frontier::new(url("https://ex.com/"), 10);
        let seed = frontier.pop().unwrap();
        assert!(frontier.claim(&seed));
        assert!(!frontier.claim(&seed));
        assert!(!frontier.push(url("https://ex.com/#top")));
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_requeue_after_pop_but_before_claim() {
        let mut frontier = Frontier::new(url("https://ex.com/"), 10);
        let seed = frontier.pop().unwrap();
        assert!(frontier.push(seed.clone()));
        assert!(frontier.claim(&seed));
        let again = frontier.pop().unwrap();
        assert!(!frontier.claim(&again));
    }

    #[test]
    fn test_mark_visited_drops_queued_entry() {
        let mut frontier = Frontier::new(url("https://ex.com/"), 10);
        frontier.push(url("https://ex.com/new"));
        frontier.mark_visited(&url("https://ex.com/new/"));

        assert!(frontier.is_visited(&url("https://ex.com/new")));
        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.visited_count(), 1);
    }

    #[test]
    fn test_capacity_limit() {
        let mut frontier = Frontier::new(url("https://ex.com/"), 2);
        assert!(frontier.push(url("https://ex.com/a")));
        assert!(!frontier.push(url("https://ex.com/b")));
        assert_eq!(frontier.len(), 2);
    }
}
