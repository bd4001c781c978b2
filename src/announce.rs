//! Bounded FIFO of live-region notifications.
//!
//! Announcements are ephemeral display strings consumed by accessibility
//! and toast surfaces. The queue holds the five most recent; older entries
//! are dropped from the front. There is no TTL - entries expire only by
//! eviction.

use std::collections::VecDeque;

use chrono::Utc;
use uuid::Uuid;

use crate::models::Announcement;

/// How many announcements the queue retains.
pub const ANNOUNCEMENT_CAPACITY: usize = 5;

/// Bounded oldest-first notification queue.
#[derive(Debug, Clone)]
pub struct AnnouncementQueue {
    entries: VecDeque<Announcement>,
    capacity: usize,
}

impl AnnouncementQueue {
    /// A queue with the standard capacity.
    pub fn new() -> Self {
        Self::with_capacity(ANNOUNCEMENT_CAPACITY)
    }

    /// A queue with a custom capacity (configuration hook).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a message, evicting the oldest entry when over capacity.
    pub fn push(&mut self, message: impl Into<String>) {
        let announcement = Announcement {
            id: Uuid::new_v4().to_string(),
            message: message.into(),
            timestamp: Utc::now(),
        };
        self.entries.push_back(announcement);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Entries oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &Announcement> {
        self.entries.iter()
    }

    /// The most recent entry, for transient display.
    pub fn latest(&self) -> Option<&Announcement> {
        self.entries.back()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AnnouncementQueue {
    fn default() -> Self {
        Self::new()
    }
}
