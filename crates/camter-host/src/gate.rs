// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interactive gate and outbound script queue.
//
// Scripts produced while the WebView is loading or the app is in the
// background wait in a bounded FIFO. The gate reopens only after a load
// completes in the foreground and a settle delay has passed; any lifecycle
// event in between bumps the generation and invalidates the pending reopen.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    /// A bridge response.
    Response,
    /// Deep-link navigation.
    Navigation,
}

#[derive(Debug, Clone)]
pub struct QueuedScript {
    pub kind: ScriptKind,
    pub script: String,
    pub queued_at: DateTime<Utc>,
}

impl QueuedScript {
    pub fn new(kind: ScriptKind, script: String) -> Self {
        Self {
            kind,
            script,
            queued_at: Utc::now(),
        }
    }
}

/// Bounded FIFO of scripts awaiting delivery. When full, the oldest entry
/// is dropped.
#[derive(Debug)]
pub struct MessageQueue {
    entries: VecDeque<QueuedScript>,
    capacity: usize,
    dropped: u64,
}

impl MessageQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    /// Append `entry`, returning whatever had to be evicted to make room.
    pub fn push(&mut self, entry: QueuedScript) -> Option<QueuedScript> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        if let Some(old) = &evicted {
            self.dropped += 1;
            warn!(
                kind = ?old.kind,
                queued_at = %old.queued_at,
                capacity = self.capacity,
                "message queue full; dropped oldest script"
            );
        }
        self.entries.push_back(entry);
        evicted
    }

    /// Take every queued script, oldest first.
    pub fn drain(&mut self) -> Vec<QueuedScript> {
        self.entries.drain(..).collect()
    }

    /// Drop queued scripts of one kind. Returns how many were removed.
    pub fn discard(&mut self, kind: ScriptKind) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.kind != kind);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scripts evicted over the queue's lifetime.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Tracks whether scripts may be injected right now.
#[derive(Debug, Clone)]
pub struct DeliveryGate {
    loaded: bool,
    foreground: bool,
    interactive: bool,
    generation: u64,
}

impl Default for DeliveryGate {
    fn default() -> Self {
        Self::new()
    }
}

impl DeliveryGate {
    /// Closed gate: nothing loaded yet, app in the foreground.
    pub fn new() -> Self {
        Self {
            loaded: false,
            foreground: true,
            interactive: false,
            generation: 0,
        }
    }

    fn close(&mut self) -> u64 {
        self.interactive = false;
        self.generation += 1;
        self.generation
    }

    pub fn load_started(&mut self) {
        self.loaded = false;
        self.close();
    }

    /// Returns the ticket to present to [`open`](Self::open) once the
    /// settle delay has elapsed, or `None` while backgrounded.
    pub fn load_finished(&mut self) -> Option<u64> {
        self.loaded = true;
        let ticket = self.close();
        self.foreground.then_some(ticket)
    }

    pub fn backgrounded(&mut self) {
        self.foreground = false;
        self.close();
    }

    /// Returns a reopen ticket when a loaded page came back to the front.
    pub fn foregrounded(&mut self) -> Option<u64> {
        self.foreground = true;
        let ticket = self.close();
        self.loaded.then_some(ticket)
    }

    /// Open the gate if nothing happened since `ticket` was issued.
    pub fn open(&mut self, ticket: u64) -> bool {
        if ticket != self.generation || !self.loaded || !self.foreground {
            debug!(ticket, generation = self.generation, "stale reopen ignored");
            return false;
        }
        self.interactive = true;
        true
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_foreground(&self) -> bool {
        self.foreground
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(n: u32) -> QueuedScript {
        QueuedScript::new(ScriptKind::Response, format!("s{n}"))
    }

    #[test]
    fn queue_is_fifo() {
        let mut q = MessageQueue::new(8);
        for n in 1..=3 {
            q.push(script(n));
        }
        let drained: Vec<_> = q.drain().into_iter().map(|e| e.script).collect();
        assert_eq!(drained, ["s1", "s2", "s3"]);
        assert!(q.is_empty());
    }

    #[test]
    fn full_queue_drops_oldest() {
        let mut q = MessageQueue::new(2);
        assert!(q.push(script(1)).is_none());
        assert!(q.push(script(2)).is_none());
        let evicted = q.push(script(3)).expect("eviction");

        assert_eq!(evicted.script, "s1");
        assert_eq!(q.dropped(), 1);
        let drained: Vec<_> = q.drain().into_iter().map(|e| e.script).collect();
        assert_eq!(drained, ["s2", "s3"]);
    }

    #[test]
    fn discard_keeps_other_kinds() {
        let mut q = MessageQueue::new(8);
        q.push(script(1));
        q.push(QueuedScript::new(ScriptKind::Navigation, "nav".into()));
        q.push(script(2));

        assert_eq!(q.discard(ScriptKind::Response), 2);
        assert_eq!(q.drain()[0].script, "nav");
    }

    #[test]
    fn gate_opens_after_load_in_foreground() {
        let mut gate = DeliveryGate::new();
        assert!(!gate.is_interactive());

        let ticket = gate.load_finished().expect("ticket");
        assert!(!gate.is_interactive());
        assert!(gate.open(ticket));
        assert!(gate.is_interactive());
    }

    #[test]
    fn background_invalidates_pending_reopen() {
        let mut gate = DeliveryGate::new();
        let ticket = gate.load_finished().expect("ticket");
        gate.backgrounded();

        assert!(!gate.open(ticket));
        let fresh = gate.foregrounded().expect("ticket");
        assert!(gate.open(fresh));
    }

    #[test]
    fn no_ticket_while_backgrounded() {
        let mut gate = DeliveryGate::new();
        gate.backgrounded();
        assert!(gate.load_finished().is_none());
        assert!(gate.foregrounded().is_some());
    }

    #[test]
    fn foreground_before_any_load_stays_closed() {
        let mut gate = DeliveryGate::new();
        assert!(gate.foregrounded().is_none());
        gate.load_started();
        assert!(!gate.is_loaded());
    }
}
