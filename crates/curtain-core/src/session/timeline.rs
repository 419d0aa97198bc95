//! Session timeline
//!
//! One ordered timer queue for everything the session schedules: the
//! failsafe, the loader hide/remove chain, hero playback steps, settle
//! passes and animation frames. A single queue keeps the whole schedule
//! inspectable and keeps firing order deterministic (deadline, then
//! insertion order).

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;

use tokio::time::Instant;

/// Handle for a scheduled entry; used to defuse the failsafe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// What to do when an entry comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Forced load completion if the load signal never arrives
    Failsafe,
    /// Apply the loader hide marking after the minimum-display hold
    HideLoader,
    /// Detach the loader once the fade has run, then enable reveals
    RemoveLoader,
    /// Reveal the nth hero element
    HeroStep(usize),
    /// Release the hero gate and re-evaluate
    HeroSettle,
    /// Post-removal re-evaluation after layout settles
    SettleEvaluate,
    /// Coalesced re-evaluation after document growth
    GrowthPass,
    /// Animation frame tick (scroll animation, intersection sweeps)
    Frame,
}

struct Entry {
    at: Instant,
    seq: u64,
    id: TimerId,
    action: TimerAction,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so the BinaryHeap pops the earliest deadline first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .at
            .cmp(&self.at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

pub struct Timeline {
    heap: BinaryHeap<Entry>,
    cancelled: HashSet<TimerId>,
    next_seq: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            cancelled: HashSet::new(),
            next_seq: 0,
        }
    }

    /// Schedule an action `delay` from now
    pub fn schedule(&mut self, delay: Duration, action: TimerAction) -> TimerId {
        self.schedule_at(Instant::now() + delay, action)
    }

    pub fn schedule_at(&mut self, at: Instant, action: TimerAction) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = TimerId(seq);
        self.heap.push(Entry { at, seq, id, action });
        id
    }

    /// Defuse an entry; it will never fire
    pub fn cancel(&mut self, id: TimerId) {
        self.cancelled.insert(id);
    }

    /// Earliest pending deadline, purging defused entries on the way
    pub fn next_deadline(&mut self) -> Option<Instant> {
        while let Some(entry) = self.heap.peek() {
            if self.cancelled.remove(&entry.id) {
                self.heap.pop();
                continue;
            }
            return Some(entry.at);
        }
        None
    }

    /// Pop the next action due at or before `now`
    pub fn pop_due(&mut self, now: Instant) -> Option<TimerAction> {
        while let Some(head) = self.heap.peek() {
            if head.at > now {
                return None;
            }
            if let Some(entry) = self.heap.pop() {
                if self.cancelled.remove(&entry.id) {
                    continue;
                }
                return Some(entry.action);
            }
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.heap
            .iter()
            .all(|entry| self.cancelled.contains(&entry.id))
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}
