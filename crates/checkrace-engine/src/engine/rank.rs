use std::{fmt, sync::mpsc};

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::{AgentId, RankMarker};

/// An agent holding a rank together with the score that earned it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankSlot {
    pub agent: AgentId,
    pub score: f32,
}

/// Notification that the best agent changed identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankChange {
    pub previous: Option<AgentId>,
    pub current: Option<AgentId>,
}

/// Receives [`RankChange`] events synchronously from the tracker.
///
/// Implemented for closures and for `mpsc::Sender<RankChange>`.
pub trait RankObserver {
    fn best_changed(&mut self, change: RankChange);
}

impl<F> RankObserver for F
where
    F: FnMut(RankChange),
{
    fn best_changed(&mut self, change: RankChange) {
        self(change);
    }
}

impl RankObserver for mpsc::Sender<RankChange> {
    fn best_changed(&mut self, change: RankChange) {
        // a dropped receiver just means nobody listens any more
        let _ = self.send(change);
    }
}

/// Which agents currently hold the two rank slots.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Podium {
    pub best: Option<AgentId>,
    pub second_best: Option<AgentId>,
}

impl Podium {
    #[must_use]
    pub fn marker_of(&self, agent: AgentId) -> RankMarker {
        if self.best == Some(agent) {
            RankMarker::First
        } else if self.second_best == Some(agent) {
            RankMarker::Second
        } else {
            RankMarker::None
        }
    }

    /// Marker updates needed to go from `self` to `after`.
    ///
    /// Only agents whose marker actually changes are listed.
    #[must_use]
    pub fn transitions(&self, after: &Self) -> ArrayVec<(AgentId, RankMarker), 4> {
        let mut changes = ArrayVec::new();
        let involved = [self.best, self.second_best, after.best, after.second_best];
        for (i, agent) in involved.iter().enumerate() {
            let Some(agent) = *agent else { continue };
            if involved[..i].contains(&Some(agent)) {
                continue;
            }
            let marker = after.marker_of(agent);
            if marker != self.marker_of(agent) {
                changes.push((agent, marker));
            }
        }
        changes
    }
}

/// Tracks the best and second-best agents by score.
///
/// Scores are offered one agent at a time with [`RankTracker::observe`], in
/// roster order. Ranks persist between ticks and are only taken over by a
/// strictly greater score, so ties go to the agent that got there first and
/// an agent that stops improving keeps its rank until overtaken.
///
/// When a new agent takes the lead, the previous leader becomes second best.
/// Every change of the best agent's identity is reported to the observers
/// given at construction.
///
/// # Example
///
/// ```
/// use std::sync::mpsc;
///
/// use checkrace_engine::{AgentId, RankChange, RankObserver, RankTracker};
///
/// let (tx, rx) = mpsc::channel();
/// let mut tracker = RankTracker::new(vec![Box::new(tx) as Box<dyn RankObserver>]);
///
/// tracker.observe(AgentId(0), 0.2);
/// tracker.observe(AgentId(1), 0.9);
/// tracker.observe(AgentId(2), 0.5);
///
/// assert_eq!(tracker.best().unwrap().agent, AgentId(1));
/// assert_eq!(tracker.second_best().unwrap().agent, AgentId(2));
/// assert_eq!(rx.try_iter().count(), 2);
/// ```
pub struct RankTracker {
    best: Option<RankSlot>,
    second_best: Option<RankSlot>,
    observers: Vec<Box<dyn RankObserver>>,
}

impl fmt::Debug for RankTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankTracker")
            .field("best", &self.best)
            .field("second_best", &self.second_best)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for RankTracker {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl RankTracker {
    #[must_use]
    pub fn new(observers: Vec<Box<dyn RankObserver>>) -> Self {
        Self {
            best: None,
            second_best: None,
            observers,
        }
    }

    #[must_use]
    pub const fn best(&self) -> Option<RankSlot> {
        self.best
    }

    #[must_use]
    pub const fn second_best(&self) -> Option<RankSlot> {
        self.second_best
    }

    #[must_use]
    pub fn podium(&self) -> Podium {
        Podium {
            best: self.best.map(|s| s.agent),
            second_best: self.second_best.map(|s| s.agent),
        }
    }

    /// Offers an agent's new score to the tracker.
    ///
    /// NaN scores are ignored.
    pub fn observe(&mut self, agent: AgentId, score: f32) {
        if score.is_nan() {
            return;
        }
        let slot = RankSlot { agent, score };
        match self.best {
            Some(best) if score <= best.score => {
                let beats_second = self.second_best.is_none_or(|s| score > s.score);
                if best.agent != agent && beats_second {
                    self.second_best = Some(slot);
                }
            }
            previous => {
                match previous {
                    Some(previous) if previous.agent != agent => {
                        self.second_best = Some(previous);
                    }
                    _ => {
                        if self.second_best.is_some_and(|s| s.agent == agent) {
                            self.second_best = None;
                        }
                    }
                }
                self.set_best(Some(slot));
            }
        }
    }

    /// Drops an agent that left the race from the rank slots.
    ///
    /// Losing the best agent promotes the second best.
    pub fn forget(&mut self, agent: AgentId) {
        if self.second_best.is_some_and(|s| s.agent == agent) {
            self.second_best = None;
        }
        if self.best.is_some_and(|s| s.agent == agent) {
            let promoted = self.second_best.take();
            self.set_best(promoted);
        }
    }

    /// Empties both rank slots.
    pub fn clear(&mut self) {
        self.second_best = None;
        self.set_best(None);
    }

    fn set_best(&mut self, slot: Option<RankSlot>) {
        let previous = self.best.map(|s| s.agent);
        let current = slot.map(|s| s.agent);
        self.best = slot;
        if previous == current {
            return;
        }

        tracing::debug!(?previous, ?current, "best agent changed");
        let change = RankChange { previous, current };
        for observer in &mut self.observers {
            observer.best_changed(change);
        }
    }
}
