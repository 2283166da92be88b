use std::time::{Duration, Instant};

/// Identifies the session state a deferred continuation was scheduled for.
///
/// The session bumps its epoch on every transition that invalidates pending
/// work, so a continuation whose ticket no longer equals the session's current
/// ticket must be dropped when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub position: usize,
    pub epoch: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Due<A> {
    pub ticket: Ticket,
    pub action: A,
}

struct Pending<A> {
    due_at: Instant,
    ticket: Ticket,
    action: A,
}

/// Fire-once deferred continuations, polled from the UI tick.
pub struct Scheduler<A> {
    pending: Vec<Pending<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<A> Scheduler<A> {
    pub fn schedule(&mut self, ticket: Ticket, delay: Duration, now: Instant, action: A) {
        self.pending.push(Pending {
            due_at: now + delay,
            ticket,
            action,
        });
    }

    /// Remove and return every continuation due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<Due<A>> {
        let mut due: Vec<Pending<A>> = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due_at <= now {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|p| p.due_at);
        due.into_iter()
            .map(|p| Due {
                ticket: p.ticket,
                action: p.action,
            })
            .collect()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.due_at).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: Ticket = Ticket {
        position: 0,
        epoch: 0,
    };

    #[test]
    fn nothing_fires_before_deadline() {
        let start = Instant::now();
        let mut s = Scheduler::default();
        s.schedule(T0, Duration::from_millis(100), start, "a");
        assert!(s.take_due(start + Duration::from_millis(99)).is_empty());
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn fires_once_in_deadline_order() {
        let start = Instant::now();
        let mut s = Scheduler::default();
        s.schedule(T0, Duration::from_millis(300), start, "late");
        s.schedule(T0, Duration::from_millis(100), start, "early");
        s.schedule(T0, Duration::from_millis(900), start, "later");
        let due = s.take_due(start + Duration::from_millis(500));
        let actions: Vec<&str> = due.iter().map(|d| d.action).collect();
        assert_eq!(actions, vec!["early", "late"]);
        assert!(s.take_due(start + Duration::from_millis(500)).is_empty());
        assert_eq!(s.next_due(), Some(start + Duration::from_millis(900)));
    }

    #[test]
    fn due_items_carry_their_ticket() {
        let start = Instant::now();
        let mut s = Scheduler::default();
        let t = Ticket {
            position: 4,
            epoch: 9,
        };
        s.schedule(t, Duration::ZERO, start, ());
        assert_eq!(s.take_due(start)[0].ticket, t);
        assert!(s.is_empty());
    }
}
