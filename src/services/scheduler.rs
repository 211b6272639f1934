// src/services/scheduler.rs
//
// Single-threaded delayed tasks, polled once per frame with app time

#[derive(Debug)]
struct Pending<T> {
    due: f32,
    seq: u64,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    pending: Vec<Pending<T>>,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: f32, delay: f32, task: T) {
        self.pending.push(Pending {
            due: now + delay.max(0.0),
            seq: self.next_seq,
            task,
        });
        self.next_seq += 1;
    }

    /// Removes and returns every task due at `now`, earliest first;
    /// ties keep scheduling order.
    pub fn take_due(&mut self, now: f32) -> Vec<T> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = rest;
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|p| p.task).collect()
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

    #[test]
    fn test_take_due_in_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.0, 0.5, "late");
        scheduler.schedule(0.0, 0.3, "first");
        scheduler.schedule(0.0, 0.3, "second");
        scheduler.schedule(0.0, 2.0, "much later");

        assert!(scheduler.take_due(0.1).is_empty());
        assert_eq!(scheduler.take_due(0.6), vec!["first", "second", "late"]);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.take_due(5.0), vec!["much later"]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_negative_delay_runs_next_poll() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1.0, -4.0, 7);
        assert_eq!(scheduler.take_due(1.0), vec![7]);
    }
}
