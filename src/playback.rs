// ---------------------------------------------------------------------------
// Head animation stepper
// ---------------------------------------------------------------------------

/// Identifies one started playback.  Stale handles are ignored by
/// [`Playback::cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackHandle(u64);

#[derive(Debug, Clone)]
struct Active {
    handle: PlaybackHandle,
    len: usize,
    interval_s: f64,
    next_due: f64,
    /// Next sample index to reveal.
    cursor: usize,
}

/// Steps through `0, step, 2·step, …` of a sample sequence, one index per
/// elapsed interval.  At most one playback is active at a time.
#[derive(Debug, Clone, Default)]
pub struct Playback {
    next_id: u64,
    active: Option<Active>,
    step: usize,
    last_revealed: Option<usize>,
}

impl Playback {
    /// Start stepping through `len` samples, cancelling any running playback.
    ///
    /// The first index is revealed once `interval_s` has elapsed after `now`.
    /// A zero `step` is treated as 1; an interval of zero reveals one index
    /// per call to [`Playback::advance`].
    pub fn start(&mut self, len: usize, step: usize, interval_s: f64, now: f64) -> PlaybackHandle {
        if let Some(prev) = self.active.take() {
            log::debug!("Cancelling playback {:?} at index {}", prev.handle, prev.cursor);
        }
        let handle = PlaybackHandle(self.next_id);
        self.next_id += 1;
        self.step = step.max(1);
        self.last_revealed = None;
        let interval_s = interval_s.max(0.0);
        self.active = (len > 0).then_some(Active {
            handle,
            len,
            interval_s,
            next_due: now + interval_s,
            cursor: 0,
        });
        handle
    }

    /// Stop the playback identified by `handle`.  Returns whether it was the
    /// active one.
    pub fn cancel(&mut self, handle: PlaybackHandle) -> bool {
        if self.active.as_ref().is_some_and(|a| a.handle == handle) {
            self.active = None;
            true
        } else {
            false
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Reveal every index whose tick has elapsed by `now`.
    ///
    /// Returns the newest index revealed by this call, if any.  The playback
    /// stops by itself once the cursor passes the end.
    pub fn advance(&mut self, now: f64) -> Option<usize> {
        let active = self.active.as_mut()?;

        let mut revealed = None;
        if active.interval_s > 0.0 {
            while now >= active.next_due && active.cursor < active.len {
                revealed = Some(active.cursor);
                active.cursor += self.step;
                active.next_due += active.interval_s;
            }
        } else {
            revealed = Some(active.cursor);
            active.cursor += self.step;
        }

        if active.cursor >= active.len {
            self.active = None;
        }
        if revealed.is_some() {
            self.last_revealed = revealed;
        }
        revealed
    }

    /// The newest revealed index; kept after the playback finishes.
    pub fn current(&self) -> Option<usize> {
        self.last_revealed
    }

    /// Whether sample `index` has been shown by the current playback.
    pub fn is_revealed(&self, index: usize) -> bool {
        match self.last_revealed {
            Some(last) => index <= last && index % self.step.max(1) == 0,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_by_two_per_tick() {
        let mut pb = Playback::default();
        pb.start(5, 2, 0.1, 0.0);
        assert_eq!(pb.advance(0.05), None);
        assert_eq!(pb.advance(0.1), Some(0));
        assert_eq!(pb.advance(0.25), Some(2));
        assert!(pb.is_active());
        assert_eq!(pb.advance(0.35), Some(4));
        assert!(!pb.is_active());
        assert_eq!(pb.current(), Some(4));
        assert!(pb.is_revealed(2));
        assert!(!pb.is_revealed(3));
    }

    #[test]
    fn catches_up_on_long_frames() {
        let mut pb = Playback::default();
        pb.start(100, 2, 0.001, 0.0);
        assert_eq!(pb.advance(0.0105), Some(18));
        assert!(pb.is_revealed(18));
        assert!(!pb.is_revealed(20));
    }

    #[test]
    fn starting_again_cancels_previous() {
        let mut pb = Playback::default();
        let first = pb.start(10, 1, 0.1, 0.0);
        pb.advance(0.35);
        let second = pb.start(10, 1, 0.1, 1.0);
        assert_ne!(first, second);
        assert_eq!(pb.current(), None);
        // The old handle no longer controls anything.
        assert!(!pb.cancel(first));
        assert!(pb.is_active());
        assert!(pb.cancel(second));
        assert!(!pb.is_active());
        assert_eq!(pb.advance(5.0), None);
    }

    #[test]
    fn empty_sequence_never_runs() {
        let mut pb = Playback::default();
        pb.start(0, 2, 0.1, 0.0);
        assert!(!pb.is_active());
        assert_eq!(pb.advance(1.0), None);
    }

    #[test]
    fn zero_interval_reveals_once_per_call() {
        let mut pb = Playback::default();
        pb.start(3, 1, 0.0, 0.0);
        assert_eq!(pb.advance(0.0), Some(0));
        assert_eq!(pb.advance(0.0), Some(1));
        assert_eq!(pb.advance(0.0), Some(2));
        assert!(!pb.is_active());
    }
}
