use parking_lot::{Condvar, Mutex};

/// Separates BFS levels: armed with the size of a level, released once every node of that level
/// has been processed.
#[derive(Debug, Default)]
pub(crate) struct LevelBarrier {
    remaining: Mutex<usize>,
    cvar: Condvar,
}

impl LevelBarrier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Must be called before any node of the level is dispatched.
    pub(crate) fn arm(&self, count: usize) {
        let mut remaining = self.remaining.lock();
        debug_assert_eq!(*remaining, 0, "barrier armed while a level is in flight");
        *remaining = count;
    }

    pub(crate) fn arrive(&self) {
        let mut remaining = self.remaining.lock();
        debug_assert!(*remaining > 0, "more arrivals than nodes in the level");
        *remaining = remaining.saturating_sub(1);

        if *remaining == 0 {
            self.cvar.notify_all();
        }
    }

    /// Arrives when the returned guard is dropped, including while unwinding.
    pub(crate) fn arrival(&self) -> Arrival<'_> {
        Arrival { barrier: self }
    }

    pub(crate) fn wait(&self) {
        let mut remaining = self.remaining.lock();
        while *remaining != 0 {
            self.cvar.wait(&mut remaining);
        }
    }
}

pub(crate) struct Arrival<'a> {
    barrier: &'a LevelBarrier,
}

impl Drop for Arrival<'_> {
    fn drop(&mut self) {
        self.barrier.arrive();
    }
}
