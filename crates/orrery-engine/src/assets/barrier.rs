/// Joins N independent completion signals into one.
///
/// Fires exactly once, on the completion that leaves no slot outstanding,
/// regardless of the order slots complete in. Repeated or out-of-range
/// completions are logged and ignored.
#[derive(Debug, Clone)]
pub struct LoadBarrier {
    done: Vec<bool>,
    remaining: usize,
    fired: bool,
}

impl LoadBarrier {
    pub fn new(slots: usize) -> Self {
        Self {
            done: vec![false; slots],
            remaining: slots,
            fired: false,
        }
    }

    /// Mark `slot` complete. Returns `true` only on the call that fires.
    pub fn complete(&mut self, slot: usize) -> bool {
        match self.done.get_mut(slot) {
            None => {
                log::warn!("load barrier: slot {} out of range ({} slots)", slot, self.done.len());
                false
            }
            Some(true) => {
                log::warn!("load barrier: slot {} already complete", slot);
                false
            }
            Some(done) => {
                *done = true;
                self.remaining -= 1;
                self.try_fire()
            }
        }
    }

    /// Fire if nothing is outstanding and the barrier has not fired yet.
    /// A barrier with zero slots fires on the first call.
    pub fn try_fire(&mut self) -> bool {
        if self.remaining == 0 && !self.fired {
            self.fired = true;
            log::info!("load barrier: all {} slots complete", self.done.len());
            true
        } else {
            false
        }
    }

    pub fn is_complete(&self, slot: usize) -> bool {
        self.done.get(slot).copied().unwrap_or(false)
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn len(&self) -> usize {
        self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }
}
