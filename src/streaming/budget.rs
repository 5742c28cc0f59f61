//! Per-frame rebuild budget
//!
//! Caps how many chunk meshes may be regenerated inside one frame so a
//! camera teleport that pushes hundreds of chunks across a threshold at once
//! spreads the work over several frames instead of spiking one.

/// Rebuild budget for a single frame
///
/// `None` means unlimited, which reproduces the fully synchronous update.
#[derive(Clone, Copy, Debug, Default)]
pub struct RebuildBudget {
    /// Maximum rebuilds per frame
    max_per_frame: Option<usize>,
    /// Rebuilds spent so far this frame
    spent: usize,
}

impl RebuildBudget {
    /// Create a new budget
    ///
    /// # Arguments
    /// * `max_per_frame` - Rebuild cap, or `None` for no cap
    pub fn new(max_per_frame: Option<usize>) -> Self {
        Self {
            max_per_frame,
            spent: 0,
        }
    }

    /// Reset spending at the start of a frame
    pub fn begin_frame(&mut self) {
        self.spent = 0;
    }

    /// Spend one rebuild if any remain. Returns false once exhausted.
    pub fn try_spend(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.spent = self.spent.saturating_add(1);
        true
    }

    /// Whether no rebuilds remain this frame
    pub fn is_exhausted(&self) -> bool {
        self.max_per_frame.is_some_and(|max| self.spent >= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_budget() {
        let mut budget = RebuildBudget::new(None);
        for _ in 0..10_000 {
            assert!(budget.try_spend());
        }
        assert!(!budget.is_exhausted());
    }

    #[test]
    fn test_limited_budget() {
        let mut budget = RebuildBudget::new(Some(3));
        assert!(!budget.is_exhausted());

        assert!(budget.try_spend());
        assert!(budget.try_spend());
        assert!(budget.try_spend());
        assert!(!budget.try_spend());

        assert!(budget.is_exhausted());
    }

    #[test]
    fn test_begin_frame_resets() {
        let mut budget = RebuildBudget::new(Some(1));
        assert!(budget.try_spend());
        assert!(!budget.try_spend());

        budget.begin_frame();
        assert!(!budget.is_exhausted());
        assert!(budget.try_spend());
    }

    #[test]
    fn test_zero_budget_never_spends() {
        let mut budget = RebuildBudget::new(Some(0));
        assert!(budget.is_exhausted());
        assert!(!budget.try_spend());
    }
}
