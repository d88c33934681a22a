use chrono::NaiveDate;
use tracing::info;

/// Consecutive-day engagement counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Streak {
    pub count: u32,
    pub last_active: Option<NaiveDate>,
}

impl Streak {
    pub fn new(count: u32, last_active: Option<NaiveDate>) -> Self {
        Self { count, last_active }
    }

    /// Day-transition check run whenever the tracker is loaded. Returns
    /// whether anything changed.
    pub fn observe(&mut self, today: NaiveDate) -> bool {
        let Some(last) = self.last_active else {
            return false;
        };
        if last == today {
            return false;
        }

        let gap = (today - last).num_days();
        if gap == 1 {
            self.count = self.count.saturating_add(1);
        } else if gap > 1 {
            self.count = 1;
        }
        info!(gap, count = self.count, "streak day rolled over");
        self.last_active = Some(today);
        true
    }

    /// Covers a cold start: the first timer of a day with no streak yet.
    pub fn on_timer_start(&mut self, today: NaiveDate) {
        self.observe(today);
        if self.last_active != Some(today) || self.count == 0 {
            if self.count == 0 {
                self.count = 1;
            }
            self.last_active = Some(today);
        }
    }
}
