use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

/// Number of one-minute steps in a simulated day.
pub const STEPS_PER_DAY: usize = 1440;

/// Duration of one step in hours.
pub const DT_HOURS: f64 = 1.0 / 60.0;

/// One UTC day sampled every minute.
///
/// The grid is defined by its start instant; step `i` lies exactly `i`
/// minutes after midnight.
///
/// # Examples
///
/// ```
/// use agrivolt_sim::sim::grid::TimeGrid;
/// use chrono::NaiveDate;
///
/// let grid = TimeGrid::for_date(NaiveDate::from_ymd_opt(2020, 6, 28).unwrap());
/// assert_eq!(grid.len(), 1440);
/// assert_eq!(grid.hour_of_day(90), 1.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeGrid {
    /// 00:00:00 UTC of the simulated date
    start: DateTime<Utc>,
    /// Number of steps
    len: usize,
}

impl TimeGrid {
    /// Builds the grid starting at midnight UTC of `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            start: date.and_time(chrono::NaiveTime::MIN).and_utc(),
            len: STEPS_PER_DAY,
        }
    }

    /// The simulated calendar date.
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Instant of step `index`, or `None` past the end of the day.
    pub fn get(&self, index: usize) -> Option<DateTime<Utc>> {
        if index < self.len {
            Some(self.start + TimeDelta::minutes(index as i64))
        } else {
            None
        }
    }

    /// Iterates over all instants in order.
    pub fn iter(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        (0..self.len).filter_map(|i| self.get(i))
    }

    /// Collects all instants.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.iter().collect()
    }

    /// Fractional UTC hour of step `index`.
    pub fn hour_of_day(&self, index: usize) -> f64 {
        index as f64 / 60.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn grid() -> TimeGrid {
        TimeGrid::for_date(NaiveDate::from_ymd_opt(2020, 6, 28).expect("valid date"))
    }

    #[test]
    fn test_full_day() {
        let g = grid();
        assert_eq!(g.len(), STEPS_PER_DAY);
        assert!(!g.is_empty());
        assert_eq!(g.timestamps().len(), 1440);
    }

    #[test]
    fn test_starts_at_midnight() {
        let first = grid().get(0).expect("first step");
        assert_eq!(first.hour(), 0);
        assert_eq!(first.minute(), 0);
        assert_eq!(first.second(), 0);
        assert_eq!(first.date_naive(), grid().date());
    }

    #[test]
    fn test_one_minute_spacing() {
        let ts = grid().timestamps();
        for pair in ts.windows(2) {
            assert_eq!(pair[1] - pair[0], TimeDelta::seconds(60));
        }
    }

    #[test]
    fn test_last_step_same_day() {
        let g = grid();
        let last = g.get(1439).expect("last step");
        assert_eq!(last.hour(), 23);
        assert_eq!(last.minute(), 59);
        assert_eq!(last.date_naive(), g.date());
        assert_eq!(g.get(1440), None);
    }

    #[test]
    fn test_hour_of_day() {
        let g = grid();
        assert_eq!(g.hour_of_day(0), 0.0);
        assert_eq!(g.hour_of_day(720), 12.0);
    }

    #[test]
    fn test_leap_day() {
        let g = TimeGrid::for_date(NaiveDate::from_ymd_opt(2024, 2, 29).expect("leap day"));
        assert_eq!(g.len(), 1440);
        assert_eq!(g.get(0).map(|t| t.date_naive()), Some(g.date()));
    }
}
