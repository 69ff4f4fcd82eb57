use crate::model::{ForecastDay, ForecastPayload};

/// Which forecast day is shown in detail.
///
/// Holds only the index. The active day itself is always derived with
/// [`active_day`], so it cannot drift from the payload it indexes into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaySelection {
    index: usize,
}

impl DaySelection {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Move to `index` if it is within `0..day_count`; anything else is ignored.
    pub fn select(&mut self, index: usize, day_count: usize) -> bool {
        if index < day_count {
            self.index = index;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

/// The day at `index`, if there is a payload and the index lands inside it.
pub fn active_day(payload: Option<&ForecastPayload>, index: usize) -> Option<&ForecastDay> {
    payload.and_then(|p| p.days.get(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::payload;

    #[test]
    fn select_within_range_moves_index() {
        let mut selection = DaySelection::default();
        assert!(selection.select(4, 7));
        assert_eq!(selection.index(), 4);
    }

    #[test]
    fn select_out_of_range_is_a_no_op() {
        let mut selection = DaySelection::default();
        selection.select(2, 7);

        assert!(!selection.select(7, 7));
        assert!(!selection.select(usize::MAX, 7));
        assert_eq!(selection.index(), 2);
    }

    #[test]
    fn select_without_days_is_a_no_op() {
        let mut selection = DaySelection::default();
        assert!(!selection.select(0, 0));
        assert_eq!(selection.index(), 0);
    }

    #[test]
    fn reset_goes_back_to_today() {
        let mut selection = DaySelection::default();
        selection.select(3, 7);
        selection.reset();
        assert_eq!(selection.index(), 0);
    }

    #[test]
    fn active_day_follows_payload_and_index() {
        let forecast = payload("London", "United Kingdom", 7);

        assert_eq!(active_day(Some(&forecast), 0), Some(&forecast.days[0]));
        assert_eq!(active_day(Some(&forecast), 6), Some(&forecast.days[6]));
        assert_eq!(active_day(Some(&forecast), 7), None);
        assert_eq!(active_day(None, 0), None);
    }
}
