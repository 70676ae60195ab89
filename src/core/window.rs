use crate::domain::model::SearchWindow;
use chrono::{Days, NaiveDate};

/// Date format the search API expects for `postedFrom`/`postedTo`.
pub const API_DATE_FORMAT: &str = "%m/%d/%Y";

impl SearchWindow {
    /// First run backfills from `backfill_from`; later runs cover the
    /// previous day through `today`.
    pub fn for_run(today: NaiveDate, first_run: bool, backfill_from: NaiveDate) -> Self {
        let posted_from = if first_run {
            backfill_from
        } else {
            today.checked_sub_days(Days::new(1)).unwrap_or(today)
        };

        Self {
            posted_from,
            posted_to: today,
        }
    }

    pub fn posted_from_param(&self) -> String {
        self.posted_from.format(API_DATE_FORMAT).to_string()
    }

    pub fn posted_to_param(&self) -> String {
        self.posted_to.format(API_DATE_FORMAT).to_string()
    }
}

impl std::fmt::Display for SearchWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.posted_from_param(), self.posted_to_param())
    }
}
