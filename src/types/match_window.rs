use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// Assumed length of every match. The source data only records kickoff, so the end of the
/// weather window is kickoff plus this fixed duration.
pub const MATCH_DURATION: TimeDelta = TimeDelta::hours(2);

/// Half-open interval `[start, end)` during which a match was played.
///
/// `end` is always strictly after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl MatchWindow {
    /// Combines a calendar date with start and end times of day.
    ///
    /// If the end time is not later than the start time the match ran past midnight and the
    /// end moves to the next calendar day.
    ///
    /// ```
    /// use chrono::{NaiveDate, NaiveTime};
    /// use cupweather::MatchWindow;
    ///
    /// let date = NaiveDate::from_ymd_opt(1990, 6, 8).unwrap();
    /// let window = MatchWindow::from_times(
    ///     date,
    ///     NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
    ///     NaiveTime::from_hms_opt(1, 0, 0).unwrap(),
    /// );
    /// assert_eq!(window.end().date(), NaiveDate::from_ymd_opt(1990, 6, 9).unwrap());
    /// ```
    pub fn from_times(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        let start = date.and_time(start_time);
        let mut end = date.and_time(end_time);
        if end <= start {
            end = date
                .checked_add_days(Days::new(1))
                .map(|next| next.and_time(end_time))
                .unwrap_or(start + MATCH_DURATION);
        }
        Self { start, end }
    }

    /// Window for a match kicking off at `kickoff` and lasting [`MATCH_DURATION`].
    pub fn from_kickoff(kickoff: NaiveDateTime) -> Self {
        let end_time = (kickoff + MATCH_DURATION).time();
        Self::from_times(kickoff.date(), kickoff.time(), end_time)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Calendar dates covered by the window, inclusive on both ends.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        (self.start.date(), self.end.date())
    }

    pub fn contains(&self, time: NaiveDateTime) -> bool {
        self.start <= time && time < self.end
    }
}
