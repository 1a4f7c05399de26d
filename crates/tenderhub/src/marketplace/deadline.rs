use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Source of the current instant. Dates are UTC calendar dates.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant, for demos and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Whole days left until the deadline's midnight, rounded up.
///
/// Zero while the deadline is today, negative once it has passed.
pub fn days_until(deadline: NaiveDate, now: DateTime<Utc>) -> i64 {
    let midnight = Utc.from_utc_datetime(&deadline.and_time(NaiveTime::MIN));
    let remaining = (midnight - now).num_milliseconds();
    ceil_div(remaining, MILLIS_PER_DAY)
}

pub fn is_past(deadline: NaiveDate, today: NaiveDate) -> bool {
    deadline < today
}

fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator / denominator;
    if numerator % denominator > 0 {
        quotient + 1
    } else {
        quotient
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0)
            .single()
            .expect("valid instant")
    }

    #[test]
    fn today_is_zero_days_away() {
        assert_eq!(days_until(morning().date_naive(), morning()), 0);
    }

    #[test]
    fn tomorrow_is_one_day_away() {
        let tomorrow = morning().date_naive() + Duration::days(1);
        assert_eq!(days_until(tomorrow, morning()), 1);
    }

    #[test]
    fn yesterday_is_negative() {
        let yesterday = morning().date_naive() - Duration::days(1);
        assert!(days_until(yesterday, morning()) < 0);
        assert_eq!(days_until(yesterday, morning()), -1);
    }

    #[test]
    fn exact_midnight_counts_whole_days() {
        let midnight = Utc
            .with_ymd_and_hms(2025, 6, 2, 0, 0, 0)
            .single()
            .expect("valid instant");
        let in_thirty = midnight.date_naive() + Duration::days(30);
        assert_eq!(days_until(in_thirty, midnight), 30);
        assert_eq!(days_until(midnight.date_naive(), midnight), 0);
    }

    #[test]
    fn fixed_clock_reports_its_date() {
        let clock = FixedClock(morning());
        assert_eq!(clock.today(), morning().date_naive());
        assert!(is_past(clock.today() - Duration::days(1), clock.today()));
        assert!(!is_past(clock.today(), clock.today()));
    }
}
