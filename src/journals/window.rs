use time::{Date, Duration, OffsetDateTime};

/// Entries may be created or edited for today and the trailing three days.
pub const EDIT_WINDOW_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowViolation {
    FutureDate,
    TooOld,
}

impl WindowViolation {
    pub fn reason(&self) -> &'static str {
        match self {
            WindowViolation::FutureDate => "future-date",
            WindowViolation::TooOld => "too-old",
        }
    }
}

/// Accept iff `today - 3 days <= target <= today`, both ends inclusive.
/// Pure over calendar dates; `today` is injected so callers (and tests)
/// control the clock.
pub fn check(target: Date, today: Date) -> Result<(), WindowViolation> {
    if target > today {
        return Err(WindowViolation::FutureDate);
    }
    if target < today - Duration::days(EDIT_WINDOW_DAYS) {
        return Err(WindowViolation::TooOld);
    }
    Ok(())
}

/// The reference "today" used at the request boundary.
pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const TODAY: Date = date!(2025 - 06 - 10);

    #[test]
    fn accepts_today() {
        assert_eq!(check(date!(2025 - 06 - 10), TODAY), Ok(()));
    }

    #[test]
    fn accepts_inside_window() {
        assert_eq!(check(date!(2025 - 06 - 08), TODAY), Ok(()));
    }

    #[test]
    fn accepts_oldest_edge() {
        // today - 3 days is still writable
        assert_eq!(check(date!(2025 - 06 - 07), TODAY), Ok(()));
    }

    #[test]
    fn rejects_tomorrow_as_future() {
        assert_eq!(
            check(date!(2025 - 06 - 11), TODAY),
            Err(WindowViolation::FutureDate)
        );
    }

    #[test]
    fn rejects_four_days_back_as_too_old() {
        assert_eq!(
            check(date!(2025 - 06 - 06), TODAY),
            Err(WindowViolation::TooOld)
        );
    }

    #[test]
    fn window_spans_month_boundary() {
        let today = date!(2025 - 07 - 01);
        assert_eq!(check(date!(2025 - 06 - 28), today), Ok(()));
        assert_eq!(
            check(date!(2025 - 06 - 27), today),
            Err(WindowViolation::TooOld)
        );
    }

    #[test]
    fn reasons_render_as_wire_strings() {
        assert_eq!(WindowViolation::FutureDate.reason(), "future-date");
        assert_eq!(WindowViolation::TooOld.reason(), "too-old");
    }
}
