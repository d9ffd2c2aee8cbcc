//! Fixed US federal holiday calendar

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

/// A named holiday on a specific date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Holiday {
    pub name: &'static str,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy)]
enum Rule {
    /// Fixed month/day, moved to Friday/Monday when it falls on a weekend
    Fixed { month: u32, day: u32 },
    /// n-th weekday of the month (n = 5 means the last one)
    NthWeekday { month: u32, weekday: Weekday, n: u8 },
}

#[derive(Debug, Clone, Copy)]
struct HolidayRule {
    name: &'static str,
    since: i32,
    rule: Rule,
}

const US_RULES: [HolidayRule; 11] = [
    HolidayRule { name: "New Year's Day", since: 1871, rule: Rule::Fixed { month: 1, day: 1 } },
    HolidayRule {
        name: "Martin Luther King Jr. Day",
        since: 1986,
        rule: Rule::NthWeekday { month: 1, weekday: Weekday::Mon, n: 3 },
    },
    HolidayRule {
        name: "Washington's Birthday",
        since: 1971,
        rule: Rule::NthWeekday { month: 2, weekday: Weekday::Mon, n: 3 },
    },
    HolidayRule {
        name: "Memorial Day",
        since: 1971,
        rule: Rule::NthWeekday { month: 5, weekday: Weekday::Mon, n: 5 },
    },
    HolidayRule {
        name: "Juneteenth National Independence Day",
        since: 2021,
        rule: Rule::Fixed { month: 6, day: 19 },
    },
    HolidayRule { name: "Independence Day", since: 1871, rule: Rule::Fixed { month: 7, day: 4 } },
    HolidayRule {
        name: "Labor Day",
        since: 1894,
        rule: Rule::NthWeekday { month: 9, weekday: Weekday::Mon, n: 1 },
    },
    HolidayRule {
        name: "Columbus Day",
        since: 1971,
        rule: Rule::NthWeekday { month: 10, weekday: Weekday::Mon, n: 2 },
    },
    HolidayRule { name: "Veterans Day", since: 1938, rule: Rule::Fixed { month: 11, day: 11 } },
    HolidayRule {
        name: "Thanksgiving",
        since: 1942,
        rule: Rule::NthWeekday { month: 11, weekday: Weekday::Thu, n: 4 },
    },
    HolidayRule { name: "Christmas Day", since: 1871, rule: Rule::Fixed { month: 12, day: 25 } },
];

/// Holiday table used by the seasonal model. Not user-configurable.
#[derive(Debug, Clone)]
pub struct HolidayCalendar {
    rules: &'static [HolidayRule],
}

impl HolidayCalendar {
    /// US federal holidays
    pub fn united_states() -> Self {
        Self { rules: &US_RULES }
    }

    /// Holiday names in calendar order
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    /// Holidays of `year`, including observed weekdays for fixed-date
    /// holidays that fall on a weekend. An observed day may land in the
    /// neighbouring year (New Year's Day on a Saturday).
    pub fn holidays_in_year(&self, year: i32) -> Vec<Holiday> {
        let mut holidays = Vec::new();

        for rule in self.rules.iter().filter(|r| year >= r.since) {
            match rule.rule {
                Rule::Fixed { month, day } => {
                    let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                        continue;
                    };
                    holidays.push(Holiday { name: rule.name, date });
                    let observed = match date.weekday() {
                        Weekday::Sat => Some(date - Duration::days(1)),
                        Weekday::Sun => Some(date + Duration::days(1)),
                        _ => None,
                    };
                    if let Some(observed) = observed {
                        holidays.push(Holiday { name: rule.name, date: observed });
                    }
                }
                Rule::NthWeekday { month, weekday, n } => {
                    let date = NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
                        .or_else(|| NaiveDate::from_weekday_of_month_opt(year, month, weekday, 4));
                    if let Some(date) = date {
                        holidays.push(Holiday { name: rule.name, date });
                    }
                }
            }
        }

        holidays.sort_by_key(|h| h.date);
        holidays
    }

    /// All holidays with `start <= date <= end`
    pub fn holidays_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<Holiday> {
        if start > end {
            return Vec::new();
        }

        // Neighbouring years contribute observed days across the boundary
        (start.year() - 1..=end.year() + 1)
            .flat_map(|year| self.holidays_in_year(year))
            .filter(|h| h.date >= start && h.date <= end)
            .collect()
    }

    /// Name of the holiday on `date`, if any
    pub fn holiday_on(&self, date: NaiveDate) -> Option<&'static str> {
        self.holidays_between(date, date).first().map(|h| h.name)
    }
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self::united_states()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_floating_holidays() {
        let calendar = HolidayCalendar::united_states();
        assert_eq!(calendar.holiday_on(date(2022, 11, 24)), Some("Thanksgiving"));
        assert_eq!(calendar.holiday_on(date(2022, 5, 30)), Some("Memorial Day"));
        assert_eq!(calendar.holiday_on(date(2022, 9, 5)), Some("Labor Day"));
        assert_eq!(calendar.holiday_on(date(2022, 1, 17)), Some("Martin Luther King Jr. Day"));
    }

    #[test]
    fn test_observed_days() {
        let calendar = HolidayCalendar::united_states();
        // July 4th 2021 was a Sunday
        assert_eq!(calendar.holiday_on(date(2021, 7, 5)), Some("Independence Day"));
        // January 1st 2022 was a Saturday, observed in 2021
        assert_eq!(calendar.holiday_on(date(2021, 12, 31)), Some("New Year's Day"));
        assert_eq!(calendar.holiday_on(date(2021, 7, 6)), None);
    }

    #[test]
    fn test_holidays_respect_start_year() {
        let calendar = HolidayCalendar::united_states();
        assert_eq!(calendar.holiday_on(date(2019, 6, 19)), None);
        assert_eq!(
            calendar.holiday_on(date(2023, 6, 19)),
            Some("Juneteenth National Independence Day")
        );
    }

    #[test]
    fn test_holidays_between() {
        let calendar = HolidayCalendar::united_states();
        let holidays = calendar.holidays_between(date(2023, 1, 1), date(2023, 12, 31));
        // New Year's Day (Sunday) and Veterans Day (Saturday) add observed days
        assert_eq!(holidays.len(), 13);
        assert!(holidays.windows(2).all(|w| w[0].date <= w[1].date));
        assert!(calendar.holidays_between(date(2023, 2, 1), date(2023, 1, 1)).is_empty());
    }
}
