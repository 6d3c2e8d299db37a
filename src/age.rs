use crate::cli::CommonArgs;
use crate::config::Config;
use crate::error::{GhstatError, Result};
use crate::util::plural;
use anyhow::Context;
use chrono::{Datelike, Local, Months, NaiveDate};
use std::fmt;

/// Calendar difference between two dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Age {
    pub years: i32,
    pub months: i32,
    pub days: i32,
}

impl Age {
    pub fn between(birthday: NaiveDate, today: NaiveDate) -> Result<Self> {
        if today < birthday {
            return Err(GhstatError::InvalidDate(format!(
                "{birthday} is after {today}"
            )));
        }

        // Step whole months from the birthday, clamping to month ends, then
        // count the remaining days.
        let mut months = (today.year() - birthday.year()) * 12 + today.month() as i32
            - birthday.month() as i32;
        let mut anchor = months_after(birthday, months)?;
        if anchor > today {
            months -= 1;
            anchor = months_after(birthday, months)?;
        }
        let days = (today - anchor).num_days() as i32;

        Ok(Self {
            years: months / 12,
            months: months % 12,
            days,
        })
    }
}

fn months_after(date: NaiveDate, months: i32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months as u32))
        .ok_or_else(|| GhstatError::InvalidDate(format!("{date} plus {months} months is out of range")))
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} year{}, {} month{}, {} day{}",
            self.years,
            plural(self.years as i64),
            self.months,
            plural(self.months as i64),
            self.days,
            plural(self.days as i64)
        )
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|e| GhstatError::InvalidDate(format!("'{input}': {e}")))
}

pub fn exec(common: CommonArgs, birthday: Option<String>) -> anyhow::Result<()> {
    let birthday = match birthday {
        Some(b) => parse_date(&b)?,
        None => Config::for_args(&common)
            .context("Failed to load configuration")?
            .birthday()?
            .ok_or_else(|| anyhow::anyhow!("no birthday given; pass --birthday or set `birthday`"))?,
    };
    println!("{}", Age::between(birthday, Local::now().date_naive())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn simple_difference() {
        let age = Age::between(d("2002-07-05"), d("2024-09-10")).unwrap();
        assert_eq!(age, Age { years: 22, months: 2, days: 5 });
    }

    #[test]
    fn borrows_days_from_previous_month() {
        // August has 31 days
        let age = Age::between(d("2002-07-25"), d("2024-09-10")).unwrap();
        assert_eq!(age, Age { years: 22, months: 1, days: 16 });
    }

    #[test]
    fn borrows_months_from_year() {
        let age = Age::between(d("2002-11-05"), d("2024-02-05")).unwrap();
        assert_eq!(age, Age { years: 21, months: 3, days: 0 });
    }

    #[test]
    fn birthday_at_month_end_clamps_to_short_month() {
        let age = Age::between(d("2002-01-31"), d("2024-03-01")).unwrap();
        assert_eq!(age, Age { years: 22, months: 1, days: 1 });
        assert_eq!(age.to_string(), "22 years, 1 month, 1 day");

        let age = Age::between(d("2003-03-31"), d("2024-05-01")).unwrap();
        assert_eq!(age, Age { years: 21, months: 1, days: 1 });
    }

    #[test]
    fn leap_day_birthday() {
        let age = Age::between(d("2000-02-29"), d("2023-02-28")).unwrap();
        assert_eq!(age, Age { years: 23, months: 0, days: 0 });
        let age = Age::between(d("2000-02-29"), d("2023-02-27")).unwrap();
        assert_eq!(age, Age { years: 22, months: 11, days: 29 });
    }

    #[test]
    fn singular_units() {
        let age = Age::between(d("2023-01-01"), d("2024-02-02")).unwrap();
        assert_eq!(age.to_string(), "1 year, 1 month, 1 day");
        let zero = Age::between(d("2024-02-02"), d("2024-02-02")).unwrap();
        assert_eq!(zero.to_string(), "0 years, 0 months, 0 days");
    }

    #[test]
    fn future_birthday_is_rejected() {
        assert!(Age::between(d("2030-01-01"), d("2024-01-01")).is_err());
    }
}
