use chrono::{Datelike, NaiveDate};
use core::fmt::{Display, Formatter};
use strum::{Display as StrumDisplay, EnumIter};

/// Calendar granularity of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    /// The period containing `date` at this granularity.
    #[must_use]
    pub fn period_of(self, date: NaiveDate) -> Period {
        match self {
            Self::Daily => Period::Day(date),
            Self::Weekly => {
                let week = date.iso_week();
                Period::Week {
                    year: week.year(),
                    week: week.week(),
                }
            }
            Self::Monthly => Period::Month {
                year: date.year(),
                month: date.month(),
            },
        }
    }

    /// Header of the period column in exported tables.
    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::Daily => "date",
            Self::Weekly => "week",
            Self::Monthly => "month",
        }
    }
}

/// A calendar period: a civil day, an ISO week (Monday start) or a calendar month.
///
/// Periods order chronologically within a granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Period {
    Day(NaiveDate),
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
}

impl Period {
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        match self {
            Self::Day(_) => Granularity::Daily,
            Self::Week { .. } => Granularity::Weekly,
            Self::Month { .. } => Granularity::Monthly,
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Week { year, week } => write!(f, "{year}-W{week:02}"),
            Self::Month { year, month } => write!(f, "{year}-{month:02}"),
        }
    }
}
