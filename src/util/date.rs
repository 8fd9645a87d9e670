/* Copyright © 2024-2025 Adam Train <adam@adamtrain.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use anyhow::{bail, Error};
use std::cmp::Ordering;
use std::fmt;

const MONTH_NAMES: [&str; 12] = [
	"January",
	"February",
	"March",
	"April",
	"May",
	"June",
	"July",
	"August",
	"September",
	"October",
	"November",
	"December",
];

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct Date {
	year: u32,
	month: u8,
	day: u8,
}

impl Date {
	/// Constructor to parse a string in the "YYYY-mm-dd" format
	pub fn from_str(date_str: &str) -> Result<Date, Error> {
		let parts: Vec<&str> = date_str.split('-').collect();
		if parts.len() != 3 {
			bail!("Date format must be YYYY-MM-DD");
		}

		let year = parts[0].parse::<u32>()?;
		let month = parts[1].parse::<u8>()?;
		let day = parts[2].parse::<u8>()?;

		// Validate the date
		if !Date::is_valid_date(year, month, day) {
			bail!("Invalid date: {}", date_str);
		}

		Ok(Date { year, month, day })
	}

	pub fn month_name(&self) -> &'static str {
		MONTH_NAMES[(self.month - 1) as usize]
	}

	pub fn is_month_start(&self) -> bool {
		self.day == 1
	}

	pub fn is_month_end(&self) -> bool {
		self.day == Date::days_in_month(self.year, self.month)
	}

	fn is_leap_year(year: u32) -> bool {
		(year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
	}

	fn days_in_month(year: u32, month: u8) -> u8 {
		match month {
			1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
			4 | 6 | 9 | 11 => 30,
			2 => {
				if Date::is_leap_year(year) {
					29
				} else {
					28
				}
			},
			_ => 0, // Invalid month
		}
	}

	fn is_valid_date(year: u32, month: u8, day: u8) -> bool {
		if !(1..=12).contains(&month) {
			return false;
		}
		if day < 1 || day > Date::days_in_month(year, month) {
			return false;
		}
		true
	}
}

impl PartialOrd for Date {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Date {
	fn cmp(&self, other: &Self) -> Ordering {
		(self.year, self.month, self.day).cmp(&(
			other.year,
			other.month,
			other.day,
		))
	}
}

impl fmt::Display for Date {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
	}
}

/// A report period, printed the way a person would say it: whole months are
/// named without days, and the year is only repeated when it changes.
///
/// e.g.
///     2025-01-01 .. 2025-01-31    January, 2025
///     2025-01-10 .. 2025-01-20    January 10-20, 2025
///     2025-01-01 .. 2025-03-31    January-March, 2025
///     2025-01-15 .. 2025-03-20    January 15-March 20, 2025
///     2024-11-01 .. 2025-02-28    November 2024-February 2025
///     2024-11-15 .. 2025-02-10    15 November 2024-10 February 2025
pub struct DateRange {
	pub start: Date,
	pub end: Date,
}

impl DateRange {
	fn whole_months(&self) -> bool {
		self.start.is_month_start() && self.end.is_month_end()
	}
}

impl fmt::Display for DateRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let (s, e) = (&self.start, &self.end);
		let whole = self.whole_months();

		if s.year != e.year {
			return if whole {
				write!(
					f,
					"{} {}-{} {}",
					s.month_name(),
					s.year,
					e.month_name(),
					e.year
				)
			} else {
				write!(
					f,
					"{} {} {}-{} {} {}",
					s.day,
					s.month_name(),
					s.year,
					e.day,
					e.month_name(),
					e.year
				)
			};
		}

		match (s.month == e.month, whole) {
			(true, true) => write!(f, "{}, {}", s.month_name(), s.year),
			(true, false) => {
				write!(f, "{} {}-{}, {}", s.month_name(), s.day, e.day, s.year)
			},
			(false, true) => write!(
				f,
				"{}-{}, {}",
				s.month_name(),
				e.month_name(),
				s.year
			),
			(false, false) => write!(
				f,
				"{} {}-{} {}, {}",
				s.month_name(),
				s.day,
				e.month_name(),
				e.day,
				s.year
			),
		}
	}
}
