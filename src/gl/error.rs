/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
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
use thiserror::Error;

/// The failure conditions of report generation. Malformed rows and accounts
/// without activity are not errors; they are skipped or count as zero.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GlError {
	/// A fuzzy reference matched no record at all.
	#[error("No {kind} found matching '{term}'")]
	NotFound { kind: &'static str, term: String },

	/// The report header says there is nothing to parse.
	#[error("No data found for the specified filters.")]
	NoReportData,

	/// The account parent graph loops back on itself.
	#[error("Cyclic parent reference at account {id}")]
	CycleDetected { id: String },
}

impl GlError {
	pub fn account_not_found(term: &str) -> Self {
		GlError::NotFound {
			kind: "account",
			term: term.to_string(),
		}
	}

	pub fn customer_not_found(term: &str) -> Self {
		GlError::NotFound {
			kind: "customer",
			term: term.to_string(),
		}
	}
}
