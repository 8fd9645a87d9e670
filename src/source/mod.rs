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
use crate::gl::account::{AccountRecord, CustomerRecord};
use crate::util::date::Date;
use anyhow::Error;
use clap::ValueEnum;
use serde_json::Value;
use std::fmt;

pub mod file;
pub mod http;
pub mod models;
pub mod qbo;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum Method {
	#[default]
	Cash,
	Accrual,
}

impl Method {
	pub fn from_str(s: &str) -> Result<Self, Error> {
		<Method as ValueEnum>::from_str(s, true)
			.map_err(|_| anyhow::anyhow!("unknown accounting method: {}", s))
	}
}

impl fmt::Display for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Method::Cash => write!(f, "Cash"),
			Method::Accrual => write!(f, "Accrual"),
		}
	}
}

/// What to ask the General Ledger report for.
#[derive(Debug)]
pub struct GlParams {
	pub start_date: Date,
	pub end_date: Date,
	pub method: Method,
	pub customer_id: Option<String>,
}

/// Where the report payload and the account master data come from.
pub trait LedgerSource {
	/// The raw GeneralLedger report.
	fn general_ledger(&self, params: &GlParams) -> Result<Value, Error>;

	fn accounts(&self) -> Result<Vec<AccountRecord>, Error>;

	/// Customers that may match `reference`. Sources are free to return more
	/// than that.
	fn customers(&self, reference: &str) -> Result<Vec<CustomerRecord>, Error>;
}
