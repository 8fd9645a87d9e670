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
use crate::parsing::filesystem::Filesystem;
use crate::source::models::Listing;
use crate::source::{GlParams, LedgerSource};
use anyhow::{bail, Error};
use serde_json::Value;
use tracing::debug;

/// Serves saved API responses from disk. The report file is taken as-is:
/// it was already run with whatever dates and filters it was run with.
pub struct FileSource {
	fs: Filesystem,
	report: String,
	accounts: Option<String>,
	customers: Option<String>,
}

impl FileSource {
	pub fn new(
		report: String,
		accounts: Option<String>,
		customers: Option<String>,
	) -> Self {
		Self {
			fs: Filesystem::new(),
			report,
			accounts,
			customers,
		}
	}
}

impl LedgerSource for FileSource {
	fn general_ledger(&self, params: &GlParams) -> Result<Value, Error> {
		debug!(
			file = %self.report,
			start = %params.start_date,
			end = %params.end_date,
			"reading saved report; query filters do not apply"
		);
		self.fs.read_json(&self.report)
	}

	fn accounts(&self) -> Result<Vec<AccountRecord>, Error> {
		let Some(path) = &self.accounts else {
			bail!("an account list (--accounts FILE) is required with --report");
		};
		let listing: Listing<AccountRecord> = self.fs.read_json(path)?;
		Ok(listing.into_vec())
	}

	fn customers(&self, _reference: &str) -> Result<Vec<CustomerRecord>, Error> {
		let Some(path) = &self.customers else {
			bail!("a customer list (--customers FILE) is required with --report");
		};
		let listing: Listing<CustomerRecord> = self.fs.read_json(path)?;
		Ok(listing.into_vec())
	}
}
