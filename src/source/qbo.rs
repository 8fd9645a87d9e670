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
use crate::config::config_file::Qbo;
use crate::gl::account::{AccountRecord, CustomerRecord};
use crate::source::http::Client;
use crate::source::models::{QueryHolder, QueryParams, ReportParams};
use crate::source::{GlParams, LedgerSource};
use anyhow::{bail, Error};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

const QBO_API_URL: &str = "https://quickbooks.api.intuit.com/v3/company";
const QBO_SANDBOX_URL: &str =
	"https://sandbox-quickbooks.api.intuit.com/v3/company";

/// Page size for queries; the API will not return more.
const MAX_RESULTS: usize = 1000;
const MAX_PAGES: usize = 100;

/// Read-only QuickBooks Online client for the report and the entity lists it
/// needs.
pub struct QboClient {
	http: Client,
}

impl QboClient {
	pub fn new(config: Qbo) -> Result<Self, Error> {
		let Some(realm_id) = config.realm_id else {
			bail!("no qbo realm_id in config; set qbo.realm_id or QBO_REALM_ID");
		};
		let Some(access_token) = config.access_token else {
			bail!("no qbo access token; set qbo.access_token, qbo.access_token_cmd or QBO_ACCESS_TOKEN");
		};

		let base_url =
			company_url(config.api_url.as_deref(), config.sandbox, &realm_id);

		Ok(QboClient {
			http: Client::new(&base_url, access_token),
		})
	}

	/// Runs a query across as many pages as it takes.
	fn query<T: DeserializeOwned>(&self, sql: &str) -> Result<Vec<T>, Error> {
		let mut results = Vec::new();
		let mut start = 1;

		for _ in 0..MAX_PAGES {
			let paged = paginate(sql, start);
			let holder: QueryHolder<T> =
				self.http.get("query", &QueryParams { query: &paged })?;

			let page = holder.query_response.entities;
			let page_len = page.len();
			results.extend(page);

			if page_len < MAX_RESULTS {
				return Ok(results);
			}
			start += MAX_RESULTS;
		}

		warn!(pages = MAX_PAGES, "query stopped at page limit: {}", sql);
		Ok(results)
	}
}

impl LedgerSource for QboClient {
	fn general_ledger(&self, params: &GlParams) -> Result<Value, Error> {
		let query = ReportParams {
			start_date: params.start_date.to_string(),
			end_date: params.end_date.to_string(),
			accounting_method: params.method.to_string(),
			customer: params.customer_id.clone(),
		};
		self.http.get("reports/GeneralLedger", &query)
	}

	fn accounts(&self) -> Result<Vec<AccountRecord>, Error> {
		self.query(
			"SELECT Id, Name, FullyQualifiedName, AccountType, SubAccount, ParentRef FROM Account",
		)
	}

	/// Only customers that could match the reference come back; the final
	/// pick happens in the resolver.
	fn customers(&self, reference: &str) -> Result<Vec<CustomerRecord>, Error> {
		let escaped = qbo_escape(reference);
		let filter = if reference.chars().all(|c| c.is_ascii_digit()) {
			format!("Id = '{}'", escaped)
		} else {
			format!("DisplayName LIKE '%{}%'", escaped)
		};
		self.query(&format!(
			"SELECT Id, DisplayName, FullyQualifiedName FROM Customer WHERE {}",
			filter
		))
	}
}

fn company_url(api_url: Option<&str>, sandbox: bool, realm_id: &str) -> String {
	let api_url = match api_url {
		Some(url) => url.trim_end_matches('/'),
		None if sandbox => QBO_SANDBOX_URL,
		None => QBO_API_URL,
	};
	format!("{}/{}", api_url, realm_id)
}

fn paginate(sql: &str, start: usize) -> String {
	format!("{} STARTPOSITION {} MAXRESULTS {}", sql, start, MAX_RESULTS)
}

/// Makes a value safe inside a single-quoted query literal. Quotes are
/// doubled; `%` is dropped since it would act as a wildcard.
pub fn qbo_escape(value: &str) -> String {
	value.replace('\'', "''").replace('%', "")
}
