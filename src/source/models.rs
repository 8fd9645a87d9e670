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
use serde::{Deserialize, Serialize};

// -------------
// -- SENDING --
// -------------

#[derive(Debug, Serialize)]
pub struct QueryParams<'a> {
	pub query: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ReportParams {
	pub start_date: String,
	pub end_date: String,
	pub accounting_method: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub customer: Option<String>,
}

// ---------------
// -- RECEIVING --
// ---------------

/// `{"QueryResponse": {"Account": [...], "startPosition": 1, ...}}`. An
/// empty result omits the entity key entirely.
#[derive(Debug, Deserialize)]
pub struct QueryHolder<T> {
	#[serde(rename = "QueryResponse", default = "QueryResponse::empty")]
	pub query_response: QueryResponse<T>,
}

#[derive(Debug, Deserialize)]
pub struct QueryResponse<T> {
	#[serde(rename = "Account", alias = "Customer", default = "Vec::new")]
	pub entities: Vec<T>,
}

impl<T> QueryResponse<T> {
	fn empty() -> Self {
		Self {
			entities: Vec::new(),
		}
	}
}

/// A saved entity list: either the bare array or a whole query response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
	Bare(Vec<T>),
	Wrapped(QueryHolder<T>),
}

impl<T> Listing<T> {
	pub fn into_vec(self) -> Vec<T> {
		match self {
			Listing::Bare(items) => items,
			Listing::Wrapped(holder) => holder.query_response.entities,
		}
	}
}

#[derive(Debug, Default, Deserialize)]
pub struct FaultHolder {
	#[serde(rename = "Fault", default)]
	pub fault: Fault,
}

#[derive(Debug, Default, Deserialize)]
pub struct Fault {
	#[serde(rename = "Error", default)]
	pub errors: Vec<FaultError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FaultError {
	#[serde(default)]
	pub message: String,
	#[serde(default)]
	pub detail: String,
}
