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
use crate::source::models::FaultHolder;
use anyhow::bail;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Every request pins the API minor version so payload shapes are stable.
const MINOR_VERSION: u32 = 75;

/// How much of an unparseable error body to show.
const ERROR_BODY_LIMIT: usize = 500;

pub struct Client {
	client: reqwest::blocking::Client,
	base_url: String,
	access_token: String,
}

impl Client {
	pub fn new(base_url: &str, access_token: String) -> Self {
		Client {
			client: reqwest::blocking::Client::new(),
			base_url: base_url.to_string(),
			access_token,
		}
	}

	/// Sends a GET and handle the response. Errors on non-2xx response codes,
	/// with the API's own fault messages when it sent any.
	pub fn get<Q, R>(&self, endpoint: &str, query_params: &Q) -> Result<R, anyhow::Error>
	where
		Q: Serialize + ?Sized,
		R: DeserializeOwned,
	{
		let url = format!("{}/{}", self.base_url, endpoint);

		let request = self
			.client
			.request(Method::GET, &url)
			.header("Authorization", format!("Bearer {}", self.access_token))
			.header("Accept", "application/json")
			.query(&[("minorversion", MINOR_VERSION)])
			.query(query_params);

		debug!(url = %url, "sending GET");
		let response = request.send()?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().unwrap_or_default();
			bail!("API error {}: {}", status.as_u16(), fault_message(&body));
		}

		let response_data: R = response.json()?;
		Ok(response_data)
	}
}

/// Pulls "Message — Detail" pairs out of a QBO fault body, falling back to
/// the start of the raw body.
pub fn fault_message(body: &str) -> String {
	let errors = serde_json::from_str::<FaultHolder>(body)
		.map(|f| f.fault.errors)
		.unwrap_or_default();

	if errors.is_empty() {
		return body.chars().take(ERROR_BODY_LIMIT).collect();
	}

	errors
		.iter()
		.map(|e| format!("{} — {}", e.message, e.detail))
		.collect::<Vec<_>>()
		.join("; ")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_fault_message() {
		let body = r#"{"Fault": {"Error": [
			{"Message": "Invalid Reference Id", "Detail": "Account 9 not found"},
			{"Message": "Stale Object", "Detail": ""}
		], "type": "ValidationFault"}}"#;
		assert_eq!(
			fault_message(body),
			"Invalid Reference Id — Account 9 not found; Stale Object — "
		);
	}

	#[test]
	fn test_fault_message_plain_body() {
		let body = "x".repeat(600);
		assert_eq!(fault_message(&body).len(), ERROR_BODY_LIMIT);
		assert_eq!(fault_message("Bad Gateway"), "Bad Gateway");
	}

	#[test]
	fn test_fault_without_errors_uses_body() {
		let body = r#"{"Fault": {"type": "AuthenticationFault"}}"#;
		assert_eq!(fault_message(body), body);
	}
}
