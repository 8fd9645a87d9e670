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
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
	pub qbo: Option<Qbo>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Qbo {
	/// The QuickBooks company id.
	pub realm_id: Option<String>,
	pub access_token: Option<String>,
	pub access_token_cmd: Option<String>,
	#[serde(default)]
	pub sandbox: bool,
	pub api_url: Option<String>,

	/// Display prefix for amounts, e.g. "$".
	pub currency: Option<String>,
	/// "Cash" or "Accrual".
	pub method: Option<String>,
}
