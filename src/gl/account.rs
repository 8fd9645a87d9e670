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
use crate::gl::error::GlError;
use serde::Deserialize;

/// One row of the chart of accounts, as the account query returns it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountRecord {
	pub id: String,
	pub name: String,
	pub fully_qualified_name: Option<String>,
	#[serde(default)]
	pub sub_account: bool,
	pub parent_ref: Option<ParentRef>,
	pub account_type: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ParentRef {
	pub value: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerRecord {
	pub id: String,
	#[serde(default)]
	pub display_name: String,
	pub fully_qualified_name: Option<String>,
}

impl AccountRecord {
	pub fn parent_id(&self) -> Option<&str> {
		self.parent_ref.as_ref().and_then(|p| p.value.as_deref())
	}

	pub fn qualified_name(&self) -> &str {
		self.fully_qualified_name.as_deref().unwrap_or(&self.name)
	}
}

impl CustomerRecord {
	pub fn qualified_name(&self) -> &str {
		self.fully_qualified_name
			.as_deref()
			.unwrap_or(&self.display_name)
	}
}

/// A record picked out of a list by a human-entered reference.
///
/// `candidates` is non-empty only when several records matched and none of
/// them exactly; the first one was taken, and the caller may want to say so.
#[derive(Debug, PartialEq)]
pub struct Resolved {
	pub id: String,
	pub name: String, // fully qualified
	pub candidates: Vec<(String, String)>, // id, qualified name
}

impl Resolved {
	fn exact(id: &str, name: &str) -> Self {
		Self {
			id: id.to_string(),
			name: name.to_string(),
			candidates: Vec::new(),
		}
	}

	pub fn is_ambiguous(&self) -> bool {
		!self.candidates.is_empty()
	}
}

fn is_numeric_ref(reference: &str) -> bool {
	!reference.is_empty() && reference.chars().all(|c| c.is_ascii_digit())
}

/// Case-insensitive substring search. An exact (case-insensitive) name wins;
/// otherwise the first match in list order is taken and, when there were
/// several, all of them are reported back.
fn fuzzy_pick<'a, T>(
	items: &'a [T],
	term: &str,
	name_of: impl Fn(&T) -> &str,
) -> Option<(&'a T, Vec<&'a T>)> {
	let needle = term.to_lowercase();
	let matches: Vec<&T> = items
		.iter()
		.filter(|i| name_of(i).to_lowercase().contains(&needle))
		.collect();

	let first = *matches.first()?;
	if let Some(&exact) =
		matches.iter().find(|i| name_of(i).to_lowercase() == needle)
	{
		return Some((exact, Vec::new()));
	}

	if matches.len() > 1 {
		Some((first, matches))
	} else {
		Some((first, Vec::new()))
	}
}

/// Resolves an account reference: digits are an exact id (an unknown id is
/// still usable and gets a synthesized label), anything else is matched
/// against account names.
pub fn resolve_account(
	reference: &str,
	accounts: &[AccountRecord],
) -> Result<Resolved, GlError> {
	if is_numeric_ref(reference) {
		return Ok(match accounts.iter().find(|a| a.id == reference) {
			Some(a) => Resolved::exact(&a.id, a.qualified_name()),
			None => Resolved::exact(reference, &format!("Account {}", reference)),
		});
	}

	let (account, others) = fuzzy_pick(accounts, reference, |a| a.name.as_str())
		.ok_or_else(|| GlError::account_not_found(reference))?;

	let mut resolved = Resolved::exact(&account.id, account.qualified_name());
	resolved.candidates = others
		.into_iter()
		.map(|a| (a.id.clone(), a.qualified_name().to_string()))
		.collect();
	Ok(resolved)
}

/// Same rules as accounts, against customer display names. An unknown
/// numeric id keeps the id as its name.
pub fn resolve_customer(
	reference: &str,
	customers: &[CustomerRecord],
) -> Result<Resolved, GlError> {
	if is_numeric_ref(reference) {
		return Ok(match customers.iter().find(|c| c.id == reference) {
			Some(c) => Resolved::exact(&c.id, c.qualified_name()),
			None => Resolved::exact(reference, reference),
		});
	}

	let (customer, others) =
		fuzzy_pick(customers, reference, |c| c.display_name.as_str())
			.ok_or_else(|| GlError::customer_not_found(reference))?;

	let mut resolved = Resolved::exact(&customer.id, customer.qualified_name());
	resolved.candidates = others
		.into_iter()
		.map(|c| (c.id.clone(), c.qualified_name().to_string()))
		.collect();
	Ok(resolved)
}
