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
use crate::gl::account::{resolve_account, AccountRecord, Resolved};
use crate::gl::error::GlError;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Structural node of the chart of accounts under a chosen root. Children are
/// sorted by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AccountNode {
	pub name: String,
	pub id: String,
	pub children: Vec<AccountNode>,
}

impl AccountNode {
	pub fn new(name: &str, id: &str, children: Vec<AccountNode>) -> Self {
		Self {
			name: name.to_string(),
			id: id.to_string(),
			children,
		}
	}

	pub fn is_leaf(&self) -> bool {
		self.children.is_empty()
	}

	/// The same account with its sub-accounts dropped.
	pub fn collapsed(&self) -> Self {
		Self::new(&self.name, &self.id, Vec::new())
	}
}

/// The flat account list, grouped by parent id.
pub struct AccountTree<'a> {
	accounts: &'a [AccountRecord],
	children_of: HashMap<&'a str, Vec<&'a AccountRecord>>,
}

impl<'a> AccountTree<'a> {
	pub fn new(accounts: &'a [AccountRecord]) -> Self {
		let mut children_of: HashMap<&str, Vec<&AccountRecord>> =
			HashMap::new();
		for account in accounts {
			if let Some(parent) = account.parent_id() {
				children_of.entry(parent).or_default().push(account);
			}
		}

		Self {
			accounts,
			children_of,
		}
	}

	/// Resolves the reference and builds its sub-tree. The returned
	/// candidates are non-empty when the name match was ambiguous.
	pub fn discover(
		&self,
		reference: &str,
	) -> Result<(AccountNode, Resolved), GlError> {
		let resolved = resolve_account(reference, self.accounts)?;
		let node = self.subtree(&resolved.id, &resolved.name)?;
		Ok((node, resolved))
	}

	/// Builds the node for `id`. The display name is the last segment of the
	/// qualified name.
	pub fn subtree(
		&self,
		id: &str,
		qualified_name: &str,
	) -> Result<AccountNode, GlError> {
		let name = qualified_name.rsplit(':').next().unwrap_or("").trim();
		let mut path = HashSet::from([id.to_string()]);
		let children = self.build_children(id, &mut path)?;
		Ok(AccountNode::new(name, id, children))
	}

	fn build_children(
		&self,
		parent_id: &str,
		path: &mut HashSet<String>,
	) -> Result<Vec<AccountNode>, GlError> {
		let Some(records) = self.children_of.get(parent_id) else {
			return Ok(Vec::new());
		};

		let mut kids = Vec::with_capacity(records.len());
		for record in records {
			if !path.insert(record.id.clone()) {
				return Err(GlError::CycleDetected {
					id: record.id.clone(),
				});
			}
			let children = self.build_children(&record.id, path)?;
			path.remove(&record.id);

			kids.push(AccountNode::new(&record.name, &record.id, children));
		}

		kids.sort_by(|a, b| a.name.cmp(&b.name));
		Ok(kids)
	}

	/// Accounts with no parent, ordered by type and then name.
	pub fn top_level(&self) -> Vec<&'a AccountRecord> {
		let mut top: Vec<&AccountRecord> =
			self.accounts.iter().filter(|a| !a.sub_account).collect();
		top.sort_by(|a, b| {
			(account_type(a), &a.name).cmp(&(account_type(b), &b.name))
		});
		top
	}

	pub fn len(&self) -> usize {
		self.accounts.len()
	}

	/// Number of accounts anywhere below `id`.
	pub fn count_descendants(&self, id: &str) -> Result<usize, GlError> {
		let mut path = HashSet::from([id.to_string()]);
		Ok(count_nodes(&self.build_children(id, &mut path)?))
	}
}

pub fn account_type(account: &AccountRecord) -> &str {
	account.account_type.as_deref().unwrap_or("Other")
}

fn count_nodes(nodes: &[AccountNode]) -> usize {
	nodes.iter().map(|n| 1 + count_nodes(&n.children)).sum()
}
