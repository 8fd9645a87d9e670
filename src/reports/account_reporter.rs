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
use crate::gl::account_tree::{account_type, AccountNode, AccountTree};
use crate::gl::error::GlError;

/// Chart-of-accounts views for exploring which account to report on.
pub struct AccountReporter<'t, 'a> {
	tree: &'t AccountTree<'a>,
}

impl<'t, 'a> AccountReporter<'t, 'a> {
	pub fn new(tree: &'t AccountTree<'a>) -> Self {
		Self { tree }
	}

	/// Top-level accounts grouped under their account type, each with the
	/// number of accounts beneath it.
	pub fn listing(&self) -> Result<Vec<String>, GlError> {
		let top = self.tree.top_level();
		let mut lines = Vec::new();
		let mut current_type: Option<&str> = None;

		for account in &top {
			let kind = account_type(account);
			if current_type != Some(kind) {
				if current_type.is_some() {
					lines.push(String::new());
				}
				lines.push(format!("── {} ──", kind));
				current_type = Some(kind);
			}

			let descendants = self.tree.count_descendants(&account.id)?;
			let suffix = if descendants > 0 {
				format!("  ({} sub-accounts)", descendants)
			} else {
				String::new()
			};
			lines.push(format!("  {:>15}  {}{}", account.id, account.name, suffix));
		}

		lines.push(String::new());
		lines.push(format!(
			"{} top-level accounts, {} total",
			top.len(),
			self.tree.len()
		));
		Ok(lines)
	}
}

/// One line per account, children marked and indented under their parent.
pub fn tree_lines(node: &AccountNode) -> Vec<String> {
	let mut lines = Vec::new();
	push_node(node, 0, &mut lines);
	lines
}

fn push_node(node: &AccountNode, indent: usize, lines: &mut Vec<String>) {
	let marker = if indent > 0 { "└─ " } else { "" };
	lines.push(format!(
		"{}{}{} (ID: {})",
		"  ".repeat(indent),
		marker,
		node.name,
		node.id
	));
	for child in &node.children {
		push_node(child, indent + 1, lines);
	}
}
