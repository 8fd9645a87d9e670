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
use crate::gl::account_tree::AccountNode;
use crate::gl::index::SectionIndex;
use crate::gl::section::GlTransaction;
use crate::gl::subtotal::{section_for, subtotal, Subtotal};
use crate::reports::format::{format_amount, pad_line, truncate};

const TYPE_WIDTH: usize = 12;
const MEMO_WIDTH: usize = 40;

/// Renders an account tree with a subtotal for every account, optionally
/// listing each account's transactions beneath its amount.
///
/// e.g.
///     Revenue (1)                                                -500.00
///       Consulting Revenue (3)                                 15,700.00
///       Product Revenue (1)                                    12,000.00
///     Total for Revenue                                        27,200.00
///
/// Accounts with neither amount nor transactions are left out entirely.
pub struct TreeReporter<'r> {
	index: &'r SectionIndex<'r>,
	currency: String,
	expand: bool,
}

impl<'r> TreeReporter<'r> {
	pub fn new(index: &'r SectionIndex<'r>, currency: &str) -> Self {
		Self {
			index,
			currency: currency.to_string(),
			expand: false,
		}
	}

	/// Also list transactions, oldest first, under each amount line.
	pub fn expanded(mut self) -> Self {
		self.expand = true;
		self
	}

	pub fn lines(&self, root: &AccountNode) -> Vec<String> {
		let mut lines = Vec::new();
		self.render_recursive(root, 0, &mut lines);
		lines
	}

	fn render_recursive(
		&self,
		node: &AccountNode,
		indent: usize,
		lines: &mut Vec<String>,
	) {
		let prefix = "  ".repeat(indent);
		let section = section_for(self.index, node);

		if node.is_leaf() {
			let total = Subtotal::total(section);
			if total.is_empty() {
				return;
			}
			lines.push(self.amount_line(
				&format!("{} ({})", node.name, total.count),
				total.amount,
				&prefix,
			));
			// a leaf reports its section's full total, so it lists every
			// transaction that total counts, including those of sub-sections
			if let Some(section) = section {
				self.push_transactions(section.all_transactions(), indent, lines);
			}
			return;
		}

		let rollup = subtotal(self.index, node);
		if rollup.is_empty() {
			return;
		}

		let own = Subtotal::direct(section);
		match section {
			Some(section) if own.count > 0 => {
				lines.push(self.amount_line(
					&format!("{} ({})", node.name, own.count),
					own.amount,
					&prefix,
				));
				self.push_transactions(
					section.transactions.iter().collect(),
					indent,
					lines,
				);
			},
			_ => lines.push(format!("{}{}", prefix, node.name)),
		}

		for child in &node.children {
			self.render_recursive(child, indent + 1, lines);
		}

		lines.push(self.amount_line(
			&format!("Total for {}", node.name),
			rollup.amount,
			&prefix,
		));
	}

	fn push_transactions(
		&self,
		mut txns: Vec<&GlTransaction>,
		indent: usize,
		lines: &mut Vec<String>,
	) {
		if !self.expand {
			return;
		}

		txns.sort_by(|a, b| a.date.cmp(&b.date));
		let prefix = "  ".repeat(indent + 1);
		for txn in txns {
			let label = format!(
				"{}  {:<width$}  {}",
				txn.date,
				txn.txn_type,
				truncate(&txn.memo, MEMO_WIDTH),
				width = TYPE_WIDTH
			);
			lines.push(self.amount_line(label.trim_end(), txn.amount, &prefix));
		}
	}

	fn amount_line(&self, label: &str, amount: f64, prefix: &str) -> String {
		pad_line(label, &format_amount(amount, &self.currency), prefix)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::gl::rows::tests::gl_fixture;
	use crate::gl::rows::GlReport;
	use crate::gl::section::GlSection;

	fn leaf(name: &str, id: &str) -> AccountNode {
		AccountNode::new(name, id, Vec::new())
	}

	fn revenue_tree() -> AccountNode {
		AccountNode::new(
			"Revenue",
			"100",
			vec![
				leaf("Consulting Revenue", "101"),
				leaf("Grants", "150"),
				leaf("Product Revenue", "102"),
			],
		)
	}

	fn sections() -> Vec<GlSection> {
		GlReport::from_value(gl_fixture()).unwrap().sections().unwrap()
	}

	fn line(label: &str, amount: &str) -> String {
		pad_line(label, amount, "")
	}

	fn indented(label: &str, amount: &str) -> String {
		pad_line(label, amount, "  ")
	}

	#[test]
	fn test_tree_lines() {
		let s = sections();
		let idx = SectionIndex::new(&s);
		let lines = TreeReporter::new(&idx, "").lines(&revenue_tree());

		assert_eq!(
			lines,
			vec![
				line("Revenue (1)", "-500.00"),
				indented("Consulting Revenue (3)", "15,700.00"),
				indented("Product Revenue (1)", "12,000.00"),
				line("Total for Revenue", "27,200.00"),
			]
		);
		assert!(lines.iter().all(|l| l.chars().count() == 72));
	}

	#[test]
	fn test_branch_without_direct_activity_gets_bare_header() {
		let s = sections();
		let idx = SectionIndex::new(&s);
		let tree = AccountNode::new(
			"Income",
			"1",
			vec![leaf("Product Revenue", "102")],
		);
		let lines = TreeReporter::new(&idx, "USD").lines(&tree);
		assert_eq!(
			lines,
			vec![
				"Income".to_string(),
				indented("Product Revenue (1)", "USD12,000.00"),
				line("Total for Income", "USD12,000.00"),
			]
		);
	}

	#[test]
	fn test_inactive_accounts_are_omitted() {
		let s = sections();
		let idx = SectionIndex::new(&s);
		let tree = AccountNode::new("Dormant", "7", vec![leaf("Unused", "8")]);
		assert!(TreeReporter::new(&idx, "").lines(&tree).is_empty());
	}

	#[test]
	fn test_expanded_lines() {
		let s = sections();
		let idx = SectionIndex::new(&s);
		let lines = TreeReporter::new(&idx, "")
			.expanded()
			.lines(&revenue_tree());

		assert_eq!(lines.len(), 4 + 5);
		assert_eq!(lines[0], line("Revenue (1)", "-500.00"));
		assert_eq!(
			lines[1],
			indented("2025-06-01  Journal Entry  Reclass", "-500.00")
		);
		assert_eq!(lines[2], indented("Consulting Revenue (3)", "15,700.00"));
		assert_eq!(
			lines[3],
			pad_line("2025-01-15  Invoice       January retainer", "5,000.00", "    ")
		);
		assert_eq!(
			lines[5],
			pad_line("2025-03-10  Sales Receipt", "5,500.00", "    ")
		);
		assert_eq!(lines[8], line("Total for Revenue", "27,200.00"));
	}

	#[test]
	fn test_collapsed_leaf_lists_every_counted_transaction() {
		let s = sections();
		let idx = SectionIndex::new(&s);
		let lines = TreeReporter::new(&idx, "")
			.expanded()
			.lines(&leaf("Revenue", "100"));

		assert_eq!(lines.len(), 1 + 5);
		assert_eq!(lines[0], line("Revenue (5)", "27,200.00"));
		assert_eq!(
			lines[1],
			indented("2025-01-15  Invoice       January retainer", "5,000.00")
		);
		assert_eq!(
			lines[5],
			indented("2025-06-01  Journal Entry  Reclass", "-500.00")
		);
	}
}
