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
use crate::reports::customer_reporter::CustomerTotal;
use serde::Serialize;

/// Top-level document for `--json` tree output.
#[derive(Debug, Serialize)]
pub struct ReportDocument {
	pub start_date: String,
	pub end_date: String,
	pub method: String,
	pub account: AccountJson,
	pub total: f64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub customer: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub customer_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AccountJson {
	pub name: String,
	pub id: String,
	#[serde(flatten)]
	pub amounts: AmountsJson,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub transactions: Option<Vec<GlTransaction>>,
}

/// Leaves report their full rollup; accounts with sub-accounts report their
/// own activity and the rollup separately.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AmountsJson {
	Leaf {
		amount: f64,
		count: usize,
	},
	Branch {
		direct_amount: f64,
		direct_count: usize,
		total_amount: f64,
		total_count: usize,
		children: Vec<AccountJson>,
	},
}

#[derive(Debug, Serialize)]
pub struct TransactionsDocument<'a> {
	pub transactions: &'a [&'a GlTransaction],
	pub total: f64,
	pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct CustomersDocument<'a> {
	pub customers: &'a [CustomerTotal],
	pub total: f64,
	pub count: usize,
}

/// Builds the structured form of an account tree, matching each account to
/// its section the same way the text reports do.
pub struct JsonReporter<'r> {
	index: &'r SectionIndex<'r>,
	with_transactions: bool,
}

impl<'r> JsonReporter<'r> {
	pub fn new(index: &'r SectionIndex<'r>, with_transactions: bool) -> Self {
		Self {
			index,
			with_transactions,
		}
	}

	pub fn account(&self, node: &AccountNode) -> AccountJson {
		let section = section_for(self.index, node);

		let (amounts, transactions) = if node.is_leaf() {
			let total = Subtotal::total(section);
			(
				AmountsJson::Leaf {
					amount: total.amount,
					count: total.count,
				},
				// matches the leaf's total, which includes sub-sections
				section.map(|s| s.all_transactions()),
			)
		} else {
			let own = Subtotal::direct(section);
			let rollup = subtotal(self.index, node);
			(
				AmountsJson::Branch {
					direct_amount: own.amount,
					direct_count: own.count,
					total_amount: rollup.amount,
					total_count: rollup.count,
					children: node
						.children
						.iter()
						.map(|c| self.account(c))
						.collect(),
				},
				section.map(|s| s.transactions.iter().collect()),
			)
		};

		let transactions = if self.with_transactions {
			Some(
				transactions
					.unwrap_or_default()
					.into_iter()
					.cloned()
					.collect(),
			)
		} else {
			None
		};

		AccountJson {
			name: node.name.clone(),
			id: node.id.clone(),
			amounts,
			transactions,
		}
	}
}
