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
use serde::Serialize;

/// Name given to a headerless section until it is folded into its parent.
/// Only survives at the top level of a report, where there is no parent.
pub const ANONYMOUS_SECTION: &str = "__direct__";

/// One posting line from the report. Serializes with the key names the JSON
/// output uses.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GlTransaction {
	pub date: String,
	#[serde(rename = "type")]
	pub txn_type: String,
	#[serde(rename = "id")]
	pub txn_id: String,
	pub num: String,
	pub customer: String,
	pub memo: String,
	pub account: String,
	pub amount: f64,
}

/// A named grouping in a General Ledger report, usually one per account.
///
/// The direct fields hold only this section's own transactions. Totals over
/// the subtree are recomputed on every call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlSection {
	pub name: String,
	pub id: String,
	pub direct_amount: f64,
	pub direct_count: usize,
	pub children: Vec<GlSection>,
	pub transactions: Vec<GlTransaction>,
}

impl GlSection {
	pub fn new(name: &str, id: &str) -> Self {
		Self {
			name: name.to_string(),
			id: id.to_string(),
			..Default::default()
		}
	}

	pub fn anonymous(id: &str) -> Self {
		Self::new(ANONYMOUS_SECTION, id)
	}

	pub fn is_anonymous(&self) -> bool {
		self.name == ANONYMOUS_SECTION
	}

	/// Direct amount plus the totals of every section below.
	pub fn total_amount(&self) -> f64 {
		self.direct_amount
			+ self.children.iter().map(|c| c.total_amount()).sum::<f64>()
	}

	pub fn total_count(&self) -> usize {
		self.direct_count
			+ self.children.iter().map(|c| c.total_count()).sum::<usize>()
	}

	/// Own transactions first, then each child's, depth first.
	pub fn all_transactions(&self) -> Vec<&GlTransaction> {
		let mut out: Vec<&GlTransaction> = self.transactions.iter().collect();
		for child in &self.children {
			out.extend(child.all_transactions());
		}
		out
	}

	pub fn push_transaction(&mut self, txn: GlTransaction) {
		self.direct_amount += txn.amount;
		self.direct_count += 1;
		self.transactions.push(txn);
	}

	/// Folds another section's direct activity into this one. Its children,
	/// if any, are dropped.
	pub fn absorb(&mut self, other: GlSection) {
		self.direct_amount += other.direct_amount;
		self.direct_count += other.direct_count;
		self.transactions.extend(other.transactions);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn txn(date: &str, amount: f64) -> GlTransaction {
		GlTransaction {
			date: date.to_string(),
			amount,
			..Default::default()
		}
	}

	#[test]
	fn test_total_amount_leaf() {
		let mut s = GlSection::new("Test", "1");
		s.direct_amount = 100.0;
		assert_eq!(s.total_amount(), 100.0);
	}

	#[test]
	fn test_total_amount_with_children() {
		let mut parent = GlSection::new("Parent", "1");
		parent.direct_amount = 50.0;
		let mut child = GlSection::new("Child", "2");
		child.direct_amount = 30.0;
		parent.children = vec![child];
		assert_eq!(parent.total_amount(), 80.0);
	}

	#[test]
	fn test_total_is_direct_plus_children_at_depth() {
		let mut leaf = GlSection::new("Leaf", "3");
		leaf.direct_amount = 7.5;
		leaf.direct_count = 2;
		let mut mid = GlSection::new("Mid", "2");
		mid.direct_amount = -2.5;
		mid.direct_count = 1;
		mid.children = vec![leaf];
		let mut top = GlSection::new("Top", "1");
		top.direct_amount = 10.0;
		top.direct_count = 4;
		top.children = vec![mid.clone(), GlSection::new("Empty", "4")];

		let by_children: f64 =
			top.children.iter().map(|c| c.total_amount()).sum();
		assert_eq!(top.total_amount(), top.direct_amount + by_children);
		assert_eq!(top.total_amount(), 15.0);
		assert_eq!(mid.total_amount(), 5.0);
		assert_eq!(top.total_count(), 7);
	}

	#[test]
	fn test_total_count() {
		let mut parent = GlSection::new("Parent", "1");
		parent.direct_count = 2;
		let mut child = GlSection::new("Child", "2");
		child.direct_count = 3;
		parent.children = vec![child];
		assert_eq!(parent.total_count(), 5);
	}

	#[test]
	fn test_all_transactions() {
		let mut parent = GlSection::new("Parent", "1");
		parent.transactions = vec![txn("2025-01-01", 100.0)];
		let mut child = GlSection::new("Child", "2");
		child.transactions = vec![txn("2025-02-01", 200.0)];
		parent.children = vec![child];

		let all = parent.all_transactions();
		assert_eq!(all.len(), 2);
		assert_eq!(all[0].date, "2025-01-01");
		assert_eq!(all[1].date, "2025-02-01");
	}

	#[test]
	fn test_absorb() {
		let mut section = GlSection::new("Revenue", "100");
		section.push_transaction(txn("2025-01-01", 10.0));

		let mut anon = GlSection::anonymous("");
		anon.push_transaction(txn("2025-01-02", -2.0));
		anon.push_transaction(txn("2025-01-03", -3.0));
		assert!(anon.is_anonymous());

		section.absorb(anon);
		assert_eq!(section.direct_count, 3);
		assert_eq!(section.direct_amount, 5.0);
		assert_eq!(section.transactions.len(), 3);
	}

	#[test]
	fn test_transaction_serializes_with_report_keys() {
		let t = GlTransaction {
			date: "2025-01-15".to_string(),
			txn_type: "Invoice".to_string(),
			txn_id: "5001".to_string(),
			num: "1001".to_string(),
			customer: "Acme Corp".to_string(),
			memo: "Test memo".to_string(),
			account: "Revenue".to_string(),
			amount: 5000.0,
		};
		let v = serde_json::to_value(&t).unwrap();
		assert_eq!(
			v,
			serde_json::json!({
				"date": "2025-01-15",
				"type": "Invoice",
				"id": "5001",
				"num": "1001",
				"customer": "Acme Corp",
				"memo": "Test memo",
				"account": "Revenue",
				"amount": 5000.0,
			})
		);
	}
}
