/* Copyright © 2024-2025 Adam Train <adam@adamtrain.net>
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
use crate::gl::section::GlTransaction;
use crate::gl::subtotal::Subtotal;
use crate::reports::format::format_amount;
use crate::reports::table::Table;

pub struct LedgerReporter<'a> {
	transactions: Vec<&'a GlTransaction>,
}

impl<'a> LedgerReporter<'a> {
	pub fn new(mut transactions: Vec<&'a GlTransaction>) -> Self {
		transactions.sort_by(|a, b| a.date.cmp(&b.date));

		Self { transactions }
	}

	pub fn transactions(&self) -> &[&'a GlTransaction] {
		&self.transactions
	}

	pub fn total(&self) -> Subtotal {
		self.transactions
			.iter()
			.fold(Subtotal::zero(), |acc, t| acc + Subtotal::new(t.amount, 1))
	}

	/// Lists every transaction by date, memo underneath where there is one,
	/// then the sum and count.
	pub fn lines(&self, currency: &str) -> Vec<String> {
		if self.transactions.is_empty() {
			return vec!["No data".to_string()];
		}

		let mut table = Table::new(4);
		table.right_align(vec![2]);
		table.add_header(vec!["Date", "Type", "Amount", "Account"]);
		table.add_separator();

		for txn in &self.transactions {
			table.add_row(vec![
				&txn.date,
				&txn.txn_type,
				&format_amount(txn.amount, currency),
				&txn.account,
			]);
			if !txn.memo.is_empty() {
				table.add_note(&txn.memo);
			}
		}

		let total = self.total();
		table.add_separator();
		table.add_row(vec![
			"",
			"Total",
			&format_amount(total.amount, currency),
			&format!("{} transactions", total.count),
		]);

		table.render()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn txn(date: &str, typ: &str, memo: &str, amount: f64) -> GlTransaction {
		GlTransaction {
			date: date.to_string(),
			txn_type: typ.to_string(),
			memo: memo.to_string(),
			account: "Checking".to_string(),
			amount,
			..Default::default()
		}
	}

	#[test]
	fn test_sorted_with_memo_and_footer() {
		let a = txn("2025-03-01", "Deposit", "", 1200.0);
		let b = txn("2025-01-15", "Invoice", "retainer", 50.5);
		let reporter = LedgerReporter::new(vec![&a, &b]);

		assert_eq!(reporter.total(), Subtotal::new(1250.5, 2));
		assert_eq!(
			reporter.lines("$"),
			vec![
				"   Date       Type      Amount        Account",
				"-------------------------------------------------",
				"2025-01-15   Invoice      $50.50   Checking",
				"             retainer",
				"2025-03-01   Deposit   $1,200.00   Checking",
				"-------------------------------------------------",
				"             Total     $1,250.50   2 transactions",
			]
		);
	}

	#[test]
	fn test_no_transactions() {
		let reporter = LedgerReporter::new(Vec::new());
		assert_eq!(reporter.lines(""), vec!["No data"]);
		assert_eq!(reporter.total(), Subtotal::zero());
	}
}
