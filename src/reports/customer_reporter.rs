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
use crate::gl::section::GlTransaction;
use crate::gl::subtotal::Subtotal;
use crate::reports::format::{format_amount, pad_line};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

pub const NO_CUSTOMER: &str = "(no customer)";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CustomerTotal {
	pub customer: String,
	pub amount: f64,
	pub count: usize,
}

/// Subtotals of a set of transactions per customer, largest first.
pub struct CustomerReporter {
	groups: Vec<CustomerTotal>,
}

impl CustomerReporter {
	pub fn new(transactions: &[&GlTransaction]) -> Self {
		let mut totals: HashMap<&str, Subtotal> = HashMap::new();
		for txn in transactions {
			let customer = if txn.customer.trim().is_empty() {
				NO_CUSTOMER
			} else {
				txn.customer.as_str()
			};
			*totals.entry(customer).or_default() += Subtotal::new(txn.amount, 1);
		}

		let mut groups: Vec<CustomerTotal> = totals
			.into_iter()
			.map(|(customer, s)| CustomerTotal {
				customer: customer.to_string(),
				amount: s.amount,
				count: s.count,
			})
			.collect();

		// descending by absolute amount, then by name so ties are stable
		groups.sort_by(|a, b| {
			match b.amount.abs().partial_cmp(&a.amount.abs()) {
				Some(Ordering::Equal) | None => a.customer.cmp(&b.customer),
				Some(other) => other,
			}
		});

		Self { groups }
	}

	pub fn groups(&self) -> &[CustomerTotal] {
		&self.groups
	}

	pub fn total(&self) -> Subtotal {
		self.groups
			.iter()
			.fold(Subtotal::zero(), |acc, g| {
				acc + Subtotal::new(g.amount, g.count)
			})
	}

	pub fn lines(&self, currency: &str) -> Vec<String> {
		if self.groups.is_empty() {
			return vec!["No data".to_string()];
		}

		let mut lines: Vec<String> = self
			.groups
			.iter()
			.map(|g| {
				pad_line(
					&format!("{} ({})", g.customer, g.count),
					&format_amount(g.amount, currency),
					"",
				)
			})
			.collect();

		let total = self.total();
		lines.push(String::new());
		lines.push(pad_line(
			&format!("TOTAL ({})", total.count),
			&format_amount(total.amount, currency),
			"",
		));
		lines
	}
}
