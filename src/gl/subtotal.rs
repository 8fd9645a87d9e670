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
use crate::gl::section::{GlSection, GlTransaction};
use std::ops::{Add, AddAssign};

/// Rolled-up amount and transaction count for one account.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Subtotal {
	pub amount: f64,
	pub count: usize,
}

impl Subtotal {
	pub fn new(amount: f64, count: usize) -> Self {
		Self { amount, count }
	}

	pub fn zero() -> Self {
		Default::default()
	}

	/// Nothing booked at all; such accounts are left out of reports.
	pub fn is_empty(&self) -> bool {
		self.count == 0 && self.amount == 0.0
	}

	pub fn direct(section: Option<&GlSection>) -> Self {
		section
			.map(|s| Self::new(s.direct_amount, s.direct_count))
			.unwrap_or_default()
	}

	pub fn total(section: Option<&GlSection>) -> Self {
		section
			.map(|s| Self::new(s.total_amount(), s.total_count()))
			.unwrap_or_default()
	}
}

impl Add for Subtotal {
	type Output = Subtotal;
	fn add(self, rhs: Self) -> Self::Output {
		Subtotal::new(self.amount + rhs.amount, self.count + rhs.count)
	}
}

impl AddAssign for Subtotal {
	fn add_assign(&mut self, rhs: Self) {
		*self = *self + rhs;
	}
}

/// Looks up the section matching an account node.
pub fn section_for<'a>(
	index: &SectionIndex<'a>,
	node: &AccountNode,
) -> Option<&'a GlSection> {
	index.find(&node.name, Some(&node.id))
}

/// Computes the rollup for an account.
///
/// The account tree and the report's section tree need not have the same
/// shape: the report only lists accounts with activity, and may nest them
/// differently. So each account node is matched to its section on its own.
/// A leaf account takes everything under its section. An account with
/// sub-accounts takes only its section's direct activity and adds its
/// sub-accounts' rollups, so nothing is counted twice. Accounts with no
/// section contribute zero.
pub fn subtotal(index: &SectionIndex, node: &AccountNode) -> Subtotal {
	let section = section_for(index, node);
	if node.is_leaf() {
		return Subtotal::total(section);
	}

	node.children
		.iter()
		.fold(Subtotal::direct(section), |acc, child| {
			acc + subtotal(index, child)
		})
}

/// Every transaction booked under an account. An account with a matching
/// section takes all transactions beneath that section; one without looks
/// through its sub-accounts instead.
pub fn transactions_for<'a>(
	index: &SectionIndex<'a>,
	node: &AccountNode,
) -> Vec<&'a GlTransaction> {
	match section_for(index, node) {
		Some(section) => section.all_transactions(),
		None => node
			.children
			.iter()
			.flat_map(|child| transactions_for(index, child))
			.collect(),
	}
}
