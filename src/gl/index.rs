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
use crate::gl::section::GlSection;
use std::collections::HashMap;

/// Lookup over every section of a parsed report, built once so rendering
/// does not search the tree for each account.
///
/// Names and ids live in separate maps, so an id can never shadow a name or
/// the other way around. When a name appears twice, the later section in
/// report order wins.
#[derive(Debug, Default)]
pub struct SectionIndex<'a> {
	by_id: HashMap<&'a str, &'a GlSection>,
	by_name: HashMap<&'a str, &'a GlSection>,
	ordered: Vec<&'a GlSection>, // pre-order, for suffix scans
}

impl<'a> SectionIndex<'a> {
	pub fn new(sections: &'a [GlSection]) -> Self {
		let mut index = Self::default();
		for section in sections {
			index.insert_tree(section);
		}
		index
	}

	fn insert_tree(&mut self, section: &'a GlSection) {
		self.insert(section);
		for child in &section.children {
			self.insert_tree(child);
		}
	}

	/// Adds a single section (not its children) under its name and id.
	pub fn insert(&mut self, section: &'a GlSection) {
		if !section.name.is_empty() {
			self.by_name.insert(section.name.as_str(), section);
		}
		if !section.id.is_empty() {
			self.by_id.insert(section.id.as_str(), section);
		}
		self.ordered.push(section);
	}

	/// Resolves an account to its section: the id when given and known,
	/// then the exact name, then the first section whose name ends with
	/// " {name}" (ledger labels prefixed with an account number).
	pub fn find(&self, name: &str, id: Option<&str>) -> Option<&'a GlSection> {
		if let Some(id) = id.filter(|i| !i.is_empty()) {
			if let Some(section) = self.by_id.get(id) {
				return Some(*section);
			}
		}

		if let Some(section) = self.by_name.get(name) {
			return Some(*section);
		}

		if name.is_empty() {
			return None;
		}
		let suffix = format!(" {}", name);
		self.ordered
			.iter()
			.find(|s| s.name.ends_with(&suffix))
			.copied()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sections() -> Vec<GlSection> {
		let mut parent = GlSection::new("Revenue", "100");
		parent.children = vec![GlSection::new("Consulting Revenue", "101")];
		vec![parent]
	}

	#[test]
	fn test_name_and_id_lookup() {
		let s = sections();
		let idx = SectionIndex::new(&s);
		assert!(idx.by_name.contains_key("Revenue"));
		assert!(idx.by_id.contains_key("100"));
		assert_eq!(idx.find("Revenue", None).unwrap().id, "100");
	}

	#[test]
	fn test_nested_children_indexed() {
		let s = sections();
		let idx = SectionIndex::new(&s);
		assert!(idx.by_name.contains_key("Consulting Revenue"));
		assert!(idx.by_id.contains_key("101"));
		assert_eq!(idx.find("", Some("101")).unwrap().name, "Consulting Revenue");
	}

	#[test]
	fn test_id_preferred_over_name() {
		let s = sections();
		let idx = SectionIndex::new(&s);
		let found = idx.find("Revenue", Some("101")).unwrap();
		assert_eq!(found.id, "101");
		assert_eq!(found.name, "Consulting Revenue");
	}

	#[test]
	fn test_unknown_id_falls_back_to_name() {
		let s = sections();
		let idx = SectionIndex::new(&s);
		assert_eq!(idx.find("Revenue", Some("555")).unwrap().id, "100");
		assert_eq!(idx.find("Revenue", Some("")).unwrap().id, "100");
	}

	#[test]
	fn test_suffix_match() {
		let s = sections();
		let other = GlSection::new("Other Consulting", "103");
		let mut idx = SectionIndex::new(&s);
		idx.insert(&other);

		let found = idx.find("Consulting", None).unwrap();
		assert_eq!(found.name, "Other Consulting");
	}

	#[test]
	fn test_numbered_label_suffix() {
		let s = vec![GlSection::new("4000 Consulting Revenue", "")];
		let idx = SectionIndex::new(&s);
		assert_eq!(
			idx.find("Consulting Revenue", None).unwrap().name,
			"4000 Consulting Revenue"
		);
		// no partial-word matches
		assert!(idx.find("Revenue Extra", None).is_none());
		assert!(idx.find("onsulting Revenue", None).is_none());
	}

	#[test]
	fn test_miss_returns_none() {
		let s = sections();
		let idx = SectionIndex::new(&s);
		assert!(idx.find("Nonexistent", Some("999")).is_none());
		assert!(idx.find("", None).is_none());
	}
}
