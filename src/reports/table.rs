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
/// Column-aligned table for reports that list many single-line records,
/// such as the transaction ledger. Rendered into lines rather than printed,
/// so callers can frame it.
///
/// Not for the account tree, which has its own fixed-width layout.
pub struct Table {
	column_count: usize,
	rows: Vec<Row>,
	right_align: Vec<bool>, // indicates columns by index
}

pub enum Row {
	Header(Vec<String>),
	Data(Vec<String>),
	/// Free text under the second column, continuing the row above.
	Note(String),
	Separator,
}

const COLUMN_GAP: &str = "   ";

impl Table {
	pub fn new(column_count: usize) -> Self {
		Self {
			column_count,
			rows: Vec::new(),
			right_align: vec![false; column_count],
		}
	}

	/// Adds a header row.
	pub fn add_header(&mut self, row: Vec<&str>) {
		self.rows.push(Row::Header(
			row.into_iter().map(|s| s.to_string()).collect(),
		));
	}

	/// Adds a data row.
	pub fn add_row(&mut self, row: Vec<&str>) {
		self.rows
			.push(Row::Data(row.into_iter().map(|s| s.to_string()).collect()));
	}

	pub fn add_note(&mut self, text: &str) {
		self.rows.push(Row::Note(text.to_string()));
	}

	/// Adds a full separator row.
	pub fn add_separator(&mut self) {
		self.rows.push(Row::Separator);
	}

	/// Specifies columns that should be right-aligned by index.
	pub fn right_align(&mut self, cols: Vec<usize>) {
		for col in cols {
			self.right_align[col] = true;
		}
	}

	pub fn render(&self) -> Vec<String> {
		let mut max_widths = vec![0; self.column_count];

		// Calculate maximum column widths for proper spacing
		for row in &self.rows {
			if let Row::Data(data_row) | Row::Header(data_row) = row {
				for (i, value) in data_row.iter().enumerate() {
					max_widths[i] = max_widths[i].max(value.chars().count());
				}
			}
		}

		self.rows
			.iter()
			.map(|row| match row {
				Row::Header(header_row) => {
					self.render_centered_row(&max_widths, header_row)
				},
				Row::Data(data_row) => {
					self.render_data_row(&max_widths, data_row)
				},
				Row::Note(text) => {
					let indent = max_widths[0] + COLUMN_GAP.len();
					format!("{}{}", " ".repeat(indent), text)
				},
				Row::Separator => self.render_separator(&max_widths),
			})
			.map(|line| line.trim_end().to_string())
			.collect()
	}

	fn render_data_row(
		&self,
		max_widths: &[usize],
		data_row: &[String],
	) -> String {
		data_row
			.iter()
			.enumerate()
			.map(|(i, value)| {
				if self.right_align[i] {
					format!("{:>width$}", value, width = max_widths[i])
				} else {
					format!("{:<width$}", value, width = max_widths[i])
				}
			})
			.collect::<Vec<String>>()
			.join(COLUMN_GAP)
	}

	fn render_centered_row(
		&self,
		max_widths: &[usize],
		data_row: &[String],
	) -> String {
		data_row
			.iter()
			.enumerate()
			.map(|(i, value)| Table::center_align(value, max_widths[i]))
			.collect::<Vec<String>>()
			.join(COLUMN_GAP)
	}

	fn render_separator(&self, max_widths: &[usize]) -> String {
		let total_width: usize = max_widths.iter().sum::<usize>()
			+ (COLUMN_GAP.len() * (self.column_count - 1));
		"-".repeat(total_width)
	}

	fn center_align(value: &str, width: usize) -> String {
		let len = value.chars().count();
		if len >= width {
			return value.to_string();
		}
		let total_padding = width - len;
		let left_padding = total_padding / 2;
		let right_padding = total_padding - left_padding;

		format!(
			"{}{}{}",
			" ".repeat(left_padding),
			value,
			" ".repeat(right_padding)
		)
	}
}
