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
use crate::gl::error::GlError;
use crate::gl::section::{GlSection, GlTransaction};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

const BEGINNING_BALANCE: &str = "Beginning Balance";

/// Data rows need this many cells to reach the amount column.
const MIN_COLUMNS: usize = 7;
const AMOUNT_COLUMN: usize = 6;

// -------------
// -- PAYLOAD --
// -------------

/// A GeneralLedger report as returned by the accounting API.
#[derive(Debug, Default, Deserialize)]
pub struct GlReport {
	#[serde(rename = "Header", default)]
	pub header: ReportHeader,
	#[serde(rename = "Rows", default)]
	pub rows: Option<Rows>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportHeader {
	#[serde(rename = "Option", default)]
	pub options: Vec<ReportOption>,
	#[serde(rename = "StartPeriod")]
	pub start_period: Option<String>,
	#[serde(rename = "EndPeriod")]
	pub end_period: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportOption {
	#[serde(rename = "Name", default)]
	pub name: String,
	#[serde(rename = "Value", default)]
	pub value: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Rows {
	#[serde(rename = "Row", default, deserialize_with = "lenient_rows")]
	pub row: Vec<Row>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum Row {
	Section {
		#[serde(rename = "Header", default)]
		header: Option<Header>,
		#[serde(rename = "Rows", default)]
		rows: Option<Rows>,
	},
	Data {
		#[serde(rename = "ColData", default)]
		cols: Vec<ColData>,
	},
	#[serde(other)]
	Other,
}

#[derive(Debug, Default, Deserialize)]
pub struct Header {
	#[serde(rename = "ColData", default)]
	pub cols: Vec<ColData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ColData {
	#[serde(default, deserialize_with = "cell_text")]
	pub value: String,
	#[serde(default, deserialize_with = "cell_id")]
	pub id: Option<String>,
}

/// Cells are read as text whatever their JSON type. Null reads as empty.
fn cell_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Value::deserialize(deserializer)? {
		Value::Null => String::new(),
		Value::String(s) => s,
		other => other.to_string(),
	})
}

fn cell_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Value::deserialize(deserializer)? {
		Value::Null => None,
		Value::String(s) => Some(s),
		other => Some(other.to_string()),
	})
}

impl Header {
	/// The section label and account id, both from the first cell.
	fn label(&self) -> (String, String) {
		match self.cols.first() {
			Some(col) => (
				col.value.trim().to_string(),
				col.id.clone().unwrap_or_default(),
			),
			None => (String::new(), String::new()),
		}
	}
}

/// Rows the report cannot describe (no type tag, wrong shapes) are dropped
/// here so one odd row does not reject the whole payload.
fn lenient_rows<'de, D>(deserializer: D) -> Result<Vec<Row>, D::Error>
where
	D: Deserializer<'de>,
{
	let values = Option::<Vec<Value>>::deserialize(deserializer)?;
	Ok(values
		.unwrap_or_default()
		.into_iter()
		.filter_map(|v| match serde_json::from_value::<Row>(v) {
			Ok(row) => Some(row),
			Err(e) => {
				debug!("skipping unreadable report row: {}", e);
				None
			},
		})
		.collect())
}

impl GlReport {
	pub fn from_value(value: Value) -> Result<Self, anyhow::Error> {
		Ok(serde_json::from_value(value)?)
	}

	/// True when the API flagged the report as having nothing in range.
	pub fn has_no_data(&self) -> bool {
		self.header
			.options
			.iter()
			.any(|o| o.name == "NoReportData" && o.value == "true")
	}

	/// Parses the report into its top-level sections. Refuses a payload the
	/// API has marked as empty.
	pub fn sections(&self) -> Result<Vec<GlSection>, GlError> {
		if self.has_no_data() {
			return Err(GlError::NoReportData);
		}
		Ok(parse_rows(self.rows.as_ref()))
	}

	/// Earliest and latest ISO dates appearing in any data row.
	pub fn date_span(&self) -> Option<(String, String)> {
		DateScanner::new().span(self.rows.as_ref())
	}
}

// ------------
// -- PARSER --
// ------------

/// Parses a `Rows` object into its sections, in report order.
///
/// A section with an empty header holds transactions that belong to the
/// enclosing account. Those come back as anonymous placeholders, which the
/// enclosing section folds into its own direct totals. Placeholders only
/// remain in the output at the top level, where there is nothing to fold
/// them into.
pub fn parse_rows(rows: Option<&Rows>) -> Vec<GlSection> {
	let Some(rows) = rows else {
		return Vec::new();
	};

	rows.row
		.iter()
		.filter_map(|row| match row {
			Row::Section { header, rows } => {
				Some(parse_section(header.as_ref(), rows.as_ref()))
			},
			_ => None,
		})
		.collect()
}

fn parse_section(header: Option<&Header>, rows: Option<&Rows>) -> GlSection {
	let (name, id) = header.map(Header::label).unwrap_or_default();

	if name.is_empty() {
		// nested sections under a headerless one are not descended into
		let mut placeholder = GlSection::anonymous(&id);
		collect_direct(&mut placeholder, rows);
		return placeholder;
	}

	let mut section = GlSection::new(&name, &id);
	collect_direct(&mut section, rows);

	let (anonymous, named): (Vec<GlSection>, Vec<GlSection>) =
		parse_rows(rows).into_iter().partition(GlSection::is_anonymous);

	// absorbed even when empty
	for placeholder in anonymous {
		section.absorb(placeholder);
	}
	section.children = named;

	section
}

fn collect_direct(section: &mut GlSection, rows: Option<&Rows>) {
	let Some(rows) = rows else {
		return;
	};

	for row in &rows.row {
		if let Row::Data { cols } = row {
			if let Some(txn) = parse_transaction(cols) {
				section.push_transaction(txn);
			}
		}
	}
}

/// Reads one data row. Returns None for the opening balance line, rows too
/// short to carry an amount, and rows whose amount is blank or not a number.
pub fn parse_transaction(cols: &[ColData]) -> Option<GlTransaction> {
	if cols.len() < MIN_COLUMNS {
		return None;
	}
	if cols[0].value == BEGINNING_BALANCE {
		return None;
	}

	let raw_amount = cols[AMOUNT_COLUMN].value.trim();
	if raw_amount.is_empty() {
		return None;
	}
	// NaN and infinities parse as f64 but are not amounts
	let parsed = raw_amount.parse::<f64>().ok().filter(|a| a.is_finite());
	let amount = match parsed {
		Some(a) => a,
		None => {
			debug!("dropping row with non-numeric amount '{}'", raw_amount);
			return None;
		},
	};

	Some(GlTransaction {
		date: cols[0].value.clone(),
		txn_type: cols[1].value.clone(),
		txn_id: cols[1].id.clone().unwrap_or_default(),
		num: cols[2].value.clone(),
		customer: cols[3].value.clone(),
		memo: cols[4].value.clone(),
		account: cols[5].value.clone(),
		amount,
	})
}

// -----------
// -- DATES --
// -----------

struct DateScanner {
	iso_date: Regex,
}

impl DateScanner {
	fn new() -> Self {
		Self {
			iso_date: Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap(),
		}
	}

	fn span(&self, rows: Option<&Rows>) -> Option<(String, String)> {
		let mut dates = Vec::new();
		self.walk(rows, &mut dates);
		dates.sort();

		match (dates.first(), dates.last()) {
			(Some(first), Some(last)) => Some((first.clone(), last.clone())),
			_ => None,
		}
	}

	fn walk(&self, rows: Option<&Rows>, dates: &mut Vec<String>) {
		let Some(rows) = rows else {
			return;
		};

		for row in &rows.row {
			match row {
				Row::Data { cols } => {
					if let Some(first) = cols.first() {
						if self.iso_date.is_match(&first.value) {
							dates.push(first.value.clone());
						}
					}
				},
				Row::Section { rows, .. } => self.walk(rows.as_ref(), dates),
				Row::Other => {},
			}
		}
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use serde_json::json;

	const EPSILON: f64 = 1e-9;

	fn data_row(
		date: &str,
		typ: &str,
		customer: &str,
		memo: &str,
		amount: &str,
	) -> Value {
		json!({
			"type": "Data",
			"ColData": [
				{"value": date},
				{"value": typ, "id": "9"},
				{"value": ""},
				{"value": customer},
				{"value": memo},
				{"value": "Checking"},
				{"value": amount},
			]
		})
	}

	/// Revenue (100) holding Consulting Revenue (101) and Product Revenue
	/// (102) plus one headerless journal entry; Expenses with two direct rows.
	pub(crate) fn gl_fixture() -> Value {
		json!({
			"Header": {
				"StartPeriod": "2025-01-01",
				"EndPeriod": "2025-06-30",
				"Option": [{"Name": "NoReportData", "Value": "false"}]
			},
			"Rows": {"Row": [
				{
					"type": "Section",
					"Header": {"ColData": [{"value": "Revenue", "id": "100"}]},
					"Rows": {"Row": [
						{
							"type": "Section",
							"Header": {"ColData": [
								{"value": "Consulting Revenue", "id": "101"}
							]},
							"Rows": {"Row": [
								{"type": "Data", "ColData": [
									{"value": "Beginning Balance"},
									{"value": ""}, {"value": ""}, {"value": ""},
									{"value": ""}, {"value": ""}, {"value": "999.00"}
								]},
								data_row("2025-01-15", "Invoice", "Acme Corp", "January retainer", "5000.00"),
								data_row("2025-02-15", "Invoice", "Acme Corp", "February retainer", "5200.00"),
								data_row("2025-03-10", "Sales Receipt", "Globex", "", "5500.00"),
							]}
						},
						{
							"type": "Section",
							"Header": {"ColData": [
								{"value": "Product Revenue", "id": "102"}
							]},
							"Rows": {"Row": [
								data_row("2025-04-01", "Invoice", "Globex", "Widgets", "12000.00"),
							]}
						},
						{
							"type": "Section",
							"Header": {"ColData": [{"value": ""}]},
							"Rows": {"Row": [
								data_row("2025-06-01", "Journal Entry", "", "Reclass", "-500.00"),
							]}
						}
					]}
				},
				{
					"type": "Section",
					"Header": {"ColData": [{"value": "Expenses", "id": "200"}]},
					"Rows": {"Row": [
						data_row("2025-02-01", "Expense", "", "Hosting", "300.00"),
						data_row("2025-05-20", "Expense", "", "Domain", "39.99"),
						data_row("2025-05-21", "Expense", "", "Bad row", "n/a"),
					]}
				}
			]}
		})
	}

	fn fixture_sections() -> Vec<GlSection> {
		GlReport::from_value(gl_fixture()).unwrap().sections().unwrap()
	}

	fn cols(values: &[&str]) -> Vec<ColData> {
		values
			.iter()
			.map(|v| ColData {
				value: v.to_string(),
				id: None,
			})
			.collect()
	}

	#[test]
	fn test_valid_7col_row() {
		let mut c = cols(&[
			"2025-01-15",
			"Invoice",
			"1001",
			"Acme Corp",
			"Consulting",
			"Revenue",
			"5000.00",
		]);
		c[1].id = Some("5001".to_string());

		let txn = parse_transaction(&c).unwrap();
		assert_eq!(txn.date, "2025-01-15");
		assert_eq!(txn.txn_type, "Invoice");
		assert_eq!(txn.txn_id, "5001");
		assert_eq!(txn.num, "1001");
		assert_eq!(txn.customer, "Acme Corp");
		assert_eq!(txn.account, "Revenue");
		assert_eq!(txn.amount, 5000.0);
	}

	#[test]
	fn test_rows_without_transactions() {
		assert!(parse_transaction(&cols(&["Beginning Balance"])).is_none());
		assert!(parse_transaction(&cols(&["2025-01-15", "Invoice"])).is_none());
		assert!(parse_transaction(&[]).is_none());
		assert!(parse_transaction(&cols(&[
			"2025-01-15",
			"Invoice",
			"",
			"",
			"",
			"",
			""
		]))
		.is_none());
		assert!(parse_transaction(&cols(&[
			"2025-01-15",
			"Invoice",
			"",
			"",
			"",
			"",
			"not-a-number"
		]))
		.is_none());
		assert!(parse_transaction(&cols(&[
			"Beginning Balance",
			"",
			"",
			"",
			"",
			"",
			"10.00"
		]))
		.is_none());
	}

	#[test]
	fn test_nested_fixture() {
		let sections = fixture_sections();
		assert_eq!(sections.len(), 2);

		let revenue = &sections[0];
		assert_eq!(revenue.name, "Revenue");
		assert_eq!(revenue.id, "100");
		assert_eq!(revenue.children.len(), 2);
		assert_eq!(revenue.children[0].name, "Consulting Revenue");
		assert_eq!(revenue.children[1].name, "Product Revenue");
		assert_eq!(sections[1].name, "Expenses");
	}

	#[test]
	fn test_transaction_counts() {
		let sections = fixture_sections();

		let consulting = &sections[0].children[0];
		assert_eq!(consulting.direct_count, 3);
		assert!((consulting.direct_amount - 15700.0).abs() < EPSILON);

		let product = &sections[0].children[1];
		assert_eq!(product.direct_count, 1);
		assert!((product.direct_amount - 12000.0).abs() < EPSILON);
	}

	#[test]
	fn test_headerless_rows_belong_to_parent() {
		let sections = fixture_sections();
		let revenue = &sections[0];
		assert_eq!(revenue.direct_count, 1);
		assert!((revenue.direct_amount + 500.0).abs() < EPSILON);
		assert_eq!(revenue.transactions[0].txn_type, "Journal Entry");
		assert!((revenue.total_amount() - 27200.0).abs() < EPSILON);
		assert_eq!(revenue.total_count(), 5);
	}

	#[test]
	fn test_expenses_section() {
		let sections = fixture_sections();
		let expenses = &sections[1];
		assert_eq!(expenses.direct_count, 2);
		assert!((expenses.direct_amount - 339.99).abs() < EPSILON);
	}

	fn assert_no_anonymous_children(sections: &[GlSection]) {
		for s in sections {
			assert!(s.children.iter().all(|c| !c.is_anonymous()));
			assert_no_anonymous_children(&s.children);
		}
	}

	#[test]
	fn test_no_anonymous_children_remain() {
		assert_no_anonymous_children(&fixture_sections());
	}

	#[test]
	fn test_empty_anonymous_section_is_still_absorbed() {
		let report = GlReport::from_value(json!({"Rows": {"Row": [{
			"type": "Section",
			"Header": {"ColData": [{"value": "Assets", "id": "1"}]},
			"Rows": {"Row": [
				{"type": "Section", "Header": {"ColData": [{"value": "  "}]}},
				{"type": "Section", "Rows": {"Row": []}},
			]}
		}]}}))
		.unwrap();
		let sections = report.sections().unwrap();
		assert_eq!(sections.len(), 1);
		assert!(sections[0].children.is_empty());
		assert_eq!(sections[0].direct_count, 0);
	}

	#[test]
	fn test_top_level_anonymous_section_is_kept() {
		let report = GlReport::from_value(json!({"Rows": {"Row": [{
			"type": "Section",
			"Rows": {"Row": [data_row("2025-01-01", "Deposit", "", "", "12.50")]}
		}]}}))
		.unwrap();
		let sections = report.sections().unwrap();
		assert_eq!(sections.len(), 1);
		assert!(sections[0].is_anonymous());
		assert_eq!(sections[0].direct_amount, 12.5);
	}

	#[test]
	fn test_empty_rows() {
		assert!(parse_rows(None).is_empty());

		let empty: Rows = serde_json::from_value(json!({})).unwrap();
		assert!(parse_rows(Some(&empty)).is_empty());

		let no_rows: Rows = serde_json::from_value(json!({"Row": []})).unwrap();
		assert!(parse_rows(Some(&no_rows)).is_empty());

		let null_rows: Rows =
			serde_json::from_value(json!({"Row": null})).unwrap();
		assert!(parse_rows(Some(&null_rows)).is_empty());

		let report = GlReport::from_value(json!({})).unwrap();
		assert!(report.sections().unwrap().is_empty());
	}

	#[test]
	fn test_unreadable_rows_are_skipped() {
		let rows: Rows = serde_json::from_value(json!({"Row": [
			{"ColData": []},
			{"type": "Summary"},
			{"type": "Section", "Header": {"ColData": [{"value": "Kept"}]}},
		]}))
		.unwrap();
		let sections = parse_rows(Some(&rows));
		assert_eq!(sections.len(), 1);
		assert_eq!(sections[0].name, "Kept");
		assert_eq!(sections[0].id, "");
	}

	#[test]
	fn test_loosely_typed_cells_are_read() {
		let rows: Rows = serde_json::from_value(json!({"Row": [{
			"type": "Section",
			"Header": {"ColData": [
				{"value": "Revenue", "id": 100},
				{"value": null},
			]},
			"Rows": {"Row": [
				{"type": "Data", "ColData": [
					{"value": "2025-01-15"},
					{"value": "Invoice", "id": 9},
					{"value": null},
					{"value": "Acme Corp"},
					{"value": null},
					{"value": "Checking"},
					{"value": "5000.00"},
				]},
				{"type": "Data", "ColData": [
					{"value": "2025-01-16"},
					{"value": "Deposit", "id": null},
					{"value": 42},
					{},
					{"value": ""},
					{"value": "Checking"},
					{"value": 100},
				]},
			]}
		}]}))
		.unwrap();

		let sections = parse_rows(Some(&rows));
		assert_eq!(sections.len(), 1);
		let revenue = &sections[0];
		assert_eq!(revenue.name, "Revenue");
		assert_eq!(revenue.id, "100");
		assert_eq!(revenue.direct_count, 2);
		assert!((revenue.direct_amount - 5100.0).abs() < EPSILON);

		let first = &revenue.transactions[0];
		assert_eq!(first.txn_id, "9");
		assert_eq!(first.num, "");
		assert_eq!(first.memo, "");
		let second = &revenue.transactions[1];
		assert_eq!(second.txn_id, "");
		assert_eq!(second.num, "42");
		assert_eq!(second.customer, "");
	}

	#[test]
	fn test_non_finite_amounts_are_dropped() {
		for raw in ["NaN", "inf", "-infinity"] {
			let c = cols(&["2025-01-15", "Invoice", "", "", "", "", raw]);
			assert!(parse_transaction(&c).is_none(), "{} was kept", raw);
		}

		let report = GlReport::from_value(json!({"Rows": {"Row": [{
			"type": "Section",
			"Header": {"ColData": [{"value": "Sales", "id": "4"}]},
			"Rows": {"Row": [
				data_row("2025-01-01", "Invoice", "", "", "250.00"),
				data_row("2025-01-02", "Invoice", "", "", "NaN"),
			]}
		}]}}))
		.unwrap();
		let sections = report.sections().unwrap();
		assert_eq!(sections[0].direct_count, 1);
		assert!((sections[0].total_amount() - 250.0).abs() < EPSILON);
	}

	#[test]
	fn test_no_report_data_is_refused() {
		let report = GlReport::from_value(json!({
			"Header": {"Option": [{"Name": "NoReportData", "Value": "true"}]},
			"Rows": {}
		}))
		.unwrap();
		assert!(report.has_no_data());
		assert_eq!(report.sections(), Err(GlError::NoReportData));
	}

	#[test]
	fn test_fixture_dates() {
		let report = GlReport::from_value(gl_fixture()).unwrap();
		assert_eq!(
			report.date_span(),
			Some(("2025-01-15".to_string(), "2025-06-01".to_string()))
		);
	}

	#[test]
	fn test_no_dates() {
		assert_eq!(GlReport::from_value(json!({})).unwrap().date_span(), None);
		assert_eq!(
			GlReport::from_value(json!({"Rows": {}}))
				.unwrap()
				.date_span(),
			None
		);
	}
}
