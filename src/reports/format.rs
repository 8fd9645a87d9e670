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
/// Every padded report line is this many characters wide.
pub const REPORT_WIDTH: usize = 72;

/// Renders an amount with thousands separators and two decimals. The sign
/// goes ahead of the currency prefix: "-USD1,234.56".
pub fn format_amount(amount: f64, currency: &str) -> String {
	let digits = format!("{:.2}", amount.abs());
	let (int_part, frac_part) =
		digits.split_once('.').unwrap_or((digits.as_str(), "00"));

	let mut grouped = String::with_capacity(int_part.len() * 4 / 3);
	for (i, c) in int_part.chars().enumerate() {
		if i > 0 && (int_part.len() - i) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(c);
	}

	let sign = if amount < 0.0 { "-" } else { "" };
	format!("{}{}{}.{}", sign, currency, grouped, frac_part)
}

/// Left-aligns the label and right-aligns the amount so the line is
/// REPORT_WIDTH characters. A label too long to fit still gets one space
/// before the amount; nothing is cut off.
pub fn pad_line(label: &str, amount: &str, prefix: &str) -> String {
	let used = prefix.chars().count()
		+ label.chars().count()
		+ amount.chars().count();
	let pad = REPORT_WIDTH.saturating_sub(used).max(1);
	format!("{}{}{}{}", prefix, label, " ".repeat(pad), amount)
}

/// Shortens text to at most `max` characters, marking the cut with an
/// ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
	if text.chars().count() <= max {
		return text.to_string();
	}
	let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
	out.push('…');
	out
}

/// Surrounds a report body with its title, period and, when given, a grand
/// total line.
pub fn report_frame(
	title: &str,
	period: &str,
	body: Vec<String>,
	total: Option<String>,
) -> Vec<String> {
	let mut lines = vec![title.to_string(), period.to_string(), String::new()];
	lines.extend(body);
	if let Some(total) = total {
		lines.push(String::new());
		lines.push(pad_line("TOTAL", &total, ""));
	}
	lines
}
