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
use crate::gl::account::{resolve_customer, Resolved};
use crate::gl::account_tree::{AccountNode, AccountTree};
use crate::gl::index::SectionIndex;
use crate::gl::rows::GlReport;
use crate::gl::subtotal::{subtotal, transactions_for};
use crate::parsing::filesystem::Filesystem;
use crate::reports::account_reporter::{tree_lines, AccountReporter};
use crate::reports::customer_reporter::CustomerReporter;
use crate::reports::format::{format_amount, report_frame};
use crate::reports::json_reporter::{
	CustomersDocument, JsonReporter, ReportDocument, TransactionsDocument,
};
use crate::reports::ledger_reporter::LedgerReporter;
use crate::reports::tree_reporter::TreeReporter;
use crate::source::file::FileSource;
use crate::source::qbo::QboClient;
use crate::source::{GlParams, LedgerSource, Method};
use crate::util::date::{Date, DateRange};
use anyhow::{bail, Error};
use chrono::Local;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod config;
mod gl;
mod parsing;
mod reports;
mod source;
mod util;

/// Earliest date asked of the API when no begin date is given.
const QUERY_START: &str = "2000-01-01";

#[derive(Parser)]
#[command(
	name = "qbogl",
	version = "0.1",
	about = "Hierarchical General Ledger reports for QuickBooks Online"
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The report to produce
	command: Directive,

	// -----------
	// -- FLAGS --
	// -----------
	/// Account to report on, by id or (part of its) name
	#[arg(short, long)]
	account: Option<String>,

	/// Only include transactions for this customer, by id or name
	#[arg(short = 'c', long)]
	customer: Option<String>,

	/// First day of the report (YYYY-MM-DD); default is the earliest
	/// transaction found
	#[arg(short, long)]
	begin: Option<String>,

	/// Last day of the report (YYYY-MM-DD); default is today
	#[arg(short, long)]
	end: Option<String>,

	/// Accounting method (default: config, else Cash)
	#[arg(long, value_enum)]
	method: Option<Method>,

	/// Prefix to show before amounts, e.g. "$"
	#[arg(long)]
	currency: Option<String>,

	/// Print structured JSON instead of text
	#[arg(long)]
	json: bool,

	/// Report the account as a single line, rolling up its sub-accounts
	#[arg(long)]
	collapse: bool,

	/// Custom config file location (default: ~/.config/qbogl/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// Read a saved GeneralLedger report instead of calling the API
	#[arg(long)]
	report: Option<String>,

	/// Saved account list to use with --report
	#[arg(long)]
	accounts: Option<String>,

	/// Saved customer list to use with --report
	#[arg(long)]
	customers: Option<String>,
}

impl Cli {
	/// Extra validations on top of what clap does
	fn validate(&self) -> Result<(), Error> {
		if self.report.is_none()
			&& (self.accounts.is_some() || self.customers.is_some())
		{
			bail!("--accounts and --customers only apply together with --report");
		}
		if self.command != Directive::Accounts && self.account.is_none() {
			bail!("Account is required. Use -a/--account (ID or name); `qbogl accounts` lists them.");
		}

		Ok(())
	}
}

#[derive(ValueEnum, Clone, Copy, PartialEq)]
enum Directive {
	Tree,      // subtotals per account
	Expand,    // subtotals with transactions
	Txns,      // flat transaction list
	Customers, // subtotals per customer
	Accounts,  // explore the chart of accounts
}

/// Everything a report needs once the inputs are fetched.
struct ReportContext {
	root: AccountNode,
	report: GlReport,
	customer: Option<Resolved>,
	method: Method,
	currency: String,
	start: Date,
	end: Date,
}

fn main() -> Result<(), Error> {
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(
			EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| EnvFilter::new("qbogl=warn")),
		)
		.without_time()
		.init();

	let args = Cli::parse();
	args.validate()?;

	let fs = Filesystem::new();
	let config = fs.get_config(args.config.as_ref(), args.report.is_none())?;
	let qbo = config.qbo.unwrap_or_default();

	let currency = args
		.currency
		.clone()
		.or_else(|| qbo.currency.clone())
		.unwrap_or_default();
	let method = match (args.method, &qbo.method) {
		(Some(method), _) => method,
		(None, Some(configured)) => Method::from_str(configured)?,
		(None, None) => Method::default(),
	};

	let source: Box<dyn LedgerSource> = match &args.report {
		Some(report) => Box::new(FileSource::new(
			report.clone(),
			args.accounts.clone(),
			args.customers.clone(),
		)),
		None => Box::new(QboClient::new(qbo)?),
	};

	let accounts = source.accounts()?;
	let tree = AccountTree::new(&accounts);

	if args.command == Directive::Accounts {
		return explore_accounts(&args, &tree);
	}

	let customer = match &args.customer {
		Some(reference) => {
			let candidates = source.customers(reference)?;
			let resolved = resolve_customer(reference, &candidates)?;
			warn_ambiguous("customer", reference, &resolved);
			Some(resolved)
		},
		None => None,
	};

	// validate() guarantees an account for every report command
	let reference = args.account.as_deref().unwrap_or_default();
	let (root, resolved) = tree.discover(reference)?;
	warn_ambiguous("account", reference, &resolved);
	let root = if args.collapse { root.collapsed() } else { root };

	let end = match &args.end {
		Some(end) => Date::from_str(end)?,
		None => today()?,
	};
	let query_start = Date::from_str(args.begin.as_deref().unwrap_or(QUERY_START))?;

	let params = GlParams {
		start_date: query_start,
		end_date: end,
		method,
		customer_id: customer.as_ref().map(|c| c.id.clone()),
	};
	let report = GlReport::from_value(source.general_ledger(&params)?)?;

	let start = if args.begin.is_some() {
		check_period(&report, &params);
		query_start
	} else {
		match report.date_span() {
			Some((first, _)) => Date::from_str(&first)?,
			None => query_start,
		}
	};

	let ctx = ReportContext {
		root,
		report,
		customer,
		method,
		currency,
		start,
		end,
	};
	run_report(args.command, args.json, &ctx)
}

fn run_report(
	command: Directive,
	json: bool,
	ctx: &ReportContext,
) -> Result<(), Error> {
	let sections = ctx.report.sections()?;
	let index = SectionIndex::new(&sections);

	let title = match &ctx.customer {
		Some(customer) => format!("General Ledger Report - {}", customer.name),
		None => "General Ledger Report".to_string(),
	};
	let period = DateRange {
		start: ctx.start,
		end: ctx.end,
	}
	.to_string();

	match command {
		Directive::Tree | Directive::Expand => {
			let expand = command == Directive::Expand;
			let total = subtotal(&index, &ctx.root);

			if json {
				return print_json(&ReportDocument {
					start_date: ctx.start.to_string(),
					end_date: ctx.end.to_string(),
					method: ctx.method.to_string(),
					account: JsonReporter::new(&index, expand).account(&ctx.root),
					total: total.amount,
					customer: ctx.customer.as_ref().map(|c| c.name.clone()),
					customer_id: ctx.customer.as_ref().map(|c| c.id.clone()),
				});
			}

			let mut reporter = TreeReporter::new(&index, &ctx.currency);
			if expand {
				reporter = reporter.expanded();
			}
			print_lines(report_frame(
				&title,
				&period,
				reporter.lines(&ctx.root),
				Some(format_amount(total.amount, &ctx.currency)),
			));
		},
		Directive::Txns => {
			let reporter = LedgerReporter::new(transactions_for(&index, &ctx.root));
			if json {
				let total = reporter.total();
				return print_json(&TransactionsDocument {
					transactions: reporter.transactions(),
					total: total.amount,
					count: total.count,
				});
			}
			print_lines(report_frame(
				&title,
				&period,
				reporter.lines(&ctx.currency),
				None,
			));
		},
		Directive::Customers => {
			let transactions = transactions_for(&index, &ctx.root);
			let reporter = CustomerReporter::new(&transactions);
			if json {
				let total = reporter.total();
				return print_json(&CustomersDocument {
					customers: reporter.groups(),
					total: total.amount,
					count: total.count,
				});
			}
			print_lines(report_frame(
				&title,
				&period,
				reporter.lines(&ctx.currency),
				None,
			));
		},
		Directive::Accounts => bail!("the accounts command has no ledger report"),
	}

	Ok(())
}

/// The `accounts` command: one account's sub-tree, or the whole chart.
fn explore_accounts(args: &Cli, tree: &AccountTree) -> Result<(), Error> {
	let Some(reference) = &args.account else {
		print_lines(AccountReporter::new(tree).listing()?);
		return Ok(());
	};

	let (root, resolved) = tree.discover(reference)?;
	warn_ambiguous("account", reference, &resolved);
	if args.json {
		return print_json(&root);
	}
	print_lines(tree_lines(&root));
	Ok(())
}

fn warn_ambiguous(kind: &str, reference: &str, resolved: &Resolved) {
	if !resolved.is_ambiguous() {
		return;
	}
	for (id, name) in &resolved.candidates {
		warn!(id = %id, name = %name, "{} candidate for '{}'", kind, reference);
	}
	warn!(
		"{} {} found matching '{}'; using {} ({})",
		resolved.candidates.len(),
		kind,
		reference,
		resolved.name,
		resolved.id
	);
}

/// A saved report may not cover the dates that were asked for.
fn check_period(report: &GlReport, params: &GlParams) {
	let header = &report.header;
	let requested = (params.start_date.to_string(), params.end_date.to_string());
	if let (Some(start), Some(end)) = (&header.start_period, &header.end_period) {
		if (start, end) != (&requested.0, &requested.1) {
			warn!(
				"report covers {} to {}, not the requested {} to {}",
				start, end, requested.0, requested.1
			);
		}
	}
}

fn print_lines(lines: Vec<String>) {
	println!("{}", lines.join("\n"));
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Error> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}

fn today() -> Result<Date, Error> {
	Date::from_str(&Local::now().date_naive().to_string())
}
