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
use crate::config::config_file::{Config, Qbo};
use anyhow::{anyhow, bail, Error};
use dirs::home_dir;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::fs::File;
use std::path::PathBuf;
use std::process::Command;

pub struct Filesystem {
	/// Source of environment overrides; the process environment outside
	/// of tests.
	env: fn(&str) -> Option<String>,
}

fn process_env(key: &str) -> Option<String> {
	env::var(key).ok().filter(|v| !v.is_empty())
}

impl Filesystem {
	pub fn new() -> Self {
		Self { env: process_env }
	}

	/// Reads and deserializes a JSON file, naming the file on failure.
	pub fn read_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
		let content = fs::read_to_string(path)
			.map_err(|e| anyhow!("failed to read {}: {}", path, e))?;
		serde_json::from_str(&content)
			.map_err(|e| anyhow!("failed to parse {}: {}", path, e))
	}

	/// Fetches the config from the given path, or default path if none.
	/// The boolean argument indicates whether it is necessary to inspect
	/// the config for authentication, i.e. for calling the QBO API.
	pub fn get_config(
		&self,
		custom_config_path: Option<&String>,
		expand_auth: bool,
	) -> Result<Config, Error> {
		let config_path = match &custom_config_path {
			None => home_dir()
				.ok_or_else(|| anyhow!("unable to determine home directory"))?
				.join(".config/qbogl/config.toml"),
			Some(p) => PathBuf::from(p),
		};

		// create empty config file if it doesn't exist
		if !config_path.exists() && custom_config_path.is_none() {
			if let Some(parent) = config_path.parent() {
				fs::create_dir_all(parent)?;
			}
			File::create(config_path.clone())?;
		}

		let content = fs::read_to_string(config_path)?;
		let mut config = self.parse_config(&content)?;

		if !expand_auth {
			return Ok(config);
		}

		if let Some(qbo) = &mut config.qbo {
			expand_token_cmd(qbo)?;
		}

		Ok(config)
	}

	/// Parses config text and lays environment overrides on top of it.
	fn parse_config(&self, content: &str) -> Result<Config, Error> {
		let mut config: Config = toml::from_str(content)
			.map_err(|e| anyhow!("failed to parse config: {}", e))?;

		let realm_id = (self.env)("QBO_REALM_ID");
		let access_token = (self.env)("QBO_ACCESS_TOKEN");
		let sandbox = (self.env)("QBO_SANDBOX");

		if realm_id.is_some() || access_token.is_some() || sandbox.is_some() {
			let qbo = config.qbo.get_or_insert_with(Qbo::default);
			if realm_id.is_some() {
				qbo.realm_id = realm_id;
			}
			if access_token.is_some() {
				qbo.access_token = access_token;
				qbo.access_token_cmd = None;
			}
			if let Some(flag) = sandbox {
				qbo.sandbox = is_truthy(&flag);
			}
		}

		Ok(config)
	}
}

fn is_truthy(value: &str) -> bool {
	matches!(value.to_lowercase().as_str(), "1" | "true" | "yes")
}

/// Executes access_token_cmd if set, and puts the result in access_token.
fn expand_token_cmd(qbo: &mut Qbo) -> Result<(), Error> {
	if qbo.access_token_cmd.is_some() && qbo.access_token.is_some() {
		bail!("Only one of qbo.access_token and qbo.access_token_cmd may be specified")
	}

	let Some(cmd) = &qbo.access_token_cmd else {
		return Ok(());
	};

	let output = Command::new("sh")
		.arg("-c")
		.arg(cmd)
		.output()
		.map_err(|e| anyhow!("failed to execute access_token_cmd: {}", e))?;

	if !output.status.success() {
		bail!(
			"qbo access_token_cmd failed with status {}: {}",
			output.status,
			String::from_utf8_lossy(&output.stderr)
		);
	}

	qbo.access_token = Some(
		String::from_utf8(output.stdout)
			.map_err(|e| anyhow!("failed to parse command output: {}", e))?
			.trim()
			.to_string(),
	);
	Ok(())
}
