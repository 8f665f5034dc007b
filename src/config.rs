// Copyright 2024 Felix Engl
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The on-disk YAML shape (spec §6 "Configuration file"). Every field is
/// `#[serde(default)]` so a partial file is filled from [`FileConfig::default`]
/// on load, matching "missing fields filled from defaults".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileConfig {
    #[serde(default = "current_version")]
    pub version: String,
    #[serde(default)]
    pub request: RequestSection,
    #[serde(default)]
    pub proxies: Vec<String>,
    #[serde(default)]
    pub optimization: OptimizationSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestSection {
    #[serde(default)]
    pub delay: u64,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizationSection {
    #[serde(default)]
    pub depth: u64,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
}

fn current_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
fn default_timeout() -> u64 {
    10
}

/// Mirrors the teacher's own `num_cpus`-sized worker-thread default
/// (`atra/src/app/atra.rs::num_cpus`): absent an explicit flag or config
/// value, scale seed-level fan-out to the machine's core count.
fn default_concurrency() -> usize {
    num_cpus::get().max(1)
}
fn default_parallelism() -> usize {
    10
}

impl Default for RequestSection {
    fn default() -> Self {
        Self { delay: 0, headers: Vec::new(), timeout: default_timeout() }
    }
}

impl Default for OptimizationSection {
    fn default() -> Self {
        Self { depth: 3, concurrency: default_concurrency(), parallelism: default_parallelism() }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            version: current_version(),
            request: RequestSection::default(),
            proxies: Vec::new(),
            optimization: OptimizationSection::default(),
        }
    }
}

impl FileConfig {
    /// Loads the YAML file at `path` if present, filling absent fields from
    /// defaults. A missing file is not an error (spec doesn't require one to
    /// exist); if the file's `version` doesn't match the running binary, the
    /// loaded values are kept but the file is rewritten stamped with the
    /// current version (spec §6: "fields are merged with defaults and the
    /// file is rewritten").
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let Ok(raw) = std::fs::read_to_string(path) else {
            return Ok(Self::default());
        };

        let mut parsed: Self = serde_yaml::from_str(&raw)?;

        if parsed.version != current_version() {
            parsed.version = current_version();
            if let Ok(rewritten) = serde_yaml::to_string(&parsed) {
                let _ = std::fs::write(path, rewritten);
            }
        }

        Ok(parsed)
    }
}

/// How the `User-Agent` header is chosen; mirrors [`crate::fetch::UserAgentMode`]
/// at the config layer before it's resolved into an actual fetcher setting.
pub type UserAgent = String;

/// The engine's full runtime configuration (spec §3 `Config`), immutable
/// after construction. Built by merging CLI flags over [`FileConfig`], the
/// way the teacher's `args.rs` merges `AtraArgs` over `Configs`.
#[derive(Debug, Clone)]
pub struct Config {
    pub domains: Vec<String>,
    pub include_subdomains: bool,
    pub depth: u64,
    pub concurrency: usize,
    pub parallelism: usize,
    pub delay: u64,
    pub max_random_delay: u64,
    pub headers: Vec<String>,
    pub timeout: u64,
    pub proxies: Vec<String>,
    pub user_agent: UserAgent,
    pub render: bool,
    pub headless: bool,
}

impl Config {
    /// Merges CLI-provided overrides over a loaded [`FileConfig`]. `None`
    /// fields on `args` mean "use the file/default value" — this mirrors how
    /// the teacher's `consume_args` lets explicit flags win over the config.
    pub fn merge(file: FileConfig, args: &crate::args::Args) -> Self {
        Self {
            domains: args.domains.clone(),
            include_subdomains: args.include_subdomains,
            depth: args.depth.unwrap_or(file.optimization.depth),
            concurrency: args.concurrency.unwrap_or(file.optimization.concurrency),
            parallelism: args.parallelism.unwrap_or(file.optimization.parallelism),
            delay: args.delay.unwrap_or(file.request.delay),
            max_random_delay: args.max_random_delay.unwrap_or(1),
            headers: if args.headers.is_empty() { file.request.headers } else { args.headers.clone() },
            timeout: args.timeout.unwrap_or(file.request.timeout),
            proxies: if args.proxies.is_empty() { file.proxies } else { args.proxies.clone() },
            user_agent: args.user_agent.clone().unwrap_or_else(|| "scoutcrawl".to_string()),
            render: args.render,
            headless: args.headless,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = FileConfig::load_or_default(Path::new("/nonexistent/scoutcrawl.yaml")).unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn partial_yaml_fills_missing_fields_from_defaults() {
        let parsed: FileConfig = serde_yaml::from_str("request:\n  timeout: 30\n").unwrap();
        assert_eq!(parsed.request.timeout, 30);
        assert_eq!(parsed.optimization.concurrency, default_concurrency());
    }
}
