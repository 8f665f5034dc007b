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

use clap::Parser;

/// CLI surface (spec §6, "indicative, not normative"), flag names kept as
/// close as the Rust/clap idiom allows to the crawler this was distilled
/// from.
#[derive(Debug, Parser)]
#[command(name = "scoutcrawl", about = "A scope-bound recursive reconnaissance crawler")]
pub struct Args {
    /// Seed URL (repeatable).
    #[arg(short = 'u', long = "url")]
    pub urls: Vec<String>,

    /// Seed URLs list file path.
    #[arg(short = 'l', long = "list")]
    pub list: Option<String>,

    /// Domains to scope URLs to (repeatable). Empty means "scope to each
    /// seed's own registrable domain".
    #[arg(short = 'd', long = "domain")]
    pub domains: Vec<String>,

    #[arg(long = "include-subdomains")]
    pub include_subdomains: bool,

    #[arg(long)]
    pub depth: Option<u64>,

    #[arg(long)]
    pub headless: bool,

    /// `"Name: Value"`, repeatable.
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    #[arg(long = "proxy")]
    pub proxies: Vec<String>,

    #[arg(long)]
    pub render: bool,

    #[arg(long)]
    pub timeout: Option<u64>,

    /// `STRING`, `web`, or `mobile`.
    #[arg(long = "user-agent")]
    pub user_agent: Option<String>,

    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    #[arg(long)]
    pub delay: Option<u64>,

    #[arg(long = "max-random-delay")]
    pub max_random_delay: Option<u64>,

    #[arg(short = 'p', long)]
    pub parallelism: Option<usize>,

    #[arg(short = 'o', long)]
    pub output: Option<String>,

    #[arg(long)]
    pub jsonl: bool,

    #[arg(short = 'm', long)]
    pub monochrome: bool,

    #[arg(short = 's', long)]
    pub silent: bool,

    #[arg(short = 'v', long)]
    pub verbose: bool,

    #[arg(long)]
    pub debug: bool,

    /// Path to the YAML config file (spec §6 "Configuration file").
    #[arg(long = "config", default_value = "scoutcrawl.yaml")]
    pub config: String,
}
