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

use thiserror::Error;

/// Fatal at startup: unparseable config, bad flag combination (spec §7).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid flag combination: {0}")]
    BadFlags(String),
    #[error("could not build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Fatal at startup: the input file naming seeds could not be read.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("could not read input file {path}: {source}")]
    Unreadable { path: String, #[source] source: std::io::Error },
}

/// Per-request, non-fatal. Carried in a `Result::Error` stream item.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("dns/tcp/tls error fetching {url}: {source}")]
    Transport { url: String, #[source] source: reqwest::Error },
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("{url} responded {status}")]
    Status { url: String, status: u16 },
}

/// Per-body, non-fatal. The partial extraction made so far is kept.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed body at {url}: {message}")]
    Malformed { url: String, message: String },
}

/// Non-fatal: the headless-render hook (spec §4.7.5, §6 Renderer API) failed
/// for a single response. The un-rendered body is kept and traversal
/// continues rather than aborting the visit.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render failed for {url}: {message}")]
    Failed { url: String, message: String },
}

/// Per-result write failure (stdout/file). A persistent file error is fatal;
/// an occasional stdout hiccup is logged and the crawl continues.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("could not write result: {0}")]
    Io(#[from] std::io::Error),
}

/// The crate-wide error surface. Every per-item error that reaches the
/// results stream is one of these; `ConfigError`/`InputError` only ever
/// appear before the engine starts and terminate the process (exit code 1).
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Seed(#[from] crate::seed::SeedParseError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Normalize(#[from] crate::url::NormalizeError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl CrawlError {
    /// The `source` tag attached to the `{Error, source, error}` result
    /// variant (spec §3's `Result` source vocabulary).
    pub fn source_tag(&self) -> &'static str {
        match self {
            CrawlError::Seed(_) => "seed",
            CrawlError::Fetch(_) => "page",
            CrawlError::Parse(_) => "page",
            CrawlError::Normalize(_) => "page",
            CrawlError::Render(_) => "page",
        }
    }
}
