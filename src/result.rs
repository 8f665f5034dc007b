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

use crate::error::CrawlError;
use serde::Serialize;
use std::borrow::Cow;
use url::Url;

/// One item of a crawl's results stream (spec §3 `Result`): either a
/// discovered URL tagged with how it was found, or a non-fatal error tagged
/// with where it happened. `source` is `Cow` rather than `&'static str`
/// because the File Collector's tag is built at runtime (`file:<ext>`,
/// spec §3's `Result.source` vocabulary), while every other tag is a literal.
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    Url { value: Url, source: Cow<'static, str> },
    Error { source: Cow<'static, str>, error: String },
}

impl CrawlEvent {
    pub fn url(value: Url, source: impl Into<Cow<'static, str>>) -> Self {
        CrawlEvent::Url { value, source: source.into() }
    }

    pub fn error(error: &CrawlError) -> Self {
        CrawlEvent::Error { source: Cow::Borrowed(error.source_tag()), error: error.to_string() }
    }

    pub fn error_tagged(source: impl Into<Cow<'static, str>>, error: impl std::fmt::Display) -> Self {
        CrawlEvent::Error { source: source.into(), error: error.to_string() }
    }

    /// The line this event prints in the default (non-JSONL) text format.
    pub fn to_line(&self) -> String {
        match self {
            CrawlEvent::Url { value, .. } => value.to_string(),
            CrawlEvent::Error { source, error } => format!("[{source}] {error}"),
        }
    }

    pub fn to_record(&self) -> OutputRecord<'_> {
        match self {
            CrawlEvent::Url { value, .. } => OutputRecord::Url { url: value.as_str() },
            CrawlEvent::Error { source, error } => OutputRecord::Error { source: source.as_ref(), error },
        }
    }
}

/// The JSONL wire shape (spec §6's output formats).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum OutputRecord<'a> {
    Url { url: &'a str },
    Error { source: &'a str, error: &'a str },
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn url_event_prints_the_bare_url() {
        let event = CrawlEvent::url(Url::parse("https://example.test/a").unwrap(), "page:href");
        assert_eq!(event.to_line(), "https://example.test/a");
    }

    #[test]
    fn url_event_serializes_as_jsonl_object() {
        let event = CrawlEvent::url(Url::parse("https://example.test/a").unwrap(), "page:href");
        let json = serde_json::to_string(&event.to_record()).unwrap();
        assert_eq!(json, r#"{"url":"https://example.test/a"}"#);
    }
}
