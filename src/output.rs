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

use crate::error::WriteError;
use crate::result::CrawlEvent;
use std::io::Write;
use std::path::Path;

/// Line (default) vs. JSONL (spec §6 "Output formats"). Errors are never
/// written to the file/stdout sink in JSONL mode — only discovered URLs are;
/// a caller who wants errors surfaced goes through `-v`/log output instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Lines,
    Jsonl,
}

/// Writes emitted results to an arbitrary sink (stdout or a file), in the
/// configured [`Format`] (spec §6). A persistent write failure is fatal
/// (spec §7 `WriteError`); the caller decides how "persistent" is judged —
/// this type just returns the error once and lets the caller stop.
pub struct Writer<W: Write> {
    sink: W,
    format: Format,
}

impl<W: Write> Writer<W> {
    pub fn new(sink: W, format: Format) -> Self {
        Self { sink, format }
    }

    /// Writes one crawl event, if it's a URL event (errors are skipped —
    /// they are logged, not written to the result sink).
    pub fn write(&mut self, event: &CrawlEvent) -> Result<(), WriteError> {
        if !matches!(event, CrawlEvent::Url { .. }) {
            return Ok(());
        }

        match self.format {
            Format::Lines => writeln!(self.sink, "{}", event.to_line())?,
            Format::Jsonl => {
                let line = serde_json::to_string(&event.to_record())
                    .expect("OutputRecord serialization cannot fail");
                writeln!(self.sink, "{line}")?;
            }
        }

        self.sink.flush()?;
        Ok(())
    }
}

/// Opens `path` for append, creating parent directories as needed (mirrors
/// the original crawler's output-file setup).
pub fn open_file(path: &str) -> Result<std::fs::File, WriteError> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::OpenOptions::new().create(true).append(true).open(path).map_err(WriteError::Io)
}

#[cfg(test)]
mod test {
    use super::*;
    use url::Url;

    #[test]
    fn lines_format_writes_the_bare_url() {
        let mut buffer = Vec::new();
        let mut writer = Writer::new(&mut buffer, Format::Lines);
        let event = CrawlEvent::url(Url::parse("https://example.test/a").unwrap(), "page:href");
        writer.write(&event).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "https://example.test/a\n");
    }

    #[test]
    fn jsonl_format_writes_an_object() {
        let mut buffer = Vec::new();
        let mut writer = Writer::new(&mut buffer, Format::Jsonl);
        let event = CrawlEvent::url(Url::parse("https://example.test/a").unwrap(), "page:href");
        writer.write(&event).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "{\"url\":\"https://example.test/a\"}\n");
    }

    #[test]
    fn error_events_are_not_written_to_the_sink() {
        let mut buffer = Vec::new();
        let mut writer = Writer::new(&mut buffer, Format::Lines);
        let event = CrawlEvent::error_tagged("page", "boom");
        writer.write(&event).unwrap();
        assert!(buffer.is_empty());
    }
}
