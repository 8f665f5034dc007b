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

use sitemap::reader::{SiteMapEntity, SiteMapReader};
use sitemap::structs::Location;
use std::io::Cursor;

/// One entry of a parsed sitemap document (spec §4.3): either a nested
/// `<sitemap>` entry the caller must recurse into, or a `<url>` leaf.
#[derive(Debug, Clone)]
pub enum Entry {
    Sitemap { loc: String },
    Url { loc: String },
}

/// Streams entries out of a sitemap XML document, skipping malformed entries
/// (the `sitemap` crate reports them as `SiteMapEntity::Err` and keeps
/// reading) rather than failing the whole parse.
pub fn parse(body: &str) -> Vec<Entry> {
    let reader = SiteMapReader::new(Cursor::new(body.as_bytes()));
    let mut entries = Vec::new();

    for entity in reader {
        match entity {
            SiteMapEntity::Url(url_entry) => {
                let Location::Url(loc) = url_entry.loc else { continue };
                entries.push(Entry::Url { loc: loc.to_string() });
            }
            SiteMapEntity::SiteMap(sitemap_entry) => {
                if let Location::Url(loc) = sitemap_entry.loc {
                    entries.push(Entry::Sitemap { loc: loc.to_string() });
                }
            }
            SiteMapEntity::Err(error) => {
                log::debug!("skipping malformed sitemap entry: {error}");
            }
        }
    }

    entries
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_url_entries() {
        const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                <url><loc>https://example.test/a</loc><priority>0.8</priority></url>
                <url><loc>https://example.test/b</loc></url>
            </urlset>"#;
        let entries = parse(XML);
        assert_eq!(entries.len(), 2);
        assert!(matches!(&entries[0], Entry::Url { loc, .. } if loc == "https://example.test/a"));
    }

    #[test]
    fn parses_nested_sitemap_index() {
        const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
            <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                <sitemap><loc>https://example.test/sitemap-posts.xml</loc></sitemap>
            </sitemapindex>"#;
        let entries = parse(XML);
        assert_eq!(entries.len(), 1);
        assert!(matches!(&entries[0], Entry::Sitemap { loc } if loc == "https://example.test/sitemap-posts.xml"));
    }

    #[test]
    fn malformed_document_yields_no_panic() {
        let entries = parse("not xml at all");
        assert!(entries.is_empty());
    }
}
