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

use crate::url::normalize_seed;
use thiserror::Error;
use url::Url;

/// The fixed list of well-known sitemap filenames probed per origin, in the
/// order spec §4.4 lists them.
pub const SITEMAP_VARIANTS: &[&str] = &[
    "sitemap.xml",
    "sitemap_news.xml",
    "sitemap_index.xml",
    "sitemap-index.xml",
    "sitemapindex.xml",
    "sitemap-news.xml",
    "post-sitemap.xml",
    "page-sitemap.xml",
    "portfolio-sitemap.xml",
    "home_slider-sitemap.xml",
    "category-sitemap.xml",
    "author-sitemap.xml",
];

#[derive(Debug, Error)]
pub enum SeedParseError {
    #[error("could not parse seed {raw:?}: {source}")]
    Invalid { raw: String, #[source] source: crate::url::NormalizeError },
}

/// What a seed expands to before the crawl begins: the seed itself, its
/// origin's `robots.txt`, and the fixed sitemap variant list (spec §4.4).
/// Order matters: seed first, then robots, then sitemaps in listed order.
#[derive(Debug, Clone)]
pub struct ExpandedSeed {
    pub seed: Url,
    pub robots_txt: Url,
    pub sitemap_candidates: Vec<Url>,
}

/// Parses a seed string and derives the visit list spec §4.4 describes.
pub fn expand(raw: &str) -> Result<ExpandedSeed, SeedParseError> {
    let seed = normalize_seed(raw).map_err(|source| SeedParseError::Invalid { raw: raw.to_string(), source })?;

    let origin = format!(
        "{}://{}",
        seed.scheme(),
        seed.host_str().unwrap_or_default()
    );

    let robots_txt = Url::parse(&format!("{origin}/robots.txt"))
        .expect("origin + literal path is always a valid url");

    let sitemap_candidates = SITEMAP_VARIANTS
        .iter()
        .map(|name| Url::parse(&format!("{origin}/{name}")).expect("origin + literal path is always a valid url"))
        .collect();

    Ok(ExpandedSeed { seed, robots_txt, sitemap_candidates })
}
