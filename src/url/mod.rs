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

pub mod depth;
pub mod normalize;
pub mod origin;

pub use depth::Depth;
pub use normalize::{decode, normalize, normalize_seed, NormalizeError};
pub use origin::{registrable_domain, Origin};

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use url::Url;

/// An absolute `http(s)` URL paired with its traversal depth (spec §3
/// `CanonicalURL`/`UrlWithDepth`). Equality and hashing only consider the
/// dedup key (trailing `/` stripped); this is what lets [`crate::dedup::DedupMap`]
/// use it directly as a set key.
#[derive(Debug, Clone)]
pub struct CanonicalUrl {
    url: Url,
    pub depth: Depth,
}

impl CanonicalUrl {
    pub fn new(url: Url, depth: Depth) -> Self {
        Self { url, depth }
    }

    pub fn seed(url: Url) -> Self {
        Self::new(url, Depth::ZERO)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn origin(&self) -> Option<Origin> {
        Origin::of(&self.url)
    }

    pub fn registrable_domain(&self) -> Option<String> {
        registrable_domain(self.url.host_str()?)
    }

    pub fn dedup_key(&self) -> String {
        normalize::dedup_key(&self.url)
    }

    /// Builds a descendant at the same depth (a file-collector hop).
    pub fn sibling_same_depth(&self, url: Url) -> Self {
        Self::new(url, self.depth.same_level())
    }

    /// Builds a descendant one page-traversal hop deeper.
    pub fn child(&self, url: Url) -> Self {
        Self::new(url, self.depth.descend())
    }

    pub fn path_extension(&self) -> Option<&str> {
        let path = self.url.path();
        let last_segment = path.rsplit('/').next().unwrap_or(path);
        let dot = last_segment.rfind('.')?;
        if dot == last_segment.len() - 1 {
            return None;
        }
        Some(&last_segment[dot + 1..])
    }
}

impl Display for CanonicalUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.url, f)
    }
}

impl Eq for CanonicalUrl {}

impl PartialEq for CanonicalUrl {
    fn eq(&self, other: &Self) -> bool {
        self.dedup_key() == other.dedup_key()
    }
}

impl Hash for CanonicalUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dedup_key().hash(state)
    }
}
