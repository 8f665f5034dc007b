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

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Tracks how far a [`crate::url::CanonicalUrl`] is from the seed it was
/// discovered from. Only Page-Collector-to-Page-Collector hops increase
/// `depth_on_website`; a file-collector visit inherits the depth of the page
/// that referenced it (spec §4.7, Open Question in §9 resolved as "no").
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Serialize, Deserialize)]
pub struct Depth {
    /// Number of page-traversal hops from the seed.
    pub depth_on_website: u64,
}

impl Depth {
    pub const ZERO: Depth = Depth { depth_on_website: 0 };

    /// A page-collector hop: one level deeper.
    pub fn descend(self) -> Self {
        Self { depth_on_website: self.depth_on_website + 1 }
    }

    /// A file-collector hop: same level as the page that referenced it.
    pub fn same_level(self) -> Self {
        self
    }

    /// `depth == 0` disables the limit (spec §3, §4.7).
    pub fn is_within(self, limit: u64) -> bool {
        limit == 0 || self.depth_on_website < limit
    }
}

impl Display for Depth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.depth_on_website)
    }
}
