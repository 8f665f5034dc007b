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

pub mod html;
pub mod robots;
pub mod sitemap;
pub mod text;

use strum::IntoStaticStr;

/// Which attribute a raw link string came from (spec §4.3's HTML extractor
/// callbacks), carried through to the `Result`'s `source` tag. `IntoStaticStr`
/// generates the `source` vocabulary strings (spec §3) directly from the
/// variant names instead of a hand-written match.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, IntoStaticStr)]
pub enum HtmlOrigin {
    #[strum(serialize = "page:href")]
    Href,
    #[strum(serialize = "page:src")]
    Src,
}

impl HtmlOrigin {
    pub fn tag(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tags_match_the_result_source_vocabulary() {
        assert_eq!(HtmlOrigin::Href.tag(), "page:href");
        assert_eq!(HtmlOrigin::Src.tag(), "page:src");
    }
}
