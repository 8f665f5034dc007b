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

use super::HtmlOrigin;
use scraper::Html;

/// Extracts `[href]` and `[src]` attribute values from an HTML document
/// (spec §4.3). Values are returned verbatim; resolving them against the
/// response URL is the caller's job (see [`crate::url::normalize::normalize`]).
pub fn extract(html: &str) -> Vec<(HtmlOrigin, String)> {
    let document = Html::parse_document(html);
    let mut hits = Vec::new();

    for element in document.select(&selectors::HREF_HOLDER) {
        if let Some(href) = element.attr("href") {
            hits.push((HtmlOrigin::Href, href.to_string()));
        }
    }

    for element in document.select(&selectors::SRC_HOLDER) {
        if let Some(src) = element.attr("src") {
            hits.push((HtmlOrigin::Src, src.to_string()));
        }
    }

    hits
}

mod selectors {
    use scraper::Selector;
    use std::sync::LazyLock;

    pub static HREF_HOLDER: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("a,area,link,base").unwrap());
    pub static SRC_HOLDER: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse("audio,embed,iframe,img,input,script,source,track,video").unwrap()
    });
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::extraction::HtmlOrigin;

    #[test]
    fn extracts_href_from_anchors_and_links() {
        const HTML: &str = r#"
            <html><head><link rel="stylesheet" href="/style.css"></head>
            <body><a href="/a">a</a><area href="/b"></body></html>
        "#;
        let hits = extract(HTML);
        let hrefs: Vec<_> = hits.iter().filter(|(o, _)| *o == HtmlOrigin::Href).map(|(_, v)| v.as_str()).collect();
        assert!(hrefs.contains(&"/style.css"));
        assert!(hrefs.contains(&"/a"));
        assert!(hrefs.contains(&"/b"));
    }

    #[test]
    fn extracts_src_from_scripts_and_images() {
        const HTML: &str = r#"
            <html><body><script src="/app.js"></script><img src="/logo.png"></body></html>
        "#;
        let hits = extract(HTML);
        let srcs: Vec<_> = hits.iter().filter(|(o, _)| *o == HtmlOrigin::Src).map(|(_, v)| v.as_str()).collect();
        assert!(srcs.contains(&"/app.js"));
        assert!(srcs.contains(&"/logo.png"));
    }

    #[test]
    fn ignores_elements_without_the_attribute() {
        const HTML: &str = r#"<html><body><a>no href here</a><img></body></html>"#;
        assert!(extract(HTML).is_empty());
    }
}
