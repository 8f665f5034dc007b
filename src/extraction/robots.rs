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

use std::sync::LazyLock;
use url::Url;
use regex::Regex;

/// Matches any `Allow:`/`Disallow:` line (spec §4.3: `/.*llow:\s*(.+)/`).
static ALLOW_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r".*llow:\s*(.+)").unwrap());

/// Scans a `robots.txt` body line by line and resolves every `Allow`/
/// `Disallow` path against `origin`. Wildcards (`*`) are stripped; the
/// leading `/` is preserved.
pub fn scan(body: &str, origin: &Url) -> Vec<Url> {
    let mut found = Vec::new();

    for line in body.lines() {
        let Some(captures) = ALLOW_LINE.captures(line) else { continue };
        let Some(path) = captures.get(1) else { continue };
        let path = path.as_str().trim().replace('*', "");
        if path.is_empty() {
            continue;
        }
        if let Ok(resolved) = origin.join(&path) {
            found.push(resolved);
        }
    }

    found
}

#[cfg(test)]
mod test {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://example.test/").unwrap()
    }

    #[test]
    fn extracts_disallow_paths() {
        let body = "User-agent: *\nDisallow: /admin/\nAllow: /admin/public/\n";
        let found = scan(body, &origin());
        assert!(found.iter().any(|u| u.path() == "/admin/"));
        assert!(found.iter().any(|u| u.path() == "/admin/public/"));
    }

    #[test]
    fn strips_wildcards_from_path() {
        let body = "Disallow: /private/*/secret\n";
        let found = scan(body, &origin());
        assert!(found.iter().any(|u| u.path() == "/private//secret"));
    }

    #[test]
    fn ignores_unrelated_lines() {
        let body = "User-agent: *\nCrawl-delay: 10\nSitemap: https://example.test/sitemap.xml\n";
        assert!(scan(body, &origin()).is_empty());
    }
}
