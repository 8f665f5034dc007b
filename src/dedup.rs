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

use compact_str::CompactString;
use std::collections::HashSet;
use std::sync::Mutex;
use url::Url;

/// Process-wide (per-`Crawl`) set of URLs already enqueued (spec §4.5).
/// Single-writer-wins: the first `load_or_store` for a key makes that URL
/// eligible for emission and visit scheduling, every subsequent one is
/// suppressed. Keys are [`CompactString`] rather than `String` since a deep
/// crawl can hold hundreds of thousands of them and most URLs are well
/// under the inline-storage threshold.
#[derive(Debug, Default)]
pub struct DedupMap {
    seen: Mutex<HashSet<CompactString>>,
}

impl DedupMap {
    pub fn new() -> Self {
        Self { seen: Mutex::new(HashSet::new()) }
    }

    /// Returns `true` if the key was already present (i.e. this call did
    /// *not* win the race and the caller must not emit/visit).
    pub fn load_or_store(&self, url: &Url) -> bool {
        let key = CompactString::from(crate::url::normalize::dedup_key(url));
        let mut seen = self.seen.lock().expect("dedup map mutex poisoned");
        !seen.insert(key)
    }

    pub fn len(&self) -> usize {
        self.seen.lock().expect("dedup map mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn first_store_wins() {
        let map = DedupMap::new();
        let url = Url::parse("https://example.test/a").unwrap();
        assert!(!map.load_or_store(&url));
        assert!(map.load_or_store(&url));
    }

    #[test]
    fn trailing_slash_variants_collide() {
        let map = DedupMap::new();
        assert!(!map.load_or_store(&Url::parse("https://example.test/a/").unwrap()));
        assert!(map.load_or_store(&Url::parse("https://example.test/a").unwrap()));
    }

    #[test]
    fn concurrent_stores_emit_exactly_once() {
        use std::sync::Arc;
        use std::thread;

        let map = Arc::new(DedupMap::new());
        let url = Url::parse("https://example.test/shared").unwrap();
        let mut handles = Vec::new();
        for _ in 0..50 {
            let map = map.clone();
            let url = url.clone();
            handles.push(thread::spawn(move || !map.load_or_store(&url)));
        }
        let wins: usize = handles.into_iter().map(|h| h.join().unwrap() as usize).sum();
        assert_eq!(wins, 1);
    }
}
