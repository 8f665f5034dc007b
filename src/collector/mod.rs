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

pub mod file;
pub mod page;
pub mod robots;
pub mod sitemap;

use crate::dedup::DedupMap;
use crate::fetch::Fetcher;
use crate::render::Renderer;
use crate::result::CrawlEvent;
use crate::route::{self, Route};
use crate::scope::Scope;
use crate::url::CanonicalUrl;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use url::Url;

/// One unit of traversal work (spec §4.7/§4.8). `Robots`/`Sitemap` model the
/// seed-expansion strategies of §4.4/§9's three-sub-pipeline design; `Page`
/// and `File` are the two collectors proper.
#[derive(Debug, Clone)]
pub enum Job {
    Page { url: CanonicalUrl, referer: Option<Url> },
    File { url: CanonicalUrl, referer: Option<Url> },
    Robots { url: CanonicalUrl },
    Sitemap { url: CanonicalUrl },
}

/// Everything a job handler needs, shared read-only (or interior-mutable)
/// across every task of a single `Crawl` (spec §5 "Shared resources").
pub struct CrawlContext {
    pub fetcher: Arc<Fetcher>,
    pub scope: Scope,
    pub dedup: Arc<DedupMap>,
    pub depth_limit: u64,
    pub delay: Duration,
    pub max_random_delay: Duration,
    pub renderer: Option<Arc<dyn Renderer>>,
    pub results: mpsc::Sender<CrawlEvent>,
}

impl CrawlContext {
    /// Sleeps a uniformly-random duration in `delay ..= delay+max_random_delay`
    /// before the next request on this task (spec §4.8's `RandomDelay`).
    pub async fn random_delay(&self) {
        let extra = if self.max_random_delay.is_zero() {
            Duration::ZERO
        } else {
            let millis = rand::random::<u64>() % (self.max_random_delay.as_millis() as u64 + 1);
            Duration::from_millis(millis)
        };
        let wait = self.delay + extra;
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }

    /// Scope-checks, dedups and (if novel) emits `url` tagged `source`.
    /// Returns `true` only for a URL this call made eligible for a visit
    /// (spec §4.5: "on first store... eligible for emission and visit
    /// scheduling; subsequent stores suppress both").
    pub async fn try_emit(&self, url: &Url, source: impl Into<std::borrow::Cow<'static, str>>) -> bool {
        if !self.scope.in_scope(url) {
            return false;
        }
        if self.dedup.load_or_store(url) {
            return false;
        }
        let _ = self.results.send(CrawlEvent::url(url.clone(), source)).await;
        true
    }

    pub async fn emit_error(&self, source: impl Into<std::borrow::Cow<'static, str>>, error: impl std::fmt::Display) {
        let _ = self.results.send(CrawlEvent::error_tagged(source, error)).await;
    }
}

/// Builds the follow-up job for a URL just discovered from `parent`,
/// applying the routing table (§4.7) and the depth bound (§4.7's depth
/// accounting, §3's `depth=0` meaning unbounded). `from_file` selects
/// `Depth::same_level` vs. `Depth::descend` per the Open Question decision
/// in `DESIGN.md`. File-collector routes are never depth-limited: only
/// Page-Collector visits count against `depth_limit` (spec §4.7).
pub fn route_discovery(
    parent: &CanonicalUrl,
    discovered: Url,
    referer: Option<Url>,
    from_file: bool,
    depth_limit: u64,
) -> Option<Job> {
    let child = if from_file { parent.sibling_same_depth(discovered) } else { parent.child(discovered) };

    match route::classify(&child) {
        Route::Reject => None,
        Route::File => Some(Job::File { url: child, referer }),
        Route::Page => {
            if child.depth.is_within(depth_limit) {
                Some(Job::Page { url: child, referer })
            } else {
                None
            }
        }
    }
}
