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

use super::{route_discovery, CrawlContext, Job};
use crate::error::FetchError;
use crate::extraction::sitemap::{self, Entry};
use crate::fetch::Fetched;
use crate::url::CanonicalUrl;
use url::Url;

/// Fetches and walks one sitemap document (spec §4.3c, §4.4). A 4xx response
/// means "this variant does not exist" and is silent (spec §7); any other
/// failure is a real error tagged `"sitemap"`.
pub async fn process(url: CanonicalUrl, ctx: &CrawlContext) -> Vec<Job> {
    ctx.random_delay().await;

    let fetched = match ctx.fetcher.fetch(url.url(), None, &ctx.scope).await {
        Ok(fetched) => fetched,
        Err(FetchError::Status { status, .. }) if (400..500).contains(&status) => return Vec::new(),
        Err(source) => {
            ctx.emit_error("sitemap", source).await;
            return Vec::new();
        }
    };

    let Fetched::Response { body, .. } = fetched else {
        return Vec::new();
    };

    let mut jobs = Vec::new();
    for entry in sitemap::parse(&body) {
        match entry {
            Entry::Sitemap { loc } => {
                let Ok(nested) = Url::parse(&loc) else { continue };
                if ctx.try_emit(&nested, "known:sitemap").await {
                    jobs.push(Job::Sitemap { url: url.sibling_same_depth(nested) });
                }
            }
            Entry::Url { loc, .. } => {
                let Ok(target) = Url::parse(&loc) else { continue };
                if ctx.try_emit(&target, "sitemap").await {
                    if let Some(job) = route_discovery(&url, target, None, false, ctx.depth_limit) {
                        jobs.push(job);
                    }
                }
            }
        }
    }
    jobs
}
