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
use crate::extraction::robots;
use crate::fetch::Fetched;
use crate::url::CanonicalUrl;

/// Fetches and scans a `robots.txt` (spec §4.3d, §4.4). Absence of the file
/// is not an error (spec §7): a fetch failure of any kind is silent here.
pub async fn process(url: CanonicalUrl, ctx: &CrawlContext) -> Vec<Job> {
    ctx.random_delay().await;

    let Ok(fetched) = ctx.fetcher.fetch(url.url(), None, &ctx.scope).await else {
        return Vec::new();
    };

    let Fetched::Response { body, .. } = fetched else {
        return Vec::new();
    };

    let mut jobs = Vec::new();
    for discovered in robots::scan(&body, url.url()) {
        if ctx.try_emit(&discovered, "robots").await {
            if let Some(job) = route_discovery(&url, discovered, None, false, ctx.depth_limit) {
                jobs.push(job);
            }
        }
    }
    jobs
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dedup::DedupMap;
    use crate::fetch::{Fetcher, FetcherConfig, UserAgentMode};
    use crate::scope::Scope;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn context(server: &MockServer, tx: mpsc::Sender<crate::result::CrawlEvent>) -> CrawlContext {
        let fetcher = Fetcher::new(FetcherConfig {
            timeout: Duration::from_secs(5),
            proxies: Vec::new(),
            headers: Vec::new(),
            user_agent: UserAgentMode::Literal("test-agent".into()),
        })
        .unwrap();

        CrawlContext {
            fetcher: Arc::new(fetcher),
            scope: Scope::new([Url::parse(&server.uri()).unwrap().host_str().unwrap().to_string()], false),
            dedup: Arc::new(DedupMap::new()),
            depth_limit: 0,
            delay: Duration::ZERO,
            max_random_delay: Duration::ZERO,
            renderer: None,
            results: tx,
        }
    }

    #[tokio::test]
    async fn discovered_paths_are_emitted_and_enqueued() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /admin/\n"))
            .mount(&server)
            .await;

        let (tx, mut rx) = mpsc::channel(16);
        let ctx = context(&server, tx).await;
        let url = CanonicalUrl::seed(Url::parse(&format!("{}/robots.txt", server.uri())).unwrap());

        let jobs = process(url, &ctx).await;
        assert_eq!(jobs.len(), 1);
        assert!(matches!(&jobs[0], Job::Page { url, .. } if url.url().path() == "/admin/"));

        drop(ctx);
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, crate::result::CrawlEvent::Url { value, .. } if value.path() == "/admin/"));
    }

    #[tokio::test]
    async fn missing_robots_txt_is_silent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let (tx, mut rx) = mpsc::channel(16);
        let ctx = context(&server, tx).await;
        let url = CanonicalUrl::seed(Url::parse(&format!("{}/robots.txt", server.uri())).unwrap());

        let jobs = process(url, &ctx).await;
        assert!(jobs.is_empty());

        drop(ctx);
        assert!(rx.recv().await.is_none());
    }
}
