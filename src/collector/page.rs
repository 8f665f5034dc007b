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
use crate::error::CrawlError;
use crate::extraction::html;
use crate::fetch::Fetched;
use crate::route::{self, Route};
use crate::url::{normalize, CanonicalUrl};
use url::Url;

/// Runs one Page-Collector visit (spec §4.7). Assumes `url` has already
/// passed scope + dedup at the point it was discovered — this function never
/// re-checks dedup for its own URL, only for what it finds.
pub async fn process(url: CanonicalUrl, referer: Option<Url>, ctx: &CrawlContext) -> Vec<Job> {
    match route::classify(&url) {
        Route::Reject => return Vec::new(),
        Route::File => return vec![Job::File { url, referer }],
        Route::Page => {}
    }

    ctx.random_delay().await;

    let fetched = match ctx.fetcher.fetch(url.url(), referer.as_ref(), &ctx.scope).await {
        Ok(fetched) => fetched,
        Err(source) => {
            ctx.emit_error("page", CrawlError::Fetch(source)).await;
            return Vec::new();
        }
    };

    let (final_url, mut body) = match fetched {
        Fetched::Response { url, body, .. } => (url, body),
        // Redirect chains cannot escape scope (spec §4.6, §5 invariant); the
        // 3xx response itself is not an error.
        Fetched::StoppedRedirect { .. } => return Vec::new(),
    };

    if let Some(renderer) = &ctx.renderer {
        match renderer.render(final_url.as_str()).await {
            Ok(rendered) => body = rendered,
            Err(source) => ctx.emit_error("page", CrawlError::Render(source)).await,
        }
    }

    let mut jobs = Vec::new();
    for (origin, raw) in html::extract(&body) {
        let Ok(absolute) = normalize::normalize(&final_url, &raw) else { continue };
        if ctx.try_emit(&absolute, origin.tag()).await {
            if let Some(job) = route_discovery(&url, absolute, Some(final_url.clone()), false, ctx.depth_limit) {
                jobs.push(job);
            }
        }
    }
    jobs
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::collector::CrawlContext;
    use crate::dedup::DedupMap;
    use crate::fetch::{Fetcher, FetcherConfig, UserAgentMode};
    use crate::scope::Scope;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;
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
            scope: Scope::new([url::Url::parse(&server.uri()).unwrap().host_str().unwrap().to_string()], false),
            dedup: Arc::new(DedupMap::new()),
            depth_limit: 0,
            delay: Duration::ZERO,
            max_random_delay: Duration::ZERO,
            renderer: None,
            results: tx,
        }
    }

    #[tokio::test]
    async fn follows_href_and_src_within_depth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><a href="/a">a</a><script src="/b.js"></script></body></html>"#,
            ))
            .mount(&server)
            .await;

        let (tx, mut rx) = mpsc::channel(16);
        let ctx = context(&server, tx).await;
        let seed = CanonicalUrl::seed(Url::parse(&server.uri()).unwrap());

        let jobs = process(seed, None, &ctx).await;
        assert_eq!(jobs.len(), 2);

        drop(ctx);
        let mut emitted = Vec::new();
        while let Some(event) = rx.recv().await {
            emitted.push(event);
        }
        assert_eq!(emitted.len(), 2);
    }

    #[tokio::test]
    async fn redirect_out_of_scope_is_not_followed_and_emits_no_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/r"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "https://evil.test/"))
            .mount(&server)
            .await;

        let (tx, mut rx) = mpsc::channel(16);
        let ctx = context(&server, tx).await;
        let url = CanonicalUrl::seed(Url::parse(&format!("{}/r", server.uri())).unwrap());

        let jobs = process(url, None, &ctx).await;
        assert!(jobs.is_empty());

        drop(ctx);
        assert!(rx.recv().await.is_none());
    }
}
