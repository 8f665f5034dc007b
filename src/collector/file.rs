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
use crate::extraction::text;
use crate::fetch::Fetched;
use crate::url::{normalize, CanonicalUrl};
use url::Url;

/// The `file:<ext>` tag for whatever file body this job is scanning (spec §3
/// `Result.source` vocabulary).
fn file_tag(url: &CanonicalUrl) -> String {
    format!("file:{}", url.path_extension().unwrap_or("unknown"))
}

/// Runs one File-Collector visit (spec §4.7). No extension-based rejection
/// here: the routing table is only applied when a URL is *discovered*, not
/// when the File Collector itself is dispatched.
pub async fn process(url: CanonicalUrl, referer: Option<Url>, ctx: &CrawlContext) -> Vec<Job> {
    let mut jobs = Vec::new();

    // `.min.` sibling probing happens on request, before the fetch (spec
    // §4.7.1): `app.min.js` also enqueues `app.js`.
    if let Some(sibling) = minified_sibling(url.url()) {
        let sibling_canonical = url.sibling_same_depth(sibling.clone());
        if ctx.try_emit(&sibling, file_tag(&sibling_canonical)).await {
            jobs.push(Job::File { url: sibling_canonical, referer: referer.clone() });
        }
    }

    ctx.random_delay().await;

    let fetched = match ctx.fetcher.fetch(url.url(), referer.as_ref(), &ctx.scope).await {
        Ok(fetched) => fetched,
        Err(source) => {
            ctx.emit_error("page", CrawlError::Fetch(source)).await;
            return jobs;
        }
    };

    let (final_url, body) = match fetched {
        Fetched::Response { url, body, .. } => (url, body),
        Fetched::StoppedRedirect { .. } => return jobs,
    };

    let decoded = normalize::decode(&body);
    let tag = file_tag(&url);

    for hit in text::extract(&decoded) {
        if text::looks_like_media(hit) {
            continue;
        }
        let Ok(absolute) = normalize::normalize(&final_url, hit) else { continue };
        if ctx.try_emit(&absolute, tag.clone()).await {
            if let Some(job) = route_discovery(&url, absolute, Some(final_url.clone()), true, ctx.depth_limit) {
                jobs.push(job);
            }
        }
    }

    jobs
}

/// `app.min.js` -> `Some(".../app.js")`. Spec §4.7.1 literally says "replace
/// `.min.` with `.`"; this also covers the common `.min.js`/`.min.css` cases
/// the original crawler special-cased (see `SPEC_FULL.md`'s §C.3).
fn minified_sibling(url: &Url) -> Option<Url> {
    let raw = url.as_str();
    if !raw.contains(".min.") {
        return None;
    }
    Url::parse(&raw.replacen(".min.", ".", 1)).ok()
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

    #[test]
    fn minified_sibling_strips_first_min_infix() {
        let url = Url::parse("https://example.test/app.min.js").unwrap();
        assert_eq!(minified_sibling(&url).unwrap().as_str(), "https://example.test/app.js");
    }

    #[test]
    fn no_min_infix_yields_none() {
        let url = Url::parse("https://example.test/app.js").unwrap();
        assert!(minified_sibling(&url).is_none());
    }

    #[tokio::test]
    async fn min_js_sibling_is_enqueued_before_fetching() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/app.min.js"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let (tx, mut rx) = mpsc::channel(16);
        let ctx = context(&server, tx).await;
        let url = CanonicalUrl::seed(Url::parse(&format!("{}/app.min.js", server.uri())).unwrap());

        let jobs = process(url, None, &ctx).await;
        assert!(jobs.iter().any(|j| matches!(j, Job::File { url, .. } if url.url().path() == "/app.js")));

        drop(ctx);
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, crate::result::CrawlEvent::Url { value, .. } if value.path() == "/app.js"));
    }

    #[tokio::test]
    async fn body_hits_are_extracted_and_media_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/app.js"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"fetch('/d.json'); var x = "/logo.png";"#),
            )
            .mount(&server)
            .await;

        let (tx, mut rx) = mpsc::channel(16);
        let ctx = context(&server, tx).await;
        let url = CanonicalUrl::seed(Url::parse(&format!("{}/app.js", server.uri())).unwrap());

        let jobs = process(url, None, &ctx).await;
        assert_eq!(jobs.len(), 1);

        drop(ctx);
        let mut emitted = Vec::new();
        while let Some(event) = rx.recv().await {
            emitted.push(event);
        }
        assert_eq!(emitted.len(), 1);
    }
}
