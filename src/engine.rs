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

use crate::collector::{file, page, robots, sitemap, CrawlContext, Job};
use crate::config::Config;
use crate::dedup::DedupMap;
use crate::error::{CrawlError, ConfigError};
use crate::fetch::{parse_header, Fetcher, FetcherConfig, UserAgentMode};
use crate::render::Renderer;
use crate::result::CrawlEvent;
use crate::scope::Scope;
use crate::seed;
use crate::url::CanonicalUrl;
use futures::StreamExt;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;

/// The results channel is kept small (spec §5: "unbuffered or small-buffered
/// ... producers block on send, naturally throttling discovery rate to
/// output rate").
const RESULTS_BUFFER: usize = 8;

/// Compiles the shared fetcher prototype and (optionally) a renderer handle
/// from a [`Config`], then hands out fresh, independent per-seed crawls
/// (spec §4.8). `Config` is read-only after construction (spec §3).
pub struct Engine {
    config: Config,
    fetcher: Arc<Fetcher>,
    renderer: Option<Arc<dyn Renderer>>,
}

impl Engine {
    /// Builds the shared HTTP client prototype and, if `config.render` is
    /// set and the `render` feature is compiled in, launches the headless
    /// browser session (spec §4.8 "Construction").
    pub async fn new(config: Config) -> Result<Self, ConfigError> {
        let user_agent = UserAgentMode::parse(&config.user_agent);
        let headers = config.headers.iter().filter_map(|raw| parse_header(raw)).collect();

        let fetcher = Fetcher::new(FetcherConfig {
            timeout: Duration::from_secs(config.timeout.max(1)),
            proxies: config.proxies.clone(),
            headers,
            user_agent,
        })?;

        let renderer = build_renderer(&config).await?;

        Ok(Self { config, fetcher: Arc::new(fetcher), renderer })
    }

    /// Runs a fresh Page+File(+Robots+Sitemap) collector pipeline and a
    /// fresh [`DedupMap`] for `seed` (spec §4.8 "Operation"). Matches the
    /// `Engine.Crawl(seed) -> Stream<Result>` shape of spec §6's Engine API
    /// literally: the returned stream is finite and closes once the crawl is
    /// idle.
    pub fn crawl(&self, seed: &str) -> impl Stream<Item = CrawlEvent> {
        let (tx, rx) = mpsc::channel(RESULTS_BUFFER);
        let config = self.config.clone();
        let fetcher = self.fetcher.clone();
        let renderer = self.renderer.clone();
        let seed = seed.to_string();

        tokio::spawn(run_crawl(seed, config, fetcher, renderer, tx));
        ReceiverStream::new(rx)
    }

    /// Cross-seed fan-out (spec §4.8 "Cross-seed fan-out"): pulls seeds from
    /// `seeds` and runs up to `config.concurrency` [`Engine::crawl`]
    /// invocations in parallel, multiplexing every crawl's events onto a
    /// single output stream. Each seed gets its own [`DedupMap`]; this driver
    /// does not deduplicate across seeds (spec §9's Open Question,
    /// `DESIGN.md`).
    pub fn crawl_many(self: Arc<Self>, mut seeds: mpsc::Receiver<String>) -> impl Stream<Item = CrawlEvent> {
        let (tx, rx) = mpsc::channel(RESULTS_BUFFER);
        let concurrency = self.config.concurrency.max(1);

        tokio::spawn(async move {
            let semaphore = Arc::new(Semaphore::new(concurrency));
            let mut join_set = JoinSet::new();

            while let Some(seed) = seeds.recv().await {
                let Ok(permit) = semaphore.clone().acquire_owned().await else { break };
                let engine = self.clone();
                let tx = tx.clone();

                join_set.spawn(async move {
                    let _permit = permit;
                    let mut events = Box::pin(engine.crawl(&seed));
                    while let Some(event) = events.next().await {
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                });
            }

            while join_set.join_next().await.is_some() {}
        });

        ReceiverStream::new(rx)
    }
}

#[cfg(feature = "render")]
async fn build_renderer(config: &Config) -> Result<Option<Arc<dyn Renderer>>, ConfigError> {
    use crate::render::{ChromeRenderer, RendererConfig};

    if !config.render {
        return Ok(None);
    }

    let renderer = ChromeRenderer::launch(RendererConfig {
        headless: config.headless,
        proxy: config.proxies.first().cloned(),
    })
    .await
    .map_err(|source| ConfigError::BadFlags(source.to_string()))?;

    Ok(Some(Arc::new(renderer) as Arc<dyn Renderer>))
}

#[cfg(not(feature = "render"))]
async fn build_renderer(config: &Config) -> Result<Option<Arc<dyn Renderer>>, ConfigError> {
    if config.render {
        log::warn!("--render requested but this binary was built without the `render` feature; continuing without it");
    }
    Ok(None)
}

/// One full `Crawl(seed)` (spec §4.8, steps 1-5): parse seed, expand to the
/// seed-expansion visit list, run the Page/File/Robots/Sitemap collectors
/// over a shared bounded task queue, and close `tx` once both collectors'
/// queues have drained.
async fn run_crawl(
    seed_raw: String,
    config: Config,
    fetcher: Arc<Fetcher>,
    renderer: Option<Arc<dyn Renderer>>,
    tx: mpsc::Sender<CrawlEvent>,
) {
    let expanded = match seed::expand(&seed_raw) {
        Ok(expanded) => expanded,
        Err(source) => {
            let _ = tx.send(CrawlEvent::error(&CrawlError::Seed(source))).await;
            return;
        }
    };

    let scope = if config.domains.is_empty() {
        Scope::from_seed(&expanded.seed, config.include_subdomains)
    } else {
        Scope::new(config.domains.clone(), config.include_subdomains)
    };

    let ctx = Arc::new(CrawlContext {
        fetcher,
        scope,
        dedup: Arc::new(DedupMap::new()),
        depth_limit: config.depth,
        delay: Duration::from_secs(config.delay),
        max_random_delay: Duration::from_secs(config.max_random_delay),
        renderer,
        results: tx,
    });

    let mut queue = VecDeque::new();

    if ctx.try_emit(&expanded.seed, "page").await {
        queue.push_back(Job::Page { url: CanonicalUrl::seed(expanded.seed.clone()), referer: None });
    }
    if ctx.try_emit(&expanded.robots_txt, "known:robots").await {
        queue.push_back(Job::Robots { url: CanonicalUrl::seed(expanded.robots_txt.clone()) });
    }
    for sitemap_url in &expanded.sitemap_candidates {
        if ctx.try_emit(sitemap_url, "known:sitemap").await {
            queue.push_back(Job::Sitemap { url: CanonicalUrl::seed(sitemap_url.clone()) });
        }
    }

    let semaphore = Arc::new(Semaphore::new(config.parallelism.max(1)));
    let mut join_set: JoinSet<Vec<Job>> = JoinSet::new();

    // Drain whatever is queued, gated by `parallelism`, then wait for the
    // next completion and feed whatever it discovered back into the queue.
    // When both the queue and the join set are empty, the crawl is idle and
    // `tx` is dropped, closing the results stream (spec §3 "Lifecycles").
    loop {
        while let Some(job) = queue.pop_front() {
            let Ok(permit) = semaphore.clone().acquire_owned().await else { break };
            let ctx = ctx.clone();
            join_set.spawn(async move {
                let _permit = permit;
                dispatch(job, &ctx).await
            });
        }

        match join_set.join_next().await {
            Some(Ok(new_jobs)) => queue.extend(new_jobs),
            Some(Err(join_error)) => log::debug!("a collector task panicked: {join_error}"),
            None => break,
        }
    }
}

async fn dispatch(job: Job, ctx: &CrawlContext) -> Vec<Job> {
    match job {
        Job::Page { url, referer } => page::process(url, referer, ctx).await,
        Job::File { url, referer } => file::process(url, referer, ctx).await,
        Job::Robots { url } => robots::process(url, ctx).await,
        Job::Sitemap { url } => sitemap::process(url, ctx).await,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(domains: Vec<String>) -> Config {
        Config {
            domains,
            include_subdomains: false,
            depth: 2,
            concurrency: 2,
            parallelism: 4,
            delay: 0,
            max_random_delay: 0,
            headers: Vec::new(),
            timeout: 5,
            proxies: Vec::new(),
            user_agent: "scoutcrawl-test".to_string(),
            render: false,
            headless: true,
        }
    }

    /// Mirrors spec §8's S1 scenario: a small link graph is fully traversed
    /// and every reachable URL is emitted exactly once.
    #[tokio::test]
    async fn basic_traversal_emits_every_reachable_url() {
        let server = MockServer::start().await;

        Mock::given(method("GET")).and(path("/")).respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/a"></a><script src="/b.js"></script>"#),
        ).mount(&server).await;
        Mock::given(method("GET")).and(path("/a")).respond_with(
            ResponseTemplate::new(200).set_body_string(r#"<a href="/c"></a>"#),
        ).mount(&server).await;
        Mock::given(method("GET")).and(path("/b.js")).respond_with(
            ResponseTemplate::new(200).set_body_string(r#"fetch("/d.json")"#),
        ).mount(&server).await;
        Mock::given(method("GET")).and(path("/c")).respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server).await;
        Mock::given(method("GET")).and(path("/d.json")).respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server).await;
        Mock::given(method("GET")).and(path("/robots.txt")).respond_with(ResponseTemplate::new(404))
            .mount(&server).await;

        let host = url::Url::parse(&server.uri()).unwrap().host_str().unwrap().to_string();
        let engine = Engine::new(test_config(vec![host])).await.unwrap();

        let mut events = Box::pin(engine.crawl(&server.uri()));
        let mut urls = Vec::new();
        while let Some(event) = events.next().await {
            if let CrawlEvent::Url { value, .. } = event {
                urls.push(value.path().to_string());
            }
        }

        for expected in ["/", "/a", "/b.js", "/c", "/d.json"] {
            assert!(urls.contains(&expected.to_string()), "missing {expected} in {urls:?}");
        }
    }

    /// spec §8 S6: the same URL linked from many pages is emitted exactly
    /// once even under concurrent discovery.
    #[tokio::test]
    async fn same_url_discovered_many_times_is_emitted_once() {
        let server = MockServer::start().await;

        let links: String = (0..100).map(|i| format!(r#"<a href="/p{i}"></a>"#)).collect();
        Mock::given(method("GET")).and(path("/")).respond_with(ResponseTemplate::new(200).set_body_string(links))
            .mount(&server).await;
        for i in 0..100 {
            Mock::given(method("GET")).and(path(format!("/p{i}"))).respond_with(
                ResponseTemplate::new(200).set_body_string(r#"<a href="/shared"></a>"#),
            ).mount(&server).await;
        }
        Mock::given(method("GET")).and(path("/shared")).respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server).await;
        Mock::given(method("GET")).and(path("/robots.txt")).respond_with(ResponseTemplate::new(404))
            .mount(&server).await;

        let host = url::Url::parse(&server.uri()).unwrap().host_str().unwrap().to_string();
        let mut config = test_config(vec![host]);
        config.parallelism = 50;
        config.depth = 3;
        let engine = Engine::new(config).await.unwrap();

        let mut events = Box::pin(engine.crawl(&server.uri()));
        let mut shared_count = 0;
        while let Some(event) = events.next().await {
            if let CrawlEvent::Url { value, .. } = event {
                if value.path() == "/shared" {
                    shared_count += 1;
                }
            }
        }

        assert_eq!(shared_count, 1);
    }
}
