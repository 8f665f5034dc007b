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

use crate::error::FetchError;
use crate::scope::Scope;
use rand::seq::SliceRandom;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, REFERER};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

const MAX_REDIRECT_HOPS: u8 = 10;

/// A small, hand-picked pool of mobile UAs. `ua_generator` only ships a
/// single desktop-leaning `spoof_ua()`, so "mobile" mode draws from this pool
/// instead (spec §4.6: literal `"mobile"` → random mobile UA per request).
const MOBILE_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; Android 13; SM-G991B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (iPad; CPU OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
];

/// How the `User-Agent` header is chosen per request (spec §4.6).
#[derive(Debug, Clone)]
pub enum UserAgentMode {
    /// Random desktop UA per request.
    Web,
    /// Random mobile UA per request.
    Mobile,
    /// The literal configured string, unchanged.
    Literal(String),
}

impl UserAgentMode {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "web" => UserAgentMode::Web,
            "mobile" => UserAgentMode::Mobile,
            other => UserAgentMode::Literal(other.to_string()),
        }
    }

    fn resolve(&self) -> String {
        match self {
            UserAgentMode::Web => ua_generator::ua::spoof_ua().to_string(),
            UserAgentMode::Mobile => MOBILE_USER_AGENTS
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(MOBILE_USER_AGENTS[0])
                .to_string(),
            UserAgentMode::Literal(literal) => literal.clone(),
        }
    }
}

/// Configuration the fetcher needs to build its underlying HTTP clients.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub timeout: Duration,
    pub proxies: Vec<String>,
    pub headers: Vec<(String, String)>,
    pub user_agent: UserAgentMode,
}

/// Splits a `"Name: Value"` or `"Name:Value"` header line on its first colon
/// (spec §4.6). Lines without a colon are dropped.
pub fn parse_header(raw: &str) -> Option<(String, String)> {
    let (name, value) = raw.split_once(':')?;
    Some((name.trim().to_string(), value.trim().to_string()))
}

/// What a completed fetch handed back to a collector (spec §4.6/§4.7). A
/// redirect whose target left scope is surfaced as `StoppedRedirect` rather
/// than followed: the 3xx response body/headers are what the caller sees.
#[derive(Debug)]
pub enum Fetched {
    Response { url: Url, status: u16, body: String },
    StoppedRedirect { from: Url, status: u16, location: Url },
}

/// Owns one `reqwest::Client` per configured proxy (or a single proxy-less
/// client) and round-robins across them per request (spec §4.6).
pub struct Fetcher {
    clients: Vec<reqwest::Client>,
    next: AtomicUsize,
    user_agent: UserAgentMode,
    headers: HeaderMap,
}

impl Fetcher {
    pub fn new(config: FetcherConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            if let (Ok(name), Ok(value)) = (HeaderName::from_str(name.trim()), HeaderValue::from_str(value.trim())) {
                headers.insert(name, value);
            }
        }

        let proxy_list: Vec<Option<String>> = if config.proxies.is_empty() {
            vec![None]
        } else {
            config.proxies.iter().cloned().map(Some).collect()
        };

        let mut clients = Vec::with_capacity(proxy_list.len());
        for proxy in proxy_list {
            let mut builder = reqwest::Client::builder()
                .danger_accept_invalid_certs(true)
                .redirect(reqwest::redirect::Policy::none())
                .timeout(config.timeout)
                .connect_timeout(config.timeout)
                .pool_max_idle_per_host(100)
                .pool_idle_timeout(config.timeout)
                .default_headers(headers.clone());

            if let Some(proxy) = proxy {
                builder = builder.proxy(reqwest::Proxy::all(proxy)?);
            }

            clients.push(builder.build()?);
        }

        Ok(Self { clients, next: AtomicUsize::new(0), user_agent: config.user_agent, headers })
    }

    fn next_client(&self) -> &reqwest::Client {
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.clients.len();
        &self.clients[index]
    }

    /// Performs a single GET, manually following in-scope redirects up to
    /// [`MAX_REDIRECT_HOPS`] and handing the caller whatever the chain
    /// terminates on (spec §4.6's redirect scoping rule).
    pub async fn fetch(&self, url: &Url, referer: Option<&Url>, scope: &Scope) -> Result<Fetched, FetchError> {
        let mut current = url.clone();
        let mut current_referer = referer.cloned();

        for _ in 0..MAX_REDIRECT_HOPS {
            let client = self.next_client();
            let mut request = client.get(current.clone()).header("User-Agent", self.user_agent.resolve());
            if let Some(referer) = &current_referer {
                request = request.header(REFERER, referer.as_str());
            }

            let response = request.send().await.map_err(|source| {
                if source.is_timeout() {
                    FetchError::Timeout { url: current.to_string() }
                } else {
                    FetchError::Transport { url: current.to_string(), source }
                }
            })?;

            let status = response.status();

            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|raw| current.join(raw).ok());

                if let Some(location) = location {
                    if scope.in_scope(&location) {
                        current_referer = Some(current.clone());
                        current = location;
                        continue;
                    }
                    return Ok(Fetched::StoppedRedirect { from: current, status: status.as_u16(), location });
                }
            }

            if !status.is_success() && !status.is_redirection() {
                return Err(FetchError::Status { url: current.to_string(), status: status.as_u16() });
            }

            let body = response
                .text()
                .await
                .map_err(|source| FetchError::Transport { url: current.to_string(), source })?;
            return Ok(Fetched::Response { url: current, status: status.as_u16(), body });
        }

        Err(FetchError::Status { url: current.to_string(), status: 310 })
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.headers
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn user_agent_mode_parses_known_literals() {
        assert!(matches!(UserAgentMode::parse("web"), UserAgentMode::Web));
        assert!(matches!(UserAgentMode::parse("mobile"), UserAgentMode::Mobile));
        assert!(matches!(UserAgentMode::parse("MyBot/1.0"), UserAgentMode::Literal(s) if s == "MyBot/1.0"));
    }

    #[test]
    fn mobile_mode_resolves_to_one_of_the_pool() {
        let ua = UserAgentMode::Mobile.resolve();
        assert!(MOBILE_USER_AGENTS.contains(&ua.as_str()));
    }

    #[test]
    fn literal_mode_resolves_unchanged() {
        let ua = UserAgentMode::Literal("MyBot/1.0".to_string());
        assert_eq!(ua.resolve(), "MyBot/1.0");
    }

    #[test]
    fn parse_header_splits_on_first_colon() {
        assert_eq!(parse_header("Referer: http://example.com/"), Some(("Referer".to_string(), "http://example.com/".to_string())));
        assert_eq!(parse_header("X-Custom:no-space"), Some(("X-Custom".to_string(), "no-space".to_string())));
    }

    #[test]
    fn parse_header_without_colon_is_none() {
        assert_eq!(parse_header("garbage"), None);
    }
}
