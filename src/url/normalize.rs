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

use thiserror::Error;
use url::Url;

/// Errors while turning a raw href/src/text hit into an absolute URL.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("could not build a url from {raw:?}: {source}")]
    Unparseable { raw: String, #[source] source: url::ParseError },
    #[error("scheme {scheme:?} is not http(s)")]
    UnsupportedScheme { scheme: String },
    #[error("base url {0} has no host")]
    BaseHasNoHost(Url),
}

/// Replaces literal `/`/`&` escapes, strips `*`, and trims spaces
/// and quotes from both ends. Applied before every normalization attempt and
/// again, identically, to every text-extractor hit (spec §4.2, §4.3).
pub fn decode(raw: &str) -> String {
    let replaced = raw.replace("\\u002f", "/").replace("\\u0026", "&");
    let stripped: String = replaced.chars().filter(|c| *c != '*').collect();
    stripped.trim_matches(|c: char| c == ' ' || c == '\'' || c == '"').to_string()
}

fn authority(base: &Url) -> Result<String, NormalizeError> {
    let host = base.host_str().ok_or_else(|| NormalizeError::BaseHasNoHost(base.clone()))?;
    Ok(match base.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

fn require_http_scheme(url: Url) -> Result<Url, NormalizeError> {
    if url.scheme() == "http" || url.scheme() == "https" {
        Ok(url)
    } else {
        Err(NormalizeError::UnsupportedScheme { scheme: url.scheme().to_string() })
    }
}

/// Canonicalizes a relative, protocol-relative, or scheme-less string into an
/// absolute `http(s)` URL, resolved against `base`. Implements spec §4.2's
/// rules (a)-(f), tried in order.
pub fn normalize(base: &Url, raw: &str) -> Result<Url, NormalizeError> {
    let decoded = decode(raw);

    // (a) absolute with scheme
    if let Ok(parsed) = Url::parse(&decoded) {
        return require_http_scheme(parsed);
    }

    // (b) protocol-relative
    if let Some(rest) = decoded.strip_prefix("//") {
        let candidate = format!("{}://{}", base.scheme(), rest);
        let parsed = Url::parse(&candidate)
            .map_err(|source| NormalizeError::Unparseable { raw: decoded.clone(), source })?;
        return require_http_scheme(parsed);
    }

    let authority = authority(base)?;

    // (c) root-relative
    if let Some(rest) = decoded.strip_prefix('/') {
        let candidate = format!("{}://{}/{}", base.scheme(), authority, rest);
        let parsed = Url::parse(&candidate)
            .map_err(|source| NormalizeError::Unparseable { raw: decoded.clone(), source })?;
        return require_http_scheme(parsed);
    }

    // (d) parent-relative
    if let Some(rest) = decoded.strip_prefix("..") {
        let candidate = format!("{}://{}{}", base.scheme(), authority, rest);
        let parsed = Url::parse(&candidate)
            .map_err(|source| NormalizeError::Unparseable { raw: decoded.clone(), source })?;
        return require_http_scheme(parsed);
    }

    // (e) same-directory-relative
    if let Some(rest) = decoded.strip_prefix('.') {
        let candidate = format!("{}://{}{}", base.scheme(), authority, rest);
        let parsed = Url::parse(&candidate)
            .map_err(|source| NormalizeError::Unparseable { raw: decoded.clone(), source })?;
        return require_http_scheme(parsed);
    }

    // (f) bare relative path
    let candidate = format!("{}://{}/{}", base.scheme(), authority, decoded);
    let parsed = Url::parse(&candidate)
        .map_err(|source| NormalizeError::Unparseable { raw: decoded.clone(), source })?;
    require_http_scheme(parsed)
}

/// Parses a seed that may start with `//`, `://`, or be a bare host, as an
/// absolute `https://` URL (spec's boundary behavior for seeds).
pub fn normalize_seed(raw: &str) -> Result<Url, NormalizeError> {
    let decoded = decode(raw);

    if let Ok(parsed) = Url::parse(&decoded) {
        return require_http_scheme(parsed);
    }

    if let Some(rest) = decoded.strip_prefix("://") {
        let candidate = format!("https://{rest}");
        let parsed = Url::parse(&candidate)
            .map_err(|source| NormalizeError::Unparseable { raw: decoded.clone(), source })?;
        return require_http_scheme(parsed);
    }

    if let Some(rest) = decoded.strip_prefix("//") {
        let candidate = format!("https://{rest}");
        let parsed = Url::parse(&candidate)
            .map_err(|source| NormalizeError::Unparseable { raw: decoded.clone(), source })?;
        return require_http_scheme(parsed);
    }

    let candidate = format!("https://{decoded}");
    let parsed = Url::parse(&candidate)
        .map_err(|source| NormalizeError::Unparseable { raw: decoded.clone(), source })?;
    require_http_scheme(parsed)
}

/// The dedup key for a URL: trailing `/` stripped, host already lowercased
/// by the `url` crate's parser (spec §3 `CanonicalURL` invariant).
pub fn dedup_key(url: &Url) -> String {
    let s = url.as_str();
    s.strip_suffix('/').unwrap_or(s).to_string()
}
