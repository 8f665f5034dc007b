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

use regex::Regex;
use std::sync::LazyLock;

/// URL-shaped substrings inside quoted string literals of a decoded text body
/// (JS/JSON/XML/CSV, spec §4.3's body URL regex). Grounded in the upstream
/// crawler's own quoted-literal matcher rather than a full URL grammar, since
/// that is what actually survives minified JS and JSON payloads.
static URL_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?:"|')("#,
        r#"((?:[a-zA-Z]{1,10}://|//)[^"'/]{1,}\.[a-zA-Z]{2,}[^"']{0,})|"#,
        r#"((?:/|\.\./|\./)[^"'><,;| *()(%$^/\\\[\]][^"'><,;|()]{1,})|"#,
        r#"([a-zA-Z0-9_\-/]{1,}/[a-zA-Z0-9_\-/]{1,}\.(?:[a-zA-Z]{1,4}|action)(?:[?|#][^"|']{0,}|))|"#,
        r#"([a-zA-Z0-9_\-/]{1,}/[a-zA-Z0-9_\-/]{3,}(?:[?|#][^"|']{0,}|))|"#,
        r#"([a-zA-Z0-9_\-]{1,}\.(?:php|asp|aspx|jsp|json|action|html|js|txt|xml)(?:[?|#][^"|']{0,}|))"#,
        r#")(?:"|')"#,
    ))
    .unwrap()
});

/// Finds every URL-shaped substring in `decoded` text (already passed through
/// [`crate::url::normalize::decode`]).
pub fn extract(decoded: &str) -> Vec<&str> {
    URL_LIKE
        .captures_iter(decoded)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// True if `candidate` parses as a known media MIME type by its guessed
/// extension — such hits are rejected rather than emitted (spec §4.7 File
/// Collector step 2: "reject if it parses as a media type").
pub fn looks_like_media(candidate: &str) -> bool {
    let ext = candidate.rsplit('.').next().unwrap_or_default();
    let ext = ext.split(|c| c == '?' || c == '#').next().unwrap_or(ext);
    mime_guess_by_extension(ext)
        .map(|m| {
            let essence = m.essence_str();
            essence.starts_with("image/")
                || essence.starts_with("audio/")
                || essence.starts_with("video/")
                || essence.starts_with("font/")
        })
        .unwrap_or(false)
}

fn mime_guess_by_extension(ext: &str) -> Option<mime::Mime> {
    let guess = match ext.to_ascii_lowercase().as_str() {
        "png" => mime::IMAGE_PNG,
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "gif" => mime::IMAGE_GIF,
        "svg" => "image/svg+xml".parse().ok()?,
        "webp" => "image/webp".parse().ok()?,
        "ico" | "cur" => "image/x-icon".parse().ok()?,
        "bmp" => "image/bmp".parse().ok()?,
        "mp3" => "audio/mpeg".parse().ok()?,
        "wav" => "audio/wav".parse().ok()?,
        "mp4" | "m4v" => "video/mp4".parse().ok()?,
        "webm" => "video/webm".parse().ok()?,
        "woff" => "font/woff".parse().ok()?,
        "woff2" => "font/woff2".parse().ok()?,
        "ttf" => "font/ttf".parse().ok()?,
        "otf" => "font/otf".parse().ok()?,
        _ => return None,
    };
    Some(guess)
}
