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

use crate::url::CanonicalUrl;

/// Which collector a URL belongs to, decided purely from its path extension
/// (spec §4.7's routing table), before any request is sent.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Route {
    /// Request aborted pre-send: known binary media/font asset.
    Reject,
    /// Rerouted to the File Collector.
    File,
    /// Followed as an HTML page by the Page Collector.
    Page,
}

const REJECTED_EXTENSIONS: &[&str] = &[
    "apng", "png", "bmp", "gif", "ico", "svg", "tif", "tiff", "webp", "jpg", "jpeg", "jfif", "pjp", "pjpeg", "cur",
    "heif", "psd", "raw", "xbm", "3gp", "aac", "flac", "mp3", "m4a", "m4p", "oga", "ogg", "mpg", "mpeg", "mp4", "m4v",
    "ogv", "mov", "wav", "webm", "eot", "woff", "woff2", "ttf", "otf",
];

const FILE_EXTENSIONS: &[&str] = &["css", "js", "json", "xml", "csv", "txt", "map"];

/// Decides the route for a request URL by its path extension.
pub fn classify(url: &CanonicalUrl) -> Route {
    let Some(ext) = url.path_extension() else { return Route::Page };
    let ext = ext.to_ascii_lowercase();

    if REJECTED_EXTENSIONS.contains(&ext.as_str()) {
        Route::Reject
    } else if FILE_EXTENSIONS.contains(&ext.as_str()) {
        Route::File
    } else {
        Route::Page
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use url::Url;

    fn of(path: &str) -> CanonicalUrl {
        CanonicalUrl::seed(Url::parse(&format!("https://example.test{path}")).unwrap())
    }

    #[test]
    fn rejects_known_media_extensions() {
        assert_eq!(classify(&of("/logo.png")), Route::Reject);
        assert_eq!(classify(&of("/clip.webm")), Route::Reject);
        assert_eq!(classify(&of("/font.woff2")), Route::Reject);
    }

    #[test]
    fn routes_textual_assets_to_file_collector() {
        assert_eq!(classify(&of("/app.js")), Route::File);
        assert_eq!(classify(&of("/data.json")), Route::File);
        assert_eq!(classify(&of("/styles.css")), Route::File);
    }

    #[test]
    fn routes_everything_else_to_page_collector() {
        assert_eq!(classify(&of("/article")), Route::Page);
        assert_eq!(classify(&of("/page.html")), Route::Page);
        assert_eq!(classify(&of("/")), Route::Page);
    }
}
