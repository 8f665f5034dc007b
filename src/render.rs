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

use crate::error::RenderError;
use async_trait::async_trait;

/// The opaque headless-browser collaborator (spec §6 Renderer API): a single
/// long-lived session handing back rendered HTML for a URL. Implementations
/// live behind the `render` feature; without it, `Engine` simply never
/// constructs one and pages are traversed from their raw fetched body.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<String, RenderError>;
}

/// Construction flags (spec §6: "Flags passed at construction: `headless`
/// (show/hide window), `proxy`").
#[derive(Debug, Clone, Default)]
pub struct RendererConfig {
    pub headless: bool,
    pub proxy: Option<String>,
}

#[cfg(feature = "render")]
pub use chrome::ChromeRenderer;

#[cfg(feature = "render")]
mod chrome {
    use super::{Renderer, RendererConfig};
    use crate::error::RenderError;
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser, BrowserConfig};
    use futures::StreamExt;
    use tokio::sync::Mutex;

    /// A single long-lived Chrome DevTools Protocol session with a fresh tab
    /// per `render()` call (spec §6: "A single long-lived session with fresh
    /// tab per call").
    pub struct ChromeRenderer {
        browser: Mutex<Browser>,
    }

    impl ChromeRenderer {
        pub async fn launch(config: RendererConfig) -> Result<Self, RenderError> {
            let mut builder = BrowserConfig::builder();
            if !config.headless {
                builder = builder.with_head();
            }
            if let Some(proxy) = &config.proxy {
                builder = builder.arg(format!("--proxy-server={proxy}"));
            }

            let browser_config = builder.build().map_err(|message| RenderError::Failed {
                url: "<launch>".to_string(),
                message,
            })?;

            let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|source| {
                RenderError::Failed { url: "<launch>".to_string(), message: source.to_string() }
            })?;

            tokio::spawn(async move { while handler.next().await.is_some() {} });

            Ok(Self { browser: Mutex::new(browser) })
        }
    }

    #[async_trait]
    impl Renderer for ChromeRenderer {
        async fn render(&self, url: &str) -> Result<String, RenderError> {
            let browser = self.browser.lock().await;
            let page = browser
                .new_page(url)
                .await
                .map_err(|source| RenderError::Failed { url: url.to_string(), message: source.to_string() })?;

            page.wait_for_navigation()
                .await
                .map_err(|source| RenderError::Failed { url: url.to_string(), message: source.to_string() })?;

            let html = page
                .content()
                .await
                .map_err(|source| RenderError::Failed { url: url.to_string(), message: source.to_string() })?;

            let _ = page.close().await;
            Ok(html)
        }
    }
}
