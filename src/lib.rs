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

//! A scope-bound recursive reconnaissance crawler.
//!
//! [`Engine`] is the library surface the CLI (`main.rs`) drives: build a
//! [`Config`], construct an [`Engine`], call [`Engine::crawl`] per seed (or
//! [`Engine::crawl_many`] for cross-seed fan-out) and drain the returned
//! [`CrawlEvent`] stream.

pub mod args;
pub mod collector;
pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod extraction;
pub mod fetch;
pub mod input;
pub mod output;
pub mod render;
pub mod result;
pub mod route;
pub mod scope;
pub mod seed;
pub mod url;

pub use config::Config;
pub use engine::Engine;
pub use error::{ConfigError, CrawlError, FetchError, InputError, ParseError, RenderError, WriteError};
pub use result::CrawlEvent;
