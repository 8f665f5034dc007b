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

use case_insensitive_string::CaseInsensitiveString;
use std::fmt::{Display, Formatter};
use url::Url;

/// `scheme://host[:port]`, used as the per-origin key for rate limiting,
/// robots.txt caching and proxy/UA bookkeeping.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Origin {
    pub scheme: CaseInsensitiveString,
    pub host: CaseInsensitiveString,
    pub port: Option<u16>,
}

impl Origin {
    pub fn of(url: &Url) -> Option<Self> {
        let host = url.host_str()?;
        Some(Self {
            scheme: CaseInsensitiveString::new(url.scheme()),
            host: CaseInsensitiveString::new(host),
            port: url.port(),
        })
    }
}

impl Display for Origin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}://{}:{}", self.scheme, self.host, port),
            None => write!(f, "{}://{}", self.scheme, self.host),
        }
    }
}

/// Returns the registrable domain (eTLD+1) of a host, e.g. `api.example.com`
/// -> `example.com`. Uses the public suffix list, same as the teacher's
/// `domain_name_raw`.
pub fn registrable_domain(host: &str) -> Option<String> {
    psl::domain(host.as_bytes()).map(|domain| String::from_utf8_lossy(domain.as_bytes()).into_owned())
}
