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
use std::collections::HashSet;
use url::Url;

/// `(domains, includeSubdomains)` — decides which discovered URLs belong to
/// the crawl (spec §4.1). Pure, no side effects, safe to share across tasks.
#[derive(Debug, Clone)]
pub struct Scope {
    domains: HashSet<CaseInsensitiveString>,
    include_subdomains: bool,
}

impl Scope {
    pub fn new<I: IntoIterator<Item = String>>(domains: I, include_subdomains: bool) -> Self {
        Self {
            domains: domains.into_iter().map(CaseInsensitiveString::new).collect(),
            include_subdomains,
        }
    }

    /// Scope anchored on a single seed's registrable domain, used when no
    /// `domains` were configured explicitly (spec §8 boundary behavior).
    pub fn from_seed(seed: &Url, include_subdomains: bool) -> Self {
        let domain = seed
            .host_str()
            .and_then(crate::url::registrable_domain)
            .unwrap_or_default();
        Self::new(std::iter::once(domain), include_subdomains)
    }

    /// `U.host == d` for some configured domain `d`, or, when
    /// `includeSubdomains` is off, the conventional `www.` variant of `d`; or,
    /// when `includeSubdomains` is on, `U.host` ends with `"." + d`.
    ///
    /// The domains a caller configures are registrable domains (the
    /// GLOSSARY's "eTLD+1"); this check is deliberately done against the
    /// literal host rather than by reducing `U.host` to its own registrable
    /// domain first — that reduction would make every subdomain pass
    /// regardless of `includeSubdomains`, which contradicts spec.md's own S2
    /// scenario. See DESIGN.md for the grounding in the original
    /// implementation's `IsInScope`.
    pub fn in_scope(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else { return false };
        let host = CaseInsensitiveString::new(host);

        if self.include_subdomains {
            self.domains.iter().any(|d| {
                let suffix = CaseInsensitiveString::new(format!(".{}", d.as_ref()));
                host == *d || ends_with_ci(&host, &suffix)
            })
        } else {
            self.domains.iter().any(|d| host == *d || host == CaseInsensitiveString::new(format!("www.{}", d.as_ref())))
        }
    }
}

/// `host` ends with `suffix`, compared case-insensitively. `CaseInsensitiveString`
/// has no `ends_with` of its own, so this lowercases both sides once rather
/// than falling back to a case-sensitive `&str` comparison.
fn ends_with_ci(host: &CaseInsensitiveString, suffix: &CaseInsensitiveString) -> bool {
    host.as_ref().to_lowercase().ends_with(&suffix.as_ref().to_lowercase())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn same_domain_is_in_scope() {
        let scope = Scope::new(["example.test".to_string()], false);
        assert!(scope.in_scope(&Url::parse("https://example.test/a").unwrap()));
    }

    #[test]
    fn subdomain_rejected_without_include_subdomains() {
        let scope = Scope::new(["example.test".to_string()], false);
        assert!(!scope.in_scope(&Url::parse("https://api.example.test/a").unwrap()));
    }

    #[test]
    fn subdomain_accepted_with_include_subdomains() {
        let scope = Scope::new(["example.test".to_string()], true);
        assert!(scope.in_scope(&Url::parse("https://api.example.test/a").unwrap()));
    }

    #[test]
    fn lookalike_domain_is_not_a_subdomain_match() {
        // evilexample.com must not match example.com via a naive suffix check.
        let scope = Scope::new(["example.com".to_string()], true);
        assert!(!scope.in_scope(&Url::parse("https://evilexample.com/a").unwrap()));
    }

    #[test]
    fn other_domain_is_out_of_scope() {
        let scope = Scope::new(["example.test".to_string()], true);
        assert!(!scope.in_scope(&Url::parse("https://other.test/a").unwrap()));
    }

    #[test]
    fn mixed_case_configured_domain_matches_lowercased_host() {
        let scope = Scope::new(["Example.Test".to_string()], false);
        assert!(scope.in_scope(&Url::parse("https://example.test/a").unwrap()));
    }

    #[test]
    fn mixed_case_configured_domain_matches_subdomain() {
        let scope = Scope::new(["Example.Test".to_string()], true);
        assert!(scope.in_scope(&Url::parse("https://api.example.test/a").unwrap()));
    }

    #[test]
    fn empty_domains_with_seed_scopes_to_seed_domain() {
        let seed = Url::parse("https://example.test/").unwrap();
        let scope = Scope::from_seed(&seed, false);
        assert!(scope.in_scope(&Url::parse("https://example.test/a").unwrap()));
        assert!(!scope.in_scope(&Url::parse("https://other.test/a").unwrap()));
    }
}
