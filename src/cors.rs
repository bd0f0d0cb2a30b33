// src/cors.rs
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

#[derive(Debug, Clone, PartialEq, Eq)]
enum OriginRule {
    Any,
    Exact(String),
    /// `https://*.vercel.app` is stored as scheme `https://` and suffix `.vercel.app`.
    Subdomain { scheme: String, suffix: String },
}

/// Decides which browser origins may call the relay.
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    rules: Vec<OriginRule>,
}

impl OriginPolicy {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = entries
            .into_iter()
            .filter_map(|entry| parse_rule(entry.as_ref()))
            .collect();
        Self { rules }
    }

    pub fn allows(&self, origin: &str) -> bool {
        let origin = origin.trim_end_matches('/').to_ascii_lowercase();
        self.rules.iter().any(|rule| match rule {
            OriginRule::Any => true,
            OriginRule::Exact(allowed) => *allowed == origin,
            OriginRule::Subdomain { scheme, suffix } => origin
                .strip_prefix(scheme.as_str())
                .and_then(|host| host.strip_suffix(suffix.as_str()))
                .is_some_and(|label| !label.is_empty() && !label.contains(['/', ':', '@'])),
        })
    }

    pub fn into_layer(self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
                origin.to_str().is_ok_and(|o| self.allows(o))
            }))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
    }
}

fn parse_rule(entry: &str) -> Option<OriginRule> {
    let entry = entry.trim().trim_end_matches('/').to_ascii_lowercase();
    if entry.is_empty() {
        return None;
    }
    if entry == "*" {
        return Some(OriginRule::Any);
    }
    match entry.split_once("://*.") {
        Some((scheme, rest)) if !rest.is_empty() => Some(OriginRule::Subdomain {
            scheme: format!("{scheme}://"),
            suffix: format!(".{rest}"),
        }),
        _ => Some(OriginRule::Exact(entry)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> OriginPolicy {
        OriginPolicy::new(["https://egshiglen.xyz", "https://*.vercel.app"])
    }

    #[test]
    fn exact_origin_matches() {
        assert!(policy().allows("https://egshiglen.xyz"));
        assert!(policy().allows("https://Egshiglen.xyz/"));
        assert!(!policy().allows("http://egshiglen.xyz"));
        assert!(!policy().allows("https://egshiglen.xyz.evil.com"));
    }

    #[test]
    fn wildcard_matches_subdomains_only() {
        assert!(policy().allows("https://portfolio-git-main.vercel.app"));
        assert!(policy().allows("https://a.b.vercel.app"));
        assert!(!policy().allows("https://vercel.app"));
        assert!(!policy().allows("https://evilvercel.app"));
        assert!(!policy().allows("http://portfolio.vercel.app"));
        assert!(!policy().allows("https://portfolio.vercel.app.evil.com"));
    }

    #[test]
    fn star_allows_everything_and_empty_allows_nothing() {
        assert!(OriginPolicy::new(["*"]).allows("http://localhost:5173"));
        assert!(!OriginPolicy::new(Vec::<String>::new()).allows("https://egshiglen.xyz"));
    }
}
