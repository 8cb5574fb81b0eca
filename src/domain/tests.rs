// Domain module tests.

use std::sync::Arc;

use super::*;
use crate::dns::mock::MockTransport;
use crate::error_handling::ResolutionError;

fn selector(primary: MockTransport) -> (TargetSelector, Arc<MockTransport>) {
    let primary = Arc::new(primary);
    let fallback = Arc::new(MockTransport::failing(
        "fallback",
        ResolutionError::inconclusive("any", "offline"),
    ));
    let resolver = Arc::new(ResilientResolver::new(primary.clone(), fallback));
    (TargetSelector::new(resolver), primary)
}

#[test]
fn test_clean_domain_strips_scheme_port_path_query() {
    assert_eq!(clean_domain("https://www.Example.com:8443/status"), "www.example.com");
    assert_eq!(clean_domain("http://example.com?x=1"), "example.com");
    assert_eq!(clean_domain("ftp://Host.example.org:21/a/b?c=d"), "host.example.org");
    assert_eq!(clean_domain("  EXAMPLE.com  "), "example.com");
    assert_eq!(clean_domain("example.com/"), "example.com");
}

#[test]
fn test_clean_domain_without_scheme_keeps_host() {
    assert_eq!(clean_domain("example.com:443"), "example.com");
    assert_eq!(clean_domain("sub.example.com"), "sub.example.com");
    assert_eq!(clean_domain(""), "");
}

#[test]
fn test_clean_domain_keeps_host_text_verbatim() {
    assert_eq!(clean_domain("https://Bücher.example:443/x"), "bücher.example");
    assert_eq!(clean_domain("http://0x7f.1/"), "0x7f.1");
    assert_eq!(clean_domain("http://10.1/status"), "10.1");
    assert_eq!(clean_domain("https://a%41b.example.com/"), "a%41b.example.com");
    assert_eq!(clean_domain("https://[2001:DB8::1]:443/"), "2001:db8::1");
}

#[test]
fn test_parent_domain_two_labels_or_fewer() {
    assert_eq!(parent_domain("example.com"), "example.com");
    assert_eq!(parent_domain("localhost"), "localhost");
}

#[test]
fn test_parent_domain_takes_last_two_labels() {
    assert_eq!(parent_domain("www.example.com"), "example.com");
    assert_eq!(parent_domain("a.b.c.example.org"), "example.org");
}

#[test]
fn test_parent_domain_multi_label_suffix_limitation() {
    // Naive heuristic: not public-suffix aware
    assert_eq!(parent_domain("foo.co.uk"), "co.uk");
}

#[tokio::test]
async fn test_select_uses_cleaned_when_resolvable() {
    let (selector, primary) = selector(MockTransport::answering("primary", &["192.0.2.10"]));
    let triple = selector.select("https://www.Example.com:8443/status").await;
    assert_eq!(triple.cleaned, "www.example.com");
    assert_eq!(triple.parent, "example.com");
    assert_eq!(triple.connectable.as_deref(), Some("www.example.com"));
    assert_eq!(primary.queried(), vec!["www.example.com".to_string()]);
}

#[tokio::test]
async fn test_select_falls_back_to_www() {
    let (selector, primary) = selector(
        MockTransport::failing("primary", ResolutionError::not_found("example.com", "A"))
            .with("www.example.com", Ok(vec!["192.0.2.20".to_string()])),
    );
    let triple = selector.select("example.com").await;
    assert_eq!(triple.connectable.as_deref(), Some("www.example.com"));
    assert_eq!(
        primary.queried(),
        vec!["example.com".to_string(), "www.example.com".to_string()]
    );
}

#[tokio::test]
async fn test_select_connectable_absent_when_nothing_resolves() {
    let (selector, _) = selector(MockTransport::failing(
        "primary",
        ResolutionError::not_found("x", "A"),
    ));
    let triple = selector.select("dead.example").await;
    assert_eq!(triple.connectable, None);
    assert_eq!(triple.target_for(TargetPolicy::Connectable), None);
    assert_eq!(triple.target_for(TargetPolicy::Parent), Some("dead.example"));
    assert_eq!(triple.target_for(TargetPolicy::Cleaned), Some("dead.example"));
}

#[tokio::test]
async fn test_select_empty_answer_counts_as_unresolvable() {
    let (selector, _) = selector(MockTransport::answering("primary", &[]));
    let triple = selector.select("example.com").await;
    assert_eq!(triple.connectable, None);
}
