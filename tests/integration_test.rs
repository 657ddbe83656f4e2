//! Integration tests for the capture-lookup cycle

use std::time::{Duration, Instant};

use bytes::Bytes;

use tabtrace::cache::RetryPolicy;
use tabtrace::headers::{clean_request_headers, header_value, HeaderSide};
use tabtrace::source::ScriptedSource;
use tabtrace::{RawExchange, TabtraceError, TrafficCache, UrlMatch};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn raw(method: &str, url: &str) -> RawExchange {
    RawExchange {
        method: method.to_string(),
        url: url.to_string(),
        status_code: "200".to_string(),
        ..RawExchange::default()
    }
}

/// The mixed-batch scenario: the OPTIONS preflight is dropped at capture
/// time and both surviving matches come back in capture order.
#[test]
fn test_capture_filter_and_ordered_lookup() {
    let source = ScriptedSource::fixed(vec![
        RawExchange {
            method: "GET".to_string(),
            url: "https://x.com/api/a".to_string(),
            status_code: "200".to_string(),
            response_content_type: "application/json".to_string(),
            response_body: Bytes::from_static(b"{\"ok\":true}"),
            ..RawExchange::default()
        },
        raw("OPTIONS", "https://x.com/api/b"),
        raw("POST", "https://x.com/api/a?x=1"),
    ]);
    let mut cache = TrafficCache::new(source);

    cache.refresh().unwrap();
    assert_eq!(cache.len(), 2);

    let all = cache.find_all("api/a", UrlMatch::Substring).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].url, "https://x.com/api/a");
    assert_eq!(all[0].response_body, "{\"ok\":true}");
    assert_eq!(all[1].url, "https://x.com/api/a?x=1");

    assert!(cache
        .find("https://x.com/api/b", UrlMatch::Exact)
        .unwrap()
        .is_none());
}

/// An empty capture is a valid snapshot: refresh succeeds and lookups
/// report absence as a value, never an error.
#[test]
fn test_empty_source_is_not_an_error() {
    let source = ScriptedSource::fixed(vec![]);
    let mut cache = TrafficCache::new(source);

    cache.refresh().unwrap();
    assert!(cache.is_populated());
    assert_eq!(cache.len(), 0);

    assert!(cache.find("anything", UrlMatch::Substring).unwrap().is_none());
    assert!(cache.find_all("anything", UrlMatch::Substring).unwrap().is_empty());
}

/// A request that appears mid-flight is picked up by the polling lookup
/// without any caller-side refresh.
#[tokio::test]
async fn test_retry_waits_for_late_exchange() {
    init_tracing();
    let source = ScriptedSource::scripted(vec![
        vec![raw("GET", "https://x.com/home")],
        vec![raw("GET", "https://x.com/home")],
        vec![
            raw("GET", "https://x.com/home"),
            raw("POST", "https://x.com/api/graphql/CreateTweet"),
        ],
    ]);
    let mut cache = TrafficCache::new(source);

    let found = cache
        .find_with_retry(
            "CreateTweet",
            UrlMatch::Substring,
            RetryPolicy {
                timeout: Duration::from_secs(5),
                poll_interval: Duration::from_millis(10),
            },
        )
        .await
        .unwrap();

    assert_eq!(found.method, "POST");
}

/// A pattern that never appears fails with a timeout close to the deadline,
/// not unbounded.
#[tokio::test]
async fn test_retry_deadline_is_bounded() {
    init_tracing();
    let source = ScriptedSource::fixed(vec![raw("GET", "https://x.com/home")]);
    let mut cache = TrafficCache::new(source);

    let start = Instant::now();
    let result = cache
        .find_with_retry(
            "never-appears",
            UrlMatch::Substring,
            RetryPolicy {
                timeout: Duration::from_millis(200),
                poll_interval: Duration::from_millis(50),
            },
        )
        .await;

    let elapsed = start.elapsed();
    assert!(matches!(
        result,
        Err(TabtraceError::Timeout { ref pattern, .. }) if pattern == "never-appears"
    ));
    assert!(elapsed >= Duration::from_millis(200));
    assert!(elapsed < Duration::from_secs(2));
}

/// Headers parse on demand from the raw block of a returned exchange.
#[test]
fn test_header_access_on_found_exchange() {
    let source = ScriptedSource::fixed(vec![RawExchange {
        method: "GET".to_string(),
        url: "https://x.com/api/a".to_string(),
        status_code: "200".to_string(),
        request_headers: ":authority: x.com\nAuthorization: Bearer abc\nAccept: */*\n".to_string(),
        response_headers: ":status: 200\nContent-Type: text/html\nX-Foo: bar\n".to_string(),
        ..RawExchange::default()
    }]);
    let mut cache = TrafficCache::new(source);

    let exchange = cache.find("api/a", UrlMatch::Substring).unwrap().unwrap();

    assert_eq!(
        header_value(&exchange, HeaderSide::Response, "content-type").unwrap(),
        "text/html"
    );
    assert!(matches!(
        header_value(&exchange, HeaderSide::Response, ":status"),
        Err(TabtraceError::HeaderNotFound(_))
    ));
    assert_eq!(
        clean_request_headers(&exchange),
        "Authorization: Bearer abc\nAccept: */*"
    );
}

/// Clearing drops the snapshot; the next lookup repopulates from whatever
/// the tab has captured by then.
#[test]
fn test_clear_then_lazy_repopulate() {
    let source = ScriptedSource::scripted(vec![
        vec![raw("GET", "https://x.com/v1/session")],
        vec![raw("GET", "https://x.com/v2/session")],
    ]);
    let mut cache = TrafficCache::new(source);

    assert!(cache.find("v1/session", UrlMatch::Substring).unwrap().is_some());

    cache.clear();
    assert!(!cache.is_populated());

    assert!(cache.find("v1/session", UrlMatch::Substring).unwrap().is_none());
    assert!(cache.find("v2/session", UrlMatch::Substring).unwrap().is_some());
}
