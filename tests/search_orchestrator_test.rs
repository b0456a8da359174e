//! SearchOrchestrator source selection and variant iteration

mod utils;

use review_resolver::modules::retrieval::application::{
    SearchOptions, SearchOrchestrator, SERVICE_UNAVAILABLE_MESSAGE,
};
use review_resolver::modules::retrieval::domain::value_objects::{
    ProductSearchRequest, SearchSettings, SourcePreference,
};
use chrono::Utc;
use review_resolver::modules::retrieval::domain::entities::CacheEntry;
use review_resolver::modules::retrieval::domain::repositories::CacheStore;
use review_resolver::modules::retrieval::infrastructure::{
    cache::{InMemoryCacheStore, RetrievalCache},
    http_client::RetryPolicy,
};
use review_resolver::shared::errors::AppError;
use std::sync::Arc;
use std::time::Duration;
use utils::factories::{hits, VideoFactory};
use utils::fakes::{FakeProxy, FakeRewriter, ScriptedProvider};

fn orchestrator(provider: &Arc<ScriptedProvider>) -> SearchOrchestrator {
    SearchOrchestrator::new(provider.clone(), RetrievalCache::in_memory())
        .with_retry_policy(RetryPolicy::immediate(3))
}

fn with_key() -> SearchSettings {
    SearchSettings::default().with_api_key("user-key")
}

fn echo_dot() -> ProductSearchRequest {
    ProductSearchRequest::new("Echo Dot")
}

fn ids(results: &[review_resolver::VideoResult]) -> Vec<&str> {
    results.iter().map(|r| r.video_id.as_str()).collect()
}

#[tokio::test]
async fn proxy_quota_falls_through_to_direct_search() {
    let provider = Arc::new(ScriptedProvider::new().then(Ok(hits(&["direct"]))));
    let proxy = Arc::new(FakeProxy::quota_exceeded());
    let orchestrator = orchestrator(&provider).with_proxy(proxy.clone());

    let results = orchestrator
        .resolve_product_videos(&echo_dot(), &with_key())
        .await
        .expect("quota on the proxy must not reach the caller");

    assert_eq!(ids(&results), vec!["direct"]);
    assert_eq!(proxy.call_count(), 1);
    assert_eq!(provider.search_count(), 1);
}

#[tokio::test]
async fn proxy_success_short_circuits_direct_search() {
    let provider = Arc::new(ScriptedProvider::new());
    let proxy = Arc::new(FakeProxy::returning(Ok(vec![
        VideoFactory::new("few").views(5).build(),
        VideoFactory::new("many").views(500).build(),
    ])));
    let orchestrator = orchestrator(&provider).with_proxy(proxy);

    let results = orchestrator
        .resolve_product_videos(&echo_dot(), &with_key())
        .await
        .unwrap();

    assert_eq!(ids(&results), vec!["many", "few"]);
    assert_eq!(provider.search_count(), 0);
}

#[tokio::test]
async fn proxy_empty_success_is_an_empty_result() {
    let provider = Arc::new(ScriptedProvider::new());
    let orchestrator =
        orchestrator(&provider).with_proxy(Arc::new(FakeProxy::returning(Ok(vec![]))));

    let results = orchestrator
        .resolve_product_videos(&echo_dot(), &SearchSettings::default())
        .await
        .unwrap();

    assert!(results.is_empty());
    assert_eq!(provider.search_count(), 0);
}

#[tokio::test]
async fn proxy_request_carries_subtitle_and_ai_flag() {
    let provider = Arc::new(ScriptedProvider::new());
    let proxy = Arc::new(FakeProxy::returning(Ok(vec![VideoFactory::new("v").build()])));
    let orchestrator = orchestrator(&provider).with_proxy(proxy.clone());

    orchestrator
        .resolve_product_videos(
            &ProductSearchRequest::new("  Echo Dot ").with_subtitle(" 5th Gen "),
            &SearchSettings::default().prefer_ai(true),
        )
        .await
        .unwrap();

    let sent = proxy.requests.lock().unwrap()[0].clone();
    assert_eq!(sent.product_title, "Echo Dot");
    assert_eq!(sent.subtitle.as_deref(), Some("5th Gen"));
    assert!(sent.optimize_title);
}

#[tokio::test]
async fn no_credentials_and_failing_proxy_is_configuration_error() {
    let provider = Arc::new(ScriptedProvider::new());
    let orchestrator = orchestrator(&provider).with_proxy(Arc::new(FakeProxy::returning(Err(
        AppError::ExternalServiceError("connection refused".into()),
    ))));

    let err = orchestrator
        .resolve_product_videos(&echo_dot(), &SearchSettings::default())
        .await
        .unwrap_err();

    assert!(matches!(&err, AppError::ConfigurationError(msg) if msg == SERVICE_UNAVAILABLE_MESSAGE));
    assert!(err.user_message().contains("API key"));
}

#[tokio::test]
async fn no_credentials_and_no_proxy_is_configuration_error() {
    let provider = Arc::new(ScriptedProvider::new());
    let err = orchestrator(&provider)
        .resolve_product_videos(&echo_dot(), &SearchSettings::default().with_api_key("   "))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ConfigurationError(_)));
    assert_eq!(provider.search_count(), 0);
}

#[tokio::test]
async fn credentials_only_never_calls_proxy() {
    let provider = Arc::new(ScriptedProvider::new().then(Ok(hits(&["a"]))));
    let proxy = Arc::new(FakeProxy::returning(Ok(vec![VideoFactory::new("p").build()])));
    let orchestrator = orchestrator(&provider).with_proxy(proxy.clone());

    let results = orchestrator
        .resolve_product_videos(
            &echo_dot(),
            &with_key().with_preference(SourcePreference::CredentialsOnly),
        )
        .await
        .unwrap();

    assert_eq!(ids(&results), vec!["a"]);
    assert_eq!(proxy.call_count(), 0);
    assert_eq!(provider.api_keys.lock().unwrap()[0], "user-key");
}

#[tokio::test]
async fn credentials_only_skips_the_hosted_title_rewrite() {
    let provider = Arc::new(ScriptedProvider::new().then(Ok(hits(&["a"]))));
    let rewriter = Arc::new(FakeRewriter::returning(Ok("Echo Dot 5th Gen".into())));
    let orchestrator = orchestrator(&provider).with_title_rewriter(rewriter.clone());

    orchestrator
        .resolve_product_videos(
            &echo_dot(),
            &with_key()
                .with_preference(SourcePreference::CredentialsOnly)
                .prefer_ai(true),
        )
        .await
        .unwrap();

    assert_eq!(*rewriter.calls.lock().unwrap(), 0);
    assert_eq!(provider.queries()[0], "echo dot review");
}

#[tokio::test]
async fn refreshed_entry_survives_eviction_of_the_expired_one() {
    let provider = Arc::new(ScriptedProvider::new().then(Ok(hits(&["fresh"]))));
    let store = Arc::new(InMemoryCacheStore::new());
    store
        .write(
            "echo dot review",
            CacheEntry::fetched_at(
                vec![VideoFactory::new("old").build()],
                Utc::now() - chrono::Duration::hours(25),
            ),
        )
        .await
        .unwrap();
    let orchestrator = SearchOrchestrator::new(provider.clone(), RetrievalCache::new(store.clone()))
        .with_retry_policy(RetryPolicy::immediate(3));

    let results = orchestrator
        .resolve_product_videos(&echo_dot(), &with_key())
        .await
        .unwrap();
    assert_eq!(ids(&results), vec!["fresh"]);

    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    let cached = orchestrator
        .cache()
        .get("echo dot review", Duration::from_secs(24 * 3600))
        .await
        .expect("write-through entry must outlive the stale eviction");
    assert_eq!(ids(&cached), vec!["fresh"]);
    assert_eq!(store.len().await.unwrap(), 1);
}

#[tokio::test]
async fn credentials_preferred_tries_direct_first() {
    let provider = Arc::new(ScriptedProvider::new().then(Err(AppError::RateLimitError(
        "still throttled".into(),
    ))));
    let proxy = Arc::new(FakeProxy::returning(Ok(vec![VideoFactory::new("p").build()])));
    let orchestrator = orchestrator(&provider)
        .with_retry_policy(RetryPolicy::immediate(1))
        .with_proxy(proxy.clone());

    let results = orchestrator
        .resolve_product_videos(
            &echo_dot(),
            &with_key().with_preference(SourcePreference::UserCredentialPreferred),
        )
        .await
        .unwrap();

    assert_eq!(ids(&results), vec!["p"]);
    assert_eq!(provider.search_count(), 1);
    assert_eq!(proxy.call_count(), 1);
}

#[tokio::test]
async fn variants_are_tried_in_order_until_one_has_results() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .then(Ok(vec![]))
            .then(Ok(hits(&["low", "high"])))
            .then(Ok(hits(&["never"])))
            .with_views("low", 10)
            .with_views("high", 10_000),
    );

    let results = orchestrator(&provider)
        .resolve_product_videos(&echo_dot(), &with_key())
        .await
        .unwrap();

    assert_eq!(ids(&results), vec!["high", "low"]);
    assert_eq!(results[0].view_count, 10_000);
    assert_eq!(provider.queries(), vec!["echo dot review", "echo dot unboxing"]);
}

#[tokio::test]
async fn soft_failure_moves_on_to_next_variant() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .then(Err(AppError::HttpStatus {
                status: 500,
                message: "Backend Error".into(),
            }))
            .then(Ok(hits(&["second"]))),
    );

    let results = orchestrator(&provider)
        .resolve_product_videos(&echo_dot(), &with_key())
        .await
        .unwrap();

    assert_eq!(ids(&results), vec!["second"]);
}

#[tokio::test]
async fn exhausted_rate_limit_surfaces_without_trying_more_variants() {
    let throttled = || {
        Err(AppError::HttpStatus {
            status: 429,
            message: "rateLimitExceeded".into(),
        })
    };
    let provider = Arc::new(
        ScriptedProvider::new()
            .then(throttled())
            .then(throttled())
            .then(throttled())
            .then(Ok(hits(&["too-late"]))),
    );

    let err = orchestrator(&provider)
        .resolve_product_videos(&echo_dot(), &with_key())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::RateLimitError(_)));
    assert_eq!(provider.search_count(), 3);
}

#[tokio::test]
async fn everything_empty_is_an_empty_result_not_an_error() {
    let provider = Arc::new(ScriptedProvider::new());
    let results = orchestrator(&provider)
        .resolve_product_videos(&echo_dot(), &with_key())
        .await
        .unwrap();

    assert!(results.is_empty());
    assert!(provider.search_count() >= 2);
}

#[tokio::test]
async fn statistics_failure_keeps_results_with_zero_views() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .then(Ok(hits(&["a", "b"])))
            .failing_statistics(AppError::TimeoutError("stats".into())),
    );

    let results = orchestrator(&provider)
        .resolve_product_videos(&echo_dot(), &with_key())
        .await
        .unwrap();

    assert_eq!(ids(&results), vec!["a", "b"]);
    assert!(results.iter().all(|r| r.view_count == 0));
}

#[tokio::test]
async fn cache_serves_repeat_searches() {
    let provider = Arc::new(ScriptedProvider::new().then(Ok(hits(&["a"]))));
    let orchestrator = orchestrator(&provider);

    let first = orchestrator
        .resolve_product_videos(&echo_dot(), &with_key())
        .await
        .unwrap();
    let second = orchestrator
        .resolve_product_videos(&ProductSearchRequest::new("ECHO  DOT"), &with_key())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(provider.search_count(), 1);
}

#[tokio::test]
async fn bypass_cache_skips_read_but_still_writes() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .then(Ok(hits(&["old"])))
            .then(Ok(hits(&["new"]))),
    );
    let orchestrator = orchestrator(&provider);

    orchestrator
        .resolve_product_videos(&echo_dot(), &with_key())
        .await
        .unwrap();
    let bypassed = orchestrator
        .resolve_product_videos(&echo_dot(), &with_key().bypass_cache(true))
        .await
        .unwrap();
    let cached = orchestrator
        .resolve_product_videos(&echo_dot(), &with_key())
        .await
        .unwrap();

    assert_eq!(ids(&bypassed), vec!["new"]);
    assert_eq!(ids(&cached), vec!["new"]);
    assert_eq!(provider.search_count(), 2);
}

#[tokio::test]
async fn ai_rewrite_replaces_the_search_title() {
    let provider = Arc::new(ScriptedProvider::new().then(Ok(hits(&["a"]))));
    let rewriter = Arc::new(FakeRewriter::returning(Ok("Echo Dot 5th Gen".into())));
    let orchestrator = orchestrator(&provider).with_title_rewriter(rewriter.clone());

    orchestrator
        .resolve_product_videos(
            &ProductSearchRequest::new("Amazon Echo Dot Smart Speaker Bundle with Alexa"),
            &with_key().prefer_ai(true),
        )
        .await
        .unwrap();

    assert_eq!(*rewriter.calls.lock().unwrap(), 1);
    assert_eq!(provider.queries()[0], "echo dot 5th gen review");
}

#[tokio::test]
async fn failed_ai_rewrite_uses_the_original_title() {
    let provider = Arc::new(ScriptedProvider::new().then(Ok(hits(&["a"]))));
    let rewriter = Arc::new(FakeRewriter::returning(Err(AppError::ExternalServiceError(
        "model offline".into(),
    ))));
    let orchestrator = orchestrator(&provider).with_title_rewriter(rewriter);

    let results = orchestrator
        .resolve_product_videos(&echo_dot(), &with_key().prefer_ai(true))
        .await
        .unwrap();

    assert_eq!(ids(&results), vec!["a"]);
    assert_eq!(provider.queries()[0], "echo dot review");
}

#[tokio::test]
async fn rewrite_is_skipped_unless_requested() {
    let provider = Arc::new(ScriptedProvider::new().then(Ok(hits(&["a"]))));
    let rewriter = Arc::new(FakeRewriter::returning(Ok("Something Else".into())));
    let orchestrator = orchestrator(&provider).with_title_rewriter(rewriter.clone());

    orchestrator
        .resolve_product_videos(&echo_dot(), &with_key())
        .await
        .unwrap();

    assert_eq!(*rewriter.calls.lock().unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn slow_proxy_times_out_and_falls_through() {
    let provider = Arc::new(ScriptedProvider::new().then(Ok(hits(&["direct"]))));
    let proxy = Arc::new(
        FakeProxy::returning(Ok(vec![VideoFactory::new("late").build()]))
            .slow(Duration::from_secs(60)),
    );
    let orchestrator = orchestrator(&provider)
        .with_proxy(proxy)
        .with_options(SearchOptions {
            proxy_timeout: Duration::from_secs(20),
            ..SearchOptions::default()
        });

    let results = orchestrator
        .resolve_product_videos(&echo_dot(), &with_key())
        .await
        .unwrap();

    assert_eq!(ids(&results), vec!["direct"]);
}

#[tokio::test]
async fn blank_title_is_rejected() {
    let provider = Arc::new(ScriptedProvider::new());
    let err = orchestrator(&provider)
        .resolve_product_videos(&ProductSearchRequest::default(), &with_key())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
}
