use std::time::{Duration, Instant};

use tracker_engine::RateLimiter;

#[tokio::test]
async fn first_request_is_not_delayed() {
    let limiter = RateLimiter::new(Duration::from_millis(200), Duration::from_millis(300));
    let started = Instant::now();
    limiter.wait_before_next_request().await;
    assert!(started.elapsed() < Duration::from_millis(150));
}

#[tokio::test]
async fn consecutive_requests_are_spaced_by_at_least_the_minimum() {
    let limiter = RateLimiter::new(Duration::from_millis(60), Duration::from_millis(90));
    limiter.wait_before_next_request().await;
    let first = Instant::now();
    limiter.wait_before_next_request().await;
    let second = Instant::now();
    limiter.wait_before_next_request().await;
    let third = Instant::now();

    assert!(second - first >= Duration::from_millis(55));
    assert!(third - second >= Duration::from_millis(55));
}

#[tokio::test]
async fn concurrent_callers_share_one_schedule() {
    let limiter = std::sync::Arc::new(RateLimiter::new(
        Duration::from_millis(50),
        Duration::from_millis(50),
    ));
    let started = Instant::now();
    let tasks: Vec<_> = (0..3)
        .map(|_| {
            let limiter = limiter.clone();
            tokio::spawn(async move { limiter.wait_before_next_request().await })
        })
        .collect();
    for task in tasks {
        task.await.expect("task");
    }
    assert!(started.elapsed() >= Duration::from_millis(95));
}
