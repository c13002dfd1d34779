//! Load testing for the download gateway.

use std::time::Instant;

use serde_json::json;

use sign_proxy::signing::{sign, Secret};

mod common;

use common::{FileReply, LinkReply};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_signed_downloads() {
    // 1. Setup mock storage API and file host
    let body: Vec<u8> = (0..=255u8).cycle().take(16 * 1024).collect();
    let upstream = common::start_mock_upstream(
        LinkReply::File { headers: json!({}) },
        FileReply::ok(body.clone()),
    )
    .await;

    // 2. Start gateway
    let gateway = common::start_gateway(common::gateway_config(&upstream.base_url())).await;

    // 3. Run load
    let concurrency = 20;
    let requests_per_task = 10;
    let total_requests = concurrency * requests_per_task;

    let client = common::client();
    let secret = Secret::from(common::UPSTREAM_TOKEN);
    let expiry = common::now_unix() + 600;
    let start = Instant::now();

    let mut tasks = Vec::new();
    for task in 0..concurrency {
        let client = client.clone();
        let path = format!("/load/{}.bin", task);
        let token = sign(&path, expiry, &secret);
        let url = gateway.url(&path);
        let expected = body.clone();
        tasks.push(tokio::spawn(async move {
            let mut latencies = Vec::new();
            for _ in 0..requests_per_task {
                let req_start = Instant::now();
                let res = client
                    .get(&url)
                    .query(&[("sign", token.as_str())])
                    .send()
                    .await
                    .expect("gateway unreachable");
                assert!(res.status().is_success(), "status {}", res.status());
                assert_eq!(res.bytes().await.unwrap().as_ref(), expected.as_slice());
                latencies.push(req_start.elapsed());
            }
            latencies
        }));
    }

    let mut all_latencies = Vec::new();
    for task in tasks {
        all_latencies.extend(task.await.unwrap());
    }

    let duration = start.elapsed();
    assert_eq!(all_latencies.len(), total_requests);
    assert_eq!(upstream.link_calls(), total_requests);
    assert_eq!(upstream.file_calls(), total_requests);

    all_latencies.sort();
    let p50 = all_latencies[all_latencies.len() / 2];
    let p99 = all_latencies[(all_latencies.len() as f64 * 0.99) as usize];

    println!("\n--- Load Test Results ---");
    println!("Total Requests: {}", total_requests);
    println!("Concurrency:    {}", concurrency);
    println!("Total Duration: {:?}", duration);
    println!(
        "Requests/sec:   {:.2}",
        total_requests as f64 / duration.as_secs_f64()
    );
    println!("P50 Latency:    {:?}", p50);
    println!("P99 Latency:    {:?}", p99);
    println!("-------------------------\n");
}
