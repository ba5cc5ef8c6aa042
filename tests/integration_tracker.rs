use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use blocktracker::analysis::{AnalysisError, FlowTracker};
use blocktracker::chain::FetchError;
use blocktracker::config::TrackerConfig;
use blocktracker::models::Currency;

fn eth_config(base_url: &str) -> TrackerConfig {
    let mut config = TrackerConfig::default();
    config.etherscan.base_url = base_url.to_string();
    config.etherscan.api_key = Some("test-key".to_string());
    config
}

fn btc_config(base_url: &str) -> TrackerConfig {
    let mut config = TrackerConfig::default();
    config.bitcoin.base_url = base_url.to_string();
    config
}

fn trx_config(base_url: &str) -> TrackerConfig {
    let mut config = TrackerConfig::default();
    config.tron.base_url = base_url.to_string();
    config
}

fn etherscan_envelope(records: Value) -> Value {
    json!({
        "status": "1",
        "message": "OK",
        "result": records
    })
}

fn eth_record(hash: &str, from: &str, to: &str, value_wei: &str, timestamp: u64, block: u64) -> Value {
    json!({
        "hash": hash,
        "from": from,
        "to": to,
        "value": value_wei,
        "timeStamp": timestamp.to_string(),
        "blockNumber": block.to_string()
    })
}

/// Full Ethereum pipeline: fetch, per-record parsing with skips, graph
/// construction, ranking and summary statistics.
#[tokio::test]
async fn test_ethereum_analysis_end_to_end() {
    let mock_server = MockServer::start().await;

    // Two forward hops, one incoming transfer and one record with a
    // value that does not parse (skipped with a warning)
    let records = json!([
        eth_record("0xh1", "0xsource", "0xhopa", "1000000000000000000", 1640995200, 14000000),
        eth_record("0xh2", "0xhopa", "0xterminal", "500000000000000000", 1640995260, 14000001),
        eth_record("0xbad", "0xsource", "0xhopa", "garbage", 1640995300, 14000002),
        eth_record("0xh3", "0xfunder", "0xsource", "250000000000000000", 1640995320, 14000003),
    ]);

    Mock::given(method("GET"))
        .and(path("/api"))
        .and(query_param("module", "account"))
        .and(query_param("action", "txlist"))
        .and(query_param("address", "0xsource"))
        .respond_with(ResponseTemplate::new(200).set_body_json(etherscan_envelope(records)))
        .mount(&mock_server)
        .await;

    let tracker = FlowTracker::new(eth_config(&mock_server.uri()));
    let analysis = tracker
        .analyze("0xsource", None)
        .await
        .expect("analysis should succeed");

    assert_eq!(analysis.address, "0xsource");
    assert_eq!(analysis.currency, Currency::Eth);
    assert_eq!(analysis.total_transactions, 3, "malformed record is skipped");
    assert_eq!(analysis.incoming_transactions, 1);
    assert_eq!(analysis.outgoing_transactions, 1);
    assert!((analysis.total_volume - 1.75).abs() < 1e-9);

    // The graph covers every address seen in the surviving transfers
    assert_eq!(analysis.graph.node_count(), 4);
    assert_eq!(analysis.graph.edge_count(), 3);

    // The only terminal reachable from the source sits two hops away
    assert_eq!(analysis.end_receivers.len(), 1);
    assert_eq!(analysis.end_receivers[0].address, "0xterminal");
    assert!((analysis.end_receivers[0].probability - 0.64).abs() < 1e-9);

    // Upstream ordering is preserved
    assert_eq!(analysis.transactions[0].tx_hash, "0xh1");
    assert_eq!(analysis.transactions[2].tx_hash, "0xh3");
}

/// Nearer terminals outrank farther ones in the candidate list.
#[tokio::test]
async fn test_ranking_orders_nearer_terminals_first() {
    let mock_server = MockServer::start().await;

    let records = json!([
        eth_record("0xh1", "0xsource", "0xnear", "1000000000000000000", 1640995200, 14000000),
        eth_record("0xh2", "0xsource", "0xhop", "1000000000000000000", 1640995260, 14000001),
        eth_record("0xh3", "0xhop", "0xfar", "1000000000000000000", 1640995320, 14000002),
    ]);

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(etherscan_envelope(records)))
        .mount(&mock_server)
        .await;

    let tracker = FlowTracker::new(eth_config(&mock_server.uri()));
    let analysis = tracker
        .analyze("0xsource", None)
        .await
        .expect("analysis should succeed");

    assert_eq!(analysis.end_receivers.len(), 2);
    assert_eq!(analysis.end_receivers[0].address, "0xnear");
    assert!((analysis.end_receivers[0].probability - 0.8).abs() < 1e-9);
    assert_eq!(analysis.end_receivers[1].address, "0xfar");
    assert!((analysis.end_receivers[1].probability - 0.64).abs() < 1e-9);
}

/// Without an API key the Ethereum adapter never calls upstream and the
/// analysis reports no transactions.
#[tokio::test]
async fn test_ethereum_missing_api_key_skips_upstream() {
    let mock_server = MockServer::start().await;

    // Expect zero calls; MockServer verifies this on shutdown
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(etherscan_envelope(json!([]))))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = eth_config(&mock_server.uri());
    config.etherscan.api_key = None;

    let tracker = FlowTracker::new(config);
    let result = tracker.analyze("0xsource", None).await;

    assert!(matches!(result, Err(AnalysisError::NoTransactions)));
}

/// An Etherscan error envelope (status "0") is treated as an empty listing,
/// not a transport failure.
#[tokio::test]
async fn test_etherscan_error_envelope_yields_no_transactions() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Max rate limit reached"
        })))
        .mount(&mock_server)
        .await;

    let tracker = FlowTracker::new(eth_config(&mock_server.uri()));
    let result = tracker.analyze("0xsource", None).await;

    assert!(matches!(result, Err(AnalysisError::NoTransactions)));
}

/// A non-2xx upstream answer surfaces as a fetch error carrying the status.
#[tokio::test]
async fn test_upstream_http_error_maps_to_fetch_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&mock_server)
        .await;

    let tracker = FlowTracker::new(eth_config(&mock_server.uri()));
    let result = tracker.analyze("0xsource", None).await;

    assert!(matches!(
        result,
        Err(AnalysisError::Fetch(FetchError::Status { status: 503 }))
    ));
}

/// A body that is not JSON at all is a fetch error, not a panic.
#[tokio::test]
async fn test_malformed_upstream_body_is_a_fetch_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let tracker = FlowTracker::new(eth_config(&mock_server.uri()));
    let result = tracker.analyze("0xsource", None).await;

    assert!(matches!(result, Err(AnalysisError::Fetch(_))));
}

/// Bitcoin analysis issues the summary call first, then the listing, and
/// produces simplified placeholder transfers.
#[tokio::test]
async fn test_bitcoin_two_step_fetch() {
    let mock_server = MockServer::start().await;
    let address = "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh";

    Mock::given(method("GET"))
        .and(path(format!("/address/{}", address)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chain_stats": { "tx_count": 3 }
        })))
        .mount(&mock_server)
        .await;

    // One unconfirmed transaction in the middle; it carries no block data
    Mock::given(method("GET"))
        .and(path(format!("/address/{}/txs", address)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "txid": "btc-1", "status": { "block_time": 1640995200, "block_height": 700000 } },
            { "txid": "btc-2", "status": {} },
            { "txid": "btc-3", "status": { "block_time": 1640995300, "block_height": 700001 } }
        ])))
        .mount(&mock_server)
        .await;

    let tracker = FlowTracker::new(btc_config(&mock_server.uri()));
    let analysis = tracker
        .analyze(address, None)
        .await
        .expect("analysis should succeed");

    assert_eq!(analysis.currency, Currency::Btc);
    assert_eq!(analysis.total_transactions, 2, "unconfirmed entry is dropped");
    assert_eq!(analysis.outgoing_transactions, 2);
    assert_eq!(analysis.incoming_transactions, 0);
    assert!((analysis.total_volume - 0.002).abs() < 1e-9);

    let first = &analysis.transactions[0];
    assert_eq!(first.tx_hash, "btc-1");
    assert_eq!(first.from_address, address);
    assert_eq!(first.to_address, "");
    assert_eq!(first.block_number, 700000);
    assert!((first.amount - 0.001).abs() < 1e-12);
}

/// An address with zero confirmed transactions never triggers the
/// listing call.
#[tokio::test]
async fn test_bitcoin_inactive_address_short_circuits() {
    let mock_server = MockServer::start().await;
    let address = "bc1qinactiveaddressxxxxxxxxxxxxxxxxxxxxxxx";

    Mock::given(method("GET"))
        .and(path(format!("/address/{}", address)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chain_stats": { "tx_count": 0 }
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/address/{}/txs", address)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let tracker = FlowTracker::new(btc_config(&mock_server.uri()));
    let result = tracker.analyze(address, None).await;

    assert!(matches!(result, Err(AnalysisError::NoTransactions)));
}

/// The fetch limit truncates the raw listing before the confirmation
/// filter runs, matching the upstream page semantics.
#[tokio::test]
async fn test_bitcoin_limit_applies_before_confirmation_filter() {
    let mock_server = MockServer::start().await;
    let address = "bc1qlimitedaddressxxxxxxxxxxxxxxxxxxxxxxxx";

    Mock::given(method("GET"))
        .and(path(format!("/address/{}", address)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chain_stats": { "tx_count": 3 }
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/address/{}/txs", address)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "txid": "btc-1", "status": { "block_time": 1640995200, "block_height": 700000 } },
            { "txid": "btc-2", "status": {} },
            { "txid": "btc-3", "status": { "block_time": 1640995300, "block_height": 700001 } }
        ])))
        .mount(&mock_server)
        .await;

    let mut config = btc_config(&mock_server.uri());
    config.fetch.max_transactions = 2;

    let tracker = FlowTracker::new(config);
    let analysis = tracker
        .analyze(address, None)
        .await
        .expect("analysis should succeed");

    // The confirmed third entry sits past the limit and never survives
    assert_eq!(analysis.total_transactions, 1);
    assert_eq!(analysis.transactions[0].tx_hash, "btc-1");
}

/// Tron analysis keeps only Transfer records, converts sun amounts and
/// millisecond timestamps, and skips records missing required fields.
#[tokio::test]
async fn test_tron_analysis_filters_and_converts() {
    let mock_server = MockServer::start().await;
    let address = "TJRabPrwbZy45sbavfcjinPJC18kjpRTv8";

    Mock::given(method("GET"))
        .and(path(format!("/v1/accounts/{}/transactions", address)))
        .and(query_param("limit", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "type": "Transfer",
                    "txID": "trx-1",
                    "from": address,
                    "to": "TReceiverWv5sbavfcjinPJC18kjpRTv8x",
                    "value": 2_500_000,
                    "block_timestamp": 1_640_995_200_000u64,
                    "block": 37000000
                },
                {
                    "type": "TriggerSmartContract",
                    "txID": "trx-contract",
                    "block_timestamp": 1_640_995_210_000u64
                },
                {
                    "type": "Transfer",
                    "txID": "trx-2",
                    "from": "TFunderWv5sbavfcjinPJC18kjpRTv8xyz",
                    "to": address,
                    "value": "1000000",
                    "block_timestamp": 1_640_995_260_000u64,
                    "block": 37000010
                },
                {
                    "type": "Transfer",
                    "value": 99,
                    "block_timestamp": 1_640_995_270_000u64
                }
            ]
        })))
        .mount(&mock_server)
        .await;

    let tracker = FlowTracker::new(trx_config(&mock_server.uri()));
    let analysis = tracker
        .analyze(address, None)
        .await
        .expect("analysis should succeed");

    assert_eq!(analysis.currency, Currency::Trx);
    assert_eq!(analysis.total_transactions, 2);
    assert_eq!(analysis.outgoing_transactions, 1);
    assert_eq!(analysis.incoming_transactions, 1);

    let first = &analysis.transactions[0];
    assert_eq!(first.tx_hash, "trx-1");
    assert!((first.amount - 2.5).abs() < 1e-9);
    assert_eq!(first.timestamp, 1_640_995_200);

    let second = &analysis.transactions[1];
    assert!((second.amount - 1.0).abs() < 1e-9);
}

/// Batch analysis keeps input order and carries per-address failures
/// without aborting the rest.
#[tokio::test]
async fn test_batch_analysis_preserves_order_and_isolates_failures() {
    let mock_server = MockServer::start().await;

    let records = json!([
        eth_record("0xh1", "0xbatchone", "0xdest", "1000000000000000000", 1640995200, 14000000),
    ]);
    Mock::given(method("GET"))
        .and(path("/api"))
        .and(query_param("address", "0xbatchone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(etherscan_envelope(records)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .and(query_param("address", "0xbatchthree"))
        .respond_with(ResponseTemplate::new(200).set_body_json(etherscan_envelope(json!([]))))
        .mount(&mock_server)
        .await;

    let tracker = FlowTracker::new(eth_config(&mock_server.uri()));
    let addresses = vec![
        "0xbatchone".to_string(),
        "addr1qxck4vz3g8sv0387a4kyk4vp8u".to_string(),
        "0xbatchthree".to_string(),
    ];

    let results = tracker.analyze_many(&addresses).await;

    assert_eq!(results.len(), 3);

    assert_eq!(results[0].0, "0xbatchone");
    let analysis = results[0].1.as_ref().expect("first address should succeed");
    assert_eq!(analysis.total_transactions, 1);

    assert_eq!(results[1].0, "addr1qxck4vz3g8sv0387a4kyk4vp8u");
    assert!(matches!(
        results[1].1,
        Err(AnalysisError::UnsupportedCurrency(Currency::Ada))
    ));

    assert_eq!(results[2].0, "0xbatchthree");
    assert!(matches!(results[2].1, Err(AnalysisError::NoTransactions)));
}
