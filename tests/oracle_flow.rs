//! End-to-end oracle request flows against a mock ledger.

mod common;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;

use oracle_client::config::KeyConfig;
use oracle_client::{DecodedField, MnemonicWallet, OracleClient, OracleError, OracleScript, Signer, ValidatorCounts};

use common::{start_mock_ledger, test_config, FixtureCodec, MockRequest, TEST_PRIVATE_KEY};

const VALUE_SCHEMA: &str = "{value:i64}/{value:i64}";
const PRICE_SCHEMA: &str = "{symbol:string}/{price:u64}";

fn script(id: u64, schema: &str) -> OracleScript {
    OracleScript::from_result(id, &json!({"name": "test script", "schema": schema})).unwrap()
}

fn tx_logs(request_id: &str) -> String {
    json!([{
        "msg_index": 0,
        "events": [
            {"type": "message", "attributes": [{"key": "action", "value": "request"}]},
            {"type": "raw_request", "attributes": [{"key": "data_source_id", "value": "1"}]},
            {"type": "request", "attributes": [{"key": "id", "value": request_id}]}
        ]
    }])
    .to_string()
}

fn account_body(address: &str) -> String {
    json!({
        "height": "100",
        "result": {
            "type": "cosmos-sdk/Account",
            "value": {"address": address, "account_number": "7", "sequence": "3"}
        }
    })
    .to_string()
}

fn wallet() -> MnemonicWallet {
    MnemonicWallet::from_private_key(TEST_PRIVATE_KEY, &KeyConfig::default()).unwrap()
}

fn recorder() -> (Arc<Mutex<Vec<MockRequest>>>, Arc<Mutex<Vec<MockRequest>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    (seen.clone(), seen)
}

#[tokio::test]
async fn test_get_oracle_script() {
    let addr = start_mock_ledger(|req| {
        if req.path == "/oracle/oracle_scripts/1" {
            let body = json!({
                "height": "5",
                "result": {"id": "1", "owner": "band1owner", "name": "Echo", "schema": VALUE_SCHEMA}
            });
            (200, body.to_string())
        } else {
            (404, r#"{"error":"oracle script not found"}"#.to_string())
        }
    })
    .await;

    let client = OracleClient::new(test_config(addr), Arc::new(FixtureCodec)).unwrap();

    let found = client.get_oracle_script(1).await.unwrap();
    assert_eq!(found.id, 1);
    assert_eq!(found.schema, VALUE_SCHEMA);
    assert_eq!(found.name(), Some("Echo"));

    let err = client.get_oracle_script(2).await.unwrap_err();
    assert!(matches!(err, OracleError::NotFound(2)));
}

#[tokio::test]
async fn test_build_request_msg_with_fresh_account() {
    let addr = start_mock_ledger(|req| {
        if req.path.starts_with("/auth/accounts/") {
            // Sequence omitted for accounts that never sent a transaction.
            let body = json!({"result": {"type": "cosmos-sdk/Account", "value": {"account_number": "12"}}});
            (200, body.to_string())
        } else {
            (404, "{}".to_string())
        }
    })
    .await;

    let client = OracleClient::new(test_config(addr), Arc::new(FixtureCodec)).unwrap();
    let script = script(1, VALUE_SCHEMA);

    let calldata = client.encode_calldata(&script, &json!({"value": 42})).unwrap();
    assert_eq!(calldata, vec![0, 0, 0, 0, 0, 0, 0, 42]);

    let message = client
        .build_request_msg(&script, &json!({"value": 42}), ValidatorCounts::new(4, 3), "band1sender")
        .await
        .unwrap();

    assert_eq!(message.chain_id, "bandchain");
    assert_eq!(message.account_number, "12");
    assert_eq!(message.sequence, "0");
    assert_eq!(message.msgs.len(), 1);

    let request = &message.msgs[0];
    assert_eq!(request.msg_type, "oracle/Request");
    assert_eq!(request.value.oracle_script_id, "1");
    assert_eq!(request.value.calldata, STANDARD.encode([0u8, 0, 0, 0, 0, 0, 0, 42]));
    assert_eq!(request.value.ask_count, "4");
    assert_eq!(request.value.min_count, "3");
    assert_eq!(request.value.sender, "band1sender");
    assert_eq!(message.fee.amount[0].amount, "100");
    assert_eq!(message.fee.amount[0].denom, "uband");
    assert_eq!(message.fee.gas, "380000");
}

#[tokio::test]
async fn test_submit_request_tx_returns_request_id() {
    let wallet = wallet();
    let address = wallet.address().to_string();
    let tx_polls = Arc::new(AtomicU32::new(0));
    let (seen, log) = recorder();

    let polls = tx_polls.clone();
    let account = address.clone();
    let addr = start_mock_ledger(move |req| {
        log.lock().unwrap().push(req.clone());
        match (req.method.as_str(), req.path.as_str()) {
            ("GET", path) if path == format!("/auth/accounts/{}", account) => (200, account_body(&account)),
            ("POST", "/txs") => (200, json!({"height": "0", "txhash": "ABC123"}).to_string()),
            ("GET", "/txs/ABC123") => {
                if polls.fetch_add(1, Ordering::SeqCst) < 2 {
                    (404, r#"{"error":"tx not found"}"#.to_string())
                } else {
                    let body = json!({"height": "101", "txhash": "ABC123", "raw_log": tx_logs("17")});
                    (200, body.to_string())
                }
            }
            _ => (400, "unexpected".to_string()),
        }
    })
    .await;

    let client = OracleClient::new(test_config(addr), Arc::new(FixtureCodec)).unwrap();
    let request_id = client
        .submit_request_tx(&script(1, VALUE_SCHEMA), &json!({"value": 42}), ValidatorCounts::new(4, 3), &wallet)
        .await
        .unwrap();

    assert_eq!(request_id, "17");
    assert_eq!(tx_polls.load(Ordering::SeqCst), 3);

    let requests = seen.lock().unwrap().clone();
    let posts: Vec<_> = requests.iter().filter(|r| r.method == "POST").collect();
    assert_eq!(posts.len(), 1);

    let body: serde_json::Value = serde_json::from_str(&posts[0].body).unwrap();
    assert_eq!(body["mode"], "block");
    assert_eq!(body["tx"]["memo"], "");
    assert_eq!(body["tx"]["msg"][0]["type"], "oracle/Request");
    assert_eq!(body["tx"]["msg"][0]["value"]["sender"], address.as_str());

    let signature = &body["tx"]["signatures"][0];
    assert_eq!(signature["account_number"], "7");
    assert_eq!(signature["sequence"], "3");
    assert_eq!(STANDARD.decode(signature["signature"].as_str().unwrap()).unwrap().len(), 64);

    let pub_key = STANDARD.decode(signature["pub_key"].as_str().unwrap()).unwrap();
    assert_eq!(&pub_key[..5], &[0xeb, 0x5a, 0xe9, 0x87, 0x21]);
    assert_eq!(&pub_key[5..], wallet.public_key());
}

#[tokio::test]
async fn test_rejected_transaction_is_not_polled() {
    let wallet = wallet();
    let (seen, log) = recorder();
    let addr = start_mock_ledger(move |req| {
        log.lock().unwrap().push(req.clone());
        match req.method.as_str() {
            "POST" => {
                let body = json!({"txhash": "DEAD", "code": 4, "raw_log": "unauthorized: signature verification failed"});
                (200, body.to_string())
            }
            _ if req.path.starts_with("/auth/accounts/") => (200, account_body("band1x")),
            _ => (200, json!({"raw_log": tx_logs("1")}).to_string()),
        }
    })
    .await;

    let client = OracleClient::new(test_config(addr), Arc::new(FixtureCodec)).unwrap();
    let err = client
        .submit_request_tx(&script(1, VALUE_SCHEMA), &json!({"value": 1}), ValidatorCounts::new(1, 1), &wallet)
        .await
        .unwrap_err();

    match err {
        OracleError::RejectedTransaction { code, raw_log } => {
            assert_eq!(code, 4);
            assert!(raw_log.contains("signature verification failed"));
        }
        other => panic!("expected rejected transaction, got {:?}", other),
    }

    let requests = seen.lock().unwrap().clone();
    assert!(requests.iter().all(|r| !r.path.starts_with("/txs/")));
}

#[tokio::test]
async fn test_broadcast_failure_is_not_retried() {
    let wallet = wallet();
    let posts = Arc::new(AtomicU32::new(0));
    let counter = posts.clone();
    let addr = start_mock_ledger(move |req| {
        if req.method == "POST" {
            counter.fetch_add(1, Ordering::SeqCst);
            (500, "node overloaded".to_string())
        } else {
            (200, account_body("band1x"))
        }
    })
    .await;

    let client = OracleClient::new(test_config(addr), Arc::new(FixtureCodec)).unwrap();
    let err = client
        .submit_request_tx(&script(1, VALUE_SCHEMA), &json!({"value": 1}), ValidatorCounts::new(1, 1), &wallet)
        .await
        .unwrap_err();

    match err {
        OracleError::Broadcast { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "node overloaded");
        }
        other => panic!("expected broadcast error, got {:?}", other),
    }
    assert_eq!(posts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_encoding_failure_sends_nothing() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let addr = start_mock_ledger(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        (200, "{}".to_string())
    })
    .await;

    let client = OracleClient::new(test_config(addr), Arc::new(FixtureCodec)).unwrap();
    let err = client
        .submit_request_tx(&script(1, VALUE_SCHEMA), &json!({"other": 1}), ValidatorCounts::new(1, 1), &wallet())
        .await
        .unwrap_err();

    assert!(matches!(err, OracleError::Codec(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_last_matching_request_result() {
    let searches = Arc::new(AtomicU32::new(0));
    let (seen, log) = recorder();
    let counter = searches.clone();
    let addr = start_mock_ledger(move |req| {
        log.lock().unwrap().push(req.clone());
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            // Matching request found but not resolved yet.
            let body = json!({"result": {"result": {"RequestPacketData": {"oracle_script_id": "8"}}}});
            return (200, body.to_string());
        }
        let body = json!({
            "height": "300",
            "result": {
                "result": {
                    "RequestPacketData": {"oracle_script_id": "8", "ask_count": "4", "min_count": "3"},
                    "ResponsePacketData": {
                        "request_id": "55",
                        "ans_count": "4",
                        "resolve_status": 1,
                        "result": STANDARD.encode(100_000_000u64.to_be_bytes())
                    }
                }
            }
        });
        (200, body.to_string())
    })
    .await;

    let client = OracleClient::new(test_config(addr), Arc::new(FixtureCodec)).unwrap();
    let matching = client
        .get_last_matching_request_result(&script(8, PRICE_SCHEMA), &json!({"symbol": "BTC"}), 3, 4)
        .await
        .unwrap();

    assert_eq!(matching.fields, vec![DecodedField::new("price", "100000000")]);
    assert_eq!(
        matching.response_packet["result"],
        json!([{"fieldName": "price", "fieldValue": "100000000"}])
    );
    assert_eq!(matching.response_packet["request_id"], "55");
    assert_eq!(matching.request_packet.unwrap()["oracle_script_id"], "8");
    assert_eq!(searches.load(Ordering::SeqCst), 2);

    // BTC as a length-prefixed string.
    let calldata = hex::encode([0, 0, 0, 3, b'B', b'T', b'C']);
    let requests = seen.lock().unwrap().clone();
    assert_eq!(
        requests[0].path,
        format!("/oracle/request_search?oid=8&calldata={}&min_count=3&ask_count=4", calldata)
    );
}

#[tokio::test]
async fn test_undecodable_result_is_fatal() {
    let searches = Arc::new(AtomicU32::new(0));
    let counter = searches.clone();
    let addr = start_mock_ledger(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        let body = json!({"result": {"result": {"ResponsePacketData": {"result": STANDARD.encode([1u8, 2, 3])}}}});
        (200, body.to_string())
    })
    .await;

    let client = OracleClient::new(test_config(addr), Arc::new(FixtureCodec)).unwrap();
    let err = client
        .get_last_matching_request_result(&script(8, PRICE_SCHEMA), &json!({"symbol": "BTC"}), 3, 4)
        .await
        .unwrap_err();

    assert!(matches!(err, OracleError::Codec(_)));
    assert_eq!(searches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_request_outcome_waits_for_both() {
    let proof_polls = Arc::new(AtomicU32::new(0));
    let counter = proof_polls.clone();
    let addr = start_mock_ledger(move |req| match req.path.as_str() {
        "/oracle/requests/17" => (200, json!({"result": {"result": {"ans_count": "4"}}}).to_string()),
        "/bandchain/proof/17" => {
            if counter.fetch_add(1, Ordering::SeqCst) < 3 {
                (404, r#"{"error":"proof not ready"}"#.to_string())
            } else {
                (200, json!({"result": {"evmProofBytes": "0xabcdef"}}).to_string())
            }
        }
        _ => (400, "unexpected".to_string()),
    })
    .await;

    let client = OracleClient::new(test_config(addr), Arc::new(FixtureCodec)).unwrap();
    let outcome = client.get_request_outcome("17").await.unwrap();

    assert_eq!(outcome.request_id, "17");
    assert_eq!(outcome.result["ans_count"], "4");
    assert_eq!(outcome.proof, "0xabcdef");
    assert_eq!(proof_polls.load(Ordering::SeqCst), 4);
}
