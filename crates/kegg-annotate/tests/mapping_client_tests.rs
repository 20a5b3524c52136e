//! Integration tests for the UniProt ID-mapping client
//!
//! These tests exercise chunking, retry behavior, and row
//! de-duplication against a wiremock server.

use kegg_annotate::config::MappingConfig;
use kegg_annotate::idmapping::{MappingClient, MappingRow};
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(url: String) -> MappingConfig {
    MappingConfig {
        url,
        timeout: Duration::from_secs(5),
        chunk_size: 2,
        retry_delay: Duration::from_millis(10),
        max_retries: Some(5),
    }
}

fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn row(from: &str, to: &str) -> MappingRow {
    MappingRow {
        from: from.to_string(),
        to: to.to_string(),
    }
}

#[tokio::test]
async fn test_map_identifiers_single_chunk() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_string_contains("from=ACC%2BID"))
        .and(body_string_contains("to=KEGG_ID"))
        .and(body_string_contains("format=tab"))
        .and(body_string_contains("query=P0A9P0+P77580"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("From\tTo\nP0A9P0\teco:b0114\nP77580\teco:b1241\n"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = MappingClient::new(test_config(server.uri())).unwrap();
    let rows = client
        .map_identifiers("ACC+ID", "KEGG_ID", &ids(&["P0A9P0", "P77580"]))
        .await
        .unwrap();

    assert_eq!(
        rows,
        vec![row("P0A9P0", "eco:b0114"), row("P77580", "eco:b1241")]
    );
}

#[tokio::test]
async fn test_map_identifiers_chunks_and_dedups() {
    let server = MockServer::start().await;

    // Three identifiers with chunk_size 2 means two requests; both
    // responses share a row, which must appear once in the result.
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("From\tTo\nP0A9P0\teco:b0114\nP0A9P0\tecj:JW0110\n"),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = MappingClient::new(test_config(server.uri())).unwrap();
    let rows = client
        .map_identifiers("ACC+ID", "KEGG_ID", &ids(&["P0A9P0", "P77580", "P12345"]))
        .await
        .unwrap();

    assert_eq!(
        rows,
        vec![row("P0A9P0", "eco:b0114"), row("P0A9P0", "ecj:JW0110")]
    );
}

#[tokio::test]
async fn test_map_identifiers_retries_after_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("From\tTo\nP0A9P0\teco:b0114\n"))
        .mount(&server)
        .await;

    let client = MappingClient::new(test_config(server.uri())).unwrap();
    let rows = client
        .map_identifiers("ACC+ID", "KEGG_ID", &ids(&["P0A9P0"]))
        .await
        .unwrap();

    assert_eq!(rows, vec![row("P0A9P0", "eco:b0114")]);
}

#[tokio::test]
async fn test_map_identifiers_retries_on_unparseable_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("From\tTo\nP0A9P0\teco:b0114\n"))
        .mount(&server)
        .await;

    let client = MappingClient::new(test_config(server.uri())).unwrap();
    let rows = client
        .map_identifiers("ACC+ID", "KEGG_ID", &ids(&["P0A9P0"]))
        .await
        .unwrap();

    assert_eq!(rows, vec![row("P0A9P0", "eco:b0114")]);
}

#[tokio::test]
async fn test_map_identifiers_gives_up_after_retry_cap() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = MappingConfig {
        max_retries: Some(2),
        ..test_config(server.uri())
    };
    let client = MappingClient::new(config).unwrap();

    let result = client
        .map_identifiers("ACC+ID", "KEGG_ID", &ids(&["P0A9P0"]))
        .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("giving up on chunk 1/1"));
}

#[tokio::test]
async fn test_map_identifiers_empty_query_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("From\tTo\n"))
        .expect(0)
        .mount(&server)
        .await;

    let client = MappingClient::new(test_config(server.uri())).unwrap();
    let rows = client
        .map_identifiers("ACC+ID", "KEGG_ID", &[])
        .await
        .unwrap();

    assert!(rows.is_empty());
}
