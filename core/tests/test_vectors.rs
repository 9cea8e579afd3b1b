//! Verify URL building and response classification against the JSON test
//! vectors in `test-vectors/`.
//!
//! Vectors are deserialized straight into typed cases rather than through
//! `serde_json::Value`, whose map would sort the query keys and hide ordering
//! bugs.

use serde::Deserialize;
use tradedoubler_core::{
    Configuration, ListEncoding, OutcomeKind, ProductsClient, QueryKeys, TransportError,
};

#[derive(Deserialize)]
struct Vectors {
    cases: Vec<Case>,
}

#[derive(Deserialize)]
struct Case {
    name: String,
    config: CaseConfig,
    query: QueryKeys,
    expected_url: String,
    simulated_response: String,
    expected_outcome: ExpectedOutcome,
    expected_body: Option<String>,
}

#[derive(Deserialize)]
struct CaseConfig {
    token: String,
    api_version: String,
    format: String,
    #[serde(default)]
    list_encoding: ListEncoding,
}

#[derive(Deserialize)]
struct ExpectedOutcome {
    status: u16,
    kind: OutcomeKind,
}

fn load() -> Vec<Case> {
    let raw = include_str!("../../test-vectors/search.json");
    serde_json::from_str::<Vectors>(raw).unwrap().cases
}

fn client_for(config: &CaseConfig) -> ProductsClient {
    let mut client =
        ProductsClient::with_config(Configuration::default().with_list_encoding(config.list_encoding));
    client.configure(config.token.as_str(), config.api_version.as_str(), &config.format);
    client
}

#[test]
fn build_url_vectors() {
    for case in load() {
        let client = client_for(&case.config);
        assert_eq!(client.build_search_url(&case.query), case.expected_url, "{}: url", case.name);
    }
}

#[test]
fn parse_response_vectors() {
    for case in load() {
        let mut client = client_for(&case.config);
        let body = client.parse_search_response(&case.simulated_response).unwrap();
        assert_eq!(body, case.expected_body, "{}: body", case.name);

        let outcome = client.last_outcome().unwrap();
        assert_eq!(outcome.status, case.expected_outcome.status, "{}: status", case.name);
        assert_eq!(outcome.kind, case.expected_outcome.kind, "{}: kind", case.name);
    }
}

#[test]
fn search_vectors_through_scripted_transport() {
    for case in load() {
        let mut client = client_for(&case.config);
        let expected_url = case.expected_url.clone();
        let response = case.simulated_response.clone();
        let transport = move |url: &str| -> Result<String, TransportError> {
            assert_eq!(url, expected_url);
            Ok(response.clone())
        };

        let body = client.search(&transport, &case.query).unwrap();
        assert_eq!(body, case.expected_body, "{}: body", case.name);
        assert_eq!(
            client.last_outcome().map(|o| o.kind == OutcomeKind::Success),
            Some(body.is_some()),
            "{}: success iff body",
            case.name
        );
    }
}
