//! Search round trips against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `ProductsClient`
//! through `UreqTransport` over real HTTP. Covers the success path and each
//! failure status the server can produce.

#![cfg(feature = "ureq")]

use tradedoubler_core::{
    decode_json, ApiError, Configuration, ListEncoding, OutcomeKind, ProductsClient, QueryKeys,
    ResponseFormat, UreqTransport,
};

use mock_server::{Catalog, DEMO_TOKEN};

/// Spawn the mock server on its own runtime and return its base URL.
fn start_server(catalog: Catalog) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::serve(listener, catalog).await
        })
        .unwrap();
    });

    format!("http://{addr}/")
}

fn client(host: &str) -> ProductsClient {
    ProductsClient::with_config(Configuration::default().with_host(host))
}

#[test]
fn search_lifecycle() {
    let catalog = Catalog::demo();
    let host = start_server(catalog.clone());
    let transport = UreqTransport::default();
    let mut client = client(&host);

    // Step 1: no filters returns the whole catalog.
    let body = client.search(&transport, &QueryKeys::new()).unwrap().unwrap();
    let value = decode_json(&body).unwrap();
    assert_eq!(value["productHeader"]["totalHits"], 5);
    assert_eq!(client.last_outcome().unwrap().kind, OutcomeKind::Success);

    // Step 2: scalar and list filters, typed decode.
    let keys = QueryKeys::new().with("category", "Shoes").with("id", ["1", "2"]);
    let page = client.fetch_products(&transport, &keys).unwrap();
    let names: Vec<&str> = page.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Trail running shoes", "Leather boots"]);
    let price = page.products[1].offers[0].current_price().unwrap();
    assert_eq!(price.value, "149.00");

    // Step 3: spaces and ampersands survive both list encodings when the
    // server reads lists the same way the client writes them.
    for (encoding, server_encoding) in [
        (ListEncoding::Single, mock_server::ListEncoding::Single),
        (ListEncoding::Double, mock_server::ListEncoding::Double),
    ] {
        let list_host = start_server(Catalog::demo().with_list_encoding(server_encoding));
        let mut c = ProductsClient::with_config(
            Configuration::default().with_host(&list_host).with_list_encoding(encoding),
        );
        let keys = QueryKeys::new().with("category", ["Home & Garden", "Toys"]);
        let page = c.fetch_products(&transport, &keys).unwrap();
        assert_eq!(page.product_header.total_hits, 2, "{encoding:?}");
    }

    // Step 4: xml comes back raw.
    client.configure(DEMO_TOKEN, "1.0", ".xml");
    let body = client
        .search(&transport, &QueryKeys::new().with("id", "4"))
        .unwrap()
        .unwrap();
    assert!(body.contains("<name>Wooden train set</name>"));
    assert_eq!(client.config().response_format, ResponseFormat::Xml);

    // Step 5: wrong version is NotFound.
    client.configure(DEMO_TOKEN, "9.9", "");
    assert!(client.search(&transport, &QueryKeys::new()).unwrap().is_none());
    assert_eq!(client.last_outcome().unwrap().kind, OutcomeKind::NotFound);

    // Step 6: malformed pageSize is BadFormat.
    client.configure(DEMO_TOKEN, "1.0", "");
    let keys = QueryKeys::new().with("pageSize", "many");
    assert!(client.search(&transport, &keys).unwrap().is_none());
    assert_eq!(client.last_outcome().unwrap().kind, OutcomeKind::BadFormat);

    // Step 7: bad token is a status outside the table.
    client.configure("not-a-token", "1.0", "");
    let err = client.fetch_products(&transport, &QueryKeys::new()).unwrap_err();
    match err {
        ApiError::Http(outcome) => {
            assert_eq!(outcome.status, 403);
            assert_eq!(outcome.kind, OutcomeKind::Unknown);
        }
        other => panic!("expected Http error, got {other:?}"),
    }

    // Step 8: offline server.
    client.configure(DEMO_TOKEN, "1.0", "");
    catalog.set_offline(true);
    assert!(client.search(&transport, &QueryKeys::new()).unwrap().is_none());
    assert_eq!(client.last_outcome().unwrap().kind, OutcomeKind::ServerOffline);

    // Step 9: back online.
    catalog.set_offline(false);
    assert!(client.search(&transport, &QueryKeys::new()).unwrap().is_some());
    assert_eq!(client.last_outcome().unwrap().status, 200);
}

#[test]
fn unreachable_host_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut client = client(&format!("http://{addr}/"));
    let err = client
        .search(&UreqTransport::default(), &QueryKeys::new())
        .unwrap_err();
    assert!(matches!(err, tradedoubler_core::TransportError::Request(_)));
    assert!(client.last_outcome().is_none());
}

/// Serve one fixed 200 response over a bare socket and return the base URL.
fn serve_once(body: String) -> String {
    use std::io::{Read, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        // The client may hang up early when it rejects the body.
        let _ = stream.write_all(head.as_bytes());
        let _ = stream.write_all(body.as_bytes());
    });

    format!("http://{addr}/")
}

fn padded_page(len: usize) -> String {
    let prefix = r#"{"productHeader":{"totalHits":0},"products":[],"padding":""#;
    let suffix = r#""}"#;
    let padding = "x".repeat(len - prefix.len() - suffix.len());
    format!("{prefix}{padding}{suffix}")
}

#[test]
fn bodies_past_ten_mib_are_read_whole() {
    let body = padded_page(11 * 1024 * 1024);
    let mut client = client(&serve_once(body.clone()));

    let received = client
        .search(&UreqTransport::default(), &QueryKeys::new())
        .unwrap()
        .unwrap();
    assert_eq!(received.len(), body.len());
    assert_eq!(decode_json(&received).unwrap()["productHeader"]["totalHits"], 0);
}

#[test]
fn body_limit_is_enforced() {
    let mut client = client(&serve_once(padded_page(4096)));
    let transport = UreqTransport::default().with_body_limit(1024);

    let err = client.search(&transport, &QueryKeys::new()).unwrap_err();
    assert!(matches!(err, tradedoubler_core::TransportError::Request(_)));
    assert!(client.last_outcome().is_none());
}
