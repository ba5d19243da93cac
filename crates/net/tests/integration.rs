//! Integration tests for net crate

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;
    use xscan_errors::{AuthError, Error, NetworkError, VersionError};
    use xscan_net::*;
    use xscan_types::{GraphScanRequest, ServiceConnection, ServiceVersion};

    fn client() -> NetClient {
        NetClient::new(NetConfig {
            retry_count: 0,
            retry_delay: Duration::from_millis(10),
            ..NetConfig::default()
        })
        .unwrap()
    }

    fn token_conn(base: &str) -> ServiceConnection {
        ServiceConnection::build(base, Some("secret-token"), None, None).unwrap()
    }

    #[tokio::test]
    async fn test_authenticate_with_token() {
        let server = MockServer::start_async().await;
        let ping = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/xscan/api/v1/system/ping")
                    .header("authorization", "Bearer secret-token");
                then.status(200).body("OK");
            })
            .await;

        let conn = token_conn(&server.url("/xscan"));
        let authed = authenticate(&client(), &conn).await.unwrap();

        ping.assert_async().await;
        assert_eq!(authed.base_url().as_str(), server.url("/xscan/"));
    }

    #[tokio::test]
    async fn test_authenticate_with_basic_credentials() {
        let server = MockServer::start_async().await;
        let ping = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/system/ping")
                    .header("authorization", "Basic YWRtaW46c2VjcmV0");
                then.status(200);
            })
            .await;

        let conn =
            ServiceConnection::build(&server.base_url(), None, Some("admin"), Some("secret"))
                .unwrap();
        authenticate(&client(), &conn).await.unwrap();
        ping.assert_async().await;
    }

    #[tokio::test]
    async fn test_authenticate_follows_redirect_to_canonical_url() {
        let server = MockServer::start_async().await;
        let new_ping = server.url("/canonical/api/v1/system/ping");
        server
            .mock_async(|when, then| {
                when.method(GET).path("/legacy/api/v1/system/ping");
                then.status(302).header("location", new_ping.as_str());
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/canonical/api/v1/system/ping");
                then.status(200);
            })
            .await;

        let conn = token_conn(&server.url("/legacy"));
        let authed = authenticate(&client(), &conn).await.unwrap();
        assert_eq!(authed.base_url().as_str(), server.url("/canonical/"));
        assert_eq!(authed.credential(), conn.credential());
    }

    #[tokio::test]
    async fn test_authenticate_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/system/ping");
                then.status(401).body("bad credentials");
            })
            .await;

        let conn = token_conn(&server.base_url());
        let err = authenticate(&client(), &conn).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Auth(AuthError::Rejected { status: 401, .. })
        ));
        assert!(err
            .to_string()
            .contains("failed while attempting to authenticate with"));
    }

    #[tokio::test]
    async fn test_authenticate_server_error_is_handshake_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/system/ping");
                then.status(503);
            })
            .await;

        let conn = token_conn(&server.base_url());
        let err = authenticate(&client(), &conn).await.unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::HandshakeFailed { .. })));
    }

    #[tokio::test]
    async fn test_authenticate_unreachable() {
        let conn = token_conn("http://127.0.0.1:1");
        let err = authenticate(&client(), &conn).await.unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::Unreachable { .. })));
    }

    #[tokio::test]
    async fn test_authenticate_unreachable_does_not_retry() {
        let patient = NetClient::new(NetConfig {
            retry_count: 3,
            retry_delay: Duration::from_secs(5),
            ..NetConfig::default()
        })
        .unwrap();
        let conn = token_conn("http://127.0.0.1:1");

        let err = tokio::time::timeout(Duration::from_secs(4), authenticate(&patient, &conn))
            .await
            .expect("handshake must fail without backoff")
            .unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::Unreachable { .. })));
    }

    #[tokio::test]
    async fn test_fetch_version() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/system/version")
                    .header("authorization", "Bearer secret-token");
                then.status(200)
                    .json_body(json!({"version": "3.29.2", "revision": "abc"}));
            })
            .await;

        let conn = token_conn(&server.base_url());
        let version = fetch_version(&client(), &conn).await.unwrap();
        assert_eq!(version, ServiceVersion::parse("3.29.2").unwrap());
    }

    #[tokio::test]
    async fn test_fetch_version_failures() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/broken/api/v1/system/version");
                then.status(500);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/garbage/api/v1/system/version");
                then.status(200).body("not json");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/weird/api/v1/system/version");
                then.status(200).json_body(json!({"version": "latest"}));
            })
            .await;

        let client = client();
        let err = fetch_version(&client, &token_conn(&server.url("/broken")))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Version(VersionError::FetchFailed { .. })));

        let err = fetch_version(&client, &token_conn(&server.url("/garbage")))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Version(VersionError::FetchFailed { .. })));

        let err = fetch_version(&client, &token_conn(&server.url("/weird")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Version(VersionError::InvalidVersion { .. })
        ));

        let err = fetch_version(&client, &token_conn("http://127.0.0.1:1"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Version(VersionError::FetchFailed { .. })));
    }

    #[tokio::test]
    async fn test_scan_graph() {
        let server = MockServer::start_async().await;
        let scan = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/scan/graph")
                    .header("authorization", "Bearer secret-token")
                    .body_contains("generic://sha256:abc/app.bin");
                then.status(200).json_body(json!({
                    "scan_id": "s-1",
                    "violations": [],
                    "vulnerabilities": [{"issue_id": "XRAY-1", "severity": "High"}],
                    "licenses": [{"key": "MIT"}]
                }));
            })
            .await;

        let conn = token_conn(&server.base_url());
        let request = GraphScanRequest::binary("app.bin", "abc".to_string(), true);
        let response = scan_graph(&client(), &conn, &request).await.unwrap();

        scan.assert_async().await;
        assert_eq!(response.scan_id, "s-1");
        assert_eq!(response.vulnerabilities.len(), 1);
        assert_eq!(response.licenses.len(), 1);
    }

    #[tokio::test]
    async fn test_scan_graph_null_arrays() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/scan/graph");
                then.status(200).body(
                    r#"{"scan_id":"g","violations":null,"vulnerabilities":null,"licenses":null}"#,
                );
            })
            .await;

        let conn = token_conn(&server.base_url());
        let request = GraphScanRequest::binary("app.bin", "abc".to_string(), true);
        let response = scan_graph(&client(), &conn, &request).await.unwrap();
        assert_eq!(response.scan_id, "g");
        assert!(response.violations.is_empty());
        assert!(response.licenses.is_empty());
    }

    #[tokio::test]
    async fn test_scan_graph_http_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/scan/graph");
                then.status(400).body("unsupported package type");
            })
            .await;

        let conn = token_conn(&server.base_url());
        let request = GraphScanRequest::binary("app.bin", "abc".to_string(), false);
        let err = scan_graph(&client(), &conn, &request).await.unwrap_err();
        match err {
            Error::Network(NetworkError::HttpError { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "unsupported package type");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_scan_graph_invalid_payload() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/scan/graph");
                then.status(200).json_body(json!({"violations": 7}));
            })
            .await;

        let conn = token_conn(&server.base_url());
        let request = GraphScanRequest::binary("app.bin", "abc".to_string(), false);
        let err = scan_graph(&client(), &conn, &request).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Network(NetworkError::InvalidResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/system/version");
                then.status(429).header("retry-after", "30");
            })
            .await;

        let conn = token_conn(&server.base_url());
        let url = conn.endpoint(VERSION_PATH).unwrap();
        let err = client().get(&url, None).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Network(NetworkError::RateLimited { seconds: 30 })
        ));
    }
}
