use matchfeed_api::{Charset, Client, Error};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn get_text_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/feed/51/2011/post_standing/post_standing_2.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<sports-content/>"))
        .mount(&mock_server)
        .await;

    let client = Client::new().unwrap();
    let url = format!(
        "{}/data/feed/51/2011/post_standing/post_standing_2.xml?cb=517837",
        mock_server.uri()
    );
    let body = client.get_text(&url, Charset::Utf8).await.unwrap();
    assert_eq!(body, "<sports-content/>");
}

#[tokio::test]
async fn get_text_sends_browser_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/germany/stuttgart/2011/"))
        .and(header("user-agent", "Mozilla/5.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new().unwrap();
    let url = format!("{}/germany/stuttgart/2011/", mock_server.uri());
    assert!(client.get_text(&url, Charset::Utf8).await.is_ok());
}

#[tokio::test]
async fn get_text_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::new().unwrap();
    let url = format!("{}/missing", mock_server.uri());
    let err = client.get_text(&url, Charset::Utf8).await.unwrap_err();
    match err {
        Error::HttpStatus { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn get_text_not_found_is_an_error() {
    let mock_server = MockServer::start().await;

    let client = Client::new().unwrap();
    let url = format!("{}/nothing-mounted", mock_server.uri());
    let err = client.get_text(&url, Charset::Utf8).await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn get_text_blank_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blank"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  \n\t "))
        .mount(&mock_server)
        .await;

    let client = Client::new().unwrap();
    let url = format!("{}/blank", mock_server.uri());
    let err = client.get_text(&url, Charset::Utf8).await.unwrap_err();
    assert!(matches!(err, Error::EmptyBody { .. }));
}

#[tokio::test]
async fn get_text_malformed_url() {
    let client = Client::new().unwrap();
    let err = client
        .get_text("not a url at all", Charset::Utf8)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidUrl { .. }));
}

#[tokio::test]
async fn get_text_connection_refused() {
    let client = Client::new().unwrap();
    // Port 9 (discard) is closed on test hosts.
    let err = client
        .get_text("http://127.0.0.1:9/", Charset::Utf8)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RequestFailed { .. }));
}

#[tokio::test]
async fn get_text_decodes_latin_body() {
    let mock_server = MockServer::start().await;

    // "M\u{f6}nchengladbach" encoded as ISO-8859-9 (single byte 0xF6).
    let bytes = b"<td>M\xf6nchengladbach</td>".to_vec();
    Mock::given(method("GET"))
        .and(path("/latin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
        .mount(&mock_server)
        .await;

    let client = Client::new().unwrap();
    let url = format!("{}/latin", mock_server.uri());
    let body = client.get_text(&url, Charset::Iso8859_9).await.unwrap();
    assert_eq!(body, "<td>Mönchengladbach</td>");
}
