use fetch::{
    FetchError, HttpTransport, Payload, RequestController, RequestOptions,
    RequestParams,
};
use futures::poll;
use serde_json::json;
use std::net::TcpListener;
use std::time::{Duration, Instant};
use test_helpers::{
    ECHO_HEADER, FixtureServer, MAINTENANCE_REASON, SLOW_DELAY, product_fixture,
    spawn_fixture_server,
};

fn controller(
    server: &FixtureServer,
    path: &str,
) -> RequestController<HttpTransport> {
    RequestController::new(
        HttpTransport::default(),
        RequestParams::new(server.url(path)),
    )
}

#[tokio::test]
async fn fetches_json_products() -> anyhow::Result<()> {
    let server = spawn_fixture_server().await;
    let controller = controller(&server, "/products");

    controller.refetch().await;

    let state = controller.state();
    assert_eq!(state.error, None);
    assert_eq!(state.data, Some(Payload::Json(product_fixture())));
    assert!(!state.loading);
    Ok(())
}

#[tokio::test]
async fn fetches_plain_text() -> anyhow::Result<()> {
    let server = spawn_fixture_server().await;
    let controller = controller(&server, "/hello");

    controller.refetch().await;

    assert_eq!(controller.state().data, Some(Payload::Text("hello".into())));
    Ok(())
}

#[tokio::test]
async fn not_found_carries_status_text() -> anyhow::Result<()> {
    let server = spawn_fixture_server().await;
    let controller = controller(&server, "/missing");

    controller.refetch().await;

    assert_eq!(
        controller.state().error,
        Some(FetchError::RequestFailed {
            status: 404,
            status_text: "Not Found".into(),
        })
    );
    assert_eq!(controller.state().data, None);
    Ok(())
}

#[tokio::test]
async fn server_reason_phrase_is_kept() -> anyhow::Result<()> {
    let server = spawn_fixture_server().await;
    let controller = controller(&server, "/maintenance");

    controller.refetch().await;

    let error = controller.state().error.expect("error should be set");
    assert_eq!(
        error,
        FetchError::RequestFailed {
            status: 503,
            status_text: MAINTENANCE_REASON.into(),
        }
    );
    assert_eq!(
        error.to_string(),
        format!("Request failed: 503 {MAINTENANCE_REASON}")
    );
    Ok(())
}

#[tokio::test]
async fn invalid_json_body_is_a_decode_error() -> anyhow::Result<()> {
    let server = spawn_fixture_server().await;
    let controller = controller(&server, "/broken");

    controller.refetch().await;

    assert!(matches!(
        controller.state().error,
        Some(FetchError::Decode(_))
    ));
    Ok(())
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() -> anyhow::Result<()> {
    test_helpers::init_tracing();
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        listener.local_addr()?.port()
    };
    let controller = RequestController::new(
        HttpTransport::default(),
        RequestParams::new(format!("http://127.0.0.1:{port}/products")),
    );

    controller.refetch().await;

    assert!(matches!(
        controller.state().error,
        Some(FetchError::Transport(_))
    ));
    Ok(())
}

#[tokio::test]
async fn invalid_method_is_a_transport_error() -> anyhow::Result<()> {
    let server = spawn_fixture_server().await;
    let controller = RequestController::new(
        HttpTransport::default(),
        RequestParams::new(server.url("/hello"))
            .with_options(RequestOptions::default().method("NOT A METHOD")),
    );

    controller.refetch().await;

    assert!(matches!(
        controller.state().error,
        Some(FetchError::Transport(_))
    ));
    Ok(())
}

#[tokio::test]
async fn options_are_sent() -> anyhow::Result<()> {
    let server = spawn_fixture_server().await;
    let controller = RequestController::new(
        HttpTransport::default(),
        RequestParams::new(server.url("/echo")).with_options(
            RequestOptions::default()
                .method("POST")
                .header(ECHO_HEADER, "ping")
                .body("payload"),
        ),
    );

    controller.refetch().await;

    assert_eq!(
        controller.state().data,
        Some(Payload::Json(json!({
            "method": "POST",
            "header": "ping",
            "body": "payload",
        })))
    );
    Ok(())
}

#[tokio::test]
async fn timeout_option_is_applied() -> anyhow::Result<()> {
    let server = spawn_fixture_server().await;
    let controller = RequestController::new(
        HttpTransport::default(),
        RequestParams::new(server.url("/slow")).with_options(
            RequestOptions::default().timeout(Duration::from_millis(100)),
        ),
    );

    let started = Instant::now();
    controller.refetch().await;

    assert!(started.elapsed() < SLOW_DELAY);
    assert!(matches!(
        controller.state().error,
        Some(FetchError::Transport(_))
    ));
    Ok(())
}

#[tokio::test]
async fn switching_away_aborts_the_slow_request() -> anyhow::Result<()> {
    let server = spawn_fixture_server().await;
    let controller = controller(&server, "/slow");

    let started = Instant::now();
    let mut slow = controller.refetch();
    assert!(poll!(&mut slow).is_pending());

    let hello = controller
        .set_params(RequestParams::new(server.url("/hello")))
        .expect("url changed");
    hello.await;
    slow.await;

    assert!(started.elapsed() < SLOW_DELAY);
    assert_eq!(controller.state().data, Some(Payload::Text("hello".into())));
    assert_eq!(controller.state().error, None);
    Ok(())
}
