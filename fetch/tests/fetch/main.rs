mod http;

use fetch::{RequestController, RequestParams};
use test_helpers::MockTransport;

#[tokio::test]
async fn idle_controller_issues_nothing() -> anyhow::Result<()> {
    let transport = MockTransport::new();
    let controller =
        RequestController::new(transport.clone(), RequestParams::idle());

    controller.refetch().await;

    assert!(controller.state().is_idle());
    assert_eq!(transport.issued_count(), 0);

    Ok(())
}
