//! Local HTTP stand-in for vCenter, used by the client tests.

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use tokio::net::TcpListener;

use crate::types::VsphereConfig;
use crate::vsphere::VsphereClient;

pub const SESSION_ID: &str = "5a1c0ffe-7e57-4c3a-9d2e-000000000001";

/// Serve `app` on an ephemeral loopback port; returns its base URL.
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn config_for(base_url: String) -> VsphereConfig {
    VsphereConfig {
        host: "127.0.0.1".into(),
        username: "administrator@vsphere.local".into(),
        password: "VMware1!".into(),
        task_poll_interval_ms: 0,
        base_url: Some(base_url),
        ..Default::default()
    }
}

/// `routes` plus a session endpoint that always accepts.
pub fn with_session(routes: Router) -> Router {
    routes.route(
        "/api/session",
        post(|| async { Json(SESSION_ID) })
            .get(|| async { Json(SESSION_ID) })
            .delete(|| async { StatusCode::NO_CONTENT }),
    )
}

pub async fn connected_client(routes: Router) -> VsphereClient {
    connected_client_with(routes, |_| {}).await
}

pub async fn connected_client_with(
    routes: Router,
    tweak: impl FnOnce(&mut VsphereConfig),
) -> VsphereClient {
    let mut config = config_for(serve(with_session(routes)).await);
    tweak(&mut config);
    let mut client = VsphereClient::new(&config).unwrap();
    client.login().await.unwrap();
    client
}
