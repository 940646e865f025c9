// Server module entry point
// Listener setup, accept loop, per-connection serving and signal handling

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::start_server_loop;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppState, Config, Overrides};
    use crate::templates::TemplateEngine;
    use http_body_util::{BodyExt, Empty};
    use hyper::body::Bytes;
    use hyper::{Request, StatusCode};
    use hyper_util::client::legacy::Client;
    use hyper_util::rt::TokioExecutor;
    use std::net::SocketAddr;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpStream;

    fn spawn_server(
        template_dir: &std::path::Path,
    ) -> (SocketAddr, Arc<AppState>, tokio::task::JoinHandle<usize>) {
        spawn_server_with(template_dir, |_| {})
    }

    fn spawn_server_with(
        template_dir: &std::path::Path,
        tweak: impl FnOnce(&mut Config),
    ) -> (SocketAddr, Arc<AppState>, tokio::task::JoinHandle<usize>) {
        let mut config =
            Config::load_from("__no_such_config_file__", &Overrides::default()).unwrap();
        config.server.port = 0;
        config.logging.access_log = false;
        config.performance.shutdown_grace = 1;
        tweak(&mut config);

        let listener = create_listener(config.get_socket_addr().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(AppState::new(&config, TemplateEngine::new(template_dir, false)));
        let handle = tokio::spawn(start_server_loop(listener, Arc::clone(&state)));
        (addr, state, handle)
    }

    async fn wait_for_active(state: &AppState, expected: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while state.active_connections.load(Ordering::SeqCst) != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("active connections never reached {expected}"));
    }

    async fn get(addr: SocketAddr, path: &str) -> (StatusCode, Bytes) {
        let client = Client::builder(TokioExecutor::new()).build_http::<Empty<Bytes>>();
        let req = Request::get(format!("http://{addr}{path}"))
            .body(Empty::new())
            .unwrap();
        let resp = client.request(req).await.unwrap();
        let status = resp.status();
        (status, resp.into_body().collect().await.unwrap().to_bytes())
    }

    #[tokio::test]
    async fn test_end_to_end_routes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>{{ app_name }}</h1>").unwrap();
        let (addr, state, handle) = spawn_server(dir.path());

        let (status, body) = get(addr, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from_static(b"<h1>localstore-web</h1>"));

        let (status, body) = get(addr, "/api/data").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from_static(br#"{"status":"ok"}"#));

        let (status, body) = get(addr, "/api/export").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from_static(br#"{"status":"ok"}"#));

        let (status, _) = get(addr, "/nonexistent").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        state.request_shutdown();
        let remaining = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_shutdown_stops_accepting() {
        let dir = tempfile::tempdir().unwrap();
        let (addr, state, handle) = spawn_server(dir.path());

        state.request_shutdown();
        handle.await.unwrap();

        assert!(tokio::net::TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn test_connection_limit_rejects_extra() {
        let dir = tempfile::tempdir().unwrap();
        let (addr, state, handle) =
            spawn_server_with(dir.path(), |c| c.performance.max_connections = Some(1));

        let _held = TcpStream::connect(addr).await.unwrap();
        wait_for_active(&state, 1).await;

        let mut extra = TcpStream::connect(addr).await.unwrap();
        let mut buf = [0u8; 64];
        let n = tokio::time::timeout(Duration::from_secs(5), extra.read(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(n, 0);
        assert_eq!(state.active_connections.load(Ordering::SeqCst), 1);

        state.request_shutdown();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_idle_connection_is_closed() {
        let dir = tempfile::tempdir().unwrap();
        let (addr, state, handle) = spawn_server_with(dir.path(), |c| {
            c.performance.read_timeout = 1;
            c.performance.write_timeout = 1;
        });

        let mut idle = TcpStream::connect(addr).await.unwrap();
        wait_for_active(&state, 1).await;

        let mut buf = [0u8; 64];
        let n = tokio::time::timeout(Duration::from_secs(5), idle.read(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(n, 0);
        wait_for_active(&state, 0).await;

        state.request_shutdown();
        let remaining = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
