//! テスト用のフィクスチャと最小HTTPサーバー

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tutor_openstack_cloud::CloudCredentials;

pub(crate) fn credentials() -> CloudCredentials {
    CloudCredentials {
        auth_url: "https://keystone.example.com:5000/v3".to_string(),
        username: "alice".to_string(),
        user_domain: "users".to_string(),
        password: "s3cret".to_string(),
        project_name: "edx".to_string(),
        project_domain: "projects".to_string(),
        region: Some("RegionOne".to_string()),
        interface: "public".to_string(),
    }
}

/// 接続ごとに指定ステータスを順に返すサーバー（最後のステータスを繰り返す）
pub(crate) struct StatusServer {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl StatusServer {
    pub(crate) async fn start(statuses: Vec<u16>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        let handle = tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let status = statuses
                    .get(n)
                    .or(statuses.last())
                    .copied()
                    .unwrap_or(200);

                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).await;

                let body = "{\"repositories\":[]}";
                let response = format!(
                    "HTTP/1.1 {} Fake\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self { addr, hits, handle }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub(crate) fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for StatusServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// 何もリッスンしていないローカルURL
pub(crate) async fn refused_url(path: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}{}", addr, path)
}
