use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Start a listener that accepts connections and never answers. Returns its
/// base URL.
pub async fn silent_upstream() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}", addr)
}

pub fn client_with_timeout(timeout: Duration) -> Arc<reqwest::Client> {
    Arc::new(reqwest::Client::builder().timeout(timeout).build().unwrap())
}
