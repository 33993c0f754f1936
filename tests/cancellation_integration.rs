use std::net::SocketAddr;
use std::time::Duration;

use slow_responder::config::Config;
use slow_responder::handler::{RequestHandler, WORK_DELAY};
use slow_responder::server::ServerStats;
use slow_responder::Server;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinSet;
use tokio::time::{sleep, timeout, Instant};

const REQUEST: &[u8] = b"GET /anything HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n";

const POST_REQUEST: &[u8] =
    b"POST /other/path?x=1 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nX-Custom: 1\r\nContent-Length: 4\r\n\r\nbody";

async fn start_server(delay: Duration, config: Config) -> (SocketAddr, ServerStats) {
    let server = Server::bind(
        "127.0.0.1:0".parse().unwrap(),
        RequestHandler::new(delay),
        config,
    )
    .unwrap();
    let addr = server.local_addr().unwrap();
    let stats = server.stats();
    tokio::spawn(server.run());
    (addr, stats)
}

async fn send_request(addr: SocketAddr) -> TcpStream {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(REQUEST).await.unwrap();
    stream
}

async fn read_all(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    String::from_utf8(buf).unwrap()
}

async fn wait_until(cond: impl Fn() -> bool, within: Duration) -> bool {
    let deadline = Instant::now() + within;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        sleep(Duration::from_millis(10)).await;
    }
    cond()
}

fn assert_processed(response: &str) {
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "got: {response}");
    assert!(response.ends_with("\r\n\r\nrequest processed"), "got: {response}");
}

#[tokio::test]
async fn test_completes_after_fixed_delay() {
    let (addr, stats) = start_server(WORK_DELAY, Config::default()).await;

    let start = Instant::now();
    let mut stream = send_request(addr).await;
    let response = read_all(&mut stream).await;

    assert_processed(&response);
    assert!(start.elapsed() >= WORK_DELAY);
    assert!(wait_until(|| stats.in_flight() == 0, Duration::from_secs(1)).await);
}

#[tokio::test]
async fn test_method_path_and_body_are_ignored() {
    let delay = Duration::from_millis(200);
    let (addr, _stats) = start_server(delay, Config::default()).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(POST_REQUEST).await.unwrap();

    assert_processed(&read_all(&mut stream).await);
}

#[tokio::test]
async fn test_half_closed_client_gets_no_bytes() {
    let delay = Duration::from_secs(5);
    let (addr, stats) = start_server(delay, Config::default()).await;

    let start = Instant::now();
    let mut stream = send_request(addr).await;
    assert!(wait_until(|| stats.in_flight() == 1, Duration::from_secs(1)).await);

    sleep(Duration::from_millis(500)).await;
    stream.shutdown().await.unwrap();

    let response = timeout(delay, read_all(&mut stream)).await.unwrap();
    assert!(response.is_empty(), "got: {response}");
    assert!(start.elapsed() < delay);
    assert!(wait_until(|| stats.in_flight() == 0, Duration::from_secs(1)).await);
}

#[tokio::test]
async fn test_disconnect_cancels_handler() {
    let delay = Duration::from_secs(5);
    let (addr, stats) = start_server(delay, Config::default()).await;

    let stream = send_request(addr).await;
    assert!(wait_until(|| stats.in_flight() == 1, Duration::from_secs(1)).await);

    sleep(Duration::from_millis(500)).await;
    drop(stream);

    // Well before the delay: the handler gave up instead of finishing its work.
    assert!(wait_until(|| stats.in_flight() == 0, Duration::from_secs(1)).await);
    assert!(wait_until(|| stats.active_connections() == 0, Duration::from_secs(1)).await);
}

#[tokio::test]
async fn test_immediate_disconnect() {
    let delay = Duration::from_secs(5);
    let (addr, stats) = start_server(delay, Config::default()).await;

    drop(send_request(addr).await);
    sleep(Duration::from_millis(100)).await;

    assert!(
        wait_until(
            || stats.active_connections() == 0 && stats.in_flight() == 0,
            Duration::from_secs(1),
        )
        .await
    );
}

#[tokio::test]
async fn test_cancelled_request_does_not_affect_neighbour() {
    let delay = Duration::from_millis(800);
    let (addr, stats) = start_server(delay, Config::default()).await;

    let start = Instant::now();
    let mut kept = send_request(addr).await;
    let dropped = send_request(addr).await;
    assert!(wait_until(|| stats.in_flight() == 2, Duration::from_secs(1)).await);

    drop(dropped);
    assert!(wait_until(|| stats.in_flight() == 1, Duration::from_millis(500)).await);

    let response = read_all(&mut kept).await;
    assert_processed(&response);
    let elapsed = start.elapsed();
    assert!(elapsed >= delay);
    assert!(elapsed < delay * 2);
}

#[tokio::test]
async fn test_concurrent_requests_complete_independently() {
    let delay = Duration::from_millis(500);
    let (addr, _stats) = start_server(delay, Config::default()).await;

    let start = Instant::now();
    let mut requests = JoinSet::new();
    for _ in 0..100 {
        requests.spawn(async move {
            let sent = Instant::now();
            let mut stream = send_request(addr).await;
            let response = read_all(&mut stream).await;
            (response, sent.elapsed())
        });
    }

    let mut completed = 0;
    while let Some(result) = requests.join_next().await {
        let (response, elapsed) = result.unwrap();
        assert_processed(&response);
        assert!(elapsed >= delay);
        completed += 1;
    }

    assert_eq!(completed, 100);
    // Served side by side, not one after another.
    assert!(start.elapsed() < delay * 4);
}

#[tokio::test]
async fn test_connections_over_limit_are_dropped() {
    let mut config = Config::default();
    config.performance.max_connections = Some(1);
    let delay = Duration::from_secs(1);
    let (addr, stats) = start_server(delay, config).await;

    let mut first = send_request(addr).await;
    assert!(wait_until(|| stats.active_connections() == 1, Duration::from_secs(1)).await);

    let mut second = TcpStream::connect(addr).await.unwrap();
    let rejected = timeout(Duration::from_millis(500), read_all(&mut second))
        .await
        .unwrap();
    assert!(rejected.is_empty());

    assert_processed(&read_all(&mut first).await);
}
