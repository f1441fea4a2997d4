//! HTTPバックエンド結合テスト
//!
//! ローカルの1回限りのサーバーに送信し、実際に送られたバイト列と
//! 応答の扱いを確認する

use ai_image_common::{FormState, GenerateRequest, ImageFile, ImageSlot};
use ai_image_studio::backend::{GenerateBackend, HttpBackend};
use ai_image_studio::config::parse_base_url;
use ai_image_studio::session::{Session, SubmitStatus};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// 1回だけ応答するサーバーを起動し、受け取ったリクエストを返す
async fn serve_once(status: &str, content_type: &str, body: &[u8]) -> (HttpBackend, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().expect("no local addr");

    let mut response = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept failed");
        let request = read_request(&mut socket).await;
        socket.write_all(&response).await.expect("write failed");
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).to_string()
    });

    let base_url = parse_base_url(&format!("http://{}", addr)).expect("invalid url");
    let backend = HttpBackend::new(base_url).expect("client build failed");
    (backend, server)
}

/// ヘッダと本文（Content-Length または chunked）を読み切る
async fn read_request(socket: &mut TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.expect("read failed");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok());

        match content_length {
            Some(len) if buf.len() >= header_end + 4 + len => break,
            Some(_) => {}
            None if headers.contains("transfer-encoding: chunked") => {
                if buf.ends_with(b"0\r\n\r\n") {
                    break;
                }
            }
            None => break,
        }
    }

    buf
}

fn prompt_request(prompt: &str) -> GenerateRequest {
    let mut state = FormState::default();
    state.set_prompt(prompt);
    GenerateRequest::from_state(&state).expect("valid state")
}

/// プロンプトのみ: face_swap=false と prompt だけを送る
#[tokio::test]
async fn test_prompt_only_wire_format() {
    let (backend, server) = serve_once("200 OK", "image/jpeg", b"JPEG").await;

    let reply = backend.generate(&prompt_request("a cat")).await.expect("request failed");
    let request = server.await.expect("server panicked");

    assert_eq!(reply.status, 200);
    assert_eq!(reply.content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(reply.body, b"JPEG");

    assert!(request.starts_with("POST /generate HTTP/1.1"), "{}", request);
    assert!(request.to_lowercase().contains("content-type: multipart/form-data"));
    assert!(request.contains("name=\"face_swap\"\r\n\r\nfalse\r\n"));
    assert!(request.contains("name=\"prompt\"\r\n\r\na cat\r\n"));
    assert!(!request.contains("name=\"image1\""));
    assert!(!request.contains("name=\"image2\""));
}

/// フェイススワップ: 画像2枚をファイル名・形式付きで送り、プロンプトは送らない
#[tokio::test]
async fn test_face_swap_wire_format() {
    let (backend, server) = serve_once("200 OK", "image/jpeg", b"SWAPPED").await;

    let mut state = FormState::default();
    state.set_prompt("ignored");
    state.set_face_swap(true);
    state.select_image(ImageSlot::Image1, Some(ImageFile::new("a.jpg", "image/jpeg", b"fileA".to_vec())));
    state.select_image(ImageSlot::Image2, Some(ImageFile::new("b.png", "image/png", b"fileB".to_vec())));
    let request = GenerateRequest::from_state(&state).expect("valid state");

    backend.generate(&request).await.expect("request failed");
    let raw = server.await.expect("server panicked");
    let lower = raw.to_lowercase();

    assert!(raw.contains("name=\"face_swap\"\r\n\r\ntrue\r\n"));
    assert!(!raw.contains("name=\"prompt\""));
    assert!(raw.contains("name=\"image1\"; filename=\"a.jpg\""));
    assert!(raw.contains("name=\"image2\"; filename=\"b.png\""));
    assert!(lower.contains("content-type: image/jpeg\r\n\r\nfilea"));
    assert!(lower.contains("content-type: image/png\r\n\r\nfileb"));
}

/// 500 + {"error": ...} はそのメッセージで失敗する
#[tokio::test]
async fn test_server_error_is_surfaced() {
    let (backend, server) = serve_once(
        "500 Internal Server Error",
        "application/json",
        br#"{"error": "boom"}"#,
    )
    .await;
    let mut session = Session::new(backend);
    session.set_prompt("a cat");

    let status = session.submit().await.expect("submit failed");
    server.await.expect("server panicked");

    assert_eq!(status, SubmitStatus::Failed("boom".into()));
    assert_eq!(session.state().error_message.as_deref(), Some("boom"));
    assert!(session.result().is_none());
    assert!(!session.state().is_submitting);
}

/// 成功時は応答バイト列が結果になる
#[tokio::test]
async fn test_success_body_becomes_result() {
    let (backend, server) = serve_once("200 OK", "image/jpeg", b"\xFF\xD8\xFFresult").await;
    let mut session = Session::new(backend);
    session.set_prompt("a cat");

    let status = session.submit().await.expect("submit failed");
    server.await.expect("server panicked");

    assert!(matches!(status, SubmitStatus::Generated(_)));
    let artifact = session.result().expect("result should resolve");
    assert_eq!(artifact.bytes, b"\xFF\xD8\xFFresult");
    assert_eq!(artifact.content_type.as_deref(), Some("image/jpeg"));
}

/// 稼働確認は GET / の message を返す
#[tokio::test]
async fn test_health_reads_message() {
    let (backend, server) = serve_once(
        "200 OK",
        "application/json",
        r#"{"message": "Backend is running 🚀"}"#.as_bytes(),
    )
    .await;

    let message = backend.health().await.expect("health failed");
    let request = server.await.expect("server panicked");

    assert_eq!(message, "Backend is running 🚀");
    assert!(request.starts_with("GET / HTTP/1.1"), "{}", request);
}

/// 接続できなければ通信エラーのメッセージで失敗する
#[tokio::test]
async fn test_connection_refused_is_surfaced() {
    // 一度確保したポートを閉じてから送る
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().expect("no local addr");
    drop(listener);

    let base_url = parse_base_url(&format!("http://{}", addr)).expect("invalid url");
    let mut session = Session::new(HttpBackend::new(base_url).expect("client build failed"));
    session.set_prompt("a cat");

    let status = session.submit().await.expect("submit failed");
    match status {
        SubmitStatus::Failed(message) => assert!(!message.is_empty()),
        other => panic!("unexpected status: {:?}", other),
    }
    assert!(!session.state().is_submitting);
}
