//! Exercises the QRZ client against a scripted in-process HTTP responder.

use std::collections::HashMap;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    sync::mpsc,
    task::JoinHandle,
};

use qsoupload::{
    adif::encode_record,
    config::ApiKey,
    runtime::runner::upload_all,
    types::TabularRecord,
    upload::{LogbookClient, qrz::QrzLogbookClient},
};

struct CapturedRequest {
    method: String,
    path: String,
    content_type: Option<String>,
    form: HashMap<String, String>,
}

/// Serves one canned response per connection, in order, and reports what
/// each request carried.
async fn spawn_responder(
    responses: Vec<(u16, &'static str)>,
) -> (String, mpsc::UnboundedReceiver<CapturedRequest>, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let request = read_request(&mut socket).await;
            let _ = tx.send(request);

            let reply = format!(
                "HTTP/1.1 {status} X\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.expect("write");
            socket.shutdown().await.expect("shutdown");
        }
    });

    (format!("http://{addr}/api"), rx, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = socket.read(&mut chunk).await.expect("read");
        assert!(n > 0, "client closed before headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().expect("request line").split(' ');
    let method = request_line.next().expect("method").to_string();
    let path = request_line.next().expect("path").to_string();

    let mut content_length = 0usize;
    let mut content_type = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            match name.to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.parse().expect("length"),
                "content-type" => content_type = Some(value.to_string()),
                _ => {}
            }
        }
    }

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.expect("read body");
        assert!(n > 0, "client closed before body");
        buf.extend_from_slice(&chunk[..n]);
    }

    let form = url::form_urlencoded::parse(&buf[header_end..header_end + content_length])
        .into_owned()
        .collect();

    CapturedRequest {
        method,
        path,
        content_type,
        form,
    }
}

fn sample_record() -> qsoupload::adif::AdifRecord {
    let mut rec = TabularRecord::new();
    rec.insert("call".to_string(), "SP2JW".into());
    rec.insert("band".to_string(), "20m".into());
    rec.insert("comment".to_string(), "tnx & 73".into());
    encode_record(&rec)
}

#[tokio::test]
async fn posts_form_encoded_insert_and_accepts_ok() {
    let (url, mut rx, server) = spawn_responder(vec![(200, "RESULT=OK&LOGID=42&COUNT=1")]).await;
    let client = QrzLogbookClient::with_endpoint(ApiKey::new("ABCD-1234"), url);
    let record = sample_record();

    let result = client.insert(&record).await.expect("insert");
    assert_eq!(result.status, 200);
    assert!(result.is_accepted());

    let req = rx.recv().await.expect("captured");
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/api");
    assert_eq!(
        req.content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(req.form.get("KEY").map(String::as_str), Some("ABCD-1234"));
    assert_eq!(req.form.get("ACTION").map(String::as_str), Some("INSERT"));
    assert_eq!(req.form.get("ADIF").map(String::as_str), Some(record.as_str()));

    server.await.expect("server");
}

#[tokio::test]
async fn non_200_status_is_prefixed_and_not_accepted() {
    let (url, _rx, server) = spawn_responder(vec![(500, "server error")]).await;
    let client = QrzLogbookClient::with_endpoint(ApiKey::new("k"), url);

    let result = client.insert(&sample_record()).await.expect("insert");
    assert_eq!(result.status, 500);
    assert_eq!(result.body, "server error");
    assert_eq!(result.status_text(), "500server error");
    assert!(!result.is_accepted());

    server.await.expect("server");
}

#[tokio::test]
async fn loop_over_http_counts_mixed_responses() {
    let (url, _rx, server) = spawn_responder(vec![
        (200, "RESULT=OK&LOGID=1&COUNT=1"),
        (200, "RESULT=FAIL&REASON=duplicate"),
        (200, "RESULT=OK&LOGID=2&COUNT=1"),
    ])
    .await;
    let client = QrzLogbookClient::with_endpoint(ApiKey::new("k"), url);
    let records = vec![sample_record(), sample_record(), sample_record()];

    let summary = upload_all(&client, &records).await.expect("run");
    assert_eq!((summary.total, summary.accepted, summary.failed), (3, 2, 1));

    server.await.expect("server");
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = QrzLogbookClient::with_endpoint(ApiKey::new("k"), format!("http://{addr}/api"));
    assert!(client.insert(&sample_record()).await.is_err());
}

#[test]
fn debug_output_hides_api_key() {
    let client = QrzLogbookClient::new(ApiKey::new("SECRET-KEY"));
    let shown = format!("{client:?}");
    assert!(!shown.contains("SECRET-KEY"));
    assert!(shown.contains("logbook.qrz.com"));
}
