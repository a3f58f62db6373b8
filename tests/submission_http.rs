use contract_designer::status::StatusBoard;
use contract_designer::submission::{
    HttpBackend, StageStatus, SubmissionError, SubmissionOrchestrator, TransportError,
};
use contract_designer::wizard::{ConfigPatch, ContractConfig, WizardController, WizardStep};
use httpmock::prelude::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const CANDIDATES: [&str; 4] = ["/api/process", "/process", "/api/process_text", "/process_text"];

const RESULT_JSON: &str =
    r#"{"docxUrl": "/output/contrato_formatado.docx", "pdfUrl": "/output/contrato_visualizacao.pdf"}"#;

fn orchestrator(base_url: &str, status: StatusBoard) -> SubmissionOrchestrator {
    let backend = Arc::new(HttpBackend::new(base_url).unwrap());
    SubmissionOrchestrator::new(
        backend,
        CANDIDATES.iter().map(|c| c.to_string()).collect(),
        Duration::from_secs(5),
        status,
    )
}

/// Walk a controller to Processing with pasted text and return it
fn processing_wizard(status: StatusBoard) -> WizardController {
    let mut wizard = WizardController::new(status);
    wizard
        .advance(WizardStep::Branding, ConfigPatch::new().text("CLÁUSULA PRIMEIRA - DO OBJETO"))
        .unwrap();
    wizard.advance(WizardStep::Preview, ConfigPatch::new()).unwrap();
    wizard.advance(WizardStep::Processing, ConfigPatch::new()).unwrap();
    wizard
}

#[tokio::test]
async fn first_candidate_success_resolves_locators() {
    let server = MockServer::start_async().await;
    let process = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/process");
            then.status(200)
                .header("content-type", "application/json")
                .body(RESULT_JSON);
        })
        .await;

    let status = StatusBoard::new();
    let mut wizard = processing_wizard(status.clone());
    let orchestrator = orchestrator(&server.base_url(), status.clone());

    let result = orchestrator
        .submit(wizard.activation().unwrap(), &wizard.snapshot())
        .await
        .unwrap()
        .unwrap();
    process.assert_async().await;

    let resolved = result.resolve(&server.base_url());
    assert_eq!(
        resolved.docx_url,
        format!("{}/output/contrato_formatado.docx", server.base_url())
    );
    assert!(resolved.pdf_url.ends_with("/output/contrato_visualizacao.pdf"));

    wizard.complete_submission(resolved).unwrap();
    let snapshot = status.current();
    assert_eq!(snapshot.step, WizardStep::Result);
    assert!(snapshot.stages.iter().all(|s| s.status == StageStatus::Success));
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn falls_back_in_order_until_one_succeeds() {
    let server = MockServer::start_async().await;
    let first = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/process");
            then.status(404);
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(POST).path("/process");
            then.status(200).body(RESULT_JSON);
        })
        .await;
    let third = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/process_text");
            then.status(200).body(RESULT_JSON);
        })
        .await;

    let status = StatusBoard::new();
    let wizard = processing_wizard(status.clone());
    let outcome = orchestrator(&server.base_url(), status)
        .submit(wizard.activation().unwrap(), &wizard.snapshot())
        .await
        .unwrap();

    assert!(outcome.is_ok());
    first.assert_hits_async(1).await;
    second.assert_hits_async(1).await;
    third.assert_hits_async(0).await;
}

#[tokio::test]
async fn sends_multipart_fields() {
    let server = MockServer::start_async().await;
    let process = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/process")
                .header_exists("content-type")
                .body_contains("name=\"text\"")
                .body_contains("DO OBJETO")
                .body_contains("name=\"primaryColor\"")
                .body_contains("#4F46E5");
            then.status(200).body(RESULT_JSON);
        })
        .await;

    let status = StatusBoard::new();
    let wizard = processing_wizard(status.clone());
    let outcome = orchestrator(&server.base_url(), status)
        .submit(wizard.activation().unwrap(), &wizard.snapshot())
        .await
        .unwrap();

    assert!(outcome.is_ok());
    process.assert_async().await;
}

#[tokio::test]
async fn every_candidate_failing_reports_server_error() {
    let server = MockServer::start_async().await;
    let failing = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(500);
        })
        .await;

    let status = StatusBoard::new();
    let wizard = processing_wizard(status.clone());
    let err = orchestrator(&server.base_url(), status.clone())
        .submit(wizard.activation().unwrap(), &wizard.snapshot())
        .await
        .unwrap()
        .unwrap_err();

    assert_eq!(err, SubmissionError::Server { status: 500 });
    failing.assert_hits_async(CANDIDATES.len()).await;

    let snapshot = status.current();
    assert_eq!(snapshot.step, WizardStep::Processing);
    assert!(snapshot.stages.iter().all(|s| s.status == StageStatus::Pending));
    assert_eq!(snapshot.error.as_deref(), Some(err.user_message()));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let status = StatusBoard::new();
    let wizard = processing_wizard(status.clone());
    let err = orchestrator("http://127.0.0.1:1", status)
        .submit(wizard.activation().unwrap(), &wizard.snapshot())
        .await
        .unwrap()
        .unwrap_err();

    assert!(matches!(err, SubmissionError::Transport(_)));
    assert!(!err.is_user_fixable());
}

#[tokio::test]
async fn success_without_locators_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/process");
            then.status(200).body(r#"{"docxUrl": "/output/a.docx"}"#);
        })
        .await;

    let status = StatusBoard::new();
    let wizard = processing_wizard(status.clone());
    let err = orchestrator(&server.base_url(), status)
        .submit(wizard.activation().unwrap(), &wizard.snapshot())
        .await
        .unwrap()
        .unwrap_err();

    assert!(matches!(err, SubmissionError::MalformedResponse(_)));
}

#[tokio::test]
async fn missing_content_never_reaches_the_server() {
    let server = MockServer::start_async().await;
    let any = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).body(RESULT_JSON);
        })
        .await;

    let status = StatusBoard::new();
    let mut wizard = WizardController::new(status.clone());
    wizard.advance(WizardStep::Branding, ConfigPatch::new()).unwrap();
    wizard.advance(WizardStep::Preview, ConfigPatch::new()).unwrap();
    wizard.advance(WizardStep::Processing, ConfigPatch::new()).unwrap();
    assert_eq!(wizard.snapshot(), ContractConfig::default());

    let err = orchestrator(&server.base_url(), status)
        .submit(wizard.activation().unwrap(), &wizard.snapshot())
        .await
        .unwrap()
        .unwrap_err();

    assert!(err.is_user_fixable());
    any.assert_hits_async(0).await;
}

/// Read one request off the socket and return its path
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let path = head.split_whitespace().nth(1).unwrap_or_default().to_string();
    let content_length = head
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok());

    loop {
        let body = &buf[header_end..];
        let done = match content_length {
            Some(len) => body.len() >= len,
            None => body.ends_with(b"0\r\n\r\n"),
        };
        if done {
            break;
        }
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    path
}

#[tokio::test]
async fn success_status_with_stalled_body_is_not_resubmitted() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let hits = Arc::new(Mutex::new(Vec::new()));

    let server_hits = hits.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let hits = server_hits.clone();
            tokio::spawn(async move {
                let path = read_request(&mut stream).await;
                hits.lock().unwrap().push(path.clone());

                if path == "/api/process" {
                    let head = "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 200\r\n\r\n";
                    stream.write_all(head.as_bytes()).await.unwrap();
                    stream.write_all(br#"{"docxUrl": "/out"#).await.unwrap();
                    stream.flush().await.unwrap();
                    tokio::time::sleep(Duration::from_secs(10)).await;
                } else {
                    let reply = format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        RESULT_JSON.len(),
                        RESULT_JSON
                    );
                    stream.write_all(reply.as_bytes()).await.unwrap();
                }
            });
        }
    });

    let status = StatusBoard::new();
    let wizard = processing_wizard(status.clone());
    let orchestrator = SubmissionOrchestrator::new(
        Arc::new(HttpBackend::new(&base_url).unwrap()),
        CANDIDATES.iter().map(|c| c.to_string()).collect(),
        Duration::from_millis(500),
        status.clone(),
    );

    let err = orchestrator
        .submit(wizard.activation().unwrap(), &wizard.snapshot())
        .await
        .unwrap()
        .unwrap_err();

    assert!(
        matches!(err, SubmissionError::Transport(TransportError::Timeout { ref path, .. }) if path == "/api/process"),
        "{err:?}"
    );
    assert_eq!(*hits.lock().unwrap(), vec!["/api/process".to_string()]);
    assert!(status.current().stages.iter().all(|s| s.status == StageStatus::Pending));
    assert!(status.current().error.is_some());
}
