use contract_designer::download::{
    DOCX_FILE_NAME, DownloadError, PDF_FILE_NAME, download_results,
};
use contract_designer::submission::SubmissionResult;
use httpmock::prelude::*;

fn result_for(server: &MockServer) -> SubmissionResult {
    SubmissionResult {
        docx_url: server.url("/output/contrato_formatado.docx"),
        pdf_url: server.url("/output/contrato_visualizacao.pdf"),
    }
}

#[tokio::test]
async fn saves_both_documents() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/output/contrato_formatado.docx");
            then.status(200).body("PK docx bytes");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/output/contrato_visualizacao.pdf");
            then.status(200).body("%PDF-1.7");
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out");
    let client = reqwest::Client::new();

    let files = download_results(&client, &result_for(&server), &target)
        .await
        .unwrap();

    assert_eq!(files.docx, target.join(DOCX_FILE_NAME));
    assert_eq!(files.pdf, target.join(PDF_FILE_NAME));
    assert_eq!(std::fs::read_to_string(&files.docx).unwrap(), "PK docx bytes");
    assert_eq!(std::fs::read_to_string(&files.pdf).unwrap(), "%PDF-1.7");
}

#[tokio::test]
async fn missing_document_is_a_status_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/output/contrato_formatado.docx");
            then.status(404);
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = reqwest::Client::new();

    let err = download_results(&client, &result_for(&server), dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Status { status: 404, .. }));
    assert!(!dir.path().join(PDF_FILE_NAME).exists());
}
