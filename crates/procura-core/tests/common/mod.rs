use std::path::Path;

use procura_core::{
    params::{DecisionRequest, DocumentUpload, UploadRequest},
    Workflow, WorkflowBuilder,
};
use tempfile::TempDir;

/// Helper function to create a test workflow with its own ledger and
/// document root
pub async fn create_test_workflow() -> (TempDir, Workflow) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let workflow = WorkflowBuilder::new()
        .with_database_path(Some(temp_dir.path().join("ledger.db")))
        .with_document_root(Some(temp_dir.path().join("documents")))
        .build()
        .await
        .expect("Failed to create workflow");
    (temp_dir, workflow)
}

pub fn decision(procurement_id: &str, held: bool) -> DecisionRequest {
    DecisionRequest {
        procurement_id: procurement_id.to_string(),
        procurement_title: "Office Supplies".to_string(),
        conference_held: held,
    }
}

/// Upload request carrying the given `(document_type, file_name)` pairs,
/// each written as a small file under `dir`.
pub fn upload(procurement_id: &str, dir: &Path, files: &[(&str, &str)]) -> UploadRequest {
    let documents = files
        .iter()
        .map(|(document_type, file_name)| {
            let path = dir.join(file_name);
            std::fs::write(&path, file_name.as_bytes()).expect("Failed to write upload");
            DocumentUpload {
                document_type: (*document_type).to_string(),
                path: path.to_string_lossy().into_owned(),
            }
        })
        .collect();

    UploadRequest {
        procurement_id: procurement_id.to_string(),
        procurement_title: "Office Supplies".to_string(),
        documents,
        submission_date: Some("2026-03-01".to_string()),
        participants: Some("BAC members".to_string()),
        note: None,
    }
}
