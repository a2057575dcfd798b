//! File response DTOs

use serde::Serialize;

use crate::models::{StoredFile, UserSummary};

/// File metadata with the uploader
#[derive(Debug, Serialize)]
pub struct FileResponse {
    #[serde(flatten)]
    pub file: StoredFile,
    pub uploaded_by_user: Option<UserSummary>,
}

/// `attachment` disposition with quotes and line breaks stripped from the name
pub fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .filter(|c| !matches!(c, '"' | '\\' | '\r' | '\n'))
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            content_disposition("report.pdf"),
            "attachment; filename=\"report.pdf\""
        );
        assert_eq!(
            content_disposition("bad\"name\r\n.pdf"),
            "attachment; filename=\"badname.pdf\""
        );
    }
}
