use axum::extract::Multipart;

/// An uploaded PDF with its original filename.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Reasons an upload is rejected before any processing happens.
#[derive(Debug, PartialEq, Eq)]
pub enum UploadError {
    /// The form has no `file` field.
    NoFilePart,
    /// The `file` field carries an empty filename.
    NoSelectedFile,
    /// Wrong extension, or the bytes are not a PDF.
    NotPdf,
    /// The multipart body could not be read.
    Malformed(String),
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadError::NoFilePart => f.write_str("No file part"),
            UploadError::NoSelectedFile => f.write_str("No selected file"),
            UploadError::NotPdf => f.write_str("File must be a PDF"),
            UploadError::Malformed(msg) => write!(f, "Failed to read upload: {msg}"),
        }
    }
}

/// Pull the `file` field out of a multipart upload.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<UploadedFile, UploadError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Malformed(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| UploadError::Malformed(e.to_string()))?
                    .to_vec();
                file = Some(UploadedFile { filename, data });
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    let file = file.ok_or(UploadError::NoFilePart)?;
    if file.filename.is_empty() {
        return Err(UploadError::NoSelectedFile);
    }
    check_pdf(&file.filename, &file.data)?;
    Ok(file)
}

/// Accept only `.pdf` names (any case) whose bytes start with the PDF magic.
fn check_pdf(filename: &str, data: &[u8]) -> Result<(), UploadError> {
    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(UploadError::NotPdf);
    }
    if !data.starts_with(b"%PDF-") {
        tracing::debug!(filename, "upload has .pdf extension but no PDF header");
        return Err(UploadError::NotPdf);
    }
    Ok(())
}
