//! Upload API for the two PDF buckets
//!
//! Multipart uploads are bounded by the request body limit; every file is
//! checked for a `.pdf` extension and reported individually.

use axum::Extension;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Serialize;

use crate::uploads;
use crate::uploads::Bucket;
use crate::uploads::UploadStore;

use super::Error;
use super::PathParameters;
use super::Success;

/// Outcome of a multi-file upload
#[derive(Debug, Serialize)]
pub struct UploadReport {
    /// Stored file names of the accepted files
    pub accepted: Vec<String>,

    /// Per-file refusals
    pub rejected: Vec<RejectedFile>,
}

/// A single refused file and the reason
#[derive(Debug, Serialize)]
pub struct RejectedFile {
    pub file: String,
    pub reason: String,
}

/// A buffered multipart field
struct UploadedFile {
    name: String,
    data: Vec<u8>,
}

/// Upload network diagrams
///
/// Multipart fields: `pdfFiles` (repeated) and `pdfLabels`, a comma
/// separated label list. Non-PDF files are skipped and reported; accepted
/// files get a random prefix so they never collide.
pub async fn upload_network_diagrams(
    Extension(store): Extension<UploadStore>,
    multipart: Multipart,
) -> Result<Success<UploadReport>, Error> {
    let (files, labels) = read_fields(multipart, "pdfFiles", "pdfLabels").await?;

    let labels = split_labels(&labels);

    if labels.is_empty() {
        return Err(Error::bad_request("No labels provided"));
    }

    if files.is_empty() {
        return Err(Error::bad_request("No file part in the request"));
    }

    let mut report = UploadReport {
        accepted: Vec::new(),
        rejected: Vec::new(),
    };

    for file in files {
        match store.store_network_diagram(&file.name, &file.data).await {
            Ok(stored_name) => report.accepted.push(stored_name),
            Err(err @ uploads::Error::InvalidExtension(_)) => {
                report.rejected.push(RejectedFile {
                    file: file.name,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(Error::internal_server_error(err)),
        }
    }

    Ok(Success::ok(report))
}

/// List the stored network diagram files
pub async fn list_network_diagrams(
    Extension(store): Extension<UploadStore>,
) -> Result<Success<Vec<String>>, Error> {
    let files = store
        .list(Bucket::NetworkDiagrams)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(files))
}

/// Upload work reports
///
/// Multipart fields: `files` (repeated) and `labels`, a comma separated
/// list paired with the files by position. The stored name is label-derived
/// and overwrites any previous upload with the same label and name.
pub async fn upload_work_reports(
    Extension(store): Extension<UploadStore>,
    multipart: Multipart,
) -> Result<Success<UploadReport>, Error> {
    let (files, labels) = read_fields(multipart, "files", "labels").await?;

    let labels = split_labels(&labels);

    if files.is_empty() {
        return Err(Error::bad_request("No file part in the request"));
    }

    let mut report = UploadReport {
        accepted: Vec::new(),
        rejected: Vec::new(),
    };

    for (index, file) in files.into_iter().enumerate() {
        let Some(label) = labels.get(index) else {
            report.rejected.push(RejectedFile {
                file: file.name,
                reason: "No label provided".to_string(),
            });
            continue;
        };

        match store.store_work_report(label, &file.name, &file.data).await {
            Ok(stored_name) => report.accepted.push(stored_name),
            Err(err @ uploads::Error::InvalidExtension(_)) => {
                report.rejected.push(RejectedFile {
                    file: file.name,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(Error::internal_server_error(err)),
        }
    }

    Ok(Success::ok(report))
}

/// List the stored work report files
pub async fn list_work_reports(
    Extension(store): Extension<UploadStore>,
) -> Result<Success<Vec<String>>, Error> {
    let files = store
        .list(Bucket::WorkReports)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(files))
}

/// Download a single work report
pub async fn fetch_work_report(
    Extension(store): Extension<UploadStore>,
    PathParameters(file_name): PathParameters<String>,
) -> Result<Response, Error> {
    let data = match store.fetch(Bucket::WorkReports, &file_name).await {
        Ok(Some(data)) => data,
        Ok(None) => return Err(Error::not_found("File not found")),
        Err(err @ uploads::Error::UnsafeFileName(_)) => {
            return Err(Error::bad_request(err));
        }
        Err(err) => return Err(Error::internal_server_error(err)),
    };

    Ok((StatusCode::OK, [(CONTENT_TYPE, "application/pdf")], data).into_response())
}

/// Buffer all file and label fields of a multipart request
///
/// Field order is not guaranteed, so everything is collected before any
/// validation happens.
async fn read_fields(
    mut multipart: Multipart,
    files_field: &str,
    labels_field: &str,
) -> Result<(Vec<UploadedFile>, String), Error> {
    let mut files = Vec::new();
    let mut labels = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| multipart_error("Invalid multipart request", err))?
    {
        let Some(name) = field.name() else {
            continue;
        };

        if name == files_field {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|err| multipart_error("Could not read file", err))?;

            files.push(UploadedFile {
                name: file_name,
                data: data.to_vec(),
            });
        } else if name == labels_field {
            labels = field
                .text()
                .await
                .map_err(|err| multipart_error("Could not read labels", err))?;
        }
    }

    Ok((files, labels))
}

/// Map a multipart failure, keeping the body limit visible as a 413
fn multipart_error(message: &str, err: MultipartError) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::payload_too_large("Payload too large")
    } else {
        Error::bad_request(message).with_description(err)
    }
}

/// Split a comma separated label list, dropping empty entries
fn split_labels(labels: &str) -> Vec<String> {
    labels
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(ToString::to_string)
        .collect()
}
