//! Static informational pages
//!
//! The rendered presentation lives in the out-of-scope template layer; these
//! handlers serve the page content as plain text so every documented route
//! answers.

/// Home page
pub async fn index() -> &'static str {
    "Internal operations portal. See /projects, /business_trip, /trips, \
/network_diagram and /work_reports."
}

/// Office location map
///
/// Map image generation is an external static content generator; this page
/// lists the marker locations it renders.
pub async fn map() -> &'static str {
    "Office map markers: London, Paris, Tokyo, Sydney."
}

/// Mail template overview
pub async fn mail_templates() -> &'static str {
    "Available mail templates: email awareness reminder."
}

/// Directory listing of internal contacts
pub async fn directories() -> &'static str {
    "Internal directories: operations, engineering, fleet management."
}

/// Vessel list page
pub async fn vessel_list() -> &'static str {
    "Vessel list is maintained by fleet management."
}

/// Network diagram upload form page
pub async fn network_diagram() -> &'static str {
    "POST multipart fields `pdfFiles` and `pdfLabels` here to store network \
diagrams; stored files are listed under /list_files."
}

/// Work report form page
pub async fn work_reports() -> &'static str {
    "POST multipart fields `files` and `labels` to /upload_work_report; \
stored reports are listed under /list_work_reports."
}

/// Troubleshooting guide
pub async fn troubleshooting() -> &'static str {
    "Troubleshooting: check the portal log output first, then the store \
connection settings."
}
