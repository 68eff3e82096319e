//! Briefing history, schedule intake and the email notifier route

use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

use crate::notifier::Notifier;
use crate::scratchpad::BriefingEntry;
use crate::scratchpad::Scratchpad;

use super::Form;
use super::Success;

/// The briefing page state: the last submitted values plus full history
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefingView {
    pub submitted: bool,
    pub name: String,
    pub date: String,
    pub vessel_name: String,
    pub person_in_charge: String,
    pub status: String,
    pub history: Vec<BriefingEntry>,
}

impl BriefingView {
    fn empty(history: Vec<BriefingEntry>) -> Self {
        Self {
            submitted: false,
            name: String::new(),
            date: String::new(),
            vessel_name: String::new(),
            person_in_charge: String::new(),
            status: String::new(),
            history,
        }
    }

    fn submitted(entry: BriefingEntry, history: Vec<BriefingEntry>) -> Self {
        Self {
            submitted: true,
            name: entry.name,
            date: entry.date,
            vessel_name: entry.vessel_name,
            person_in_charge: entry.person_in_charge,
            status: entry.status,
            history,
        }
    }
}

/// Show the briefing history
pub async fn show_briefing(Extension(scratchpad): Extension<Scratchpad>) -> Success<BriefingView> {
    Success::ok(BriefingView::empty(scratchpad.briefing_history().await))
}

/// Briefing form; every field defaults to an empty string
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefingForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    vessel_name: String,
    #[serde(default)]
    person_in_charge: String,
    #[serde(default)]
    status: String,
}

/// Append a briefing entry to the history
pub async fn submit_briefing(
    Extension(scratchpad): Extension<Scratchpad>,
    Form(form): Form<BriefingForm>,
) -> Success<BriefingView> {
    let entry = BriefingEntry {
        name: form.name,
        date: form.date,
        vessel_name: form.vessel_name,
        person_in_charge: form.person_in_charge,
        status: form.status,
    };

    scratchpad.add_briefing_entry(entry.clone()).await;

    Success::ok(BriefingView::submitted(
        entry,
        scratchpad.briefing_history().await,
    ))
}

/// Accept a schedule submission
///
/// The payload is accepted as-is and acknowledged; schedule processing lives
/// elsewhere.
pub async fn add_schedule(Form(_payload): Form<Value>) -> Json<Value> {
    Json(json!({ "status": "success" }))
}

/// Answer for the schedule form page
pub async fn schedule_status() -> Json<Value> {
    Json(json!({ "status": "success" }))
}

#[derive(Debug, Deserialize)]
pub struct SendEmailForm {
    recipient_email: String,
}

#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub message: String,
}

/// Send the awareness reminder email
///
/// Delivery failure is reported in-band, never as a request failure.
pub async fn send_email(
    Extension(notifier): Extension<Notifier>,
    Form(form): Form<SendEmailForm>,
) -> Success<SendEmailResponse> {
    let message = match notifier.send_reminder(&form.recipient_email).await {
        Ok(()) => "Email sent successfully!".to_string(),
        Err(err) => {
            tracing::warn!("Mail delivery failed: {err}");

            format!("Failed to send email: {err}")
        }
    };

    Success::ok(SendEmailResponse { message })
}
