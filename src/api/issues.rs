//! Issue API management
//!
//! Issues live under a project; status and assignee are overwritten
//! unconditionally, any of the three states is reachable from any other.

use axum::Extension;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::projects::Issue;
use crate::projects::IssueStatus;
use crate::projects::Project;
use crate::storage::CreateIssueValues;
use crate::storage::Storage;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: IssueStatus,
    pub assigned_to: Option<Uuid>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl IssueResponse {
    fn from_issue(issue: Issue) -> Self {
        Self {
            id: issue.id,
            project_id: issue.project_id,
            title: issue.title,
            description: issue.description,
            status: issue.status,
            assigned_to: issue.assigned_to,
            created_at: issue.created_at,
            updated_at: issue.updated_at,
        }
    }

    fn from_issue_multiple(mut issues: Vec<Issue>) -> Vec<Self> {
        issues.drain(..).map(Self::from_issue).collect::<Vec<Self>>()
    }
}

/// List all issues of a project
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters(project_id): PathParameters<Uuid>,
) -> Result<Success<Vec<IssueResponse>>, Error> {
    let project = get_project(&storage, &project_id).await?;

    let issues = storage
        .find_all_issues_by_project(&project)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(IssueResponse::from_issue_multiple(issues)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueForm {
    title: String,
    description: Option<String>,
    /// One of the three status labels; `To Do` when omitted
    status: Option<IssueStatus>,
}

/// Create an issue under a project
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters(project_id): PathParameters<Uuid>,
    Form(form): Form<CreateIssueForm>,
) -> Result<Success<IssueResponse>, Error> {
    let title = form.title.trim();

    if title.is_empty() {
        return Err(Error::bad_request("Issue title is required"));
    }

    let project = get_project(&storage, &project_id).await?;

    let values = CreateIssueValues {
        title,
        description: form.description.as_deref(),
        status: form.status.unwrap_or_default(),
    };

    let issue = storage
        .create_issue(&project, &values)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::created(IssueResponse::from_issue(issue)))
}

/// Show a single issue, used by the update form to echo current values
pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters(issue_id): PathParameters<Uuid>,
) -> Result<Success<IssueResponse>, Error> {
    let issue = get_issue(&storage, &issue_id).await?;

    Ok(Success::ok(IssueResponse::from_issue(issue)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssueForm {
    /// New status, when given
    status: Option<IssueStatus>,
    /// New assignee, when given; must be an existing user
    assigned_to: Option<Uuid>,
}

/// Update the status and/or the assignee of an issue
///
/// Both fields are optional; an empty form leaves the issue untouched and
/// returns its current state. Repeating the same update is idempotent.
pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters(issue_id): PathParameters<Uuid>,
    Form(form): Form<UpdateIssueForm>,
) -> Result<Success<IssueResponse>, Error> {
    let mut issue = get_issue(&storage, &issue_id).await?;

    if let Some(assignee_id) = form.assigned_to {
        let assignee = storage
            .find_single_user_by_id(&assignee_id)
            .await
            .map_err(Error::internal_server_error)?
            .ok_or_else(|| Error::not_found("User not found"))?;

        issue = storage
            .assign_issue(&issue.id, &assignee)
            .await
            .map_err(Error::internal_server_error)?
            .ok_or_else(|| Error::not_found("Issue not found"))?;
    }

    if let Some(status) = form.status {
        issue = storage
            .update_issue_status(&issue.id, status)
            .await
            .map_err(Error::internal_server_error)?
            .ok_or_else(|| Error::not_found("Issue not found"))?;
    }

    Ok(Success::ok(IssueResponse::from_issue(issue)))
}

async fn get_project<S: Storage>(storage: &S, project_id: &Uuid) -> Result<Project, Error> {
    storage
        .find_single_project_by_id(project_id)
        .await
        .map_err(Error::internal_server_error)?
        .map_or_else(|| Err(Error::not_found("Project not found")), Ok)
}

async fn get_issue<S: Storage>(storage: &S, issue_id: &Uuid) -> Result<Issue, Error> {
    storage
        .find_single_issue_by_id(issue_id)
        .await
        .map_err(Error::internal_server_error)?
        .map_or_else(|| Err(Error::not_found("Issue not found")), Ok)
}
