//! Project API management

use axum::Extension;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::projects::Project;
use crate::storage::CreateProjectValues;
use crate::storage::Storage;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::Success;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: NaiveDateTime,
}

impl ProjectResponse {
    fn from_project(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            created_at: project.created_at,
        }
    }

    fn from_project_multiple(mut projects: Vec<Project>) -> Vec<Self> {
        projects
            .drain(..)
            .map(Self::from_project)
            .collect::<Vec<Self>>()
    }
}

/// List all projects
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
) -> Result<Success<Vec<ProjectResponse>>, Error> {
    let projects = storage
        .find_all_projects()
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(ProjectResponse::from_project_multiple(
        projects,
    )))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectForm {
    name: String,
}

/// Create a project
///
/// The name is required and not deduplicated: two projects may share a name.
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    Form(form): Form<CreateProjectForm>,
) -> Result<Success<ProjectResponse>, Error> {
    let name = form.name.trim();

    if name.is_empty() {
        return Err(Error::bad_request("Project name is required"));
    }

    let values = CreateProjectValues { name };

    let project = storage
        .create_project(&values)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::created(ProjectResponse::from_project(project)))
}
