//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::projects::Issue;
use crate::projects::IssueStatus;
use crate::projects::Project;
use crate::trips::Trip;
use crate::users::User;

use super::CreateIssueValues;
use super::CreateProjectValues;
use super::CreateTripValues;
use super::CreateUserValues;
use super::Result;
use super::Storage;

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// All users in storage
    users: Arc<Mutex<HashMap<Uuid, User>>>,

    /// All projects in storage
    projects: Arc<Mutex<HashMap<Uuid, Project>>>,

    /// All issues in storage
    issues: Arc<Mutex<HashMap<Uuid, Issue>>>,

    /// All trips in storage
    trips: Arc<Mutex<HashMap<Uuid, Trip>>>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for Memory {
    async fn find_single_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        Ok(self.users.lock().await.get(id).cloned())
    }

    async fn create_user(&self, values: &CreateUserValues) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            session_id: *values.session_id,
            username: values.username.to_string(),
            hashed_password: values.hashed_password.to_string(),
            created_at: Utc::now().naive_utc(),
        };

        self.users.lock().await.insert(user.id, user.clone());

        Ok(user)
    }

    async fn rotate_session(&self, user: &User, session_id: &Uuid) -> Result<User> {
        Ok(self
            .users
            .lock()
            .await
            .get_mut(&user.id)
            .map(|user| {
                user.session_id = *session_id;

                user.clone()
            })
            .expect("HashMap is the source of the user"))
    }

    async fn find_all_projects(&self) -> Result<Vec<Project>> {
        let mut projects = self
            .projects
            .lock()
            .await
            .values()
            .cloned()
            .collect::<Vec<_>>();

        projects.sort_by_key(|project| project.created_at);

        Ok(projects)
    }

    async fn find_single_project_by_id(&self, id: &Uuid) -> Result<Option<Project>> {
        Ok(self.projects.lock().await.get(id).cloned())
    }

    async fn create_project(&self, values: &CreateProjectValues) -> Result<Project> {
        let project = Project {
            id: Uuid::new_v4(),
            name: values.name.to_string(),
            created_at: Utc::now().naive_utc(),
        };

        self.projects
            .lock()
            .await
            .insert(project.id, project.clone());

        Ok(project)
    }

    async fn find_all_issues_by_project(&self, project: &Project) -> Result<Vec<Issue>> {
        let mut issues = self
            .issues
            .lock()
            .await
            .values()
            .filter(|issue| issue.project_id == project.id)
            .cloned()
            .collect::<Vec<_>>();

        issues.sort_by_key(|issue| issue.created_at);

        Ok(issues)
    }

    async fn find_single_issue_by_id(&self, id: &Uuid) -> Result<Option<Issue>> {
        Ok(self.issues.lock().await.get(id).cloned())
    }

    async fn create_issue(&self, project: &Project, values: &CreateIssueValues) -> Result<Issue> {
        let now = Utc::now().naive_utc();

        let issue = Issue {
            id: Uuid::new_v4(),
            project_id: project.id,
            title: values.title.to_string(),
            description: values.description.map(ToString::to_string),
            status: values.status,
            assigned_to: None,
            created_at: now,
            updated_at: now,
        };

        self.issues.lock().await.insert(issue.id, issue.clone());

        Ok(issue)
    }

    async fn update_issue_status(&self, id: &Uuid, status: IssueStatus) -> Result<Option<Issue>> {
        Ok(self.issues.lock().await.get_mut(id).map(|issue| {
            issue.status = status;
            issue.updated_at = Utc::now().naive_utc();

            issue.clone()
        }))
    }

    async fn assign_issue(&self, id: &Uuid, assignee: &User) -> Result<Option<Issue>> {
        Ok(self.issues.lock().await.get_mut(id).map(|issue| {
            issue.assigned_to = Some(assignee.id);
            issue.updated_at = Utc::now().naive_utc();

            issue.clone()
        }))
    }

    async fn find_all_trips(&self, participant_filter: Option<&str>) -> Result<Vec<Trip>> {
        let mut trips = self
            .trips
            .lock()
            .await
            .values()
            .filter(|trip| {
                participant_filter.is_none_or(|filter| trip.participants.contains(filter))
            })
            .cloned()
            .collect::<Vec<_>>();

        trips.sort_by_key(|trip| (trip.start_date, trip.created_at));

        Ok(trips)
    }

    async fn create_trip(&self, values: &CreateTripValues) -> Result<Trip> {
        let trip = Trip {
            id: Uuid::new_v4(),
            destination: values.destination.to_string(),
            start_date: values.start_date,
            end_date: values.end_date,
            purpose: values.purpose.map(ToString::to_string),
            participants: values.participants.to_string(),
            created_at: Utc::now().naive_utc(),
        };

        self.trips.lock().await.insert(trip.id, trip.clone());

        Ok(trip)
    }

    async fn delete_trip(&self, id: &Uuid) -> Result<bool> {
        Ok(self.trips.lock().await.remove(id).is_some())
    }
}
