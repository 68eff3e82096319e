//! All things related to the storage of accounts, projects, issues and trips

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::projects::Issue;
use crate::projects::IssueStatus;
use crate::projects::Project;
use crate::trips::Trip;
use crate::users::User;

#[cfg(not(feature = "postgres"))]
use memory::Memory;
#[cfg(feature = "postgres")]
use postgres::Postgres;

#[cfg(not(feature = "postgres"))]
mod memory;
#[cfg(feature = "postgres")]
mod postgres;

/// Setup the storage
#[cfg(not(feature = "postgres"))]
#[allow(clippy::unused_async)]
pub async fn setup() -> Memory {
    Memory::new()
}

/// Setup the storage
#[cfg(feature = "postgres")]
pub async fn setup() -> Postgres {
    Postgres::new().await
}

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// A connection error with the storage
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Values to create a User
pub struct CreateUserValues<'a> {
    /// The initial session ID for the user
    pub session_id: &'a Uuid,

    /// The username
    pub username: &'a str,

    /// The hashed password
    pub hashed_password: &'a str,
}

/// Values to create a Project
pub struct CreateProjectValues<'a> {
    /// The project name, not required to be unique
    pub name: &'a str,
}

/// Values to create an Issue
pub struct CreateIssueValues<'a> {
    /// The issue title
    pub title: &'a str,

    /// Optional free-text description
    pub description: Option<&'a str>,

    /// Initial workflow status
    pub status: IssueStatus,
}

/// Values to create a Trip
pub struct CreateTripValues<'a> {
    /// Where the trip goes
    pub destination: &'a str,

    /// First day of the trip
    pub start_date: NaiveDate,

    /// Last day of the trip
    pub end_date: NaiveDate,

    /// Optional reason for the trip
    pub purpose: Option<&'a str>,

    /// Free-text participant list, matched by substring when filtering
    pub participants: &'a str,
}

/// Storage with all supported operations
///
/// Every mutation is atomic within the store: the status update and the
/// assignment are single-statement overwrites, so concurrent requests can
/// not lose each other's writes.
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Finds a single user by its username
    async fn find_single_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Finds a single user by its ID
    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>>;

    /// Create a single user
    async fn create_user(&self, values: &CreateUserValues) -> Result<User>;

    /// Replace the session ID of a user, invalidating outstanding tokens
    async fn rotate_session(&self, user: &User, session_id: &Uuid) -> Result<User>;

    /// Find all projects
    async fn find_all_projects(&self) -> Result<Vec<Project>>;

    /// Find a single project by ID
    async fn find_single_project_by_id(&self, id: &Uuid) -> Result<Option<Project>>;

    /// Create a project
    async fn create_project(&self, values: &CreateProjectValues) -> Result<Project>;

    /// Find all issues of a project
    async fn find_all_issues_by_project(&self, project: &Project) -> Result<Vec<Issue>>;

    /// Find a single issue by ID
    async fn find_single_issue_by_id(&self, id: &Uuid) -> Result<Option<Issue>>;

    /// Create an issue under a project
    async fn create_issue(&self, project: &Project, values: &CreateIssueValues) -> Result<Issue>;

    /// Overwrite the status of an issue
    ///
    /// Returns `None` when the issue does not exist.
    async fn update_issue_status(&self, id: &Uuid, status: IssueStatus) -> Result<Option<Issue>>;

    /// Overwrite the assignee of an issue
    ///
    /// The assignee must be an existing user; callers resolve the user
    /// before asking for the assignment. Returns `None` when the issue does
    /// not exist.
    async fn assign_issue(&self, id: &Uuid, assignee: &User) -> Result<Option<Issue>>;

    /// Find all trips, ordered by start date ascending
    ///
    /// With a filter, only trips whose participants field contains it as a
    /// case-sensitive substring are returned.
    async fn find_all_trips(&self, participant_filter: Option<&str>) -> Result<Vec<Trip>>;

    /// Create a trip
    async fn create_trip(&self, values: &CreateTripValues) -> Result<Trip>;

    /// Hard-delete a trip
    ///
    /// Returns whether a trip was actually removed.
    async fn delete_trip(&self, id: &Uuid) -> Result<bool>;
}
