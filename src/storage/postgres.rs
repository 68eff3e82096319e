//! Postgres storage
//!
//! Compiled with the `postgres` feature; queries are checked at runtime so
//! builds do not need a live database.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono::naive::NaiveDateTime;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
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
use super::Error;
use super::Result;
use super::Storage;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage
    ///
    /// Uses the `DATABASE_URL` environment variable; migrations will be run
    pub async fn new() -> Self {
        let database_connection_string = std::env::var("DATABASE_URL").expect("Valid DATABASE_URL");

        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_connection_string)
            .await
            .expect("Valid connection");

        let migration_result = MIGRATOR.run(&connection_pool).await;

        if let Err(err) = migration_result {
            panic!("Migrations could not run: {err}");
        }

        Self { connection_pool }
    }
}

/// `SQLx` version of user
#[derive(sqlx::FromRow)]
struct SqlxUser {
    id: Uuid,
    session_id: Uuid,
    username: String,
    hashed_password: String,
    created_at: NaiveDateTime,
}

impl SqlxUser {
    fn into_user(self) -> User {
        User {
            id: self.id,
            session_id: self.session_id,
            username: self.username,
            hashed_password: self.hashed_password,
            created_at: self.created_at,
        }
    }
}

/// `SQLx` version of project
#[derive(sqlx::FromRow)]
struct SqlxProject {
    id: Uuid,
    name: String,
    created_at: NaiveDateTime,
}

impl SqlxProject {
    fn into_project(self) -> Project {
        Project {
            id: self.id,
            name: self.name,
            created_at: self.created_at,
        }
    }
}

/// `SQLx` version of issue, status stored as its label
#[derive(sqlx::FromRow)]
struct SqlxIssue {
    id: Uuid,
    project_id: Uuid,
    title: String,
    description: Option<String>,
    status: String,
    assigned_to: Option<Uuid>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl SqlxIssue {
    fn into_issue(self) -> Result<Issue> {
        let status = IssueStatus::parse(&self.status)
            .ok_or_else(|| Error::Connection(format!("Unknown issue status: {}", self.status)))?;

        Ok(Issue {
            id: self.id,
            project_id: self.project_id,
            title: self.title,
            description: self.description,
            status,
            assigned_to: self.assigned_to,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// `SQLx` version of trip
#[derive(sqlx::FromRow)]
struct SqlxTrip {
    id: Uuid,
    destination: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    purpose: Option<String>,
    participants: String,
    created_at: NaiveDateTime,
}

impl SqlxTrip {
    fn into_trip(self) -> Trip {
        Trip {
            id: self.id,
            destination: self.destination,
            start_date: self.start_date,
            end_date: self.end_date,
            purpose: self.purpose,
            participants: self.participants,
            created_at: self.created_at,
        }
    }
}

#[async_trait]
impl Storage for Postgres {
    async fn find_single_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, SqlxUser>(
            r"
            SELECT id, session_id, username, hashed_password, created_at
            FROM users
            WHERE username = $1
            LIMIT 1
            ",
        )
        .bind(username)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(user.map(SqlxUser::into_user))
    }

    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, SqlxUser>(
            r"
            SELECT id, session_id, username, hashed_password, created_at
            FROM users
            WHERE id = $1
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(user.map(SqlxUser::into_user))
    }

    async fn create_user(&self, values: &CreateUserValues) -> Result<User> {
        let user = sqlx::query_as::<_, SqlxUser>(
            r"
            INSERT INTO users (id, session_id, username, hashed_password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, session_id, username, hashed_password, created_at
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.session_id)
        .bind(values.username)
        .bind(values.hashed_password)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(user.into_user())
    }

    async fn rotate_session(&self, user: &User, session_id: &Uuid) -> Result<User> {
        let user = sqlx::query_as::<_, SqlxUser>(
            r"
            UPDATE users
            SET session_id = $1
            WHERE id = $2
            RETURNING id, session_id, username, hashed_password, created_at
            ",
        )
        .bind(session_id)
        .bind(user.id)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(user.into_user())
    }

    async fn find_all_projects(&self) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, SqlxProject>(
            r"
            SELECT id, name, created_at
            FROM projects
            ORDER BY created_at ASC
            ",
        )
        .fetch_all(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(projects.into_iter().map(SqlxProject::into_project).collect())
    }

    async fn find_single_project_by_id(&self, id: &Uuid) -> Result<Option<Project>> {
        let project = sqlx::query_as::<_, SqlxProject>(
            r"
            SELECT id, name, created_at
            FROM projects
            WHERE id = $1
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(project.map(SqlxProject::into_project))
    }

    async fn create_project(&self, values: &CreateProjectValues) -> Result<Project> {
        let project = sqlx::query_as::<_, SqlxProject>(
            r"
            INSERT INTO projects (id, name)
            VALUES ($1, $2)
            RETURNING id, name, created_at
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.name)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(project.into_project())
    }

    async fn find_all_issues_by_project(&self, project: &Project) -> Result<Vec<Issue>> {
        let issues = sqlx::query_as::<_, SqlxIssue>(
            r"
            SELECT id, project_id, title, description, status, assigned_to, created_at, updated_at
            FROM issues
            WHERE project_id = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(project.id)
        .fetch_all(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        issues.into_iter().map(SqlxIssue::into_issue).collect()
    }

    async fn find_single_issue_by_id(&self, id: &Uuid) -> Result<Option<Issue>> {
        let issue = sqlx::query_as::<_, SqlxIssue>(
            r"
            SELECT id, project_id, title, description, status, assigned_to, created_at, updated_at
            FROM issues
            WHERE id = $1
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        issue.map(SqlxIssue::into_issue).transpose()
    }

    async fn create_issue(&self, project: &Project, values: &CreateIssueValues) -> Result<Issue> {
        let issue = sqlx::query_as::<_, SqlxIssue>(
            r"
            INSERT INTO issues (id, project_id, title, description, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, project_id, title, description, status, assigned_to, created_at, updated_at
            ",
        )
        .bind(Uuid::new_v4())
        .bind(project.id)
        .bind(values.title)
        .bind(values.description)
        .bind(values.status.as_str())
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        issue.into_issue()
    }

    async fn update_issue_status(&self, id: &Uuid, status: IssueStatus) -> Result<Option<Issue>> {
        let issue = sqlx::query_as::<_, SqlxIssue>(
            r"
            UPDATE issues
            SET status = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2
            RETURNING id, project_id, title, description, status, assigned_to, created_at, updated_at
            ",
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        issue.map(SqlxIssue::into_issue).transpose()
    }

    async fn assign_issue(&self, id: &Uuid, assignee: &User) -> Result<Option<Issue>> {
        let issue = sqlx::query_as::<_, SqlxIssue>(
            r"
            UPDATE issues
            SET assigned_to = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2
            RETURNING id, project_id, title, description, status, assigned_to, created_at, updated_at
            ",
        )
        .bind(assignee.id)
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        issue.map(SqlxIssue::into_issue).transpose()
    }

    async fn find_all_trips(&self, participant_filter: Option<&str>) -> Result<Vec<Trip>> {
        let trips = if let Some(filter) = participant_filter {
            sqlx::query_as::<_, SqlxTrip>(
                r"
                SELECT id, destination, start_date, end_date, purpose, participants, created_at
                FROM trips
                WHERE strpos(participants, $1) > 0
                ORDER BY start_date ASC, created_at ASC
                ",
            )
            .bind(filter)
            .fetch_all(&self.connection_pool)
            .await
        } else {
            sqlx::query_as::<_, SqlxTrip>(
                r"
                SELECT id, destination, start_date, end_date, purpose, participants, created_at
                FROM trips
                ORDER BY start_date ASC, created_at ASC
                ",
            )
            .fetch_all(&self.connection_pool)
            .await
        }
        .map_err(connection_error)?;

        Ok(trips.into_iter().map(SqlxTrip::into_trip).collect())
    }

    async fn create_trip(&self, values: &CreateTripValues) -> Result<Trip> {
        let trip = sqlx::query_as::<_, SqlxTrip>(
            r"
            INSERT INTO trips (id, destination, start_date, end_date, purpose, participants)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, destination, start_date, end_date, purpose, participants, created_at
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.destination)
        .bind(values.start_date)
        .bind(values.end_date)
        .bind(values.purpose)
        .bind(values.participants)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(trip.into_trip())
    }

    async fn delete_trip(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM trips
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(result.rows_affected() > 0)
    }
}

/// Convert `SQLx` to storage connection error
fn connection_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Connection(err.to_string())
}
