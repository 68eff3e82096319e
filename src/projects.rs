//! Project and issue models

use chrono::naive::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// A named container for issues
///
/// Projects have no update or delete operation.
#[derive(Clone, Debug)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub created_at: NaiveDateTime,
}

/// Workflow state of an issue
///
/// All six directed transitions between the three states are permitted,
/// there is no terminal state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum IssueStatus {
    #[default]
    #[serde(rename = "To Do")]
    ToDo,

    #[serde(rename = "In Progress")]
    InProgress,

    #[serde(rename = "Done")]
    Done,
}

impl IssueStatus {
    /// The user-facing label, also used as the stored representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// Parse a status from its label
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "To Do" => Some(Self::ToDo),
            "In Progress" => Some(Self::InProgress),
            "Done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// A tracked issue, always owned by exactly one project
///
/// Issues are never deleted; only the status and the assignee are mutable.
#[derive(Clone, Debug)]
pub struct Issue {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: IssueStatus,
    pub assigned_to: Option<Uuid>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
