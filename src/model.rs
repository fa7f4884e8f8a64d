//! Core dashboard entities
//!
//! Agents, tasks, and activity events as returned by the Mission Control
//! backend. Collections of these are replaced wholesale on every refresh;
//! nothing here is mutated in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for an agent
pub type AgentId = String;

/// Agent status enumeration
///
/// Reflects the current activity state of an agent as reported by the
/// backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Agent is actively working on a task
    Working,
    /// Agent is idle and available for assignment
    Standby,
    /// Agent is not currently reachable
    Offline,
}

/// An autonomous worker entity tracked by the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier for the agent
    pub id: AgentId,
    /// Display name of the agent
    pub name: String,
    /// Role description (e.g. "builder", "reviewer")
    pub role: String,
    /// Current status of the agent
    pub status: AgentStatus,
    /// Avatar image URL, if the backend provides one
    #[serde(default)]
    pub avatar: Option<String>,
    /// Whether this agent coordinates the other agents in its workspace
    #[serde(default)]
    pub is_master: bool,
    /// Origin tag identifying which system registered the agent
    #[serde(default)]
    pub source: Option<String>,
}

/// Task lifecycle status
///
/// Variants are declared in pipeline order, so the derived `Ord` matches
/// the progression of a task through the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been assigned but work has not started
    Assigned,
    /// Task is actively being worked on
    InProgress,
    /// Task implementation is complete and under test
    Testing,
    /// Task is awaiting review
    Review,
    /// Task is finished (terminal)
    Done,
}

impl TaskStatus {
    /// All statuses in pipeline order, for queue-style grouped views
    pub const PIPELINE: [TaskStatus; 5] = [
        TaskStatus::Assigned,
        TaskStatus::InProgress,
        TaskStatus::Testing,
        TaskStatus::Review,
        TaskStatus::Done,
    ];

    /// Whether this status is terminal
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Done)
    }
}

/// A unit of work with a lifecycle status, optionally assigned to an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for the task
    pub id: String,
    /// Human-readable task title
    pub title: String,
    /// Current lifecycle status
    pub status: TaskStatus,
    /// Weak reference to the assigned agent by id, if any
    #[serde(default)]
    pub assignee: Option<AgentId>,
    /// When the task was created
    pub created_at: DateTime<Utc>,
    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Activity event kinds
///
/// Closed enumeration over the lifecycle kinds the backend emits; inbound
/// events with any other `type` value are rejected at decode time rather
/// than carried as untyped data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A task was created
    TaskCreated,
    /// A task moved to a new lifecycle status
    TaskStatusChanged,
    /// A task reached its terminal status
    TaskCompleted,
    /// An agent joined a workspace
    AgentJoined,
    /// An agent's status changed
    AgentStatusChanged,
    /// An agent went offline
    AgentOffline,
    /// A system-level notice not tied to a task or agent
    SystemNotice,
}

/// An immutable log entry describing something that happened
///
/// Events are append-only on the backend; the fetch layer retrieves a
/// bounded most-recent window of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier for the event
    pub id: String,
    /// Event kind (wire field `type`)
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Free-text description of what happened
    pub message: String,
    /// Agent this event refers to, if any
    #[serde(default)]
    pub agent_id: Option<AgentId>,
    /// When the event was recorded
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&AgentStatus::Working).unwrap(),
            "\"working\""
        );
        let status: AgentStatus = serde_json::from_str("\"offline\"").unwrap();
        assert_eq!(status, AgentStatus::Offline);
    }

    #[test]
    fn test_task_status_pipeline_order() {
        assert!(TaskStatus::Assigned < TaskStatus::InProgress);
        assert!(TaskStatus::InProgress < TaskStatus::Testing);
        assert!(TaskStatus::Testing < TaskStatus::Review);
        assert!(TaskStatus::Review < TaskStatus::Done);
        assert!(TaskStatus::Done.is_terminal());
        assert!(!TaskStatus::Review.is_terminal());
    }

    #[test]
    fn test_agent_optional_fields_default() {
        let agent: Agent = serde_json::from_str(
            r#"{"id":"a1","name":"Scout","role":"researcher","status":"standby"}"#,
        )
        .unwrap();
        assert!(agent.avatar.is_none());
        assert!(!agent.is_master);
        assert!(agent.source.is_none());
    }

    #[test]
    fn test_event_type_tag() {
        let event: Event = serde_json::from_str(
            r#"{
                "id": "e1",
                "type": "task_completed",
                "message": "Task finished",
                "agent_id": "a1",
                "created_at": "2026-01-15T10:30:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(event.kind, EventKind::TaskCompleted);
        assert_eq!(event.agent_id.as_deref(), Some("a1"));
    }

    #[test]
    fn test_unknown_event_type_rejected() {
        let result = serde_json::from_str::<Event>(
            r#"{"id":"e1","type":"mystery","message":"?","created_at":"2026-01-15T10:30:00Z"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_task_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        let status: TaskStatus = serde_json::from_str("\"review\"").unwrap();
        assert_eq!(status, TaskStatus::Review);
    }
}
