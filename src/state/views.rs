//! Derived view computations
//!
//! Pure functions over store snapshots. These are recomputed by consumers
//! whenever the source collections change; nothing here is cached.

use crate::model::{Agent, AgentId, AgentStatus, Event, Task, TaskStatus};
use std::collections::BTreeMap;

/// Policy deciding when an agent counts as "blocked"
///
/// The backend makes no guarantee about blockedness; it is a presentational
/// judgment, so the predicate is configurable rather than fixed.
#[derive(Debug, Clone)]
pub struct BlockedPolicy {
    /// Task statuses that block their assignee
    pub blocking_statuses: Vec<TaskStatus>,
    /// Whether an offline agent with a non-terminal assignment is blocked
    pub offline_with_assignment: bool,
}

impl Default for BlockedPolicy {
    fn default() -> Self {
        Self {
            blocking_statuses: vec![TaskStatus::Testing, TaskStatus::Review],
            offline_with_assignment: true,
        }
    }
}

/// Agents considered blocked under the given policy
pub fn blocked_agents<'a>(
    agents: &'a [Agent],
    tasks: &[Task],
    policy: &BlockedPolicy,
) -> Vec<&'a Agent> {
    agents
        .iter()
        .filter(|agent| {
            let assigned = |task: &&Task| task.assignee.as_deref() == Some(agent.id.as_str());
            if tasks
                .iter()
                .filter(assigned)
                .any(|task| policy.blocking_statuses.contains(&task.status))
            {
                return true;
            }
            policy.offline_with_assignment
                && agent.status == AgentStatus::Offline
                && tasks
                    .iter()
                    .filter(assigned)
                    .any(|task| !task.status.is_terminal())
        })
        .collect()
}

/// Agents matching a status filter
pub fn agents_with_status(agents: &[Agent], status: AgentStatus) -> Vec<&Agent> {
    agents.iter().filter(|a| a.status == status).collect()
}

/// Events grouped by the agent they refer to
///
/// The `None` key collects events with no agent reference (system events).
pub fn events_by_agent(events: &[Event]) -> BTreeMap<Option<AgentId>, Vec<&Event>> {
    let mut grouped: BTreeMap<Option<AgentId>, Vec<&Event>> = BTreeMap::new();
    for event in events {
        grouped.entry(event.agent_id.clone()).or_default().push(event);
    }
    grouped
}

/// Tasks grouped by pipeline status, in pipeline order
///
/// Every pipeline status gets an entry, so queue columns render even when
/// empty.
pub fn tasks_by_status(tasks: &[Task]) -> BTreeMap<TaskStatus, Vec<&Task>> {
    let mut grouped: BTreeMap<TaskStatus, Vec<&Task>> = TaskStatus::PIPELINE
        .iter()
        .map(|status| (*status, Vec::new()))
        .collect();
    for task in tasks {
        grouped.entry(task.status).or_default().push(task);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventKind;
    use chrono::{TimeZone, Utc};

    fn agent(id: &str, status: AgentStatus) -> Agent {
        Agent {
            id: id.to_string(),
            name: format!("Agent {}", id),
            role: "builder".to_string(),
            status,
            avatar: None,
            is_master: false,
            source: None,
        }
    }

    fn task(id: &str, status: TaskStatus, assignee: Option<&str>) -> Task {
        let at = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        Task {
            id: id.to_string(),
            title: format!("Task {}", id),
            status,
            assignee: assignee.map(str::to_string),
            created_at: at,
            updated_at: at,
        }
    }

    fn event(id: &str, agent_id: Option<&str>) -> Event {
        Event {
            id: id.to_string(),
            kind: EventKind::SystemNotice,
            message: "something happened".to_string(),
            agent_id: agent_id.map(str::to_string),
            created_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_blocked_by_task_status() {
        let agents = vec![
            agent("a1", AgentStatus::Working),
            agent("a2", AgentStatus::Working),
        ];
        let tasks = vec![
            task("t1", TaskStatus::Review, Some("a1")),
            task("t2", TaskStatus::InProgress, Some("a2")),
        ];

        let blocked = blocked_agents(&agents, &tasks, &BlockedPolicy::default());
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].id, "a1");
    }

    #[test]
    fn test_offline_with_active_assignment_is_blocked() {
        let agents = vec![
            agent("a1", AgentStatus::Offline),
            agent("a2", AgentStatus::Offline),
        ];
        let tasks = vec![
            task("t1", TaskStatus::InProgress, Some("a1")),
            task("t2", TaskStatus::Done, Some("a2")),
        ];

        let blocked = blocked_agents(&agents, &tasks, &BlockedPolicy::default());
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].id, "a1");
    }

    #[test]
    fn test_custom_policy_overrides_default() {
        let agents = vec![agent("a1", AgentStatus::Offline)];
        let tasks = vec![task("t1", TaskStatus::InProgress, Some("a1"))];
        let policy = BlockedPolicy {
            blocking_statuses: vec![TaskStatus::Testing],
            offline_with_assignment: false,
        };

        assert!(blocked_agents(&agents, &tasks, &policy).is_empty());
    }

    #[test]
    fn test_agents_with_status() {
        let agents = vec![
            agent("a1", AgentStatus::Working),
            agent("a2", AgentStatus::Standby),
            agent("a3", AgentStatus::Working),
        ];

        let working = agents_with_status(&agents, AgentStatus::Working);
        assert_eq!(working.len(), 2);
    }

    #[test]
    fn test_events_by_agent_groups_system_events_under_none() {
        let events = vec![
            event("e1", Some("a1")),
            event("e2", None),
            event("e3", Some("a1")),
        ];

        let grouped = events_by_agent(&events);
        assert_eq!(grouped[&Some("a1".to_string())].len(), 2);
        assert_eq!(grouped[&None].len(), 1);
    }

    #[test]
    fn test_tasks_by_status_includes_empty_columns() {
        let tasks = vec![task("t1", TaskStatus::Review, None)];

        let grouped = tasks_by_status(&tasks);
        assert_eq!(grouped.len(), TaskStatus::PIPELINE.len());
        assert_eq!(grouped[&TaskStatus::Review].len(), 1);
        assert!(grouped[&TaskStatus::Assigned].is_empty());
    }
}
