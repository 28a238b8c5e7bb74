// ABOUTME: Recent activity feed for the dashboard
// ABOUTME: Merges new customers, closed deals and completed tasks newest first

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use crm_core::{Customer, Deal, DealStage, Task};

/// Items taken from each source before merging
const PER_SOURCE: usize = 2;

/// Entries shown on the dashboard
pub const RECENT_ACTIVITY_LIMIT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    NewCustomer,
    DealClosed(DealStage),
    TaskCompleted,
}

impl ActivityKind {
    pub fn title(&self) -> &'static str {
        match self {
            ActivityKind::NewCustomer => "New Customer Added",
            ActivityKind::DealClosed(DealStage::Won) => "Deal Won",
            ActivityKind::DealClosed(_) => "Deal Lost",
            ActivityKind::TaskCompleted => "Task Completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityItem {
    pub kind: ActivityKind,
    pub description: String,
    /// Missing timestamps sort after every dated entry
    pub at: Option<DateTime<Utc>>,
}

/// Newest two customers, closed deals and completed tasks, merged newest
/// first and capped at `limit`.
pub fn recent_activity(
    deals: &[Deal],
    customers: &[Customer],
    tasks: &[Task],
    limit: usize,
) -> Vec<ActivityItem> {
    let customers = newest(customers.iter(), |customer| customer.created_at).map(|customer| {
        ActivityItem {
            kind: ActivityKind::NewCustomer,
            description: format!("{} was added as a new customer", customer.name),
            at: customer.created_at,
        }
    });

    let deals = newest(
        deals.iter().filter(|deal| deal.stage.is_closed()),
        |deal| deal.updated_at,
    )
    .map(|deal| ActivityItem {
        kind: ActivityKind::DealClosed(deal.stage),
        description: format!(
            "{} ({}) was marked as {}",
            deal.title,
            deal.customer_name.as_deref().unwrap_or("Unknown customer"),
            deal.stage.as_str().to_lowercase()
        ),
        at: deal.updated_at,
    });

    let tasks = newest(tasks.iter().filter(|task| task.completed), |task| task.updated_at).map(
        |task| ActivityItem {
            kind: ActivityKind::TaskCompleted,
            description: task.title.clone(),
            at: task.updated_at,
        },
    );

    let mut items: Vec<ActivityItem> = customers.chain(deals).chain(tasks).collect();
    items.sort_by_key(|item| Reverse(item.at));
    items.truncate(limit);
    items
}

fn newest<'a, T: 'a>(
    records: impl Iterator<Item = &'a T>,
    at: impl Fn(&T) -> Option<DateTime<Utc>>,
) -> impl Iterator<Item = &'a T> {
    let mut records: Vec<&T> = records.collect();
    records.sort_by_key(|record| Reverse(at(record)));
    records.into_iter().take(PER_SOURCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crm_core::{CustomerStatus, TaskPriority};
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2026, 6, d, 10, 0, 0).unwrap())
    }

    fn customer(name: &str, created_at: Option<DateTime<Utc>>) -> Customer {
        Customer {
            id: name.to_lowercase(),
            name: name.to_string(),
            email: None,
            phone: None,
            company: None,
            status: CustomerStatus::Lead,
            user_id: "u1".to_string(),
            created_at,
            updated_at: created_at,
        }
    }

    fn deal(title: &str, stage: DealStage, updated_at: Option<DateTime<Utc>>) -> Deal {
        Deal {
            id: title.to_lowercase(),
            title: title.to_string(),
            value: 100.0,
            stage,
            user_id: "u1".to_string(),
            customer_id: None,
            customer_name: Some("Acme".to_string()),
            closing_date: None,
            created_at: None,
            updated_at,
        }
    }

    fn task(title: &str, completed: bool, updated_at: Option<DateTime<Utc>>) -> Task {
        Task {
            id: title.to_lowercase(),
            title: title.to_string(),
            description: None,
            due_date: None,
            completed,
            priority: TaskPriority::Medium,
            customer_id: None,
            deal_id: None,
            user_id: "u1".to_string(),
            created_at: None,
            updated_at,
        }
    }

    fn titles(items: &[ActivityItem]) -> Vec<&str> {
        items.iter().map(|item| item.description.as_str()).collect()
    }

    #[test]
    fn test_recent_activity_merges_newest_first() {
        let customers = vec![customer("Ada", day(3)), customer("Bob", day(9))];
        let deals = vec![
            deal("Renewal", DealStage::Won, day(8)),
            deal("Pilot", DealStage::Open, day(12)),
        ];
        let tasks = vec![
            task("Send invoice", true, day(5)),
            task("Call back", false, day(11)),
        ];

        let items = recent_activity(&deals, &customers, &tasks, RECENT_ACTIVITY_LIMIT);

        assert_eq!(
            titles(&items),
            vec![
                "Bob was added as a new customer",
                "Renewal (Acme) was marked as won",
                "Send invoice",
                "Ada was added as a new customer",
            ]
        );
        assert_eq!(items[1].kind, ActivityKind::DealClosed(DealStage::Won));
        assert_eq!(items[1].kind.title(), "Deal Won");
    }

    #[test]
    fn test_recent_activity_takes_two_per_source_and_caps() {
        let customers = vec![
            customer("Old", day(1)),
            customer("Newer", day(20)),
            customer("Newest", day(21)),
        ];
        let deals = vec![
            deal("Lost one", DealStage::Lost, day(15)),
            deal("Won one", DealStage::Won, day(14)),
            deal("Won early", DealStage::Won, day(2)),
        ];
        let tasks = vec![task("Done", true, day(13)), task("Undated", true, None)];

        let items = recent_activity(&deals, &customers, &tasks, RECENT_ACTIVITY_LIMIT);

        assert_eq!(items.len(), 4);
        assert_eq!(
            titles(&items),
            vec![
                "Newest was added as a new customer",
                "Newer was added as a new customer",
                "Lost one (Acme) was marked as lost",
                "Won one (Acme) was marked as won",
            ]
        );

        let everything = recent_activity(&deals, &customers, &tasks, usize::MAX);
        assert_eq!(everything.len(), 6);
        assert_eq!(everything.last().map(|item| item.at), Some(None));
    }

    #[test]
    fn test_recent_activity_empty_sources() {
        assert!(recent_activity(&[], &[], &[], RECENT_ACTIVITY_LIMIT).is_empty());
    }
}
