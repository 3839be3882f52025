//! Literal demo fixtures, one list per entity kind.
//!
//! Relative timestamps are offsets from the caller's `now_ms`; everything
//! else is constant.

use crate::model::activity::{Activity, ActivityKind};
use crate::model::calendar_event::{CalendarEvent, EventKind};
use crate::model::contact::{Contact, ContactStatus};
use crate::model::content_draft::{ContentDraft, DraftKind, DraftStatus};
use crate::model::ecosystem_product::{EcosystemProduct, ProductHealth, ProductStatus};
use crate::model::task::{Task, TaskPriority, TaskStatus};
use serde_json::json;

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

pub fn activities(now_ms: i64) -> Vec<Activity> {
    let entry = |id: &str, kind, message: &str, age_ms: i64, category: &str| Activity {
        id: id.to_string(),
        kind,
        message: message.to_string(),
        timestamp: now_ms - age_ms,
        metadata: Some(json!({ "category": category })),
    };

    vec![
        entry(
            "act-1",
            ActivityKind::System,
            "All 5 projects operational",
            0,
            "system",
        ),
        entry(
            "act-2",
            ActivityKind::Agent,
            "Agent Alice completed task 'Review PR #234'",
            2 * 60 * 1000,
            "agent",
        ),
        entry(
            "act-3",
            ActivityKind::User,
            "flip-analyzer: Add real data to dashboard",
            2 * HOUR_MS,
            "git",
        ),
        entry(
            "act-4",
            ActivityKind::Agent,
            "Deployed flip-analyzer to production",
            5 * HOUR_MS,
            "deploy",
        ),
        entry(
            "act-5",
            ActivityKind::System,
            "Scheduled backup completed successfully",
            DAY_MS,
            "system",
        ),
    ]
}

pub fn calendar_events(now_ms: i64) -> Vec<CalendarEvent> {
    let event = |id: &str, title: &str, date: &str, time: Option<&str>, kind| CalendarEvent {
        id: id.to_string(),
        title: title.to_string(),
        date: date.to_string(),
        time: time.map(str::to_string),
        kind,
        participants: None,
        created_at: now_ms,
    };

    let mut standup = event(
        "evt-1",
        "Team Standup",
        "2025-02-10",
        Some("09:00"),
        EventKind::Meeting,
    );
    standup.participants = Some(strings(&["Alice", "Bob", "Charlie"]));
    let mut client_call = event(
        "evt-2",
        "Client Call: TechCorp",
        "2025-02-11",
        Some("14:00"),
        EventKind::Meeting,
    );
    client_call.participants = Some(strings(&["Sarah Johnson"]));

    vec![
        standup,
        client_call,
        event(
            "evt-3",
            "Deploy to Prod",
            "2025-02-12",
            None,
            EventKind::Deadline,
        ),
        event(
            "evt-4",
            "Weekly Review",
            "2025-02-14",
            None,
            EventKind::Reminder,
        ),
        event(
            "evt-5",
            "Quarterly Planning",
            "2025-02-16",
            Some("10:00"),
            EventKind::Meeting,
        ),
    ]
}

/// Seven kanban tasks: backlog, 2x today, 2x in-progress, review, done.
pub fn tasks(now_ms: i64) -> Vec<Task> {
    let task = |id: &str,
                title: &str,
                description: &str,
                priority,
                status,
                assignee: &str,
                tags: &[&str],
                project: &str,
                age_days: i64| Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        priority,
        status,
        assignee: Some(assignee.to_string()),
        due_date: None,
        tags: strings(tags),
        project: project.to_string(),
        created_at: now_ms - age_days * DAY_MS,
        updated_at: now_ms - age_days * DAY_MS,
    };

    let mut fix_login = task(
        "2",
        "Fix login bug",
        "Users unable to login with SSO",
        TaskPriority::High,
        TaskStatus::Today,
        "Bob",
        &["bug", "urgent"],
        "Frontend",
        2,
    );
    fix_login.due_date = Some("Today".to_string());
    let mut blog_post = task(
        "3",
        "Write blog post",
        "AI trends in 2025",
        TaskPriority::Medium,
        TaskStatus::Today,
        "Charlie",
        &["content"],
        "Content",
        3,
    );
    blog_post.due_date = Some("Today".to_string());

    vec![
        task(
            "1",
            "Design new API endpoints",
            "Create OpenAPI spec for user management",
            TaskPriority::High,
            TaskStatus::Backlog,
            "Alice",
            &["api", "design"],
            "API",
            6,
        ),
        fix_login,
        blog_post,
        task(
            "4",
            "Implement caching layer",
            "Redis setup for session storage",
            TaskPriority::High,
            TaskStatus::InProgress,
            "Diana",
            &["backend", "performance"],
            "API",
            4,
        ),
        task(
            "5",
            "Setup CI/CD pipeline",
            "GitHub Actions for automated testing",
            TaskPriority::Medium,
            TaskStatus::InProgress,
            "Eve",
            &["devops"],
            "DevOps",
            5,
        ),
        task(
            "6",
            "Review PR #234",
            "Authentication module refactor",
            TaskPriority::Medium,
            TaskStatus::Review,
            "Frank",
            &["code-review"],
            "API",
            1,
        ),
        task(
            "7",
            "Database migration",
            "Add user preferences table",
            TaskPriority::High,
            TaskStatus::Done,
            "Grace",
            &["database"],
            "API",
            7,
        ),
    ]
}

/// Five CRM contacts, one per pipeline stage up to `active`.
pub fn contacts(now_ms: i64) -> Vec<Contact> {
    let contact = |id: &str,
                   name: &str,
                   company: &str,
                   email: &str,
                   phone: &str,
                   status,
                   value: u32,
                   last_contact: &str,
                   next_action: &str,
                   tags: &[&str],
                   location: &str| Contact {
        id: id.to_string(),
        name: name.to_string(),
        company: company.to_string(),
        email: email.to_string(),
        phone: Some(phone.to_string()),
        status,
        value: f64::from(value),
        last_contact: last_contact.to_string(),
        next_action: next_action.to_string(),
        tags: strings(tags),
        location: location.to_string(),
        created_at: now_ms,
    };

    vec![
        contact(
            "1",
            "Sarah Johnson",
            "TechCorp Inc.",
            "sarah@techcorp.com",
            "+1 (555) 123-4567",
            ContactStatus::Prospect,
            25_000,
            "2 days ago",
            "Follow-up email",
            &["Enterprise", "SaaS"],
            "San Francisco, CA",
        ),
        contact(
            "2",
            "Michael Chen",
            "DataFlow Systems",
            "michael@dataflow.io",
            "+1 (555) 234-5678",
            ContactStatus::Contacted,
            45_000,
            "1 day ago",
            "Schedule demo",
            &["Mid-Market", "Analytics"],
            "New York, NY",
        ),
        contact(
            "3",
            "Emily Davis",
            "CloudNine Solutions",
            "emily@cloudnine.com",
            "+1 (555) 345-6789",
            ContactStatus::Meeting,
            120_000,
            "3 hours ago",
            "Prepare proposal",
            &["Enterprise", "Cloud"],
            "Austin, TX",
        ),
        contact(
            "4",
            "James Wilson",
            "StartupXYZ",
            "james@startupxyz.com",
            "+1 (555) 456-7890",
            ContactStatus::Proposal,
            15_000,
            "5 hours ago",
            "Send contract",
            &["Startup", "AI"],
            "Denver, CO",
        ),
        contact(
            "5",
            "Lisa Anderson",
            "GlobalTech",
            "lisa@globaltech.com",
            "+1 (555) 567-8901",
            ContactStatus::Active,
            85_000,
            "1 week ago",
            "Quarterly review",
            &["Enterprise", "Global"],
            "Chicago, IL",
        ),
    ]
}

pub fn content_drafts(now_ms: i64) -> Vec<ContentDraft> {
    let draft = |id: &str,
                 title: &str,
                 kind,
                 status,
                 author: &str,
                 progress,
                 word_count,
                 age_days: i64,
                 due_date: &str,
                 tags: &[&str],
                 comments| ContentDraft {
        id: id.to_string(),
        title: title.to_string(),
        kind,
        status,
        author: author.to_string(),
        content: None,
        progress,
        word_count,
        last_edited: now_ms - age_days * DAY_MS,
        due_date: Some(due_date.to_string()),
        tags: strings(tags),
        comments,
        created_at: now_ms - age_days * DAY_MS,
    };

    vec![
        draft(
            "1",
            "AI Trends 2025: What to Expect",
            DraftKind::Blog,
            DraftStatus::Idea,
            "Alice",
            0,
            0,
            0,
            "2025-03-01",
            &["AI", "Trends"],
            0,
        ),
        draft(
            "2",
            "Product Launch Announcement",
            DraftKind::Social,
            DraftStatus::Drafting,
            "Bob",
            65,
            280,
            1,
            "2025-02-20",
            &["Launch", "Marketing"],
            3,
        ),
        draft(
            "3",
            "Weekly Newsletter #42",
            DraftKind::Email,
            DraftStatus::Review,
            "Charlie",
            90,
            1_250,
            2,
            "2025-02-15",
            &["Newsletter"],
            5,
        ),
        draft(
            "4",
            "API Documentation v2",
            DraftKind::Doc,
            DraftStatus::Approved,
            "Diana",
            100,
            4_500,
            3,
            "2025-02-10",
            &["Docs", "API"],
            2,
        ),
        draft(
            "5",
            "Tutorial: Getting Started",
            DraftKind::Script,
            DraftStatus::Published,
            "Eve",
            100,
            2_100,
            4,
            "2025-02-05",
            &["Tutorial", "Video"],
            8,
        ),
        draft(
            "6",
            "Case Study: Enterprise Migration",
            DraftKind::Blog,
            DraftStatus::Drafting,
            "Frank",
            45,
            890,
            5,
            "2025-02-28",
            &["Case Study"],
            1,
        ),
        draft(
            "7",
            "Developer Onboarding Guide",
            DraftKind::Doc,
            DraftStatus::Review,
            "Grace",
            80,
            3_200,
            6,
            "2025-02-18",
            &["Onboarding"],
            4,
        ),
        draft(
            "8",
            "Social Media Campaign Q1",
            DraftKind::Social,
            DraftStatus::Idea,
            "Henry",
            10,
            150,
            7,
            "2025-03-15",
            &["Social", "Campaign"],
            0,
        ),
    ]
}

pub fn ecosystem_products(now_ms: i64) -> Vec<EcosystemProduct> {
    let product = |id: &str,
                   name: &str,
                   description: &str,
                   category: &str,
                   status,
                   health,
                   users: u32,
                   revenue: u32,
                   version: &str,
                   uptime: &str,
                   requests_per_day: u32,
                   avg_response_time: &str,
                   error_rate: &str| EcosystemProduct {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        status,
        health,
        users: f64::from(users),
        revenue: f64::from(revenue),
        version: version.to_string(),
        uptime: uptime.to_string(),
        requests_per_day: f64::from(requests_per_day),
        avg_response_time: avg_response_time.to_string(),
        error_rate: error_rate.to_string(),
        created_at: now_ms - 30 * DAY_MS,
        updated_at: now_ms,
    };

    vec![
        product(
            "ai-assistant",
            "AI Assistant",
            "Conversational AI for customer support",
            "AI Tools",
            ProductStatus::Active,
            ProductHealth::Healthy,
            12_500,
            45_000,
            "2.3.1",
            "99.98%",
            245_000,
            "245ms",
            "0.02%",
        ),
        product(
            "data-pipeline",
            "Data Pipeline",
            "Real-time data processing and analytics",
            "Platform",
            ProductStatus::Active,
            ProductHealth::Healthy,
            8_200,
            32_000,
            "1.8.0",
            "99.95%",
            180_000,
            "180ms",
            "0.01%",
        ),
        product(
            "slack-bot",
            "Slack Bot",
            "Automated team notifications and commands",
            "Integrations",
            ProductStatus::Active,
            ProductHealth::Warning,
            5_600,
            12_000,
            "3.1.2",
            "99.50%",
            95_000,
            "320ms",
            "0.05%",
        ),
        product(
            "code-review-ai",
            "Code Review AI",
            "Automated code review and suggestions",
            "AI Tools",
            ProductStatus::Beta,
            ProductHealth::Healthy,
            2_100,
            8_500,
            "0.9.5",
            "98.50%",
            45_000,
            "890ms",
            "0.10%",
        ),
        product(
            "analytics-dashboard",
            "Analytics Dashboard",
            "Business intelligence and reporting",
            "Platform",
            ProductStatus::Active,
            ProductHealth::Healthy,
            9_800,
            28_000,
            "2.0.0",
            "99.90%",
            120_000,
            "150ms",
            "0.01%",
        ),
        product(
            "api-gateway",
            "API Gateway",
            "Unified API management layer",
            "Services",
            ProductStatus::Active,
            ProductHealth::Healthy,
            15_000,
            55_000,
            "4.2.1",
            "99.99%",
            450_000,
            "45ms",
            "0.005%",
        ),
        product(
            "document-parser",
            "Document Parser",
            "AI-powered document extraction",
            "AI Tools",
            ProductStatus::Planned,
            ProductHealth::Healthy,
            0,
            0,
            "0.0.1",
            "0%",
            0,
            "0ms",
            "0%",
        ),
        product(
            "discord-bot",
            "Discord Bot",
            "Community management automation",
            "Integrations",
            ProductStatus::Beta,
            ProductHealth::Warning,
            3_200,
            6_000,
            "1.2.0",
            "98.00%",
            67_000,
            "420ms",
            "0.08%",
        ),
    ]
}
