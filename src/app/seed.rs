use time::macros::datetime;

use crate::domain::job::{Comment, Job, JobStatus, Reply};

/// Bootstrap content for a session with neither remote data nor a cached
/// snapshot.
pub fn seed_jobs() -> Vec<Job> {
    vec![
        Job {
            id: "1".into(),
            title: "Build a landing page for a coffee roastery".into(),
            description: "Single-page responsive site with a menu section, an online \
                          order form and a newsletter signup. Designs are ready in Figma."
                .into(),
            budget: 850.0,
            category: "Web Development".into(),
            skills: vec!["HTML".into(), "CSS".into(), "React".into()],
            user_id: "seed-user-1".into(),
            user_name: "Maya Chen".into(),
            user_photo: "https://i.pravatar.cc/150?u=seed-user-1".into(),
            status: JobStatus::Open,
            created_at: datetime!(2024-03-01 09:00 UTC),
            comments: vec![Comment {
                id: "c1".into(),
                content: "Is the order form expected to take payments, or only collect requests?"
                    .into(),
                user_id: "seed-user-2".into(),
                user_name: "Daniel Okafor".into(),
                user_photo: "https://i.pravatar.cc/150?u=seed-user-2".into(),
                created_at: datetime!(2024-03-01 11:30 UTC),
                replies: vec![Reply {
                    id: "r1".into(),
                    content: "Only requests for now, payments come in a second phase.".into(),
                    user_id: "seed-user-1".into(),
                    user_name: "Maya Chen".into(),
                    user_photo: "https://i.pravatar.cc/150?u=seed-user-1".into(),
                    created_at: datetime!(2024-03-01 12:05 UTC),
                }],
            }],
            liked_by: Vec::new(),
            likes_count: 0,
            saved_by: Vec::new(),
        },
        seed_job(
            "2",
            "Mobile app UI kit",
            "Design a component library for an iOS and Android fitness tracker.",
            1200.0,
            "Design",
            &["Figma", "UI Design", "Prototyping"],
            ("seed-user-3", "Lucas Moreau"),
            JobStatus::InProgress,
            datetime!(2024-02-26 14:20 UTC),
        ),
        seed_job(
            "3",
            "Technical blog posts on database indexing",
            "Four long-form articles explaining B-tree and hash indexes with examples.",
            400.0,
            "Writing",
            &["Technical Writing", "PostgreSQL"],
            ("seed-user-4", "Priya Raman"),
            JobStatus::Open,
            datetime!(2024-02-20 08:45 UTC),
        ),
        seed_job(
            "4",
            "Migrate a shop to a new payment provider",
            "Replace the existing checkout integration and verify refunds end to end.",
            2000.0,
            "Web Development",
            &["Node.js", "Payments", "Testing"],
            ("seed-user-2", "Daniel Okafor"),
            JobStatus::Completed,
            datetime!(2024-01-15 16:00 UTC),
        ),
        seed_job(
            "5",
            "Product explainer video",
            "Script and animate a 90-second explainer for a budgeting app.",
            650.0,
            "Video & Animation",
            &["After Effects", "Scriptwriting"],
            ("seed-user-5", "Sofia Lindqvist"),
            JobStatus::Open,
            datetime!(2024-01-08 10:10 UTC),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn seed_job(
    id: &str,
    title: &str,
    description: &str,
    budget: f64,
    category: &str,
    skills: &[&str],
    (user_id, user_name): (&str, &str),
    status: JobStatus,
    created_at: time::OffsetDateTime,
) -> Job {
    Job {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        budget,
        category: category.into(),
        skills: skills.iter().map(|skill| skill.to_string()).collect(),
        user_id: user_id.into(),
        user_name: user_name.into(),
        user_photo: format!("https://i.pravatar.cc/150?u={}", user_id),
        status,
        created_at,
        comments: Vec::new(),
        liked_by: Vec::new(),
        likes_count: 0,
        saved_by: Vec::new(),
    }
}
