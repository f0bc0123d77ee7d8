use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::user::ActingUser;

/// Fresh id for a job, comment or reply.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    #[default]
    Open,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub category: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub user_photo: String,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Newest first.
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub liked_by: Vec<String>,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub saved_by: Vec<String>,
}

impl Job {
    pub fn from_new(input: NewJob, created_at: OffsetDateTime) -> Self {
        Self {
            id: new_id(),
            title: input.title,
            description: input.description,
            budget: input.budget,
            category: input.category,
            skills: input.skills,
            user_id: input.user_id,
            user_name: input.user_name,
            user_photo: input.user_photo,
            status: input.status.unwrap_or_default(),
            created_at,
            comments: Vec::new(),
            liked_by: Vec::new(),
            likes_count: 0,
            saved_by: Vec::new(),
        }
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.liked_by.iter().any(|id| id == user_id)
    }

    pub fn is_saved_by(&self, user_id: &str) -> bool {
        self.saved_by.iter().any(|id| id == user_id)
    }

    /// Flips `user_id` in `liked_by` and re-derives `likes_count` in the same
    /// step.
    pub fn toggle_like(&mut self, user_id: &str) -> LikeState {
        let liked = toggle_member(&mut self.liked_by, user_id);
        self.likes_count = self.liked_by.len() as u64;
        LikeState {
            liked,
            likes_count: self.likes_count,
        }
    }

    /// Drops repeated ids from `liked_by`/`saved_by` and re-derives
    /// `likes_count`. Applied to every list adopted from outside the store.
    pub fn normalize(mut self) -> Self {
        dedup_in_order(&mut self.liked_by);
        dedup_in_order(&mut self.saved_by);
        self.likes_count = self.liked_by.len() as u64;
        self
    }

    /// Flips `user_id` in `saved_by`. Returns the new saved state.
    pub fn toggle_save(&mut self, user_id: &str) -> bool {
        toggle_member(&mut self.saved_by, user_id)
    }

    pub fn comment_mut(&mut self, comment_id: &str) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|comment| comment.id == comment_id)
    }
}

fn dedup_in_order(ids: &mut Vec<String>) {
    let mut seen = HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
}

fn toggle_member(members: &mut Vec<String>, user_id: &str) -> bool {
    if members.iter().any(|id| id == user_id) {
        members.retain(|id| id != user_id);
        false
    } else {
        members.push(user_id.to_string());
        true
    }
}

/// Outcome of a like toggle, read in the same transition that applied it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeState {
    pub liked: bool,
    pub likes_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub user_photo: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Oldest first.
    #[serde(default)]
    pub replies: Vec<Reply>,
}

impl Comment {
    pub fn new(content: String, author: &ActingUser, created_at: OffsetDateTime) -> Self {
        Self {
            id: new_id(),
            content,
            user_id: author.id.clone(),
            user_name: author.name.clone(),
            user_photo: author.photo.clone(),
            created_at,
            replies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: String,
    pub content: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub user_photo: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Reply {
    pub fn new(content: String, author: &ActingUser, created_at: OffsetDateTime) -> Self {
        Self {
            id: new_id(),
            content,
            user_id: author.id.clone(),
            user_name: author.name.clone(),
            user_photo: author.photo.clone(),
            created_at,
        }
    }
}

/// Fields supplied by the poster. Everything else is assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub category: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub user_photo: String,
    #[serde(default)]
    pub status: Option<JobStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub category: Option<String>,
    pub skills: Option<Vec<String>>,
    pub status: Option<JobStatus>,
}

impl JobPatch {
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.budget.is_none()
            && self.category.is_none()
            && self.skills.is_none()
            && self.status.is_none()
    }

    pub fn apply(self, job: &mut Job) {
        if let Some(title) = self.title {
            job.title = title;
        }
        if let Some(description) = self.description {
            job.description = description;
        }
        if let Some(budget) = self.budget {
            job.budget = budget;
        }
        if let Some(category) = self.category {
            job.category = category;
        }
        if let Some(skills) = self.skills {
            job.skills = skills;
        }
        if let Some(status) = self.status {
            job.status = status;
        }
    }
}

/// Someone who liked or saved a job, as the remote API reports them.
#[derive(Debug, Clone, Deserialize)]
pub struct Liker {
    pub id: String,
}

/// Job record as served by the remote list endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteJob {
    pub id: String,
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub category: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub user_photo: Option<String>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub comments: Option<Vec<Comment>>,
    #[serde(default)]
    pub likes: Option<Vec<Liker>>,
    #[serde(default)]
    pub saves: Option<Vec<Liker>>,
}

impl From<RemoteJob> for Job {
    fn from(remote: RemoteJob) -> Self {
        let liked_by = liker_ids(remote.likes);
        let saved_by = liker_ids(remote.saves);
        Job {
            id: remote.id,
            title: remote.title,
            description: remote.description,
            budget: remote.budget,
            category: remote.category,
            skills: remote.skills,
            user_id: remote.user_id,
            user_name: remote.user_name,
            user_photo: remote.user_photo.unwrap_or_default(),
            status: remote.status,
            created_at: remote.created_at,
            comments: remote.comments.unwrap_or_default(),
            likes_count: 0,
            liked_by,
            saved_by,
        }
        .normalize()
    }
}

fn liker_ids(likers: Option<Vec<Liker>>) -> Vec<String> {
    likers
        .unwrap_or_default()
        .into_iter()
        .map(|liker| liker.id)
        .collect()
}
