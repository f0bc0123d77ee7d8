use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::app::notifications::Notifier;
use crate::app::session::Identity;
use crate::app::sources::{SnapshotCache, SourceChain};
use crate::domain::job::{Comment, Job, JobPatch, LikeState, NewJob, Reply};
use crate::domain::notification::Notice;
use crate::domain::user::ActingUser;

#[derive(Default)]
struct StoreState {
    jobs: Vec<Job>,
    /// Bumped by every applied mutation.
    revision: u64,
    error: Option<String>,
}

struct Inner {
    state: RwLock<StoreState>,
    loads_in_flight: AtomicUsize,
    sources: SourceChain,
    snapshot: SnapshotCache,
    identity: Arc<dyn Identity>,
    notifier: Arc<dyn Notifier>,
}

/// In-memory job list with write-through to the local cache.
///
/// Every mutation runs under a single write lock: the change is computed
/// from the current list, applied, and mirrored to the cache before the
/// lock is released. Cache snapshots therefore arrive in mutation order and
/// concurrent toggles never lose updates.
#[derive(Clone)]
pub struct JobStore {
    inner: Arc<Inner>,
}

impl JobStore {
    pub fn new(
        sources: SourceChain,
        snapshot: SnapshotCache,
        identity: Arc<dyn Identity>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(StoreState::default()),
                loads_in_flight: AtomicUsize::new(0),
                sources,
                snapshot,
                identity,
                notifier,
            }),
        }
    }

    /// Populates the list from the first source that has data. Returns the
    /// name of that source, or `None` when the chain failed; the failure is
    /// then available through [`JobStore::error`].
    ///
    /// A local source never replaces the list when a mutation landed while
    /// the chain was running; that mutation already wrote the newer list.
    pub async fn load(&self) -> Option<&'static str> {
        let _loading = LoadGuard::enter(&self.inner.loads_in_flight);
        let started_at = self.inner.state.read().await.revision;

        let loaded = self.inner.sources.load().await;

        let mut state = self.inner.state.write().await;
        match loaded {
            Ok(loaded) if loaded.source != "remote" && state.revision != started_at => {
                info!(
                    source = loaded.source,
                    revision = state.revision,
                    "jobs changed during load, keeping current list"
                );
                state.error = None;
                Some(loaded.source)
            }
            Ok(loaded) => {
                info!(source = loaded.source, jobs = loaded.jobs.len(), "jobs loaded");
                state.jobs = loaded.jobs;
                state.error = None;
                let persisted = self.persist(&state.jobs).await;
                if let Err(err) = persisted {
                    error!(error = ?err, "failed to cache loaded jobs");
                    state.error = Some(format!("{:#}", err));
                    self.notify(Notice::failure(
                        "Could not cache jobs",
                        "Jobs were loaded but could not be saved locally.",
                    ));
                }
                Some(loaded.source)
            }
            Err(err) => {
                error!(error = ?err, "failed to load jobs");
                state.error = Some(format!("{:#}", err));
                self.notify(Notice::failure(
                    "Failed to load jobs",
                    "Neither the server nor the local cache could provide jobs.",
                ));
                None
            }
        }
    }

    /// Re-runs the load sequence on demand and reports where the data came from.
    pub async fn refresh(&self) -> Option<&'static str> {
        let source = self.load().await?;
        self.notify(Notice::success(
            "Jobs refreshed",
            match source {
                "remote" => "Loaded the latest jobs from the server.",
                "cache" => "Server unreachable, showing jobs saved on this device.",
                _ => "Server unreachable, showing example jobs.",
            },
        ));
        Some(source)
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.loads_in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn error(&self) -> Option<String> {
        self.inner.state.read().await.error.clone()
    }

    pub async fn jobs(&self) -> Vec<Job> {
        self.inner.state.read().await.jobs.clone()
    }

    pub async fn get_job(&self, job_id: &str) -> Option<Job> {
        self.inner
            .state
            .read()
            .await
            .jobs
            .iter()
            .find(|job| job.id == job_id)
            .cloned()
    }

    pub async fn add_job(&self, input: NewJob) -> Result<String> {
        let job = Job::from_new(input, OffsetDateTime::now_utc());
        let job_id = job.id.clone();

        self.mutate(|jobs| {
            jobs.insert(0, job);
            Some(())
        })
        .await?;

        info!(job_id = %job_id, "job added");
        self.notify(Notice::success("Job posted", "Your job has been posted."));
        Ok(job_id)
    }

    /// Returns `false` when no job has `job_id`.
    pub async fn update_job(&self, job_id: &str, patch: JobPatch) -> Result<bool> {
        let updated = self
            .mutate(|jobs| {
                let job = find_job(jobs, job_id)?;
                patch.apply(job);
                Some(())
            })
            .await?;

        if updated.is_none() {
            self.job_not_found(job_id);
            return Ok(false);
        }
        self.notify(Notice::success("Job updated", "Your changes have been saved."));
        Ok(true)
    }

    /// Returns `false` when no job has `job_id`.
    pub async fn delete_job(&self, job_id: &str) -> Result<bool> {
        let deleted = self
            .mutate(|jobs| {
                let index = jobs.iter().position(|job| job.id == job_id)?;
                Some(jobs.remove(index))
            })
            .await?;

        if deleted.is_none() {
            self.job_not_found(job_id);
            return Ok(false);
        }
        info!(job_id = %job_id, "job deleted");
        self.notify(Notice::success("Job deleted", "The job has been removed."));
        Ok(true)
    }

    /// Prepends a comment by the acting user. Returns the comment id, or
    /// `None` when the operation was rejected.
    pub async fn add_comment_to_job(&self, job_id: &str, content: &str) -> Result<Option<String>> {
        let Some(author) = self.acting_user("comment on jobs") else {
            return Ok(None);
        };
        let Some(content) = self.non_empty(content) else {
            return Ok(None);
        };

        let comment = Comment::new(content, &author, OffsetDateTime::now_utc());
        let comment_id = comment.id.clone();
        let added = self
            .mutate(|jobs| {
                find_job(jobs, job_id)?.comments.insert(0, comment);
                Some(())
            })
            .await?;

        if added.is_none() {
            self.job_not_found(job_id);
            return Ok(None);
        }
        self.notify(Notice::success("Comment added", "Your comment has been posted."));
        Ok(Some(comment_id))
    }

    /// Appends a reply by the acting user. Returns the reply id, or `None`
    /// when the operation was rejected.
    pub async fn add_reply_to_comment(
        &self,
        job_id: &str,
        comment_id: &str,
        content: &str,
    ) -> Result<Option<String>> {
        let Some(author) = self.acting_user("reply to comments") else {
            return Ok(None);
        };
        let Some(content) = self.non_empty(content) else {
            return Ok(None);
        };

        let reply = Reply::new(content, &author, OffsetDateTime::now_utc());
        let reply_id = reply.id.clone();
        let mut job_found = false;
        let added = self
            .mutate(|jobs| {
                let job = find_job(jobs, job_id)?;
                job_found = true;
                job.comment_mut(comment_id)?.replies.push(reply);
                Some(())
            })
            .await?;

        if added.is_none() && !job_found {
            self.job_not_found(job_id);
            return Ok(None);
        }
        if added.is_none() {
            warn!(job_id = %job_id, comment_id = %comment_id, "comment not found");
            self.notify(Notice::failure(
                "Not found",
                "The comment you replied to no longer exists.",
            ));
            return Ok(None);
        }
        self.notify(Notice::success("Reply added", "Your reply has been posted."));
        Ok(Some(reply_id))
    }

    /// Likes or unlikes the job for the acting user. Returns the liked flag
    /// and counter as they stood right after the toggle, or `None` when the
    /// operation was rejected.
    pub async fn toggle_job_like(&self, job_id: &str) -> Result<Option<LikeState>> {
        let Some(user) = self.acting_user("like jobs") else {
            return Ok(None);
        };

        let liked = self
            .mutate(|jobs| Some(find_job(jobs, job_id)?.toggle_like(&user.id)))
            .await?;

        match liked.map(|state| state.liked) {
            Some(true) => self.notify(Notice::success("Job liked", "Added to your liked jobs.")),
            Some(false) => self.notify(Notice::success("Like removed", "Removed from your liked jobs.")),
            None => self.job_not_found(job_id),
        }
        Ok(liked)
    }

    /// Saves or unsaves the job for the acting user. Returns the new saved
    /// state, or `None` when the operation was rejected.
    pub async fn toggle_save_job(&self, job_id: &str) -> Result<Option<bool>> {
        let Some(user) = self.acting_user("save jobs") else {
            return Ok(None);
        };

        let saved = self
            .mutate(|jobs| Some(find_job(jobs, job_id)?.toggle_save(&user.id)))
            .await?;

        match saved {
            Some(true) => self.notify(Notice::success("Job saved", "Added to your saved jobs.")),
            Some(false) => self.notify(Notice::success("Job unsaved", "Removed from your saved jobs.")),
            None => self.job_not_found(job_id),
        }
        Ok(saved)
    }

    pub async fn is_job_liked_by_current_user(&self, job_id: &str) -> bool {
        let Some(user) = self.inner.identity.current_user() else {
            return false;
        };
        self.inner
            .state
            .read()
            .await
            .jobs
            .iter()
            .any(|job| job.id == job_id && job.is_liked_by(&user.id))
    }

    pub async fn is_job_saved_by_current_user(&self, job_id: &str) -> bool {
        let Some(user) = self.inner.identity.current_user() else {
            return false;
        };
        self.inner
            .state
            .read()
            .await
            .jobs
            .iter()
            .any(|job| job.id == job_id && job.is_saved_by(&user.id))
    }

    pub async fn get_likes_count(&self, job_id: &str) -> u64 {
        self.inner
            .state
            .read()
            .await
            .jobs
            .iter()
            .find(|job| job.id == job_id)
            .map_or(0, |job| job.likes_count)
    }

    /// Jobs saved by the acting user, in list order. Derived from the current
    /// list and user on every call.
    pub async fn saved_jobs(&self) -> Vec<Job> {
        let Some(user) = self.inner.identity.current_user() else {
            return Vec::new();
        };
        self.inner
            .state
            .read()
            .await
            .jobs
            .iter()
            .filter(|job| job.is_saved_by(&user.id))
            .cloned()
            .collect()
    }

    /// Applies `change` under the write lock and mirrors the list to the
    /// cache. `change` returns `None` when it left the list untouched.
    async fn mutate<T, F>(&self, change: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut Vec<Job>) -> Option<T>,
    {
        let mut state = self.inner.state.write().await;
        let Some(output) = change(&mut state.jobs) else {
            return Ok(None);
        };
        state.revision += 1;

        let persisted = self.persist(&state.jobs).await;
        if let Err(err) = persisted {
            error!(error = ?err, "failed to cache jobs");
            state.error = Some(format!("{:#}", err));
            self.notify(Notice::failure(
                "Something went wrong",
                "Your change could not be saved on this device.",
            ));
            return Err(err);
        }
        Ok(Some(output))
    }

    async fn persist(&self, jobs: &[Job]) -> Result<()> {
        if jobs.is_empty() {
            return Ok(());
        }
        self.inner.snapshot.write(jobs).await
    }

    fn acting_user(&self, action: &str) -> Option<ActingUser> {
        let user = self.inner.identity.current_user();
        if user.is_none() {
            warn!(action = action, "rejected anonymous operation");
            self.notify(Notice::failure(
                "Authentication required",
                format!("Please sign in to {}.", action),
            ));
        }
        user
    }

    fn non_empty(&self, content: &str) -> Option<String> {
        let content = content.trim();
        if content.is_empty() {
            self.notify(Notice::failure("Empty comment", "Write something before posting."));
            return None;
        }
        Some(content.to_string())
    }

    fn job_not_found(&self, job_id: &str) {
        warn!(job_id = %job_id, "job not found");
        self.notify(Notice::failure("Not found", "That job no longer exists."));
    }

    fn notify(&self, notice: Notice) {
        self.inner.notifier.notify(notice);
    }
}

/// Counts a load as in flight until dropped, including when the load
/// future is cancelled.
struct LoadGuard<'a>(&'a AtomicUsize);

impl<'a> LoadGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn find_job<'a>(jobs: &'a mut [Job], job_id: &str) -> Option<&'a mut Job> {
    jobs.iter_mut().find(|job| job.id == job_id)
}
