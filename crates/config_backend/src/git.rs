//! Git backend.
//!
//! Keeps a local checkout of a configuration repository and serves snapshots
//! from the HEAD commit of the requested branch. A snapshot optionally
//! re-synchronises first: open-or-clone, check the branch out (fetching the
//! remote ref when the local branch is absent), then pull fast-forward.
//!
//! The underlying object database is not safe for concurrent mutation, so
//! one mutex per backend guards the open-repository handle across the
//! refresh / HEAD-read / tree-walk critical section. The background refresh
//! task contends on the same mutex.

use std::path::Path;
use std::sync::{Arc, Mutex};

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{
    CertificateCheckStatus, Cred, ErrorCode, FetchOptions, ObjectType, RemoteCallbacks,
    Repository, TreeWalkMode, TreeWalkResult,
};
use tracing::{debug, info, warn};

use app_config::GitSettings;

use crate::decoder::{decode_document, Decrypter};
use crate::document::{readable_suffix, Document};
use crate::errors::{BackendError, DecodeError};
use crate::{Backend, JsonMap, Refreshable, Snapshot};

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;

pub struct GitBackend {
    settings: GitSettings,
    decrypter: Option<Arc<dyn Decrypter>>,
    repo: Mutex<Option<Repository>>,
}

impl GitBackend {
    /// Create the backend, cloning eagerly when configured to do so.
    pub fn new(
        settings: GitSettings,
        decrypter: Option<Arc<dyn Decrypter>>,
    ) -> Result<Self, BackendError> {
        let backend = Self {
            settings,
            decrypter,
            repo: Mutex::new(None),
        };

        if backend.settings.clone_on_start {
            info!("Cloning configuration repository on startup");
            let repo =
                backend.connect("", !backend.settings.disable_base_dir_cleaning)?;
            *backend.lock_repo()? = Some(repo);
        }

        Ok(backend)
    }

    fn lock_repo(&self) -> Result<std::sync::MutexGuard<'_, Option<Repository>>, BackendError> {
        self.repo
            .lock()
            .map_err(|_| BackendError::Unavailable("git repository lock poisoned".to_string()))
    }

    /// Open or clone the checkout and synchronise it onto `branch`.
    fn connect(&self, branch: &str, clean_existing: bool) -> Result<Repository, BackendError> {
        if !self.settings.basedir.is_empty() && clean_existing {
            debug!("Cleaning existing checkout at {}", self.settings.basedir);
            match std::fs::remove_dir_all(&self.settings.basedir) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e.into()),
                _ => {}
            }
        }

        match Repository::open(&self.settings.basedir) {
            Ok(repo) => {
                self.sync(&repo, branch)?;
                Ok(repo)
            }
            Err(e) if e.code() == ErrorCode::NotFound => {
                let repo = self.clone_repository()?;
                let branch = self.effective_branch(branch);
                if repo.find_reference(&format!("refs/heads/{branch}")).is_err() {
                    self.sync(&repo, &branch)?;
                }
                Ok(repo)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn clone_repository(&self) -> Result<Repository, BackendError> {
        let mut fetch = FetchOptions::new();
        fetch.remote_callbacks(self.remote_callbacks());
        if self.settings.disable_labels {
            // No label selection means history is irrelevant.
            fetch.depth(1);
        }

        let repo = RepoBuilder::new()
            .fetch_options(fetch)
            .clone(&self.settings.uri, Path::new(&self.settings.basedir))?;

        info!(
            "Cloned {} into {}",
            self.settings.uri, self.settings.basedir
        );
        Ok(repo)
    }

    fn effective_branch(&self, branch: &str) -> String {
        if !branch.is_empty() {
            return branch.to_string();
        }
        if self.settings.default_branch_name.is_empty() {
            "master".to_string()
        } else {
            self.settings.default_branch_name.clone()
        }
    }

    /// Check the branch out and pull it up to date.
    fn sync(&self, repo: &Repository, branch: &str) -> Result<(), BackendError> {
        let branch = self.effective_branch(branch);
        let refname = format!("refs/heads/{branch}");

        if repo.find_reference(&refname).is_err() {
            debug!("Local branch {branch} not found, fetching from origin");
            self.fetch_origin(repo, &[&format!("refs/heads/{branch}:refs/heads/{branch}")])?;
        }

        repo.set_head(&refname)?;
        let mut checkout = CheckoutBuilder::new();
        if self.settings.force_pull {
            checkout.force();
        }
        repo.checkout_head(Some(&mut checkout))?;
        debug!("Checked out {branch}");

        self.pull(repo, &branch)
    }

    fn pull(&self, repo: &Repository, branch: &str) -> Result<(), BackendError> {
        self.fetch_origin(repo, &[branch])?;

        let fetch_head = repo.find_reference("FETCH_HEAD")?;
        let fetch_commit = repo.reference_to_annotated_commit(&fetch_head)?;
        let (analysis, _) = repo.merge_analysis(&[&fetch_commit])?;

        if analysis.is_up_to_date() {
            debug!("Checkout already up to date");
            return Ok(());
        }

        if analysis.is_fast_forward() {
            let refname = format!("refs/heads/{branch}");
            let mut reference = repo.find_reference(&refname)?;
            reference.set_target(fetch_commit.id(), "fast-forward")?;
            repo.set_head(&refname)?;
            repo.checkout_head(Some(CheckoutBuilder::new().force()))?;
            info!("Fast-forwarded {branch}");
        } else {
            warn!("Non-fast-forward update for {branch}, keeping local state");
        }

        Ok(())
    }

    fn fetch_origin(&self, repo: &Repository, refspecs: &[&str]) -> Result<(), BackendError> {
        let mut remote = repo.find_remote("origin")?;
        let mut fetch = FetchOptions::new();
        fetch.remote_callbacks(self.remote_callbacks());
        remote.fetch(refspecs, Some(&mut fetch), None)?;
        Ok(())
    }

    fn remote_callbacks(&self) -> RemoteCallbacks<'static> {
        let mut callbacks = RemoteCallbacks::new();

        if !self.settings.private_key.is_empty() {
            let key = self.settings.private_key.trim().to_string();
            callbacks.credentials(move |_url, username, _allowed| {
                Cred::ssh_key_from_memory(username.unwrap_or("git"), None, &key, None)
            });
        }

        if !self.settings.known_hosts_file.is_empty() {
            let known_hosts_file = self.settings.known_hosts_file.clone();
            callbacks.certificate_check(move |_cert, host| {
                if host_is_known(&known_hosts_file, host)? {
                    Ok(CertificateCheckStatus::CertificateOk)
                } else {
                    Err(git2::Error::from_str(&format!(
                        "host {host} not present in known-hosts file"
                    )))
                }
            });
        }

        callbacks
    }
}

fn host_is_known(known_hosts_file: &str, host: &str) -> Result<bool, git2::Error> {
    let known = std::fs::read_to_string(known_hosts_file)
        .map_err(|e| git2::Error::from_str(&format!("cannot read known-hosts file: {e}")))?;

    Ok(known.lines().any(|line| {
        line.split_whitespace()
            .next()
            .map(|hosts| hosts.split(',').any(|entry| entry == host))
            .unwrap_or(false)
    }))
}

impl Backend for GitBackend {
    fn order(&self) -> i32 {
        self.settings.order
    }

    fn snapshot(&self, branch: &str, refresh: bool) -> Result<Snapshot, BackendError> {
        if self.settings.disable_labels && !branch.is_empty() {
            return Err(BackendError::LabelsUnsupported { backend: "git" });
        }

        let mut guard = self.lock_repo()?;
        if refresh || guard.is_none() {
            *guard = Some(self.connect(branch, false)?);
        }
        let Some(repo) = guard.as_ref() else {
            return Err(BackendError::Unavailable(
                "no repository checkout available".to_string(),
            ));
        };

        let commit = repo.head()?.peel_to_commit()?;
        let tree = commit.tree()?;

        let mut documents: Vec<Box<dyn Document>> = Vec::new();
        let mut walk_error: Option<BackendError> = None;

        tree.walk(TreeWalkMode::PreOrder, |dir, entry| {
            if entry.kind() != Some(ObjectType::Blob) {
                return TreeWalkResult::Ok;
            }

            let name = entry.name().unwrap_or_default();
            let rel_path = format!("{dir}{name}");

            // Materialise content under the lock; the object database must
            // not be read concurrently once the guard is released.
            let bytes = if readable_suffix(&rel_path).is_some() {
                match repo.find_blob(entry.id()) {
                    Ok(blob) => Some(blob.content().to_vec()),
                    Err(e) => {
                        walk_error = Some(e.into());
                        return TreeWalkResult::Abort;
                    }
                }
            } else {
                None
            };

            documents.push(Box::new(GitDocument {
                repo_uri: self.settings.uri.clone(),
                rel_path,
                bytes,
                decrypter: self.decrypter.clone(),
            }));
            TreeWalkResult::Ok
        })?;

        if let Some(e) = walk_error {
            return Err(e);
        }

        Ok(Snapshot::new(commit.id().to_string(), documents))
    }
}

impl Refreshable for GitBackend {
    fn refresh(&self) -> Result<(), BackendError> {
        let mut guard = self.lock_repo()?;
        *guard = Some(self.connect("", false)?);
        Ok(())
    }
}

struct GitDocument {
    repo_uri: String,
    rel_path: String,
    bytes: Option<Vec<u8>>,
    decrypter: Option<Arc<dyn Decrypter>>,
}

impl Document for GitDocument {
    fn name(&self) -> &str {
        &self.rel_path
    }

    fn qualified_name(&self) -> String {
        format!("{}/{}", self.repo_uri, self.rel_path)
    }

    fn location(&self) -> String {
        self.repo_uri.clone()
    }

    fn to_map(&self) -> Result<JsonMap, DecodeError> {
        let bytes = self.bytes.as_ref().ok_or(DecodeError::NoContent)?;
        decode_document(bytes, self.decrypter.as_deref())
    }
}
