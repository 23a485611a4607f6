use crate::error::Result;
use crate::git::{preferred_tag, Describe, DescribeOptions, HeadInfo};
use git2::{ErrorCode, Oid, Repository as Git2Repo, Sort, StatusOptions};
use std::collections::HashMap;
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// HEAD commit, or `None` while the current branch is unborn
    fn head_commit(&self) -> Result<Option<Oid>> {
        match self.repo.head() {
            Ok(reference) => Ok(Some(reference.peel_to_commit()?.id())),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Branch HEAD refers to symbolically, even before its first commit
    fn head_branch(&self) -> Result<Option<String>> {
        let head = self.repo.find_reference("HEAD")?;
        Ok(head
            .symbolic_target()
            .and_then(|target| target.strip_prefix("refs/heads/"))
            .map(str::to_string))
    }

    /// Commit -> names of the tags pointing at it
    fn tag_targets(&self) -> Result<HashMap<Oid, Vec<String>>> {
        let mut targets: HashMap<Oid, Vec<String>> = HashMap::new();
        for reference in self.repo.references_glob("refs/tags/*")? {
            let reference = reference?;
            let Some(name) = reference.shorthand().map(str::to_string) else {
                continue;
            };
            // Tags on trees or blobs have no place in commit history.
            if let Ok(commit) = reference.peel_to_commit() {
                targets.entry(commit.id()).or_default().push(name);
            }
        }
        Ok(targets)
    }
}

impl super::Repository for Git2Repository {
    fn head(&self) -> Result<HeadInfo> {
        let commit = self.head_commit()?.map(|oid| oid.to_string());
        let branch = if self.repo.head_detached()? {
            None
        } else {
            self.head_branch()?
        };

        Ok(HeadInfo { branch, commit })
    }

    fn tags_at(&self, commit: &str) -> Result<Vec<String>> {
        let oid = Oid::from_str(commit)?;
        let mut tags = self.tag_targets()?.remove(&oid).unwrap_or_default();
        tags.sort();
        Ok(tags)
    }

    fn describe(&self, options: &DescribeOptions) -> Result<Option<Describe>> {
        let Some(head) = self.head_commit()? else {
            return Ok(None);
        };
        let targets = self.tag_targets()?;

        let mut walk = self.repo.revwalk()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        walk.push(head)?;
        if options.first_parent {
            walk.simplify_first_parent()?;
        }

        let mut distance = 0u64;
        for oid in walk {
            let oid = oid?;
            if let Some(names) = targets.get(&oid) {
                let eligible = names
                    .iter()
                    .map(String::as_str)
                    .filter(|t| options.tag_pattern.is_match(t));
                if let Some(tag) = preferred_tag(eligible) {
                    return Ok(Some(Describe {
                        tag: Some(tag.to_string()),
                        distance,
                    }));
                }
            }
            distance += 1;
        }

        Ok(Some(Describe {
            tag: None,
            distance,
        }))
    }

    fn is_dirty(&self) -> Result<bool> {
        if self.repo.is_bare() {
            return Ok(false);
        }

        let mut status_options = StatusOptions::new();
        status_options
            .include_untracked(true)
            .include_ignored(false)
            .exclude_submodules(true);
        let statuses = self.repo.statuses(Some(&mut status_options))?;

        Ok(!statuses.is_empty())
    }
}
