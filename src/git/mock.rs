use crate::error::Result;
use crate::git::{preferred_tag, Describe, DescribeOptions, HeadInfo, Repository};

/// In-memory repository with a linear history, for tests
#[derive(Debug, Default)]
pub struct MockRepository {
    /// Oldest first
    commits: Vec<(String, Vec<String>)>,
    branch: Option<String>,
    dirty: bool,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a commit carrying `tags`; it becomes HEAD
    pub fn commit(&mut self, hash: impl Into<String>, tags: &[&str]) {
        let tags = tags.iter().map(|t| t.to_string()).collect();
        self.commits.push((hash.into(), tags));
    }

    /// Put HEAD on `branch`
    pub fn checkout_branch(&mut self, branch: impl Into<String>) {
        self.branch = Some(branch.into());
    }

    /// Detach HEAD at the latest commit
    pub fn detach(&mut self) {
        self.branch = None;
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }
}

impl Repository for MockRepository {
    fn head(&self) -> Result<HeadInfo> {
        Ok(HeadInfo {
            branch: self.branch.clone(),
            commit: self.commits.last().map(|(hash, _)| hash.clone()),
        })
    }

    fn tags_at(&self, commit: &str) -> Result<Vec<String>> {
        Ok(self
            .commits
            .iter()
            .filter(|(hash, _)| hash == commit)
            .flat_map(|(_, tags)| tags.iter().cloned())
            .collect())
    }

    fn describe(&self, options: &DescribeOptions) -> Result<Option<Describe>> {
        if self.commits.is_empty() {
            return Ok(None);
        }

        for (distance, (_, tags)) in self.commits.iter().rev().enumerate() {
            let eligible = tags
                .iter()
                .map(String::as_str)
                .filter(|t| options.tag_pattern.is_match(t));
            if let Some(tag) = preferred_tag(eligible) {
                return Ok(Some(Describe {
                    tag: Some(tag.to_string()),
                    distance: distance as u64,
                }));
            }
        }

        Ok(Some(Describe {
            tag: None,
            distance: self.commits.len() as u64,
        }))
    }

    fn is_dirty(&self) -> Result<bool> {
        Ok(self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_head() {
        let mut repo = MockRepository::new();
        repo.commit("abc123", &[]);
        repo.checkout_branch("main");

        let head = repo.head().unwrap();
        assert_eq!(head.branch.as_deref(), Some("main"));
        assert_eq!(head.commit.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_mock_repository_tags_at() {
        let mut repo = MockRepository::new();
        repo.commit("c1", &["v1.0.0"]);
        repo.commit("c2", &["v2.0.0", "latest"]);

        assert_eq!(repo.tags_at("c1").unwrap(), vec!["v1.0.0".to_string()]);
        assert_eq!(repo.tags_at("c2").unwrap().len(), 2);
        assert!(repo.tags_at("c3").unwrap().is_empty());
    }

    #[test]
    fn test_mock_repository_describe_without_tags() {
        let mut repo = MockRepository::new();
        assert_eq!(repo.describe(&DescribeOptions::default()).unwrap(), None);

        repo.commit("c1", &[]);
        repo.commit("c2", &[]);
        let describe = repo.describe(&DescribeOptions::default()).unwrap().unwrap();
        assert_eq!(describe.tag, None);
        assert_eq!(describe.distance, 2);
    }
}
