use core::fmt::{Display, Formatter};
use core::str::FromStr;

/// A GitHub repository named as `owner/repo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSpec {
    owner: String,
    repo: String,
}

impl RepoSpec {
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }
}

impl FromStr for RepoSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_end_matches(".git");

        let Some((owner, repo)) = s.split_once('/') else {
            return Err(format!("invalid repository '{s}': expected 'owner/repo'"));
        };

        if owner.is_empty() || repo.is_empty() {
            return Err(format!("invalid repository '{s}': empty owner or repo name"));
        }

        if repo.contains('/') {
            return Err(format!("invalid repository '{s}': expected exactly one '/'"));
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

impl Display for RepoSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_owner_repo() {
        let spec: RepoSpec = "acme/payments".parse().unwrap();
        assert_eq!(spec.owner(), "acme");
        assert_eq!(spec.repo(), "payments");
        assert_eq!(spec.to_string(), "acme/payments");
    }

    #[test]
    fn test_git_suffix_and_whitespace_are_stripped() {
        let spec: RepoSpec = " acme/payments.git ".parse().unwrap();
        assert_eq!(spec.repo(), "payments");
    }

    #[test]
    fn test_invalid_forms() {
        for input in ["", "acme", "/payments", "acme/", "acme/payments/extra"] {
            let _ = input.parse::<RepoSpec>().unwrap_err();
        }
    }
}
