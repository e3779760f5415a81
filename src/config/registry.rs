//! Hostname → policy lookup

use crate::domain::HostPolicy;
use crate::error::{CloneError, Result};
use std::collections::HashMap;

/// Immutable set of configured SCM hosts. Hostnames compare case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct HostRegistry {
    hosts: HashMap<String, HostPolicy>,
}

impl HostRegistry {
    pub fn new(policies: Vec<HostPolicy>) -> Result<Self> {
        let mut hosts = HashMap::with_capacity(policies.len());
        for policy in policies {
            let key = policy.hostname.trim().to_ascii_lowercase();
            if key.is_empty() {
                return Err(CloneError::InvalidConfig("host entry with empty hostname".into()));
            }
            if hosts.contains_key(&key) {
                return Err(CloneError::DuplicateHost { hostname: policy.hostname });
            }
            hosts.insert(key, policy);
        }
        Ok(Self { hosts })
    }

    pub fn lookup(&self, hostname: &str) -> Result<&HostPolicy> {
        self.hosts
            .get(&hostname.trim().to_ascii_lowercase())
            .ok_or_else(|| CloneError::UnknownHost { hostname: hostname.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Provider;

    #[test]
    fn lookup_is_case_insensitive() {
        let registry =
            HostRegistry::new(vec![HostPolicy::new("GitHub.com", Provider::GitHub)]).expect("registry");
        let policy = registry.lookup("github.COM").expect("found");
        assert_eq!(policy.provider, Provider::GitHub);
        assert_eq!(policy.hostname, "GitHub.com");
    }

    #[test]
    fn unknown_host_is_an_error() {
        let registry = HostRegistry::default();
        assert!(matches!(registry.lookup("example.org"), Err(CloneError::UnknownHost { .. })));
    }

    #[test]
    fn duplicate_hostnames_are_rejected() {
        let err = HostRegistry::new(vec![
            HostPolicy::new("github.com", Provider::GitHub),
            HostPolicy::new("GITHUB.com", Provider::Generic),
        ])
        .expect_err("duplicate");
        assert!(matches!(err, CloneError::DuplicateHost { .. }));
    }

    #[test]
    fn empty_hostname_is_rejected() {
        let err = HostRegistry::new(vec![HostPolicy::new(" ", Provider::Generic)]).expect_err("empty");
        assert!(matches!(err, CloneError::InvalidConfig(_)));
    }
}
