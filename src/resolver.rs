use crate::config::MergeGroup;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("'{name}' is a member of both '{first}' and '{second}'")]
    DuplicateMember {
        name: String,
        first: String,
        second: String,
    },
    #[error("primary '{primary}' of merge group '{group}' is not one of its members")]
    PrimaryNotMember { group: String, primary: String },
    #[error("two merge groups are both named '{0}'")]
    DuplicateDisplayName(String),
    #[error("min_zoom {min} is greater than max_zoom {max}")]
    InvalidZoomRange { min: u8, max: u8 },
}

/// Maps raw feature names to canonical display names.
///
/// Names that belong to no merge group pass through unchanged; geometry
/// names are never validated against a fixed vocabulary.
#[derive(Debug, Clone, Default)]
pub struct NameResolver {
    groups: Vec<MergeGroup>,
    by_member: HashMap<String, usize>,
    by_display: HashMap<String, usize>,
}

impl NameResolver {
    pub fn new(groups: Vec<MergeGroup>) -> Result<Self, ConfigError> {
        let mut by_member = HashMap::new();
        let mut by_display = HashMap::new();

        for (idx, group) in groups.iter().enumerate() {
            if !group.members.iter().any(|m| m == &group.primary) {
                return Err(ConfigError::PrimaryNotMember {
                    group: group.display_name.clone(),
                    primary: group.primary.clone(),
                });
            }
            for member in &group.members {
                if let Some(&prev) = by_member.get(member) {
                    if prev != idx {
                        let first: &MergeGroup = &groups[prev];
                        return Err(ConfigError::DuplicateMember {
                            name: member.clone(),
                            first: first.display_name.clone(),
                            second: group.display_name.clone(),
                        });
                    }
                }
                by_member.insert(member.clone(), idx);
            }
            if by_display.insert(group.display_name.clone(), idx).is_some() {
                return Err(ConfigError::DuplicateDisplayName(group.display_name.clone()));
            }
        }

        Ok(Self {
            groups,
            by_member,
            by_display,
        })
    }

    pub fn canonical_name<'a>(&'a self, raw_name: &'a str) -> &'a str {
        match self.by_member.get(raw_name) {
            Some(&idx) => &self.groups[idx].display_name,
            None => raw_name,
        }
    }

    /// True for member raw names and for group display names.
    pub fn is_merged(&self, name: &str) -> bool {
        self.group_for(name).is_some()
    }

    /// Key into the statistics table. May differ from the display name.
    pub fn statistics_key_for<'a>(&'a self, raw_name: &'a str) -> &'a str {
        match self.group_for(raw_name) {
            Some(group) => &group.primary,
            None => raw_name,
        }
    }

    pub fn group_for(&self, name: &str) -> Option<&MergeGroup> {
        self.by_member
            .get(name)
            .or_else(|| self.by_display.get(name))
            .map(|&idx| &self.groups[idx])
    }
}
