use std::fmt;

/// A fully-qualified container image address: repository path plus tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub repository: String,
    pub tag: String,
}

impl ImageReference {
    pub fn new(repository: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            tag: tag.into(),
        }
    }

    /// Registry host component of the repository path.
    pub fn registry_host(&self) -> &str {
        self.repository
            .split_once('/')
            .map(|(host, _)| host)
            .unwrap_or(&self.repository)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}

/// Resolve the image tag from an optional positional argument.
///
/// A flag-shaped token (leading `--`) never becomes a tag; it falls
/// back to the default `<prefix>-<revision>` form, same as when no
/// argument was given.
pub fn resolve_tag(positional: Option<&str>, prefix: &str, revision: &str) -> String {
    match positional {
        Some(tag) if !tag.starts_with("--") && !tag.is_empty() => tag.to_owned(),
        _ => format!("{prefix}-{revision}"),
    }
}
