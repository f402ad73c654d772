//! Entry name selection using glob patterns.

use glob::{MatchOptions, Pattern};

/// Error type for file selector operations
#[derive(Debug)]
pub struct PatternError(pub String);

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid glob pattern: {}", self.0)
    }
}

impl std::error::Error for PatternError {}

/// Selects entry names by include and exclude glob patterns
pub struct FileSelector {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl FileSelector {
    /// Creates a new file selector from pattern strings
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, PatternError> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// Checks if an entry name matches the selection criteria.
    ///
    /// `*` does not cross `/`, so `*.txt` only matches top-level names; use
    /// `**/*.txt` for any depth.
    pub fn matches(&self, name: &str) -> bool {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        if !self.include.is_empty() && !self.include.iter().any(|p| p.matches_with(name, options)) {
            return false;
        }

        !self.exclude.iter().any(|p| p.matches_with(name, options))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>, PatternError> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(|e| PatternError(e.to_string())))
        .collect()
}
