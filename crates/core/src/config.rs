//! Configuration values - validated once at startup and passed down explicitly.

use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, Offset, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Accepted shape of an `owner/name` repository identifier.
const REPOSITORY_PATTERN: &str = r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$";

/// Errors raised while building configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// UTC offset outside the supported range
    #[error("UTC timezone should be in the range of '-12' to '14', got '{0}'")]
    OffsetOutOfRange(i32),

    /// UTC offset is not an integer
    #[error("UTC timezone must be an integer number of hours, got '{0}'")]
    InvalidOffset(String),

    /// Alphabet has fewer than two glyphs
    #[error("Invalid blocks string of {0} character(s). Please provide a string with 2 or more characters. Eg. '░▒▓█'")]
    AlphabetTooShort(usize),

    /// Bar length outside 1..=1000 or not a number
    #[error("Bar length must be an integer from 1 to 1000, got '{0}'")]
    InvalidBarLength(String),

    /// Repository is not `owner/name`
    #[error("Repository must look like 'owner/name', got '{0}'")]
    InvalidRepository(String),

    /// No access token was supplied
    #[error("A GitHub token is required")]
    MissingToken,

    /// Internal pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Whole-hour offset from UTC, limited to `-12..=14`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct UtcOffset(i32);

impl UtcOffset {
    /// Westernmost supported offset
    pub const MIN_HOURS: i32 = -12;

    /// Easternmost supported offset
    pub const MAX_HOURS: i32 = 14;

    /// Zero offset
    pub const UTC: Self = Self(0);

    /// Create an offset, rejecting values outside `-12..=14`.
    pub fn new(hours: i32) -> Result<Self, ConfigError> {
        if (Self::MIN_HOURS..=Self::MAX_HOURS).contains(&hours) {
            Ok(Self(hours))
        } else {
            Err(ConfigError::OffsetOutOfRange(hours))
        }
    }

    /// Offset in hours.
    pub fn hours(self) -> i32 {
        self.0
    }

    /// Offset as a chrono time zone.
    pub fn fixed_offset(self) -> FixedOffset {
        // Always in range for chrono given the -12..=14 invariant.
        FixedOffset::east_opt(self.0 * 3600).unwrap_or_else(|| Utc.fix())
    }
}

impl Default for UtcOffset {
    fn default() -> Self {
        Self::UTC
    }
}

/// Renders with an explicit sign: `+8`, `-5`, `+0`.
impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

impl FromStr for UtcOffset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hours: i32 = trimmed
            .parse()
            .map_err(|_| ConfigError::InvalidOffset(trimmed.to_string()))?;
        Self::new(hours)
    }
}

impl TryFrom<i32> for UtcOffset {
    type Error = ConfigError;

    fn try_from(hours: i32) -> Result<Self, Self::Error> {
        Self::new(hours)
    }
}

impl From<UtcOffset> for i32 {
    fn from(offset: UtcOffset) -> Self {
        offset.0
    }
}

/// Ordered glyphs used to draw a bar.
///
/// Index 0 is the empty cell, the last index is the full cell and anything in
/// between is a partial fill, from least to most filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockAlphabet {
    glyphs: Vec<char>,
}

impl BlockAlphabet {
    /// Alphabet used when none is configured.
    pub const DEFAULT: &'static str = "░▒▓█";

    /// Build an alphabet from a string of at least two characters.
    pub fn new(blocks: &str) -> Result<Self, ConfigError> {
        let glyphs: Vec<char> = blocks.chars().collect();
        if glyphs.len() < 2 {
            return Err(ConfigError::AlphabetTooShort(glyphs.len()));
        }
        Ok(Self { glyphs })
    }

    /// Number of glyphs.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false; an alphabet holds at least two glyphs.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Number of partial-fill glyphs between empty and full.
    pub fn interior_len(&self) -> usize {
        self.glyphs.len() - 2
    }

    /// The empty glyph (index 0).
    pub fn empty(&self) -> char {
        self.glyphs[0]
    }

    /// The full glyph (last index).
    pub fn full(&self) -> char {
        self.glyphs[self.glyphs.len() - 1]
    }

    /// Glyph at `index`, if any.
    pub fn get(&self, index: usize) -> Option<char> {
        self.glyphs.get(index).copied()
    }
}

impl Default for BlockAlphabet {
    fn default() -> Self {
        Self {
            glyphs: Self::DEFAULT.chars().collect(),
        }
    }
}

impl fmt::Display for BlockAlphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.glyphs.iter().try_for_each(|g| write!(f, "{}", g))
    }
}

impl FromStr for BlockAlphabet {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for BlockAlphabet {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<BlockAlphabet> for String {
    fn from(alphabet: BlockAlphabet) -> Self {
        alphabet.to_string()
    }
}

/// Number of glyphs in a rendered bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct BarLength(usize);

impl BarLength {
    /// Length used when none is configured.
    pub const DEFAULT: usize = 30;

    /// Longest accepted bar.
    pub const MAX: usize = 1000;

    /// Create a bar length in `1..=MAX`.
    pub fn new(len: usize) -> Result<Self, ConfigError> {
        if len == 0 || len > Self::MAX {
            return Err(ConfigError::InvalidBarLength(len.to_string()));
        }
        Ok(Self(len))
    }

    /// Length in glyphs.
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for BarLength {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl FromStr for BarLength {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let len: usize = trimmed
            .parse()
            .map_err(|_| ConfigError::InvalidBarLength(trimmed.to_string()))?;
        Self::new(len)
    }
}

impl TryFrom<usize> for BarLength {
    type Error = ConfigError;

    fn try_from(len: usize) -> Result<Self, Self::Error> {
        Self::new(len)
    }
}

impl From<BarLength> for usize {
    fn from(len: BarLength) -> Self {
        len.0
    }
}

/// GitHub repository identifier in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepositoryId {
    owner: String,
    name: String,
}

impl RepositoryId {
    /// Parse and validate `owner/name`.
    pub fn new(full_name: &str) -> Result<Self, ConfigError> {
        let full_name = full_name.trim();
        let pattern = Regex::new(REPOSITORY_PATTERN)?;
        if !pattern.is_match(full_name) {
            return Err(ConfigError::InvalidRepository(full_name.to_string()));
        }
        match full_name.split_once('/') {
            Some((owner, name)) => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            None => Err(ConfigError::InvalidRepository(full_name.to_string())),
        }
    }

    /// Repository owner (user or organization).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RepositoryId {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<RepositoryId> for String {
    fn from(repo: RepositoryId) -> Self {
        repo.to_string()
    }
}

/// Settings that shape the rendered report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Glyphs used for every bar
    pub alphabet: BlockAlphabet,

    /// Glyphs per bar
    pub bar_length: BarLength,

    /// Time zone the periods are computed in
    pub offset: UtcOffset,
}

/// Everything one action run needs, built once at startup.
#[derive(Clone)]
pub struct ActionConfig {
    /// Report rendering settings
    pub render: RenderConfig,

    /// Repository whose README is rewritten
    pub repository: RepositoryId,

    /// Access token for the GitHub API
    pub token: String,

    /// Commit message used when the README changes
    pub commit_message: String,

    /// GitHub REST API base URL
    pub api_url: String,
}

impl ActionConfig {
    /// Default commit message.
    pub const DEFAULT_COMMIT_MESSAGE: &'static str = "⏳ Update README with time progress bar";

    /// Default public GitHub API endpoint.
    pub const DEFAULT_API_URL: &'static str = "https://api.github.com";

    /// Assemble a config, rejecting an empty token.
    pub fn new(render: RenderConfig, repository: RepositoryId, token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        Ok(Self {
            render,
            repository,
            token,
            commit_message: Self::DEFAULT_COMMIT_MESSAGE.to_string(),
            api_url: Self::DEFAULT_API_URL.to_string(),
        })
    }

    /// Override the commit message.
    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }

    /// Override the API base URL (GitHub Enterprise, tests).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

impl fmt::Debug for ActionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionConfig")
            .field("render", &self.render)
            .field("repository", &self.repository)
            .field("token", &"<redacted>")
            .field("commit_message", &self.commit_message)
            .field("api_url", &self.api_url)
            .finish()
    }
}
