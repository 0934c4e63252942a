//! Robots.txt rule evaluation
//!
//! Parsing, group selection and longest-match precedence come from the
//! robotstxt crate (a port of Google's matcher). Pattern matching itself is
//! done by [`WildcardMatchStrategy`], because the crate's built-in
//! `LongestMatchRobotsMatchStrategy` loses candidate positions after a `*`
//! (e.g. `Disallow: /sch/*_pgn=` never matches `/sch/i.html?_nkw=car&_pgn=2`).

use robotstxt::matcher::{RobotsMatchStrategy, RobotsMatcher};

/// Longest-match strategy with a correct `*` / `$` pattern matcher
///
/// Priorities are the pattern length, as in Google's matcher.
#[derive(Debug, Default)]
pub struct WildcardMatchStrategy;

impl RobotsMatchStrategy for WildcardMatchStrategy {
    fn match_allow(&self, path: &str, pattern: &str) -> i32 {
        if Self::matches(path, pattern) {
            pattern.len() as i32
        } else {
            -1
        }
    }

    fn match_disallow(&self, path: &str, pattern: &str) -> i32 {
        if Self::matches(path, pattern) {
            pattern.len() as i32
        } else {
            -1
        }
    }

    /// Returns whether `pattern` matches a prefix of `path`
    ///
    /// `*` matches any run of bytes; `$` anchors the end only as the last
    /// pattern byte.
    fn matches(path: &str, pattern: &str) -> bool {
        let path = path.as_bytes();
        let pattern = pattern.as_bytes();

        // Sorted offsets into `path` where the pattern prefix read so far can end
        let mut positions: Vec<usize> = vec![0];

        for (index, &byte) in pattern.iter().enumerate() {
            if byte == b'$' && index + 1 == pattern.len() {
                return positions.last() == Some(&path.len());
            }

            if byte == b'*' {
                positions = (positions[0]..=path.len()).collect();
            } else {
                positions = positions
                    .into_iter()
                    .filter(|&pos| path.get(pos) == Some(&byte))
                    .map(|pos| pos + 1)
                    .collect();

                if positions.is_empty() {
                    return false;
                }
            }
        }

        true
    }
}

/// Parsed robots.txt data
///
/// This is a wrapper around the robotstxt crate's types, providing a simplified
/// interface for checking if URLs are allowed.
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
    /// Whether to allow all (true = allow all, false = parse content)
    allow_all: bool,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    ///
    /// # Arguments
    ///
    /// * `content` - The raw robots.txt file content
    ///
    /// # Returns
    ///
    /// A ParsedRobots instance that can be used to check URL permissions
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    ///
    /// This is used when the origin publishes no robots.txt, or when it cannot
    /// be fetched and the failure policy is to allow.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
        }
    }

    /// Creates a ParsedRobots that disallows every path
    ///
    /// Used when robots.txt cannot be retrieved and the configured failure
    /// policy is to deny.
    pub fn deny_all() -> Self {
        Self::from_content("User-agent: *\nDisallow: /\n")
    }

    /// Returns the raw robots.txt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The user agent product token (e.g., "CarFinderBot")
    ///
    /// # Returns
    ///
    /// * `true` - If the URL is allowed
    /// * `false` - If the URL is disallowed
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.allow_all || self.content.is_empty() {
            // Empty content or explicit allow-all means allow all
            return true;
        }

        // Parse and check on-demand
        let mut matcher = RobotsMatcher::<WildcardMatchStrategy>::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }
}
