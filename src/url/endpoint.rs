use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// A position in the documentation tree
///
/// Endpoints are built top-down (`course → year → format → index → problem`)
/// and rendered either as a URL under the site root or as the relative key a
/// problem is catalogued under. They are never persisted themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    course: String,
    year: Option<u16>,
    format: Option<String>,
    index: Option<u32>,
    problem: Option<String>,
}

impl Endpoint {
    /// Creates the endpoint for a course root
    pub fn course(slug: impl Into<String>) -> Self {
        Self {
            course: slug.into(),
            year: None,
            format: None,
            index: None,
            problem: None,
        }
    }

    pub fn with_year(&self, year: u16) -> Self {
        Self {
            year: Some(year),
            ..self.clone()
        }
    }

    pub fn with_format(&self, format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
            ..self.clone()
        }
    }

    pub fn with_index(&self, index: u32) -> Self {
        Self {
            index: Some(index),
            ..self.clone()
        }
    }

    /// Descends to a sub-problem; surrounding slashes of the path are dropped
    pub fn with_problem(&self, path: &str) -> Self {
        Self {
            problem: Some(path.trim_matches('/').to_string()),
            ..self.clone()
        }
    }

    pub fn course_slug(&self) -> &str {
        &self.course
    }

    pub fn year(&self) -> Option<u16> {
        self.year
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn index(&self) -> Option<u32> {
        self.index
    }

    pub fn problem(&self) -> Option<&str> {
        self.problem.as_deref()
    }

    fn segments(&self) -> Vec<String> {
        let mut segments = vec![self.course.clone()];
        segments.extend(self.year.map(|y| y.to_string()));
        segments.extend(self.format.clone());
        segments.extend(self.index.map(|i| i.to_string()));
        segments.extend(self.problem.clone());
        segments
    }

    /// Relative key, e.g. `x/2024/psets/1/mario/less`
    pub fn key(&self) -> String {
        self.segments().join("/")
    }

    /// Relative directory path with a trailing slash, e.g. `x/2024/psets/1/`
    pub fn path(&self) -> String {
        format!("{}/", self.key())
    }

    /// Resolves this endpoint against the site root
    ///
    /// `base` must end in `/`, otherwise its last segment is replaced.
    pub fn url(&self, base: &Url) -> UrlResult<Url> {
        let path = self.path();
        base.join(&path).map_err(|source| UrlError::Join {
            base: base.to_string(),
            path,
            source,
        })
    }

    /// Parses a problem key back into its endpoint
    ///
    /// The key must name all five levels; the problem part may itself
    /// contain slashes.
    pub fn parse_key(key: &str) -> UrlResult<Self> {
        let malformed = || UrlError::MalformedKey(key.to_string());
        let mut parts = key.splitn(5, '/');

        let course = parts.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
        let year = parts
            .next()
            .and_then(|s| s.parse::<u16>().ok())
            .ok_or_else(malformed)?;
        let format = parts.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
        let index = parts
            .next()
            .and_then(|s| s.parse::<u32>().ok())
            .ok_or_else(malformed)?;
        let problem = parts
            .next()
            .map(|s| s.trim_matches('/'))
            .filter(|s| !s.is_empty())
            .ok_or_else(malformed)?;

        Ok(Self::course(course)
            .with_year(year)
            .with_format(format)
            .with_index(index)
            .with_problem(problem))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}
