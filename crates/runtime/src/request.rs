use sha2::{Digest, Sha256};
use std::fmt;
use std::time::Duration;
use wealthlens_common::BindValue;

/// Identity of a cached result: SHA-256 over the statement text and its
/// bind parameters. The TTL is not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_statement(sql: &str, params: &[BindValue]) -> Self {
        let mut hasher = Sha256::new();
        // Length prefixes keep ("ab", "c") and ("a", "bc") apart
        hasher.update((sql.len() as u64).to_le_bytes());
        hasher.update(sql.as_bytes());
        hasher.update((params.len() as u64).to_le_bytes());

        for param in params {
            match param {
                BindValue::Null => hasher.update([0u8]),
                BindValue::Boolean(v) => hasher.update([1u8, *v as u8]),
                BindValue::Integer(v) => {
                    hasher.update([2u8]);
                    hasher.update(v.to_le_bytes());
                }
                BindValue::Float(v) => {
                    hasher.update([3u8]);
                    hasher.update(v.to_bits().to_le_bytes());
                }
                BindValue::Text(v) => {
                    hasher.update([4u8]);
                    hasher.update((v.len() as u64).to_le_bytes());
                    hasher.update(v.as_bytes());
                }
            }
        }

        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0[..self.0.len().min(16)])
    }
}

/// A statement to run, with positional `?` parameters and an optional TTL
/// override.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    sql: String,
    params: Vec<BindValue>,
    ttl: Option<Duration>,
}

impl QueryRequest {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            ttl: None,
        }
    }

    /// Append the next positional parameter.
    pub fn bind(mut self, value: impl Into<BindValue>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn with_params<I, T>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<BindValue>,
    {
        self.params.extend(params.into_iter().map(Into::into));
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[BindValue] {
        &self.params
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::for_statement(&self.sql, &self.params)
    }
}

impl From<&str> for QueryRequest {
    fn from(sql: &str) -> Self {
        Self::new(sql)
    }
}

impl From<String> for QueryRequest {
    fn from(sql: String) -> Self {
        Self::new(sql)
    }
}
