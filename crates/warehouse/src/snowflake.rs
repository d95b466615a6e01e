//! Snowflake SQL API v2 driver.
//!
//! Statements are submitted with `POST /api/v2/statements`. A `200` carries the
//! first result partition, a `202` means the statement is still running and is
//! polled through `GET /api/v2/statements/{handle}`. Remaining partitions are
//! fetched with `?partition=N` and appended in order.

use crate::driver::{ConnectionDescriptor, SessionHandle, WarehouseDriver, WarehouseSession};
use crate::error::DriverError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wealthlens_common::scrubber::sql_preview;
use wealthlens_common::{BindValue, Column, ColumnType, ResultTable, Scalar};

const TOKEN_TYPE_HEADER: &str = "X-Snowflake-Authorization-Token-Type";
const PROBE_SQL: &str = "SELECT CURRENT_VERSION()";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
const CLIENT_USER_AGENT: &str = concat!("wealthlens/", env!("CARGO_PKG_VERSION"));

// 1970-01-01 expressed as days from 0001-01-01 (CE)
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

#[derive(Serialize)]
struct StatementRequest<'a> {
    statement: &'a str,
    timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warehouse: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    bindings: BTreeMap<String, Binding>,
}

#[derive(Serialize)]
struct Binding {
    #[serde(rename = "type")]
    sql_type: &'static str,
    value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultSet {
    statement_handle: Option<String>,
    result_set_meta_data: Option<ResultSetMetaData>,
    #[serde(default)]
    data: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultSetMetaData {
    #[serde(default)]
    row_type: Vec<RowType>,
    #[serde(default)]
    partition_info: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RowType {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    scale: Option<i64>,
    #[serde(default = "default_nullable")]
    nullable: bool,
}

fn default_nullable() -> bool {
    true
}

/// Body of `202`, `408` and `422` responses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatementStatus {
    code: Option<String>,
    sql_state: Option<String>,
    message: Option<String>,
    statement_handle: Option<String>,
}

enum Progress {
    Done(ResultSet),
    Running(String),
}

/// Driver for the Snowflake SQL API.
#[derive(Debug, Clone)]
pub struct SnowflakeDriver {
    client: reqwest::Client,
    poll_interval: Duration,
}

impl Default for SnowflakeDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SnowflakeDriver {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Delay between status checks while a statement is still running.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

#[async_trait]
impl WarehouseDriver for SnowflakeDriver {
    async fn open(&self, descriptor: &ConnectionDescriptor) -> Result<SessionHandle, DriverError> {
        let session = SnowflakeSession {
            client: self.client.clone(),
            descriptor: descriptor.clone(),
            poll_interval: self.poll_interval,
        };

        let started = Instant::now();
        session
            .execute(PROBE_SQL, &[])
            .await
            .map_err(DriverError::into_probe_failure)?;

        tracing::debug!(
            target: "session",
            host = ?descriptor.host(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Warehouse session verified"
        );
        Ok(Arc::new(session))
    }
}

#[derive(Debug)]
pub struct SnowflakeSession {
    client: reqwest::Client,
    descriptor: ConnectionDescriptor,
    poll_interval: Duration,
}

impl SnowflakeSession {
    fn statements_url(&self) -> String {
        format!(
            "{}/api/v2/statements",
            self.descriptor.base_url.as_str().trim_end_matches('/')
        )
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, DriverError> {
        let token = self.descriptor.credential.resolve().await?;
        request
            .header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()))
            .header(TOKEN_TYPE_HEADER, self.descriptor.credential.kind().header_value())
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await
            .map_err(|source| DriverError::Unreachable {
                url: url.to_string(),
                source,
            })
    }

    async fn submit(
        &self,
        sql: &str,
        params: &[BindValue],
        preview: &str,
    ) -> Result<Progress, DriverError> {
        let bindings = params
            .iter()
            .enumerate()
            .map(|(idx, value)| {
                (
                    (idx + 1).to_string(),
                    Binding {
                        sql_type: value.sql_type(),
                        value: value.wire_value(),
                    },
                )
            })
            .collect();

        let body = StatementRequest {
            statement: sql,
            timeout: self.descriptor.statement_timeout.as_secs(),
            database: self.descriptor.database.as_deref(),
            schema: self.descriptor.schema.as_deref(),
            warehouse: self.descriptor.warehouse.as_deref(),
            role: self.descriptor.role.as_deref(),
            bindings,
        };

        let url = self.statements_url();
        let response = self.send(self.client.post(&url).json(&body), &url).await?;
        read_response(response, &url, preview).await
    }

    async fn fetch(
        &self,
        handle: &str,
        partition: Option<usize>,
        preview: &str,
    ) -> Result<Progress, DriverError> {
        let url = format!("{}/{}", self.statements_url(), handle);
        let mut request = self.client.get(&url);
        if let Some(partition) = partition {
            request = request.query(&[("partition", partition)]);
        }
        let response = self.send(request, &url).await?;
        read_response(response, &url, preview).await
    }
}

#[async_trait]
impl WarehouseSession for SnowflakeSession {
    async fn execute(&self, sql: &str, params: &[BindValue]) -> Result<ResultTable, DriverError> {
        let preview = sql_preview(sql);

        let mut progress = self.submit(sql, params, &preview).await?;
        let mut result = loop {
            match progress {
                Progress::Done(result) => break result,
                Progress::Running(handle) => {
                    tracing::trace!(
                        target: "queries",
                        statement_handle = %handle,
                        "Statement still running"
                    );
                    tokio::time::sleep(self.poll_interval).await;
                    progress = self.fetch(&handle, None, &preview).await?;
                }
            }
        };

        let partitions = result
            .result_set_meta_data
            .as_ref()
            .map(|m| m.partition_info.len())
            .unwrap_or(0);
        if partitions > 1 {
            let handle = result.statement_handle.clone().ok_or_else(|| {
                DriverError::Protocol("partitioned result without a statement handle".to_string())
            })?;
            for partition in 1..partitions {
                match self.fetch(&handle, Some(partition), &preview).await? {
                    Progress::Done(page) => result.data.extend(page.data),
                    Progress::Running(_) => {
                        return Err(DriverError::Protocol(format!(
                            "partition {} reported as still running",
                            partition
                        )))
                    }
                }
            }
        }

        decode_result(result)
    }
}

async fn read_response(
    response: reqwest::Response,
    url: &str,
    preview: &str,
) -> Result<Progress, DriverError> {
    let status = response.status().as_u16();
    let body = response.text().await.map_err(|source| DriverError::Unreachable {
        url: url.to_string(),
        source,
    })?;

    match status {
        200 => serde_json::from_str::<ResultSet>(&body)
            .map(Progress::Done)
            .map_err(|e| DriverError::Protocol(format!("malformed result set: {}", e))),
        202 => {
            let status: StatementStatus = serde_json::from_str(&body)
                .map_err(|e| DriverError::Protocol(format!("malformed statement status: {}", e)))?;
            status
                .statement_handle
                .map(Progress::Running)
                .ok_or_else(|| {
                    DriverError::Protocol("running statement without a handle".to_string())
                })
        }
        401 | 403 => {
            let status_body: StatementStatus = serde_json::from_str(&body).unwrap_or_default();
            Err(DriverError::CredentialsRejected {
                status,
                message: status_body.message.unwrap_or(body),
            })
        }
        408 | 422 => {
            let failure: StatementStatus = serde_json::from_str(&body).unwrap_or_default();
            let vendor_code = match (failure.code, status) {
                (Some(code), _) => Some(code),
                // Timeout responses may omit the code
                (None, 408) => Some("000630".to_string()),
                (None, _) => None,
            };
            Err(DriverError::Statement {
                message: failure.message.unwrap_or(body),
                sql_preview: preview.to_string(),
                sql_state: failure.sql_state,
                vendor_code,
                statement_handle: failure.statement_handle,
            })
        }
        other => Err(DriverError::Protocol(format!(
            "HTTP {} from {}: {}",
            other,
            url,
            body.chars().take(200).collect::<String>()
        ))),
    }
}

fn decode_result(result: ResultSet) -> Result<ResultTable, DriverError> {
    let row_types = result
        .result_set_meta_data
        .map(|m| m.row_type)
        .unwrap_or_default();

    let columns = row_types
        .iter()
        .map(|rt| Column {
            name: rt.name.clone(),
            data_type: column_type(rt),
            nullable: rt.nullable,
        })
        .collect::<Vec<_>>();

    let rows = result
        .data
        .into_iter()
        .map(|raw_row| {
            if raw_row.len() != row_types.len() {
                return Err(DriverError::Protocol(format!(
                    "row has {} cells, expected {}",
                    raw_row.len(),
                    row_types.len()
                )));
            }
            row_types
                .iter()
                .zip(raw_row)
                .map(|(rt, raw)| decode_cell(rt, raw.as_deref()))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    ResultTable::try_from_rows(columns, rows).map_err(|e| DriverError::Protocol(e.message))
}

fn column_type(row_type: &RowType) -> ColumnType {
    match row_type.kind.to_ascii_lowercase().as_str() {
        "fixed" if row_type.scale.unwrap_or(0) == 0 => ColumnType::Integer,
        "fixed" | "real" => ColumnType::Float,
        "boolean" => ColumnType::Boolean,
        "date" => ColumnType::Date,
        "timestamp_ntz" | "timestamp_ltz" | "timestamp_tz" => ColumnType::Timestamp,
        _ => ColumnType::Text,
    }
}

pub(crate) fn decode_cell(row_type: &RowType, raw: Option<&str>) -> Result<Scalar, DriverError> {
    let Some(raw) = raw else {
        return Ok(Scalar::Null);
    };
    let fail = |reason: &str| DriverError::Decode {
        column: row_type.name.clone(),
        raw: raw.to_string(),
        reason: reason.to_string(),
    };

    let value = match column_type(row_type) {
        ColumnType::Integer => match raw.parse::<i64>() {
            Ok(v) => Scalar::Integer(v),
            // NUMBER(38,0) can exceed i64
            Err(_) => Scalar::Float(raw.parse::<f64>().map_err(|_| fail("not a number"))?),
        },
        ColumnType::Float => Scalar::Float(raw.parse::<f64>().map_err(|_| fail("not a number"))?),
        ColumnType::Boolean => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" => Scalar::Boolean(true),
            "false" | "0" => Scalar::Boolean(false),
            _ => return Err(fail("not a boolean")),
        },
        ColumnType::Date => {
            let days = raw.parse::<i32>().map_err(|_| fail("not a day count"))?;
            let date = days
                .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
                .and_then(NaiveDate::from_num_days_from_ce_opt)
                .ok_or_else(|| fail("date out of range"))?;
            Scalar::Date(date)
        }
        ColumnType::Timestamp => {
            // TIMESTAMP_TZ appends the offset in minutes; the epoch part is already UTC
            let epoch = raw.split_whitespace().next().unwrap_or(raw);
            Scalar::Timestamp(parse_epoch(epoch).ok_or_else(|| fail("not an epoch timestamp"))?)
        }
        ColumnType::Text => Scalar::Text(raw.to_string()),
    };
    Ok(value)
}

/// Parse `seconds[.fraction]` into a UTC timestamp.
fn parse_epoch(raw: &str) -> Option<DateTime<Utc>> {
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let (secs, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let secs: i64 = secs.parse().ok()?;
    if frac.len() > 9 || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let nanos: u32 = if frac.is_empty() {
        0
    } else {
        format!("{:0<9}", frac).parse().ok()?
    };

    let (secs, nanos) = match (negative, nanos) {
        (false, n) => (secs, n),
        (true, 0) => (-secs, 0),
        (true, n) => (-secs - 1, 1_000_000_000 - n),
    };
    DateTime::from_timestamp(secs, nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row_type(kind: &str, scale: Option<i64>) -> RowType {
        RowType {
            name: "C".to_string(),
            kind: kind.to_string(),
            scale,
            nullable: true,
        }
    }

    #[test]
    fn test_decode_fixed() {
        assert_eq!(
            decode_cell(&row_type("fixed", Some(0)), Some("42")).unwrap(),
            Scalar::Integer(42)
        );
        assert_eq!(
            decode_cell(&row_type("fixed", Some(2)), Some("1250000.55")).unwrap(),
            Scalar::Float(1250000.55)
        );
        assert_eq!(decode_cell(&row_type("fixed", Some(0)), None).unwrap(), Scalar::Null);
    }

    #[test]
    fn test_decode_date_and_timestamps() {
        assert_eq!(
            decode_cell(&row_type("date", None), Some("19813")).unwrap(),
            Scalar::Date(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap())
        );
        let expected = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        assert_eq!(
            decode_cell(&row_type("timestamp_ntz", None), Some("1711886400.000000000")).unwrap(),
            Scalar::Timestamp(expected)
        );
        assert_eq!(
            decode_cell(
                &row_type("timestamp_tz", None),
                Some("1711886400.000000000 1500")
            )
            .unwrap(),
            Scalar::Timestamp(expected)
        );
    }

    #[test]
    fn test_parse_negative_epoch_fraction() {
        let ts = parse_epoch("-1.5").unwrap();
        assert_eq!(ts.timestamp(), -2);
        assert_eq!(ts.timestamp_subsec_nanos(), 500_000_000);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_cell(&row_type("real", None), Some("abc")).unwrap_err();
        assert!(matches!(err, DriverError::Decode { ref column, .. } if column == "C"));
    }

    #[test]
    fn test_unknown_types_decode_as_text() {
        assert_eq!(
            decode_cell(&row_type("variant", None), Some("{\"a\":1}")).unwrap(),
            Scalar::Text("{\"a\":1}".to_string())
        );
    }
}
