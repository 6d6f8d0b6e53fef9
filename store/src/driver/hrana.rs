//! Remote libSQL driver speaking the Hrana v2 HTTP pipeline protocol.
//!
//! Every call is one `POST {base}/v2/pipeline` carrying the request(s)
//! followed by a `close`, so no stream state (baton) is kept between calls.
//! Multi-statement writes go out as a single conditional `batch`:
//!
//! ```text
//! step 0      BEGIN
//! step 1..=n  statement i        if step i-1 ok
//! step n+1    COMMIT             if step n ok
//! step n+2    ROLLBACK           if step n+1 not ok
//! ```

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::{DriverError, DriverResult, SqlDriver, Statement};
use crate::dialect::Dialect;

const PIPELINE_PATH: &str = "/v2/pipeline";

/// Connection to a libSQL server (sqld, Turso) over HTTP.
pub struct HranaDriver {
    client: Client,
    pipeline_url: String,
    auth_token: Option<String>,
}

impl HranaDriver {
    /// Connects to the server at `base` and checks it answers `SELECT 1`.
    ///
    /// `base` may be `host:port`, an `http(s)://` URL or a `libsql://` URL
    /// (served over HTTPS). `timeout` bounds each HTTP round-trip.
    pub fn connect(
        base: &str,
        auth_token: Option<&str>,
        timeout: Option<Duration>,
    ) -> DriverResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout).connect_timeout(timeout);
        }
        let mut driver = Self {
            client: builder.build()?,
            pipeline_url: pipeline_url(base),
            auth_token: auth_token.map(str::to_string),
        };
        driver.query_integers(&Statement::bare("SELECT 1"))?;
        Ok(driver)
    }

    fn send(&self, requests: Vec<StreamRequest<'_>>) -> DriverResult<Vec<StreamResponse>> {
        let body = PipelineRequest {
            baton: None,
            requests,
        };
        let mut request = self.client.post(&self.pipeline_url).json(&body);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }
        let raw = request.send()?.error_for_status()?.text()?;
        parse_pipeline_response(&raw)
    }

    fn execute_one(&self, stmt: &Statement) -> DriverResult<StmtResult> {
        let responses = self.send(vec![
            StreamRequest::Execute {
                stmt: HranaStmt::from_statement(stmt, true),
            },
            StreamRequest::Close,
        ])?;
        match responses.into_iter().next() {
            Some(StreamResponse::Execute { result }) => Ok(result),
            _ => Err(DriverError::Decode(
                "pipeline returned no execute result".to_string(),
            )),
        }
    }
}

impl SqlDriver for HranaDriver {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn query_exists(&mut self, stmt: &Statement) -> DriverResult<bool> {
        let result = self.execute_one(stmt)?;
        let first = result
            .rows
            .first()
            .and_then(|row| row.first())
            .ok_or_else(|| DriverError::Decode("existence query returned no row".to_string()))?;
        Ok(first.as_integer()? != 0)
    }

    fn query_strings(&mut self, stmt: &Statement) -> DriverResult<Vec<String>> {
        let result = self.execute_one(stmt)?;
        result
            .rows
            .into_iter()
            .map(|row| match row.into_iter().next() {
                Some(HranaValue::Text { value }) => Ok(value),
                other => Err(DriverError::Decode(format!("expected text, got {other:?}"))),
            })
            .collect()
    }

    fn query_integers(&mut self, stmt: &Statement) -> DriverResult<Vec<i64>> {
        let result = self.execute_one(stmt)?;
        result
            .rows
            .iter()
            .map(|row| {
                row.first()
                    .ok_or_else(|| DriverError::Decode("empty row".to_string()))?
                    .as_integer()
            })
            .collect()
    }

    fn execute(&mut self, stmts: &[Statement]) -> DriverResult<u64> {
        if stmts.is_empty() {
            return Ok(0);
        }
        let responses = self.send(vec![
            StreamRequest::Batch {
                batch: transaction_batch(stmts),
            },
            StreamRequest::Close,
        ])?;
        match responses.into_iter().next() {
            Some(StreamResponse::Batch { result }) => batch_outcome(result, stmts.len()),
            _ => Err(DriverError::Decode(
                "pipeline returned no batch result".to_string(),
            )),
        }
    }
}

/// Builds the pipeline endpoint for a configured server address.
pub(crate) fn pipeline_url(base: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("libsql://") {
        format!("https://{rest}")
    } else if base.contains("://") {
        base.to_string()
    } else {
        format!("http://{base}")
    };
    format!("{base}{PIPELINE_PATH}")
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct PipelineRequest<'a> {
    baton: Option<String>,
    requests: Vec<StreamRequest<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamRequest<'a> {
    Execute { stmt: HranaStmt<'a> },
    Batch { batch: HranaBatch<'a> },
    Close,
}

#[derive(Debug, Serialize)]
struct HranaStmt<'a> {
    sql: &'a str,
    args: Vec<HranaValue>,
    want_rows: bool,
}

impl<'a> HranaStmt<'a> {
    fn from_statement(stmt: &'a Statement, want_rows: bool) -> Self {
        Self {
            sql: &stmt.sql,
            args: stmt
                .args
                .iter()
                .map(|arg| HranaValue::Text { value: arg.clone() })
                .collect(),
            want_rows,
        }
    }

    fn bare(sql: &'a str) -> Self {
        Self {
            sql,
            args: Vec::new(),
            want_rows: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct HranaBatch<'a> {
    steps: Vec<BatchStep<'a>>,
}

#[derive(Debug, Serialize)]
struct BatchStep<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    condition: Option<BatchCond>,
    stmt: HranaStmt<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum BatchCond {
    Ok { step: usize },
    Not { cond: Box<BatchCond> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum HranaValue {
    Null,
    Integer { value: String },
    Float { value: f64 },
    Text { value: String },
    Blob { base64: String },
}

impl HranaValue {
    fn as_integer(&self) -> DriverResult<i64> {
        match self {
            HranaValue::Integer { value } => value
                .parse()
                .map_err(|_| DriverError::Decode(format!("bad integer '{value}'"))),
            other => Err(DriverError::Decode(format!(
                "expected integer, got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PipelineResponse {
    results: Vec<StreamResult>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamResult {
    Ok { response: StreamResponse },
    Error { error: HranaError },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamResponse {
    Execute { result: StmtResult },
    Batch { result: BatchResult },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct StmtResult {
    #[serde(default)]
    rows: Vec<Vec<HranaValue>>,
    #[serde(default)]
    affected_row_count: u64,
}

#[derive(Debug, Deserialize)]
struct BatchResult {
    step_results: Vec<Option<StmtResult>>,
    step_errors: Vec<Option<HranaError>>,
}

#[derive(Debug, Deserialize)]
struct HranaError {
    message: String,
}

fn parse_pipeline_response(raw: &str) -> DriverResult<Vec<StreamResponse>> {
    let parsed: PipelineResponse = serde_json::from_str(raw)?;
    parsed
        .results
        .into_iter()
        .map(|result| match result {
            StreamResult::Ok { response } => Ok(response),
            StreamResult::Error { error } => Err(DriverError::Remote(error.message)),
        })
        .collect()
}

fn transaction_batch(stmts: &[Statement]) -> HranaBatch<'_> {
    let n = stmts.len();
    let mut steps = Vec::with_capacity(n + 3);
    steps.push(BatchStep {
        condition: None,
        stmt: HranaStmt::bare("BEGIN"),
    });
    for (i, stmt) in stmts.iter().enumerate() {
        steps.push(BatchStep {
            condition: Some(BatchCond::Ok { step: i }),
            stmt: HranaStmt::from_statement(stmt, false),
        });
    }
    steps.push(BatchStep {
        condition: Some(BatchCond::Ok { step: n }),
        stmt: HranaStmt::bare("COMMIT"),
    });
    steps.push(BatchStep {
        condition: Some(BatchCond::Not {
            cond: Box::new(BatchCond::Ok { step: n + 1 }),
        }),
        stmt: HranaStmt::bare("ROLLBACK"),
    });
    HranaBatch { steps }
}

/// Reads a [`transaction_batch`] result for `n` user statements.
fn batch_outcome(result: BatchResult, n: usize) -> DriverResult<u64> {
    let commit_step = n + 1;
    if let Some(err) = result
        .step_errors
        .iter()
        .take(commit_step + 1)
        .flatten()
        .next()
    {
        return Err(DriverError::Remote(err.message.clone()));
    }
    if !matches!(result.step_results.get(commit_step), Some(Some(_))) {
        return Err(DriverError::Remote(
            "transaction was not committed".to_string(),
        ));
    }
    Ok(result
        .step_results
        .iter()
        .skip(1)
        .take(n)
        .flatten()
        .map(|r| r.affected_row_count)
        .sum())
}
