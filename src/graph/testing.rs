//! Scripted in-process graph client for unit tests.
//!
//! Replies are matched by substring against the Cypher text; the first
//! matching rule wins. Unmatched statements succeed with no rows. Every
//! statement, transaction start, commit and rollback is recorded.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::{AppError, QueryErrorKind};
use crate::graph::row::{Params, Row, RowStream};
use crate::graph::traits::{AccessMode, CypherExecutor, GraphClient, Transaction};

/// Builds a row from column/value pairs.
pub fn row(columns: &[(&str, JsonValue)]) -> Row {
    Row::new(
        columns
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    )
}

#[derive(Debug, Clone)]
pub enum Reply {
    Rows(Vec<Row>),
    Fail(QueryErrorKind),
}

/// A statement seen by the client. `mode` is `None` for auto-commit queries.
#[derive(Debug, Clone)]
pub struct Statement {
    pub mode: Option<AccessMode>,
    pub cypher: String,
    pub params: Params,
}

struct Rule {
    pattern: String,
    reply: Reply,
    once: bool,
}

#[derive(Default)]
struct Script {
    rules: Vec<Rule>,
    log: Vec<Statement>,
    begun: usize,
    commits: usize,
    rollbacks: usize,
}

#[derive(Clone, Default)]
pub struct ScriptedClient {
    script: Arc<Mutex<Script>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies with `rows` to every statement containing `pattern`.
    pub fn on(&self, pattern: &str, rows: Vec<Row>) -> &Self {
        self.push(pattern, Reply::Rows(rows), false)
    }

    /// Replies with `rows` to the next statement containing `pattern` only.
    pub fn on_once(&self, pattern: &str, rows: Vec<Row>) -> &Self {
        self.push(pattern, Reply::Rows(rows), true)
    }

    /// Fails every statement containing `pattern` with the given kind.
    pub fn fail(&self, pattern: &str, kind: QueryErrorKind) -> &Self {
        self.push(pattern, Reply::Fail(kind), false)
    }

    /// Fails the next statement containing `pattern` only.
    pub fn fail_once(&self, pattern: &str, kind: QueryErrorKind) -> &Self {
        self.push(pattern, Reply::Fail(kind), true)
    }

    fn push(&self, pattern: &str, reply: Reply, once: bool) -> &Self {
        self.script.lock().unwrap().rules.push(Rule {
            pattern: pattern.to_string(),
            reply,
            once,
        });
        self
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.script.lock().unwrap().log.clone()
    }

    /// Statements whose Cypher contains `pattern`.
    pub fn statements_matching(&self, pattern: &str) -> Vec<Statement> {
        self.statements()
            .into_iter()
            .filter(|s| s.cypher.contains(pattern))
            .collect()
    }

    pub fn begun(&self) -> usize {
        self.script.lock().unwrap().begun
    }

    pub fn commits(&self) -> usize {
        self.script.lock().unwrap().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.script.lock().unwrap().rollbacks
    }

    fn respond(
        &self,
        mode: Option<AccessMode>,
        cypher: &str,
        params: Params,
    ) -> Result<Vec<Row>, AppError> {
        let mut script = self.script.lock().unwrap();
        script.log.push(Statement {
            mode,
            cypher: cypher.to_string(),
            params,
        });

        let Some(index) = script
            .rules
            .iter()
            .position(|rule| cypher.contains(&rule.pattern))
        else {
            return Ok(Vec::new());
        };
        let reply = if script.rules[index].once {
            script.rules.remove(index).reply
        } else {
            script.rules[index].reply.clone()
        };

        match reply {
            Reply::Rows(rows) => Ok(rows),
            Reply::Fail(kind) => Err(AppError::Query {
                kind,
                code: format!("Scripted.{:?}", kind),
                message: "scripted failure".to_string(),
                query: cypher.to_string(),
            }),
        }
    }
}

#[async_trait]
impl CypherExecutor for ScriptedClient {
    async fn execute_cypher(
        &self,
        cypher: &str,
        params: Params,
    ) -> Result<RowStream<'_>, AppError> {
        let rows = self.respond(None, cypher, params)?;
        Ok(Box::pin(futures::stream::iter(rows.into_iter().map(Ok))))
    }

    async fn run_cypher(&self, cypher: &str, params: Params) -> Result<(), AppError> {
        self.respond(None, cypher, params).map(|_| ())
    }
}

#[async_trait]
impl GraphClient for ScriptedClient {
    type Tx<'a> = ScriptedTransaction;

    async fn begin(&self, mode: AccessMode) -> Result<Self::Tx<'_>, AppError> {
        self.script.lock().unwrap().begun += 1;
        Ok(ScriptedTransaction {
            client: self.clone(),
            mode,
        })
    }
}

pub struct ScriptedTransaction {
    client: ScriptedClient,
    mode: AccessMode,
}

#[async_trait]
impl CypherExecutor for ScriptedTransaction {
    async fn execute_cypher(
        &self,
        cypher: &str,
        params: Params,
    ) -> Result<RowStream<'_>, AppError> {
        let rows = self.client.respond(Some(self.mode), cypher, params)?;
        Ok(Box::pin(futures::stream::iter(rows.into_iter().map(Ok))))
    }

    async fn run_cypher(&self, cypher: &str, params: Params) -> Result<(), AppError> {
        self.client
            .respond(Some(self.mode), cypher, params)
            .map(|_| ())
    }
}

#[async_trait]
impl Transaction for ScriptedTransaction {
    fn mode(&self) -> AccessMode {
        self.mode
    }

    async fn commit(self) -> Result<(), AppError> {
        self.client.script.lock().unwrap().commits += 1;
        Ok(())
    }

    async fn rollback(self) -> Result<(), AppError> {
        self.client.script.lock().unwrap().rollbacks += 1;
        Ok(())
    }
}
