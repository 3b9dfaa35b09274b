//! Generic repository
//!
//! One implementation, instantiated per entity:
//! - create: INSERT ... RETURNING id, constraint violations mapped to domain errors
//! - delete/get/exists: conjunctive equality filters
//! - every mutating call states whether to commit now or leave the change
//!   pending in the caller's transaction

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::{Connection, Postgres, QueryBuilder};

use super::entities::Entity;
use super::session::Session;
use crate::error::{messages, Error, Result};

/// A bindable column value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Column/value pairs. Used both as insert payload and as equality filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<(&'static str, Value)>);

/// Conjunctive equality filter: every pair must match.
pub type Filter = Fields;

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.0.push((column, value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, Value)> {
        self.0.iter()
    }
}

/// When a mutating call publishes its change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// Commit the session's transaction as soon as the statement succeeds.
    Now,
    /// Leave the change pending; the caller commits the unit later.
    Deferred,
}

/// Client-facing messages for the two constraint violations `create` maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintMessages {
    /// Unique violation
    pub exists: &'static str,
    /// Foreign key violation
    pub missing: &'static str,
}

impl ConstraintMessages {
    pub const fn new(exists: &'static str, missing: &'static str) -> Self {
        Self { exists, missing }
    }
}

impl Default for ConstraintMessages {
    fn default() -> Self {
        Self::new(messages::OBJECT_NOT_CREATED, messages::OBJECT_NOT_FOUND)
    }
}

/// Persistence contract shared by every entity.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Insert one row and return its id.
    async fn create(
        &self,
        session: &mut Session,
        fields: Fields,
        messages: ConstraintMessages,
        commit: Commit,
    ) -> Result<i64>;

    /// Delete every matching row. Fails with `NotFound(not_found)` when
    /// nothing matched.
    async fn delete_by(
        &self,
        session: &mut Session,
        filter: Filter,
        not_found: &'static str,
        commit: Commit,
    ) -> Result<bool>;

    /// The single matching row, if any. The filter must target a unique key.
    async fn get_by(&self, session: &mut Session, filter: Filter) -> Result<Option<E>>;

    async fn exists_by(&self, session: &mut Session, filter: Filter) -> Result<bool>;

    async fn count(&self, session: &mut Session) -> Result<i64>;
}

/// PostgreSQL implementation of [`Repository`] for any [`Entity`].
pub struct PgRepository<E> {
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> PgRepository<E> {
    pub const fn new() -> Self {
        Self {
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Default for PgRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for PgRepository<E> {
    async fn create(
        &self,
        session: &mut Session,
        fields: Fields,
        messages: ConstraintMessages,
        commit: Commit,
    ) -> Result<i64> {
        let mut query = insert_query::<E>(&fields)?;
        tracing::debug!(table = E::TABLE, sql = query.sql(), "insert");

        // The savepoint confines a failure to this statement so earlier
        // deferred statements survive it.
        let conn = session.connection().await?;
        let mut savepoint = conn.begin().await?;
        let inserted = query
            .build_query_scalar::<i64>()
            .fetch_one(&mut *savepoint)
            .await;

        match inserted {
            Ok(id) => {
                savepoint.commit().await?;
                if commit == Commit::Now {
                    session.commit().await?;
                }
                Ok(id)
            }
            Err(err) => {
                // The constraint error is what the caller needs; a failed
                // rollback is only logged.
                if let Err(rollback) = savepoint.rollback().await {
                    tracing::warn!(table = E::TABLE, error = %rollback, "savepoint rollback failed");
                }
                if commit == Commit::Now {
                    if let Err(rollback) = session.rollback().await {
                        tracing::warn!(table = E::TABLE, error = %rollback, "rollback failed");
                    }
                }
                Err(translate(err, messages))
            }
        }
    }

    async fn delete_by(
        &self,
        session: &mut Session,
        filter: Filter,
        not_found: &'static str,
        commit: Commit,
    ) -> Result<bool> {
        let mut query = delete_query::<E>(&filter)?;
        tracing::debug!(table = E::TABLE, sql = query.sql(), "delete");

        let conn = session.connection().await?;
        let deleted: Vec<i64> = query
            .build_query_scalar()
            .fetch_all(&mut *conn)
            .await?;

        if deleted.is_empty() {
            return Err(Error::NotFound(not_found.to_owned()));
        }
        if commit == Commit::Now {
            session.commit().await?;
        }
        Ok(true)
    }

    async fn get_by(&self, session: &mut Session, filter: Filter) -> Result<Option<E>> {
        let mut query = select_query::<E>(&filter)?;
        let conn = session.connection().await?;
        let rows: Vec<E> = query.build_query_as().fetch_all(&mut *conn).await?;

        if rows.len() > 1 {
            return Err(Error::Internal(format!(
                "filter on '{}' matched more than one row",
                E::TABLE
            )));
        }
        Ok(rows.into_iter().next())
    }

    async fn exists_by(&self, session: &mut Session, filter: Filter) -> Result<bool> {
        let mut query = exists_query::<E>(&filter)?;
        let conn = session.connection().await?;
        let exists: bool = query.build_query_scalar().fetch_one(&mut *conn).await?;
        Ok(exists)
    }

    async fn count(&self, session: &mut Session) -> Result<i64> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", E::TABLE));
        let conn = session.connection().await?;
        let count: i64 = query.build_query_scalar().fetch_one(&mut *conn).await?;
        Ok(count)
    }
}

/// Map constraint violations to domain errors; everything else stays a
/// database error.
fn translate(err: sqlx::Error, messages: ConstraintMessages) -> Error {
    if let sqlx::Error::Database(db) = &err {
        match db.kind() {
            ErrorKind::UniqueViolation => return Error::AlreadyExists(messages.exists.to_owned()),
            ErrorKind::ForeignKeyViolation => {
                return Error::ReferencedNotFound(messages.missing.to_owned())
            }
            _ => {}
        }
    }
    Error::Database(err)
}

fn check_columns<E: Entity>(fields: &Fields) -> Result<()> {
    match fields.iter().find(|(column, _)| !E::has_column(column)) {
        Some((column, _)) => Err(Error::Internal(format!(
            "unknown column '{}' for table '{}'",
            column,
            E::TABLE
        ))),
        None => Ok(()),
    }
}

fn push_value(query: &mut QueryBuilder<'static, Postgres>, value: &Value) {
    match value {
        Value::Int(v) => {
            query.push_bind(*v);
        }
        Value::Text(v) => {
            query.push_bind(v.clone());
        }
    }
}

fn push_filter(query: &mut QueryBuilder<'static, Postgres>, filter: &Filter) {
    for (i, (column, value)) in filter.iter().enumerate() {
        query.push(if i == 0 { " WHERE " } else { " AND " });
        query.push(*column).push(" = ");
        push_value(query, value);
    }
}

fn insert_query<E: Entity>(fields: &Fields) -> Result<QueryBuilder<'static, Postgres>> {
    check_columns::<E>(fields)?;
    let mut query = QueryBuilder::new(format!("INSERT INTO {}", E::TABLE));

    if fields.is_empty() {
        query.push(" DEFAULT VALUES");
    } else {
        query.push(" (");
        for (i, (column, _)) in fields.iter().enumerate() {
            if i > 0 {
                query.push(", ");
            }
            query.push(*column);
        }
        query.push(") VALUES (");
        for (i, (_, value)) in fields.iter().enumerate() {
            if i > 0 {
                query.push(", ");
            }
            push_value(&mut query, value);
        }
        query.push(")");
    }

    query.push(" RETURNING ").push(E::PRIMARY_KEY);
    Ok(query)
}

fn delete_query<E: Entity>(filter: &Filter) -> Result<QueryBuilder<'static, Postgres>> {
    if filter.is_empty() {
        return Err(Error::Internal(format!(
            "refusing to delete from '{}' without a filter",
            E::TABLE
        )));
    }
    check_columns::<E>(filter)?;
    let mut query = QueryBuilder::new(format!("DELETE FROM {}", E::TABLE));
    push_filter(&mut query, filter);
    query.push(" RETURNING ").push(E::PRIMARY_KEY);
    Ok(query)
}

fn select_query<E: Entity>(filter: &Filter) -> Result<QueryBuilder<'static, Postgres>> {
    check_columns::<E>(filter)?;
    let mut query = QueryBuilder::new(format!(
        "SELECT {} FROM {}",
        E::COLUMNS.join(", "),
        E::TABLE
    ));
    push_filter(&mut query, filter);
    // Two rows are enough to detect an ambiguous filter.
    query.push(" LIMIT 2");
    Ok(query)
}

fn exists_query<E: Entity>(filter: &Filter) -> Result<QueryBuilder<'static, Postgres>> {
    check_columns::<E>(filter)?;
    let mut query = QueryBuilder::new(format!("SELECT EXISTS(SELECT 1 FROM {}", E::TABLE));
    push_filter(&mut query, filter);
    query.push(")");
    Ok(query)
}
