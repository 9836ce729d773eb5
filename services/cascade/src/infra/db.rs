use anyhow::anyhow;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, IntoActiveModel, QuerySelect, Statement, TransactionError, TransactionTrait,
    Value,
};
use serde_json::{Map, Number, Value as Json};

use fitfusion_cascade_schema::documents;
use fitfusion_core::serde::format_rfc3339_ms;

use crate::domain::plan::{BatchCommit, FieldUpdate, OpKind, PlannedOp};
use crate::domain::repository::StoreGateway;
use crate::domain::types::{Collection, Document, FieldValue, Fields, Filter, FilterOp};
use crate::error::StoreError;

/// Document store on Postgres: one `documents` row per document, body in a
/// `jsonb` column.
#[derive(Clone)]
pub struct DbStoreGateway {
    pub db: DatabaseConnection,
}

impl StoreGateway for DbStoreGateway {
    async fn get_document(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let model = documents::Entity::find_by_id((collection.as_str().to_owned(), id.to_owned()))
            .one(&self.db)
            .await
            .map_err(store_error)?;
        Ok(model.map(document_from_model))
    }

    async fn query_where(
        &self,
        collection: Collection,
        filters: &[Filter],
    ) -> Result<Vec<Document>, StoreError> {
        let mut sql = String::from("SELECT collection, id, fields FROM documents WHERE collection = $1");
        let mut values: Vec<Value> = vec![collection.as_str().into()];
        for filter in filters {
            let (clause, value) = filter_sql(filter, values.len() + 1)?;
            sql.push_str(" AND ");
            sql.push_str(&clause);
            values.extend(value);
        }
        sql.push_str(" ORDER BY id");

        let models = documents::Entity::find()
            .from_raw_sql(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                &sql,
                values,
            ))
            .all(&self.db)
            .await
            .map_err(store_error)?;
        Ok(models.into_iter().map(document_from_model).collect())
    }

    async fn commit_batch(&self, ops: &[PlannedOp]) -> Result<BatchCommit, StoreError> {
        let ops = ops.to_vec();
        self.db
            .transaction::<_, BatchCommit, DbErr>(|txn| {
                Box::pin(async move {
                    let mut commit = BatchCommit::default();
                    for op in &ops {
                        let key = (op.collection.as_str().to_owned(), op.id.clone());
                        match &op.kind {
                            OpKind::Delete => {
                                let result = documents::Entity::delete_by_id(key).exec(txn).await?;
                                if result.rows_affected > 0 {
                                    commit.applied += 1;
                                } else {
                                    commit.missing += 1;
                                }
                            }
                            OpKind::Update(updates) => {
                                let Some(model) = documents::Entity::find_by_id(key)
                                    .lock_exclusive()
                                    .one(txn)
                                    .await?
                                else {
                                    commit.missing += 1;
                                    continue;
                                };
                                let mut body = match &model.fields {
                                    Json::Object(map) => map.clone(),
                                    _ => Map::new(),
                                };
                                for (name, update) in updates {
                                    match update {
                                        FieldUpdate::Set(value) => {
                                            body.insert(name.clone(), field_to_json(value));
                                        }
                                        FieldUpdate::Delete => {
                                            body.remove(name);
                                        }
                                    }
                                }
                                let mut active = model.into_active_model();
                                active.fields = Set(Json::Object(body));
                                active.update(txn).await?;
                                commit.applied += 1;
                            }
                        }
                    }
                    Ok(commit)
                })
            })
            .await
            .map_err(batch_error)
    }

    async fn server_now(&self) -> Result<DateTime<Utc>, StoreError> {
        #[derive(FromQueryResult)]
        struct NowRow {
            now: DateTime<Utc>,
        }

        let row = NowRow::find_by_statement(Statement::from_string(
            self.db.get_database_backend(),
            "SELECT now() AS now",
        ))
        .one(&self.db)
        .await
        .map_err(store_error)?
        .ok_or_else(|| StoreError::Other(anyhow!("server clock query returned no row")))?;
        Ok(row.now)
    }
}

fn store_error(e: DbErr) -> StoreError {
    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => StoreError::Unavailable(e.to_string()),
        other => StoreError::Other(anyhow::Error::new(other)),
    }
}

/// Lost connections stay `Unavailable` even inside the transaction; any other
/// in-transaction failure rolled the batch back.
fn batch_error(e: TransactionError<DbErr>) -> StoreError {
    match e {
        TransactionError::Connection(e)
        | TransactionError::Transaction(e @ (DbErr::Conn(_) | DbErr::ConnectionAcquire(_))) => {
            store_error(e)
        }
        TransactionError::Transaction(e) => StoreError::Conflict(e.to_string()),
    }
}

/// SQL predicate for one filter, plus the value bound to placeholder `$n`
/// when it needs one.
///
/// String equality and range predicates read `fields->>'name'`, the
/// expressions the migrations index. Nothing here casts stored text, so a
/// malformed value is skipped by the scan instead of failing it.
fn filter_sql(filter: &Filter, n: usize) -> Result<(String, Option<Value>), StoreError> {
    let field = filter.field;
    if field.is_empty() || !field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StoreError::Other(anyhow!("unsupported field name {field:?}")));
    }
    let sql = match (filter.op, &filter.value) {
        (FilterOp::Eq, FieldValue::String(s)) => (
            format!("jsonb_typeof(fields->'{field}') = 'string' AND fields->>'{field}' = ${n}"),
            Some(s.clone().into()),
        ),
        // Inlined so the partial index predicate on `isPublic` matches.
        (FilterOp::Eq, FieldValue::Bool(b)) => (format!("fields->'{field}' = '{b}'::jsonb"), None),
        (FilterOp::Eq, value) => (
            format!("fields->'{field}' = ${n}"),
            Some(field_to_json(value).into()),
        ),
        (op, FieldValue::Int(i)) => numeric_range(field, op, n, *i as f64),
        (op, FieldValue::Float(f)) => numeric_range(field, op, n, *f),
        // Timestamps are stored as fixed-width UTC strings, so byte order
        // is time order. Values that do not start like a date never match.
        (op, FieldValue::Timestamp(t)) => (
            format!(
                "jsonb_typeof(fields->'{field}') = 'string' \
                 AND fields->>'{field}' ~ '^[0-9]{{4}}-' \
                 AND (fields->>'{field}') COLLATE \"C\" {} ${n}",
                sql_op(op)
            ),
            Some(format_rfc3339_ms(t).into()),
        ),
        (op, FieldValue::String(s)) => (
            format!(
                "jsonb_typeof(fields->'{field}') = 'string' AND fields->>'{field}' {} ${n}",
                sql_op(op)
            ),
            Some(s.clone().into()),
        ),
        (_, other) => {
            return Err(StoreError::Other(anyhow!(
                "range filter on {field} with non-comparable value {other:?}"
            )));
        }
    };
    Ok(sql)
}

/// `CASE` keeps the cast behind the type check; `AND` has no evaluation order.
fn numeric_range(field: &str, op: FilterOp, n: usize, bound: f64) -> (String, Option<Value>) {
    (
        format!(
            "CASE WHEN jsonb_typeof(fields->'{field}') = 'number' \
             THEN (fields->>'{field}')::double precision END {} ${n}",
            sql_op(op)
        ),
        Some(bound.into()),
    )
}

fn sql_op(op: FilterOp) -> &'static str {
    match op {
        FilterOp::Eq => "=",
        FilterOp::Lt => "<",
        FilterOp::Gt => ">",
    }
}

fn document_from_model(model: documents::Model) -> Document {
    let fields = match model.fields {
        Json::Object(map) => map
            .into_iter()
            .map(|(k, v)| (k, field_from_json(v)))
            .collect(),
        _ => Fields::new(),
    };
    Document {
        id: model.id,
        fields,
    }
}

/// Timestamps are stored as RFC 3339 strings with millisecond precision.
fn field_to_json(value: &FieldValue) -> Json {
    match value {
        FieldValue::Null => Json::Null,
        FieldValue::Bool(b) => Json::Bool(*b),
        FieldValue::Int(i) => Json::from(*i),
        FieldValue::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
        FieldValue::String(s) => Json::String(s.clone()),
        FieldValue::Timestamp(t) => Json::String(format_rfc3339_ms(t)),
        FieldValue::Array(items) => Json::Array(items.iter().map(field_to_json).collect()),
        FieldValue::Map(map) => Json::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), field_to_json(v)))
                .collect(),
        ),
    }
}

fn field_from_json(value: Json) -> FieldValue {
    match value {
        Json::Null => FieldValue::Null,
        Json::Bool(b) => FieldValue::Bool(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Int(i),
            None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Json::String(s) => FieldValue::String(s),
        Json::Array(items) => FieldValue::Array(items.into_iter().map(field_from_json).collect()),
        Json::Object(map) => FieldValue::Map(
            map.into_iter()
                .map(|(k, v)| (k, field_from_json(v)))
                .collect(),
        ),
    }
}
