//! Row operations over a schema provider and an execution engine.

use crate::config::ServiceConfig;
use crate::response::{GetResponse, ResponseWrapper, RowsResponse, UpdateResponse};
use crate::security;
use crate::{ExecutionEngine, ResultPage, SchemaProvider};
use rowgate_core::error::{Error, Result};
use rowgate_core::{
    build_drop_columns, build_path_predicates, insert_row, parse_where, DeleteBuilder,
    PagingState, Predicate, RowMap, SelectBuilder, SortSpec, StatementDescriptor, Table,
    UpdateBuilder,
};
use tracing::{debug, warn};

/// Optional read parameters, as received from the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Comma-separated column list; all columns when absent
    pub fields: Option<String>,
    /// Requested page size; the configured default when absent or non-positive
    pub page_size: Option<i64>,
    /// Base64 paging state from a previous response
    pub page_state: Option<String>,
    /// JSON sort object, e.g. `{"age":"desc"}`
    pub sort: Option<String>,
    /// Return bare rows instead of `{count, pageState, data}`
    pub raw: bool,
}

impl ReadOptions {
    /// Set the projected columns
    pub fn with_fields<S: Into<String>>(mut self, fields: S) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Set the page size
    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Resume from a paging state
    pub fn with_page_state<S: Into<String>>(mut self, page_state: S) -> Self {
        self.page_state = Some(page_state.into());
        self
    }

    /// Set the sort object
    pub fn with_sort<S: Into<String>>(mut self, sort: S) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Request bare rows
    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }
}

/// Parses a `fields` parameter: comma separated, whitespace trimmed.
///
/// A blank parameter selects every column; an empty entry is an error.
pub fn parse_fields(fields: &str) -> Result<Vec<String>> {
    if fields.trim().is_empty() {
        return Ok(Vec::new());
    }
    fields
        .split(',')
        .map(|field| {
            let field = field.trim();
            if field.is_empty() {
                Err(Error::InvalidInput(format!(
                    "fields contains an empty column name: '{}'",
                    fields
                )))
            } else {
                Ok(field.to_string())
            }
        })
        .collect()
}

/// Translates row requests into statements and runs them.
///
/// Each operation validates its input against the configured limits first,
/// then fetches the table from the schema provider, builds one statement
/// and hands it to the engine with the caller's session.
#[derive(Debug, Clone)]
pub struct RowsService<S, E> {
    schema: S,
    engine: E,
    config: ServiceConfig,
}

impl<S, E> RowsService<S, E>
where
    S: SchemaProvider,
    E: ExecutionEngine,
{
    /// Creates a service with the default configuration.
    pub fn new(schema: S, engine: E) -> Self {
        Self::with_config(schema, engine, ServiceConfig::default())
    }

    /// Creates a service with an explicit configuration.
    pub fn with_config(schema: S, engine: E, config: ServiceConfig) -> Self {
        Self {
            schema,
            engine,
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Schema provider.
    pub fn schema(&self) -> &S {
        &self.schema
    }

    /// Execution engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Reads rows matching a `where` expression.
    pub fn get_rows_with_where(
        &self,
        session: &E::Session,
        keyspace: &str,
        table: &str,
        filter: &str,
        options: &ReadOptions,
    ) -> Result<RowsResponse> {
        self.check_names(keyspace, table)?;
        security::validate_filter(filter, &self.config.limits)?;
        let fields = self.check_read_options(options)?;

        let table = self.schema.table(keyspace, table)?;
        let predicates = parse_where(filter, &table)?;
        self.read(session, &table, predicates, fields, options)
    }

    /// Reads rows addressed by primary key path segments.
    pub fn get_rows<P: AsRef<str>>(
        &self,
        session: &E::Session,
        keyspace: &str,
        table: &str,
        path: &[P],
        options: &ReadOptions,
    ) -> Result<RowsResponse> {
        self.check_names(keyspace, table)?;
        security::validate_path(path, &self.config.limits)?;
        let fields = self.check_read_options(options)?;

        let table = self.schema.table(keyspace, table)?;
        let predicates = build_path_predicates(&table, path)?;
        self.read(session, &table, predicates, fields, options)
    }

    /// Inserts a row from a JSON object and returns its primary key fields.
    pub fn add_row(
        &self,
        session: &E::Session,
        keyspace: &str,
        table: &str,
        payload: &str,
    ) -> Result<RowMap> {
        self.check_names(keyspace, table)?;
        security::validate_payload(payload, &self.config.limits)?;
        let row: RowMap = serde_json::from_str(payload)?;

        let table = self.schema.table(keyspace, table)?;
        let (statement, keys) = insert_row(&table, &row)?;
        self.execute(session, &statement)?;
        debug!(table = %statement.statement().target(), "row added");
        Ok(keys)
    }

    /// Updates the fields of a JSON object on the rows addressed by `path`.
    ///
    /// Serves both replace and partial update; the applied field map is
    /// echoed back.
    pub fn update_row<P: AsRef<str>>(
        &self,
        session: &E::Session,
        keyspace: &str,
        table: &str,
        path: &[P],
        payload: &str,
        raw: bool,
    ) -> Result<UpdateResponse> {
        self.check_names(keyspace, table)?;
        security::validate_path(path, &self.config.limits)?;
        security::validate_payload(payload, &self.config.limits)?;
        let row: RowMap = serde_json::from_str(payload)?;

        let table = self.schema.table(keyspace, table)?;
        let predicates = build_path_predicates(&table, path)?;
        let statement = UpdateBuilder::new(&table)
            .set_row(&row)?
            .filter(predicates)
            .build()?;
        self.execute(session, &statement)?;

        Ok(if raw {
            UpdateResponse::Raw(row)
        } else {
            UpdateResponse::Wrapped(ResponseWrapper { data: row })
        })
    }

    /// Deletes the rows addressed by `path`.
    pub fn delete_row<P: AsRef<str>>(
        &self,
        session: &E::Session,
        keyspace: &str,
        table: &str,
        path: &[P],
    ) -> Result<()> {
        self.check_names(keyspace, table)?;
        security::validate_path(path, &self.config.limits)?;

        let table = self.schema.table(keyspace, table)?;
        let predicates = build_path_predicates(&table, path)?;
        let statement = DeleteBuilder::new(&table).filter(predicates).build()?;
        self.execute(session, &statement)?;
        Ok(())
    }

    /// Drops columns from a table, in the order given.
    ///
    /// Column existence is left to the engine.
    pub fn drop_columns<C: AsRef<str>>(
        &self,
        session: &E::Session,
        keyspace: &str,
        table: &str,
        columns: &[C],
    ) -> Result<()> {
        self.check_names(keyspace, table)?;
        security::validate_field_count(columns.len(), &self.config.limits)?;
        for column in columns {
            security::validate_column_name(column.as_ref())?;
        }

        let statement = build_drop_columns(keyspace, table, columns)?;
        self.execute(session, &statement)?;
        Ok(())
    }

    fn check_names(&self, keyspace: &str, table: &str) -> Result<()> {
        security::validate_name("Keyspace", keyspace)?;
        security::validate_name("Table", table)
    }

    fn check_read_options(&self, options: &ReadOptions) -> Result<Vec<String>> {
        if let Some(state) = options.page_state.as_deref() {
            security::validate_paging_state(state, &self.config.limits)?;
        }
        let fields = match options.fields.as_deref() {
            Some(fields) => parse_fields(fields)?,
            None => Vec::new(),
        };
        security::validate_field_count(fields.len(), &self.config.limits)?;
        Ok(fields)
    }

    fn read(
        &self,
        session: &E::Session,
        table: &Table,
        predicates: Vec<Predicate>,
        fields: Vec<String>,
        options: &ReadOptions,
    ) -> Result<RowsResponse> {
        let mut select = SelectBuilder::new(table).columns(fields)?.filter(predicates);
        if let Some(sort) = options.sort.as_deref() {
            select = select.order_by(SortSpec::parse(sort)?)?;
        }
        let paging_state = options
            .page_state
            .as_deref()
            .map(PagingState::from_base64)
            .transpose()?;
        let page_size = self.config.page_size_for(options.page_size);
        let statement = select
            .page_size(Some(i64::from(page_size)))
            .paging_state(paging_state)
            .build()?;

        let page = self.execute(session, &statement)?;
        debug!(
            table = %statement.statement().target(),
            rows = page.rows.len(),
            has_more = page.paging_state.is_some(),
            "rows read"
        );

        if options.raw {
            return Ok(RowsResponse::Raw(page.rows));
        }
        let page_state = page.paging_state.map(|state| state.to_base64());
        Ok(RowsResponse::Wrapped(GetResponse::new(page.rows, page_state)))
    }

    fn execute(&self, session: &E::Session, statement: &StatementDescriptor) -> Result<ResultPage> {
        self.engine.execute(session, statement).map_err(|err| {
            warn!(error = %err, cql = statement.cql(), "statement execution failed");
            err
        })
    }
}
