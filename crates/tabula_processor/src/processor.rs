//! The table view request pipeline.

use crate::{ProcessOptions, ProcessorConfig, codec_for};
use tabula_core::{
    EntityDescriptor, EntityRegistry, PageLength, Predicate, QuerySpec, Record,
    RelationDescriptor, ResultEnvelope, TableViewRequest,
};
use tabula_error::{
    InvalidEntityTypeError, InvalidRequestError, InvalidSortColumnError, TabulaResult,
    UnknownRelationError,
};
use tabula_interface::{QueryExecutor, SchemaIntrospector};
use tracing::{debug, instrument};

/// Answers table view requests for the entities in its registry.
///
/// Holds no per-request state: every call builds its own query and
/// discards it on return.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tabula_core::{EntityDescriptor, EntityRegistry, TableViewRequest};
/// use tabula_processor::{InMemoryTableStore, ProcessOptions, TableQueryProcessor};
///
/// let mut store = InMemoryTableStore::new();
/// store
///     .insert_table("users", &["id", "name"], vec![json!({"id": 1, "name": "Ada"})])
///     .unwrap();
///
/// let mut registry = EntityRegistry::new();
/// registry.insert(EntityDescriptor::builder().name("User").table("users").build().unwrap());
///
/// let processor = TableQueryProcessor::new(registry, &store, &store);
/// let request = TableViewRequest::builder().search_value("ad").draw(4).build().unwrap();
/// let envelope = processor
///     .process(&request, "User", &ProcessOptions::default())
///     .unwrap();
/// assert_eq!(*envelope.draw(), 4);
/// assert_eq!(*envelope.records_filtered(), 1);
/// ```
#[derive(Debug)]
pub struct TableQueryProcessor<S, E> {
    registry: EntityRegistry,
    introspector: S,
    executor: E,
    config: ProcessorConfig,
}

impl<S, E> TableQueryProcessor<S, E>
where
    S: SchemaIntrospector,
    E: QueryExecutor,
{
    /// Creates a processor with the default configuration.
    pub fn new(registry: EntityRegistry, introspector: S, executor: E) -> Self {
        Self {
            registry,
            introspector,
            executor,
            config: ProcessorConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: ProcessorConfig) -> Self {
        self.config = config;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Registered entities.
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Process a request with options taken from the configuration.
    pub fn process_default(
        &self,
        request: &TableViewRequest,
        entity_type: &str,
    ) -> TabulaResult<ResultEnvelope> {
        self.process(request, entity_type, &self.config.default_options())
    }

    /// Process one table view request against `entity_type`.
    ///
    /// Issues one schema lookup, an unfiltered count, a filtered count and
    /// one fetch, in that order.
    ///
    /// # Errors
    ///
    /// - `InvalidEntityType` if `entity_type` is not registered
    /// - `UnknownRelation` if an eager-load name is not declared on the entity
    /// - `InvalidRequest` if the base query targets another table
    /// - `InvalidSortColumn` if the sort index is outside the column list
    ///
    /// All four are raised before any count or fetch query runs; the first
    /// three before any storage access at all. Collaborator failures are
    /// returned unchanged.
    #[instrument(
        skip(self, request, options),
        fields(
            draw = request.draw(),
            has_search = request.search_term().is_some(),
            relations = options.eager_load().len(),
            encode_output = options.encode_output(),
        )
    )]
    pub fn process(
        &self,
        request: &TableViewRequest,
        entity_type: &str,
        options: &ProcessOptions,
    ) -> TabulaResult<ResultEnvelope> {
        let entity = self
            .registry
            .resolve(entity_type)
            .ok_or_else(|| InvalidEntityTypeError::new(entity_type))?;
        let relations = resolve_relations(entity, options.eager_load())?;

        if let Some(base) = options.base_query()
            && base.table() != entity.table()
        {
            return Err(InvalidRequestError::new(format!(
                "base query targets '{}' but entity '{}' uses table '{}'",
                base.table(),
                entity.name(),
                entity.table()
            ))
            .into());
        }

        let columns = self.introspector.columns_of(entity)?;
        debug!(table = %entity.table(), column_count = columns.len(), "Resolved columns");

        let sort = request.sort();
        let sort_column = columns
            .get(*sort.column_index())
            .ok_or_else(|| InvalidSortColumnError::new(*sort.column_index(), columns.len()))?;

        let mut query = options
            .base_query()
            .clone()
            .unwrap_or_else(|| QuerySpec::for_table(entity.table()));
        if !relations.is_empty() {
            query.with_relations(relations);
        }

        let records_total = self.executor.count(&query)?;
        debug!(records_total, "Counted rows before search");

        if let Some(term) = request.search_term() {
            query.filter(Predicate::any_column_contains(
                &columns,
                term,
                !self.config.case_insensitive_search(),
            ));
        }

        let records_filtered = self.executor.count(&query)?;
        debug!(records_filtered, "Counted rows after search");

        query.order_by(sort_column.as_str(), *sort.direction());

        // No length from the client means every filtered row.
        let page_length = request
            .page_length()
            .or(self.config.default_page_length().map(PageLength::Limit))
            .unwrap_or(PageLength::All);
        if let Some(limit) = page_length.limit() {
            query.paginate(*request.page_offset(), limit);
        }

        let rows = self.executor.fetch(&query)?;
        debug!(row_count = rows.len(), "Fetched page");

        let records = rows
            .into_iter()
            .map(|row| {
                let mut record = Record::new(row, entity.hidden_fields());
                if *options.expose_hidden_fields() {
                    record.reveal_hidden();
                }
                record
            })
            .collect::<Vec<_>>();

        let data = codec_for(*options.encode_output()).encode(records)?;

        Ok(ResultEnvelope::new(
            *request.draw(),
            records_total,
            records_filtered,
            data,
        ))
    }
}

fn resolve_relations(
    entity: &EntityDescriptor,
    names: &[String],
) -> Result<Vec<RelationDescriptor>, UnknownRelationError> {
    names
        .iter()
        .map(|name| {
            entity
                .relation(name)
                .cloned()
                .ok_or_else(|| UnknownRelationError::new(entity.name(), name))
        })
        .collect()
}
