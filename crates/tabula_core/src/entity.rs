//! Record type descriptors and the registry that resolves them by name.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cardinality of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Many related rows point at this row
    HasMany,
    /// One related row points at this row
    HasOne,
    /// This row points at one related row
    BelongsTo,
}

impl RelationKind {
    /// Whether the relation loads as an array.
    pub fn is_many(&self) -> bool {
        matches!(self, RelationKind::HasMany)
    }
}

/// An eager-loadable relation declared on an entity.
///
/// Related rows match when `related.related_column = parent.parent_column`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct RelationDescriptor {
    /// Name the related data is attached under
    name: String,
    /// Related table
    table: String,
    /// Cardinality
    kind: RelationKind,
    /// Column on the parent row
    parent_column: String,
    /// Column on the related row
    related_column: String,
}

impl RelationDescriptor {
    /// Rows of `table` whose `foreign_key` holds this row's `id`.
    pub fn has_many(
        name: impl Into<String>,
        table: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            kind: RelationKind::HasMany,
            parent_column: "id".to_string(),
            related_column: foreign_key.into(),
        }
    }

    /// The single row of `table` whose `foreign_key` holds this row's `id`.
    pub fn has_one(
        name: impl Into<String>,
        table: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            kind: RelationKind::HasOne,
            ..Self::has_many(name, table, foreign_key)
        }
    }

    /// The row of `table` whose `id` this row's `foreign_key` holds.
    pub fn belongs_to(
        name: impl Into<String>,
        table: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            kind: RelationKind::BelongsTo,
            parent_column: foreign_key.into(),
            related_column: "id".to_string(),
        }
    }

    /// Override the key column on the non-foreign-key side.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        match self.kind {
            RelationKind::HasMany | RelationKind::HasOne => self.parent_column = key.into(),
            RelationKind::BelongsTo => self.related_column = key.into(),
        }
        self
    }
}

/// Everything the processor needs to know about a record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct EntityDescriptor {
    /// Type reference callers resolve the entity by
    name: String,
    /// Backing table
    table: String,
    /// Fields left out of serialized rows unless revealed
    #[builder(default, setter(each(name = "hidden_field", into)))]
    hidden_fields: Vec<String>,
    /// Relations that may be eager-loaded
    #[builder(default, setter(each(name = "relation")))]
    relations: Vec<RelationDescriptor>,
}

impl EntityDescriptor {
    /// Create a new builder for an entity descriptor.
    pub fn builder() -> EntityDescriptorBuilder {
        EntityDescriptorBuilder::default()
    }

    /// Look up a declared relation by name.
    pub fn relation(&self, name: &str) -> Option<&RelationDescriptor> {
        self.relations.iter().find(|r| r.name == name)
    }
}

/// A record type known at compile time.
///
/// ```
/// use tabula_core::{Entity, EntityDescriptor, EntityRegistry};
///
/// struct User;
///
/// impl Entity for User {
///     const NAME: &'static str = "User";
///
///     fn descriptor() -> EntityDescriptor {
///         EntityDescriptor::builder()
///             .name(Self::NAME)
///             .table("users")
///             .hidden_field("password")
///             .build()
///             .expect("valid descriptor")
///     }
/// }
///
/// let mut registry = EntityRegistry::new();
/// registry.register::<User>();
/// assert_eq!(registry.resolve("User").unwrap().table(), "users");
/// assert!(registry.resolve("NonExistentModel").is_none());
/// ```
pub trait Entity {
    /// Type reference used in requests.
    const NAME: &'static str;

    /// Descriptor for this record type.
    fn descriptor() -> EntityDescriptor;
}

/// Name-to-descriptor lookup for the record types a processor may serve.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: HashMap<String, EntityDescriptor>,
}

impl EntityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a compile-time record type.
    pub fn register<E: Entity>(&mut self) -> &mut Self {
        let mut descriptor = E::descriptor();
        descriptor.name = E::NAME.to_string();
        self.insert(descriptor)
    }

    /// Register a descriptor under its own name, replacing any previous one.
    pub fn insert(&mut self, descriptor: EntityDescriptor) -> &mut Self {
        self.entities.insert(descriptor.name.clone(), descriptor);
        self
    }

    /// Resolve a type reference.
    pub fn resolve(&self, name: &str) -> Option<&EntityDescriptor> {
        self.entities.get(name)
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entities are registered.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
