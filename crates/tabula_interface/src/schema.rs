//! Schema introspection capability.

use std::sync::Arc;
use tabula_core::EntityDescriptor;
use tabula_error::TabulaResult;

/// Reports the queryable columns of an entity's table.
pub trait SchemaIntrospector {
    /// Column names of the entity's table, in table order.
    fn columns_of(&self, entity: &EntityDescriptor) -> TabulaResult<Vec<String>>;
}

impl<T: SchemaIntrospector + ?Sized> SchemaIntrospector for &T {
    fn columns_of(&self, entity: &EntityDescriptor) -> TabulaResult<Vec<String>> {
        (**self).columns_of(entity)
    }
}

impl<T: SchemaIntrospector + ?Sized> SchemaIntrospector for Arc<T> {
    fn columns_of(&self, entity: &EntityDescriptor) -> TabulaResult<Vec<String>> {
        (**self).columns_of(entity)
    }
}
