//! Per-generation offset tables.
//!
//! A schema only says *where* a field lives; *how* it is read is decided by
//! the field's kind in [`crate::codec`].

mod tables;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::core_api::CoreError;
use crate::generation::Generation;
use crate::record::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub field: Field,
    /// Offset from the start of the player block; `None` when the field does
    /// not exist in this layout.
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

impl FieldEntry {
    pub const fn at(field: Field, offset: usize) -> Self {
        Self {
            field,
            offset: Some(offset),
            count: None,
            size: None,
        }
    }

    pub const fn absent(field: Field) -> Self {
        Self {
            field,
            offset: None,
            count: None,
            size: None,
        }
    }

    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub const fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn is_present(&self) -> bool {
        self.offset.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    entries: Vec<FieldEntry>,
}

impl Schema {
    pub fn new(entries: Vec<FieldEntry>) -> Self {
        Self { entries }
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    pub fn entry(&self, field: Field) -> Option<&FieldEntry> {
        self.entries.iter().find(|entry| entry.field == field)
    }

    pub fn offset(&self, field: Field) -> Option<usize> {
        self.entry(field).and_then(|entry| entry.offset)
    }

    pub fn identifier_offset(&self) -> Result<usize, CoreError> {
        self.offset(Field::Identifier).ok_or_else(|| {
            CoreError::InvalidSchema("schema has no Identifier offset".to_string())
        })
    }

    /// Checks that every present entry resolves to a codec for `generation`
    /// and that no field is listed twice.
    pub fn validate(&self, generation: Generation) -> Result<(), CoreError> {
        self.identifier_offset()?;

        for (i, entry) in self.entries.iter().enumerate() {
            if self.entries[..i].iter().any(|e| e.field == entry.field) {
                return Err(CoreError::InvalidSchema(format!(
                    "{} is listed more than once",
                    entry.field
                )));
            }
            if entry.is_present() {
                codec::resolve(entry, generation)?;
            }
        }

        Ok(())
    }
}

/// The set of schemas a mapper can work with.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<Generation, Schema>,
}

impl SchemaRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for generation in Generation::ALL {
            registry.insert(generation, tables::builtin(generation));
        }
        registry
    }

    pub fn insert(&mut self, generation: Generation, schema: Schema) -> Option<Schema> {
        self.schemas.insert(generation, schema)
    }

    pub fn get(&self, generation: Generation) -> Result<&Schema, CoreError> {
        self.schemas
            .get(&generation)
            .ok_or_else(|| CoreError::UnsupportedGeneration(generation.to_string()))
    }

    pub fn generations(&self) -> impl Iterator<Item = Generation> + '_ {
        self.schemas.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_api::CoreErrorCode;

    #[test]
    fn builtin_schemas_validate() {
        let registry = SchemaRegistry::builtin();
        for generation in Generation::ALL {
            let schema = registry.get(generation).unwrap();
            schema
                .validate(generation)
                .unwrap_or_else(|e| panic!("{generation}: {e}"));
        }
    }

    #[test]
    fn empty_registry_rejects_generation() {
        let err = SchemaRegistry::empty()
            .get(Generation::CityFolk)
            .unwrap_err();
        assert_eq!(err.code(), CoreErrorCode::UnsupportedGeneration);
    }

    #[test]
    fn image_field_outside_newest_platform_is_unmapped() {
        let schema = Schema::new(vec![
            FieldEntry::at(Field::Identifier, 0),
            FieldEntry::at(Field::TownPassCardImage, 0x10),
        ]);
        let err = schema.validate(Generation::AnimalCrossing).unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnmappedFieldType {
                field: Field::TownPassCardImage,
                ..
            }
        ));
        schema.validate(Generation::NewLeaf).unwrap();
    }

    #[test]
    fn duplicate_and_identifier_problems_are_reported() {
        let schema = Schema::new(vec![FieldEntry::at(Field::Gender, 0)]);
        assert_eq!(
            schema.validate(Generation::WildWorld).unwrap_err().code(),
            CoreErrorCode::InvalidSchema
        );

        let schema = Schema::new(vec![
            FieldEntry::at(Field::Identifier, 0),
            FieldEntry::at(Field::Gender, 2),
            FieldEntry::absent(Field::Gender),
        ]);
        assert_eq!(
            schema.validate(Generation::WildWorld).unwrap_err().code(),
            CoreErrorCode::InvalidSchema
        );
    }

    #[test]
    fn absent_entries_are_not_resolved() {
        let schema = Schema::new(vec![
            FieldEntry::at(Field::Identifier, 0),
            FieldEntry::absent(Field::Bed),
        ]);
        schema.validate(Generation::CityFolk).unwrap();
        assert_eq!(schema.offset(Field::Bed), None);
    }
}
