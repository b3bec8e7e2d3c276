//! Per-field columns of a growing segment
//!
//! A segment owns one column per schema field. [`FieldColumn`] is the closed
//! set of concrete column types a field can map to, and [`FieldColumns`] keeps
//! them in schema order so the insert pipeline can address them by name
//! without knowing element types.

use super::config::{ColumnConfig, FieldSpec};
use super::error::{ColumnError, ColumnResult};
use super::store::ColumnStore;
use super::types::{DataType, RawSource};
use super::variants::{BinaryVectorColumn, FloatVectorColumn, ScalarColumn};
use std::collections::HashMap;

/// A column of any supported field type
#[derive(Debug)]
pub enum FieldColumn {
    Bool(ScalarColumn<bool>),
    Int8(ScalarColumn<i8>),
    Int16(ScalarColumn<i16>),
    Int32(ScalarColumn<i32>),
    Int64(ScalarColumn<i64>),
    Float(ScalarColumn<f32>),
    Double(ScalarColumn<f64>),
    FloatVector(FloatVectorColumn),
    BinaryVector(BinaryVectorColumn),
}

impl FieldColumn {
    /// Build the column a field spec describes
    pub fn from_spec(spec: &FieldSpec, config: &ColumnConfig) -> ColumnResult<Self> {
        config.validate()?;
        let width = spec.width()?;
        let capacity = config.chunk_capacity;

        if !spec.data_type.is_vector() && width != 1 {
            return Err(ColumnError::UnsupportedField {
                name: spec.name.clone(),
                reason: format!("scalar {} field cannot have dim {}", spec.data_type, width),
            });
        }

        let column = match spec.data_type {
            DataType::Bool => Self::Bool(ScalarColumn::new(capacity)?),
            DataType::Int8 => Self::Int8(ScalarColumn::new(capacity)?),
            DataType::Int16 => Self::Int16(ScalarColumn::new(capacity)?),
            DataType::Int32 => Self::Int32(ScalarColumn::new(capacity)?),
            DataType::Int64 => Self::Int64(ScalarColumn::new(capacity)?),
            DataType::Float => Self::Float(ScalarColumn::new(capacity)?),
            DataType::Double => Self::Double(ScalarColumn::new(capacity)?),
            DataType::FloatVector => Self::FloatVector(FloatVectorColumn::new(width, capacity)?),
            DataType::BinaryVector => Self::BinaryVector(BinaryVectorColumn::new(width, capacity)?),
        };
        Ok(column)
    }

    /// Type-erased view for ingestion and bookkeeping
    pub fn as_store(&self) -> &dyn ColumnStore {
        match self {
            Self::Bool(c) => c,
            Self::Int8(c) => c,
            Self::Int16(c) => c,
            Self::Int32(c) => c,
            Self::Int64(c) => c,
            Self::Float(c) => c,
            Self::Double(c) => c,
            Self::FloatVector(c) => c,
            Self::BinaryVector(c) => c,
        }
    }

    pub fn data_type(&self) -> DataType {
        self.as_store().data_type()
    }
}

/// All columns of one segment, in schema order
#[derive(Debug)]
pub struct FieldColumns {
    columns: Vec<(String, FieldColumn)>,
    by_name: HashMap<String, usize>,
}

impl FieldColumns {
    pub fn from_specs(specs: &[FieldSpec], config: &ColumnConfig) -> ColumnResult<Self> {
        let mut columns = Vec::with_capacity(specs.len());
        let mut by_name = HashMap::with_capacity(specs.len());

        for spec in specs {
            if by_name.contains_key(&spec.name) {
                return Err(ColumnError::DuplicateField(spec.name.clone()));
            }
            let column = FieldColumn::from_spec(spec, config)?;
            by_name.insert(spec.name.clone(), columns.len());
            columns.push((spec.name.clone(), column));
        }

        Ok(Self { columns, by_name })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FieldColumn> {
        self.by_name.get(name).map(|&i| &self.columns[i].1)
    }

    /// Copy `element_count` rows of field `name` from a tagged source
    pub fn write_raw(
        &self,
        name: &str,
        element_offset: usize,
        source: RawSource<'_>,
        element_count: usize,
    ) -> ColumnResult<()> {
        let column = self
            .get(name)
            .ok_or_else(|| ColumnError::FieldNotFound(name.to_string()))?;
        column
            .as_store()
            .write_raw(element_offset, source, element_count)
    }

    /// Reserve chunks for `row_count` rows in every field
    pub fn grow_all_to_at_least(&self, row_count: usize) {
        for (_, column) in &self.columns {
            column.as_store().grow_to_at_least(row_count);
        }
    }

    /// Iterate `(name, column)` in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldColumn)> {
        self.columns.iter().map(|(name, column)| (name.as_str(), column))
    }

    /// Bytes allocated across every field
    pub fn allocated_bytes(&self) -> usize {
        self.columns
            .iter()
            .map(|(_, column)| column.as_store().stats().allocated_bytes)
            .sum()
    }
}
