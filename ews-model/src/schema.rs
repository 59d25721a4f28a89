use crate::{Field, ModelError, ModelResult};
use std::collections::HashMap;
use std::ops::{Bound, RangeBounds};

/// An ordered, name-indexed set of fields.
///
/// Declaration order is the order children are emitted on the wire. The
/// server rejects out-of-order children, so every operation here preserves
/// it, and slicing or concatenating yields another `Fields` rather than a
/// bare `Vec`.
#[derive(Debug, Clone, Default)]
pub struct Fields {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

impl Fields {
    /// Builds a schema, rejecting duplicate names.
    pub fn new(fields: Vec<Field>) -> ModelResult<Self> {
        let mut schema = Self {
            fields,
            index: HashMap::new(),
        };
        schema.reindex()?;
        Ok(schema)
    }

    fn reindex(&mut self) -> ModelResult<()> {
        self.index.clear();
        for (pos, field) in self.fields.iter().enumerate() {
            if self.index.insert(field.name().to_string(), pos).is_some() {
                return Err(ModelError::DuplicateField {
                    name: field.name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.index.get(name).map(|&pos| &self.fields[pos])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Position of a field in declaration order.
    pub fn index_of(&self, name: &str) -> ModelResult<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ModelError::UnknownFieldName { name: name.to_string() })
    }

    /// Inserts a field at `position`, shifting later fields back.
    pub fn insert_at(&mut self, position: usize, field: Field) -> ModelResult<()> {
        if self.contains(field.name()) {
            return Err(ModelError::DuplicateField {
                name: field.name().to_string(),
            });
        }
        let position = position.min(self.fields.len());
        self.fields.insert(position, field);
        self.reindex()
    }

    /// Appends a field.
    pub fn push(&mut self, field: Field) -> ModelResult<()> {
        self.insert_at(self.fields.len(), field)
    }

    /// Removes a field by name and returns it.
    pub fn remove(&mut self, name: &str) -> ModelResult<Field> {
        let position = self.index_of(name)?;
        let field = self.fields.remove(position);
        self.reindex()?;
        Ok(field)
    }

    /// Returns `self` followed by `other`. Used to compose a derived type's
    /// schema from its base schema and its own fields.
    pub fn concat(&self, other: &Fields) -> ModelResult<Fields> {
        let mut fields = self.fields.clone();
        fields.extend(other.fields.iter().cloned());
        Self::new(fields)
    }

    /// An independent copy sharing no state with `self`.
    #[must_use]
    pub fn copy(&self) -> Fields {
        self.clone()
    }

    /// The fields within `range`. Out-of-bounds ends are clamped.
    #[must_use]
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Fields {
        let len = self.fields.len();
        let start = match range.start_bound() {
            Bound::Included(&n) => n,
            Bound::Excluded(&n) => n.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&n) => n.saturating_add(1),
            Bound::Excluded(&n) => n,
            Bound::Unbounded => len,
        }
        .clamp(start, len);

        let fields = self.fields[start..end].to_vec();
        let index = fields
            .iter()
            .enumerate()
            .map(|(pos, f)| (f.name().to_string(), pos))
            .collect();
        Fields { fields, index }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(Field::name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
