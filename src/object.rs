use crate::field::{Field, FieldValue};

/// A named group of console fields, shown as one line of the object list.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntry {
    name: String,
    fields: Vec<Field>,
}

impl ObjectEntry {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self { name: name.into(), fields }
    }

    /// Builds an entry from a shared field template. Every entry gets its own copy, so editing one
    /// entry never leaks into the others built from the same template.
    pub fn from_template(name: impl Into<String>, template: &[Field]) -> Self {
        Self::new(name, template.to_vec())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Panics when `index` is out of range.
    pub fn field_at(&self, index: usize) -> &Field {
        assert!(
            index < self.fields.len(),
            "field index {index} out of range for object '{}' ({} fields)",
            self.name,
            self.fields.len()
        );
        &self.fields[index]
    }

    pub(crate) fn field_at_mut(&mut self, index: usize) -> &mut Field {
        assert!(
            index < self.fields.len(),
            "field index {index} out of range for object '{}' ({} fields)",
            self.name,
            self.fields.len()
        );
        &mut self.fields[index]
    }

    pub fn get_field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name() == name)
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.field(name).map(Field::current_value)
    }

    pub fn is_changed(&self) -> bool {
        self.fields.iter().any(Field::is_changed)
    }

    pub fn changed_count(&self) -> usize {
        self.fields.iter().filter(|field| field.is_changed()).count()
    }
}
