use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// A single selectable value of a console field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(value) => Some(*value),
            FieldValue::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(value) => write!(f, "{value}"),
            FieldValue::Int(value) => write!(f, "{value}"),
            FieldValue::Float(value) => write!(f, "{value:.2}"),
            FieldValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Named value slot that cycles through a closed set of choices.
///
/// The index always stays inside `choices`; stepping past either end wraps around.
/// Change state is derived from the index captured at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    choices: Vec<FieldValue>,
    selected: usize,
    default: usize,
}

impl Field {
    pub fn cyclable(name: impl Into<String>, choices: Vec<FieldValue>, default_index: usize) -> Result<Self> {
        let name = name.into();
        if choices.is_empty() {
            bail!("Field '{name}' has no choices; at least one value is required.");
        }
        if default_index >= choices.len() {
            bail!(
                "Field '{name}' default index {default_index} is out of range for {} choices.",
                choices.len()
            );
        }
        Ok(Self { name, choices, selected: default_index, default: default_index })
    }

    pub fn with_default_value(
        name: impl Into<String>,
        choices: Vec<FieldValue>,
        default: &FieldValue,
    ) -> Result<Self> {
        let name = name.into();
        let Some(index) = choices.iter().position(|choice| choice == default) else {
            bail!("Field '{name}' default value '{default}' is not one of its choices.");
        };
        Self::cyclable(name, choices, index)
    }

    pub fn boolean(name: impl Into<String>, default: bool) -> Self {
        Self {
            name: name.into(),
            choices: vec![FieldValue::Bool(false), FieldValue::Bool(true)],
            selected: default as usize,
            default: default as usize,
        }
    }

    pub fn int_range(name: impl Into<String>, range: RangeInclusive<i64>, default: i64) -> Result<Self> {
        let choices: Vec<FieldValue> = range.map(FieldValue::Int).collect();
        Self::with_default_value(name, choices, &FieldValue::Int(default))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn choices(&self) -> &[FieldValue] {
        &self.choices
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn default_index(&self) -> usize {
        self.default
    }

    pub fn current_value(&self) -> &FieldValue {
        &self.choices[self.selected]
    }

    pub fn default_value(&self) -> &FieldValue {
        &self.choices[self.default]
    }

    pub fn is_changed(&self) -> bool {
        self.selected != self.default
    }

    pub fn move_left(&mut self) {
        let len = self.choices.len();
        self.selected = (self.selected + len - 1) % len;
    }

    pub fn move_right(&mut self) {
        self.selected = (self.selected + 1) % self.choices.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_field_flips_and_tracks_change() {
        let mut field = Field::boolean("solid", true);
        assert_eq!(field.current_value(), &FieldValue::Bool(true));
        assert!(!field.is_changed());

        field.move_right();
        assert_eq!(field.current_value().as_bool(), Some(false));
        assert!(field.is_changed());

        field.move_left();
        assert_eq!(field.current_value().as_bool(), Some(true));
        assert!(!field.is_changed(), "returning to the default clears the change");
    }

    #[test]
    fn stepping_wraps_in_both_directions() {
        let mut field = Field::cyclable("speed", vec![1_i64.into(), 2_i64.into(), 4_i64.into()], 0).expect("field");
        field.move_left();
        assert_eq!(field.selected_index(), 2);
        field.move_right();
        assert_eq!(field.selected_index(), 0);
        for _ in 0..3 {
            field.move_right();
        }
        assert_eq!(field.selected_index(), 0, "three steps over three choices is a full cycle");
    }

    #[test]
    fn single_choice_field_never_changes() {
        let mut field = Field::cyclable("locked", vec!["on".into()], 0).expect("field");
        field.move_right();
        field.move_left();
        assert!(!field.is_changed());
        assert_eq!(field.current_value().as_text(), Some("on"));
    }

    #[test]
    fn empty_choices_are_rejected() {
        let err = Field::cyclable("empty", Vec::new(), 0).unwrap_err();
        assert!(err.to_string().contains("no choices"), "unexpected error: {err}");
    }

    #[test]
    fn default_must_be_in_range() {
        assert!(Field::cyclable("gravity", vec![1_i64.into()], 3).is_err());
        let err = Field::with_default_value("mode", vec!["a".into(), "b".into()], &"c".into()).unwrap_err();
        assert!(err.to_string().contains("not one of its choices"));
    }

    #[test]
    fn int_range_resolves_default_by_value() {
        let field = Field::int_range("lives", 1..=5, 3).expect("range field");
        assert_eq!(field.choices().len(), 5);
        assert_eq!(field.default_index(), 2);
        assert_eq!(field.current_value().as_int(), Some(3));
    }

    #[test]
    fn values_deserialize_untagged() {
        let values: Vec<FieldValue> = serde_json::from_str(r#"[true, 3, 0.5, "fast"]"#).expect("values parse");
        assert_eq!(
            values,
            vec![FieldValue::Bool(true), FieldValue::Int(3), FieldValue::Float(0.5), FieldValue::Text("fast".into())]
        );
        assert_eq!(values[2].to_string(), "0.50");
    }
}
