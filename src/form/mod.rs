//! Match input form
//!
//! Declares the fields a user fills in, renders them with their allowed
//! choices and turns the entered text into an encoded feature record.

pub mod prompt;

pub use prompt::prompt_form;

use std::collections::BTreeMap;

use crate::artifacts::EncoderBundle;
use crate::features::FeatureRecord;
use crate::{Result, TennisError};

/// Form sections and their fields, in display order
pub const SECTIONS: [(&str, &[&str]); 4] = [
    ("Match Details", &["Country", "Surface", "Round", "minutes"]),
    (
        "Player Details",
        &[
            "P1_id", "P2_id", "P1_hand", "P2_hand", "P1_ht", "P2_ht", "P1_age", "P2_age",
        ],
    ),
    ("Rankings and Points", &["P1Rank", "P2Rank", "P1Pts", "P2Pts"]),
    ("Additional Info", &["Both RH?", "Both LH?"]),
];

/// How a field is entered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-text number
    Numeric,
    /// One of the encoder's known classes
    Choice(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub section: &'static str,
    pub kind: FieldKind,
}

impl FormField {
    pub fn is_categorical(&self) -> bool {
        matches!(self.kind, FieldKind::Choice(_))
    }
}

/// The full set of input fields
#[derive(Debug, Clone)]
pub struct Form {
    fields: Vec<FormField>,
}

impl Form {
    /// Build the form; fields with an encoder become choice fields
    pub fn build(encoders: &EncoderBundle) -> Self {
        let fields = SECTIONS
            .iter()
            .flat_map(|&(section, names)| {
                names.iter().map(move |&name| {
                    let kind = match encoders.get(name) {
                        Some(encoder) => FieldKind::Choice(encoder.classes().to_vec()),
                        None => FieldKind::Numeric,
                    };
                    FormField {
                        name,
                        section,
                        kind,
                    }
                })
            })
            .collect();

        Form { fields }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Text rendering of the form, section by section
    pub fn render(&self) -> String {
        let mut out = String::from("Tennis Match Prediction\n");
        let mut current = "";

        for field in &self.fields {
            if field.section != current {
                current = field.section;
                out.push_str(&format!("\n{}\n{}\n", current, "─".repeat(31)));
            }
            match &field.kind {
                FieldKind::Numeric => out.push_str(&format!("  {:<10} number\n", field.name)),
                FieldKind::Choice(classes) => out.push_str(&format!(
                    "  {:<10} one of: {}\n",
                    field.name,
                    classes.join(", ")
                )),
            }
        }

        out
    }

    /// Parse and encode the entered values.
    ///
    /// Numeric fields must parse as numbers and choice fields must match a
    /// known class exactly. Values for names outside the form are ignored.
    pub fn encode(&self, values: &FormValues, encoders: &EncoderBundle) -> Result<FeatureRecord> {
        for name in values.names() {
            if self.field(name).is_none() {
                log::warn!("Ignoring unknown field {:?}", name);
            }
        }

        let mut record = FeatureRecord::new();
        for field in &self.fields {
            let raw = values
                .get(field.name)
                .ok_or_else(|| TennisError::MissingField(field.name.to_string()))?;

            let value = if field.is_categorical() {
                encoders.encode(field.name, raw)? as f64
            } else {
                parse_number(field.name, raw)?
            };
            record.insert(field.name, value);
        }

        Ok(record)
    }
}

fn parse_number(field: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| TennisError::InvalidNumber {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

/// Text entered for each field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: BTreeMap<String, String>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Apply a `FIELD=VALUE` assignment
    pub fn set_assignment(&mut self, assignment: &str) -> Result<()> {
        let (field, value) = assignment.split_once('=').ok_or_else(|| {
            TennisError::Config(format!("Expected FIELD=VALUE, got {:?}", assignment))
        })?;
        self.set(field.trim(), value);
        Ok(())
    }

    /// Read values from a JSON object of field to string or number
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        let object = json
            .as_object()
            .ok_or_else(|| TennisError::Config("Input must be a JSON object".to_string()))?;

        let mut values = FormValues::new();
        for (field, value) in object {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => u8::from(*b).to_string(),
                other => {
                    return Err(TennisError::Config(format!(
                        "Unsupported value for {}: {}",
                        field, other
                    )))
                }
            };
            values.set(field.clone(), text);
        }
        Ok(values)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        FormValues {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
