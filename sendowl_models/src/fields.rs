use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

use crate::product::ProductType;

/// Field name whose value is a file path to upload rather than a text value.
pub const ATTACHMENT_FIELD: &str = "attachment";

#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    Value { name: String, value: FieldValue },
    Attachment(PathBuf),
}

/// An ordered set of product fields used to create or update a product.
///
/// Names are unique. Inserting a name that is already present replaces the value
/// in place, so the position of the first insert is kept. Any name the vendor
/// accepts can be passed through [`ProductFields::insert`]; the typed setters only
/// cover the common ones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductFields {
    fields: Vec<Field>,
}

impl ProductFields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. The name [`ATTACHMENT_FIELD`] is treated as a file path.
    ///
    /// Any value under that name is rendered as text and taken as the path, so
    /// `insert("attachment", 5_i64)` attaches the file `5`.
    #[must_use]
    pub fn insert(self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let name = name.into();
        let value = value.into();
        let field = if name == ATTACHMENT_FIELD {
            Field::Attachment(PathBuf::from(value.to_string()))
        } else {
            Field::Value { name, value }
        };
        self.push(field)
    }

    #[must_use]
    pub fn name(self, name: impl Into<String>) -> Self {
        self.insert("name", FieldValue::Text(name.into()))
    }

    #[must_use]
    pub fn price(self, price: impl Into<FieldValue>) -> Self {
        self.insert("price", price)
    }

    #[must_use]
    pub fn product_type(self, product_type: ProductType) -> Self {
        self.insert("product_type", product_type)
    }

    #[must_use]
    pub fn attachment(self, path: impl Into<PathBuf>) -> Self {
        self.push(Field::Attachment(path.into()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The path of the attachment, if one was set.
    #[must_use]
    pub fn attachment_path(&self) -> Option<&Path> {
        self.fields.iter().find_map(|field| match field {
            Field::Attachment(path) => Some(path.as_path()),
            Field::Value { .. } => None,
        })
    }

    /// Flattens the fields into name/value pairs for a urlencoded form. The
    /// attachment is sent as its path.
    #[must_use]
    pub fn form_pairs(&self) -> Vec<(&str, String)> {
        self.fields
            .iter()
            .map(|field| match field {
                Field::Value { name, value } => (name.as_str(), value.to_string()),
                Field::Attachment(path) => (ATTACHMENT_FIELD, path.display().to_string()),
            })
            .collect()
    }

    fn push(mut self, field: Field) -> Self {
        match self.fields.iter_mut().find(|f| f.name() == field.name()) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }
}

impl Field {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Field::Value { name, .. } => name,
            Field::Attachment(_) => ATTACHMENT_FIELD,
        }
    }
}

impl<'a> IntoIterator for &'a ProductFields {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Integer(int) => Display::fmt(int, f),
            FieldValue::Decimal(dec) => Display::fmt(dec, f),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<ProductType> for FieldValue {
    fn from(value: ProductType) -> Self {
        FieldValue::Text(value.as_str().to_string())
    }
}
