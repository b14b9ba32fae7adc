//! Structural model of a generated package.
//!
//! A [`PackageModel`] is produced by the upstream schema parser and is only
//! read here. It is deserializable so the model-loading collaborator can hand
//! it over as JSON or YAML (see [`crate::loader`]).

use serde::Deserialize;

/// One generated package: its enumerations, messages, services and the raw
/// `use` items its primary source file needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackageModel {
    /// Dotted package path, e.g. `acme.billing.v1`.
    pub name: String,
    /// Package-level documentation.
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub enums: Vec<Enum>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub services: Vec<Service>,
    /// Raw import statements, relative (`use self::sub::Name;`) and absolute.
    #[serde(default)]
    pub imports: Vec<String>,
}

impl PackageModel {
    /// Creates an empty package with the given dotted name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the dotted segments of the package name.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.name.split('.')
    }

    /// Returns the last segment of the dotted package name.
    ///
    /// ## Examples
    ///
    /// ```
    /// use schemagen_gen::model::PackageModel;
    ///
    /// assert_eq!(PackageModel::new("acme.billing.v1").short_name(), "v1");
    /// assert_eq!(PackageModel::new("root").short_name(), "root");
    /// ```
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// A generated enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Enum {
    pub name: String,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub variants: Vec<EnumVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnumVariant {
    pub name: String,
    pub value: i32,
    #[serde(default)]
    pub doc: Option<String>,
}

/// A generated message (record) type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub name: String,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// A message field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Field {
    pub name: String,
    /// Rust type expression for a single value, e.g. `String` or `Vec<u8>`.
    pub type_name: String,
    #[serde(default)]
    pub label: FieldLabel,
    #[serde(default)]
    pub doc: Option<String>,
}

/// Cardinality of a message field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldLabel {
    #[default]
    Singular,
    Optional,
    Repeated,
}

/// A generated service.
///
/// Each service contributes two symbols to its package: the handler contract
/// `<Name>Base` and the client `<Name>Stub`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub methods: Vec<Method>,
}

impl Service {
    /// Name of the generated handler trait.
    #[must_use]
    pub fn base_name(&self) -> String {
        format!("{}Base", self.name)
    }

    /// Name of the generated client stub.
    #[must_use]
    pub fn stub_name(&self) -> String {
        format!("{}Stub", self.name)
    }
}

/// A unary service method.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Method {
    pub name: String,
    pub input_type: String,
    pub output_type: String,
    #[serde(default)]
    pub doc: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_is_last_segment() {
        assert_eq!(PackageModel::new("a.b.c").short_name(), "c");
        assert_eq!(PackageModel::new("single").short_name(), "single");
    }

    #[test]
    fn service_derives_base_and_stub_names() {
        let service = Service {
            name: "Greeter".to_string(),
            doc: None,
            methods: vec![],
        };

        assert_eq!(service.base_name(), "GreeterBase");
        assert_eq!(service.stub_name(), "GreeterStub");
    }

    #[test]
    fn package_deserializes_with_defaults() {
        let package: PackageModel =
            serde_json::from_str(r#"{ "name": "acme.v1", "messages": [{ "name": "Ping" }] }"#)
                .unwrap();

        assert_eq!(package.name, "acme.v1");
        assert_eq!(package.messages.len(), 1);
        assert!(package.enums.is_empty());
        assert!(package.imports.is_empty());
    }

    #[test]
    fn field_label_uses_snake_case() {
        let field: Field =
            serde_json::from_str(r#"{ "name": "tags", "type_name": "String", "label": "repeated" }"#)
                .unwrap();

        assert_eq!(field.label, FieldLabel::Repeated);
    }
}
