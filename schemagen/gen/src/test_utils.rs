//! Shared test utilities for schemagen-gen tests.
//!
//! This module provides common helper functions for creating model fixtures
//! across the codebase, reducing duplication and ensuring consistency.

use crate::model::{Enum, EnumVariant, Field, FieldLabel, Message, Method, PackageModel, Service};

/// Creates an enum with two variants, `Unknown = 0` and `Known = 1`.
pub fn make_enum(name: &str) -> Enum {
    Enum {
        name: name.to_string(),
        doc: Some(format!("The {name} enum.")),
        variants: vec![
            EnumVariant {
                name: "Unknown".to_string(),
                value: 0,
                doc: None,
            },
            EnumVariant {
                name: "Known".to_string(),
                value: 1,
                doc: Some("A known value.".to_string()),
            },
        ],
    }
}

/// Creates a message with a singular, an optional and a repeated field.
pub fn make_message(name: &str) -> Message {
    Message {
        name: name.to_string(),
        doc: None,
        fields: vec![
            make_field("id", "u64", FieldLabel::Singular),
            make_field("note", "String", FieldLabel::Optional),
            make_field("tags", "String", FieldLabel::Repeated),
        ],
    }
}

/// Creates a message field.
pub fn make_field(name: &str, type_name: &str, label: FieldLabel) -> Field {
    Field {
        name: name.to_string(),
        type_name: type_name.to_string(),
        label,
        doc: None,
    }
}

/// Creates a service with a single `Check` method.
pub fn make_service(name: &str) -> Service {
    Service {
        name: name.to_string(),
        doc: Some(format!("The {name} service.")),
        methods: vec![Method {
            name: "Check".to_string(),
            input_type: "CheckRequest".to_string(),
            output_type: "CheckReply".to_string(),
            doc: None,
        }],
    }
}

/// Creates a package exercising every template feature.
///
/// Declares `Status`, `CheckRequest`, `CheckReply` and the `Health` service,
/// and imports `Timestamp` from the `common` subpackage.
pub fn make_package() -> PackageModel {
    PackageModel {
        name: "acme.health.v1".to_string(),
        doc: Some("Health checking.".to_string()),
        enums: vec![make_enum("Status")],
        messages: vec![make_message("CheckRequest"), make_message("CheckReply")],
        services: vec![make_service("Health")],
        imports: vec![
            "use std::collections::HashMap;".to_string(),
            "use self::common::Timestamp;".to_string(),
        ],
    }
}
