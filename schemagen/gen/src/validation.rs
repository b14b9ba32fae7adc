//! Validation of package models before code generation.
//!
//! Running validation early turns model problems into one clear error
//! instead of a confusing template failure halfway through a package.
//!
//! ## Validation Checks
//!
//! - **Package name**: non-empty dotted path whose segments are identifiers
//!   (they become directory and module names)
//! - **Identifiers**: every enum, variant, message, field, service and
//!   method name can be written as a Rust identifier
//! - **Symbol uniqueness**: enum names, message names and the two derived
//!   service names (`<Name>Base`, `<Name>Stub`) never collide
//! - **Member uniqueness**: variant, field and method names are unique
//!   within their enum, message or service
//! - **Enum shape**: every enum has at least one variant and no two variants
//!   share a wire value
//!
//! ## Examples
//!
//! ```
//! use schemagen_gen::model::PackageModel;
//! use schemagen_gen::validation::validate_package;
//!
//! assert!(validate_package(&PackageModel::new("acme.v1")).is_ok());
//! assert!(validate_package(&PackageModel::new("acme..v1")).is_err());
//! ```

use std::collections::HashSet;
use std::hash::Hash;

use crate::errors::GeneratorError;
use crate::model::PackageModel;
use crate::naming::{to_ident, to_snake_case};

/// Validates a package model before code generation.
///
/// ## Errors
///
/// Returns `GeneratorError::InvalidPackageName` for an unusable package
/// name, `GeneratorError::InvalidIdentifier` for a name that cannot become
/// an identifier, `GeneratorError::DuplicateSymbol` for the first
/// colliding symbol, and `EmptyEnum`, `DuplicateEnumValue` or
/// `DuplicateMember` for an entity whose output would not compile.
pub fn validate_package(package: &PackageModel) -> Result<(), GeneratorError> {
    validate_package_name(&package.name)?;

    let check = |name: &str| -> Result<(), GeneratorError> {
        if to_ident(name).is_some() {
            Ok(())
        } else {
            Err(GeneratorError::InvalidIdentifier {
                package: package.name.clone(),
                name: name.to_string(),
            })
        }
    };

    let duplicate_member = |owner: &str, member: String| GeneratorError::DuplicateMember {
        package: package.name.clone(),
        owner: owner.to_string(),
        member,
    };

    for model in &package.enums {
        check(&model.name)?;
        if model.variants.is_empty() {
            return Err(GeneratorError::EmptyEnum {
                package: package.name.clone(),
                name: model.name.clone(),
            });
        }
        for variant in &model.variants {
            check(&variant.name)?;
        }
        if let Some(name) = first_duplicate(model.variants.iter().map(|v| v.name.clone())) {
            return Err(duplicate_member(&model.name, name));
        }
        if let Some(value) = first_duplicate(model.variants.iter().map(|v| v.value)) {
            return Err(GeneratorError::DuplicateEnumValue {
                package: package.name.clone(),
                name: model.name.clone(),
                value,
            });
        }
    }
    for model in &package.messages {
        check(&model.name)?;
        for field in &model.fields {
            check(&field.name)?;
        }
        if let Some(name) = first_duplicate(model.fields.iter().map(|f| f.name.clone())) {
            return Err(duplicate_member(&model.name, name));
        }
    }
    for service in &package.services {
        check(&service.name)?;
        for method in &service.methods {
            check(&to_snake_case(&method.name))?;
        }
        if let Some(name) =
            first_duplicate(service.methods.iter().map(|m| to_snake_case(&m.name)))
        {
            return Err(duplicate_member(&service.name, name));
        }
    }

    let symbols = package
        .enums
        .iter()
        .map(|e| e.name.clone())
        .chain(package.messages.iter().map(|m| m.name.clone()))
        .chain(
            package
                .services
                .iter()
                .flat_map(|s| [s.base_name(), s.stub_name()]),
        );

    if let Some(symbol) = first_duplicate(symbols) {
        return Err(GeneratorError::DuplicateSymbol {
            package: package.name.clone(),
            symbol,
        });
    }

    Ok(())
}

/// Returns the first item that was already seen.
fn first_duplicate<T: Eq + Hash + Clone>(items: impl IntoIterator<Item = T>) -> Option<T> {
    let mut seen = HashSet::new();
    items.into_iter().find(|item| !seen.insert(item.clone()))
}

fn validate_package_name(name: &str) -> Result<(), GeneratorError> {
    let invalid = |reason: &str| GeneratorError::InvalidPackageName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("package name cannot be empty"));
    }

    for segment in name.split('.') {
        if segment.is_empty() {
            return Err(invalid("package name contains an empty segment"));
        }
        if to_ident(segment).is_none() {
            return Err(invalid("every segment must be a valid identifier"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{make_enum, make_message, make_package, make_service};

    #[test]
    fn valid_package_passes() {
        assert!(validate_package(&make_package()).is_ok());
    }

    #[test]
    fn rejects_empty_package_name() {
        let result = validate_package(&PackageModel::new(""));
        assert!(matches!(result, Err(GeneratorError::InvalidPackageName { .. })));
    }

    #[test]
    fn rejects_bad_segments() {
        for name in ["acme..v1", ".acme", "acme.", "acme.1st", "acme.self"] {
            let result = validate_package(&PackageModel::new(name));
            assert!(
                matches!(result, Err(GeneratorError::InvalidPackageName { .. })),
                "expected '{name}' to be rejected"
            );
        }
    }

    #[test]
    fn rejects_duplicate_message_and_enum() {
        let mut package = PackageModel::new("acme.v1");
        package.enums.push(make_enum("Kind"));
        package.messages.push(make_message("Kind"));

        let result = validate_package(&package);

        match result {
            Err(GeneratorError::DuplicateSymbol { symbol, .. }) => assert_eq!(symbol, "Kind"),
            other => panic!("expected DuplicateSymbol, got {other:?}"),
        }
    }

    #[test]
    fn derived_service_names_participate_in_uniqueness() {
        let mut package = PackageModel::new("acme.v1");
        package.messages.push(make_message("GreeterStub"));
        package.services.push(make_service("Greeter"));

        let result = validate_package(&package);

        match result {
            Err(GeneratorError::DuplicateSymbol { symbol, .. }) => {
                assert_eq!(symbol, "GreeterStub")
            }
            other => panic!("expected DuplicateSymbol, got {other:?}"),
        }
    }

    #[test]
    fn service_name_itself_is_not_a_symbol() {
        let mut package = PackageModel::new("acme.v1");
        package.messages.push(make_message("Greeter"));
        package.services.push(make_service("Greeter"));

        assert!(validate_package(&package).is_ok());
    }

    #[test]
    fn keyword_field_names_are_allowed() {
        let mut package = PackageModel::new("acme.v1");
        let mut message = make_message("Shape");
        message.fields[0].name = "type".to_string();
        package.messages.push(message);

        assert!(validate_package(&package).is_ok());
    }

    #[test]
    fn rejects_enum_without_variants() {
        let mut package = PackageModel::new("acme.v1");
        let mut model = make_enum("Empty");
        model.variants.clear();
        package.enums.push(model);

        let result = validate_package(&package);
        assert!(matches!(result, Err(GeneratorError::EmptyEnum { name, .. }) if name == "Empty"));
    }

    #[test]
    fn rejects_repeated_enum_value() {
        let mut package = PackageModel::new("acme.v1");
        let mut model = make_enum("Alias");
        model.variants[1].value = model.variants[0].value;
        package.enums.push(model);

        let result = validate_package(&package);
        assert!(matches!(
            result,
            Err(GeneratorError::DuplicateEnumValue { value: 0, .. })
        ));
    }

    #[test]
    fn rejects_repeated_variant_name() {
        let mut package = PackageModel::new("acme.v1");
        let mut model = make_enum("Status");
        model.variants[1].name = model.variants[0].name.clone();
        package.enums.push(model);

        let result = validate_package(&package);
        assert!(matches!(
            result,
            Err(GeneratorError::DuplicateMember { owner, member, .. })
                if owner == "Status" && member == "Unknown"
        ));
    }

    #[test]
    fn rejects_repeated_field_name() {
        let mut package = PackageModel::new("acme.v1");
        let mut message = make_message("Shape");
        message.fields[2].name = "id".to_string();
        package.messages.push(message);

        let result = validate_package(&package);
        assert!(matches!(
            result,
            Err(GeneratorError::DuplicateMember { member, .. }) if member == "id"
        ));
    }

    #[test]
    fn rejects_methods_colliding_after_snake_case() {
        let mut package = PackageModel::new("acme.v1");
        let mut service = make_service("Greeter");
        let mut twin = service.methods[0].clone();
        twin.name = "check".to_string();
        service.methods.push(twin);
        package.services.push(service);

        let result = validate_package(&package);
        assert!(matches!(
            result,
            Err(GeneratorError::DuplicateMember { owner, member, .. })
                if owner == "Greeter" && member == "check"
        ));
    }

    #[test]
    fn rejects_invalid_field_name() {
        let mut package = PackageModel::new("acme.v1");
        let mut message = make_message("Shape");
        message.fields[0].name = "bad-name".to_string();
        package.messages.push(message);

        let result = validate_package(&package);
        assert!(matches!(result, Err(GeneratorError::InvalidIdentifier { .. })));
    }
}
