//! Code generation templates for schemagen.
//!
//! Each submodule builds the tokens for one kind of model entity. The two
//! file-level templates, [`generate_package_source`] and
//! [`generate_package_index`], combine them into a whole file.
//!
//! ## Submodules
//!
//! - [`enums`] - `#[repr(i32)]` enums with value conversions
//! - [`messages`] - message structs with labelled fields
//! - [`services`] - `<Name>Base` handler traits and `<Name>Stub` clients
//! - [`package_docs`] - module-level documentation for a package
//! - [`index`] - the `prelude.rs` re-export file
//!
//! ## Output Format
//!
//! All generators return `proc_macro2::TokenStream`. Binding failures (a name
//! that is not an identifier, a type that does not parse, an import line that
//! does not tokenize) are reported as a plain reason string; the renderer
//! tags them with the template that failed. See [`crate::render`].

pub mod enums;
pub mod index;
pub mod messages;
pub mod package_docs;
pub mod services;

use std::collections::BTreeSet;

use proc_macro2::{Ident, TokenStream};
use quote::quote;

use crate::exports::{ExportSurface, parse_relative_import};
use crate::model::PackageModel;
use crate::naming::to_ident;

pub use enums::generate_enum;
pub use index::generate_index;
pub use messages::generate_message;
pub use package_docs::PackageDocBuilder;
pub use services::{generate_service_base, generate_service_stub};

/// Name of the generated index module (`prelude.rs`).
pub const INDEX_MODULE: &str = "prelude";

/// Path of the runtime crate the generated stubs build on.
pub const RUNTIME_CRATE: &str = "schemagen_runtime";

/// Result of binding a model value into a template.
pub type BindResult<T> = Result<T, String>;

/// Representation of generated messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GenerationMode {
    /// Plain structs built with struct literals.
    #[default]
    Default,
    /// `#[non_exhaustive]` structs with `with_<field>` builders.
    Variant,
}

/// Binds the package primary source template (`mod.rs`).
///
/// Besides the index module, every subpackage named by a relative import
/// (`use self::<sub>::..;`) is declared as `pub mod <sub>;` so the import
/// and the index re-export resolve.
pub fn generate_package_source(
    package: &PackageModel,
    mode: GenerationMode,
) -> BindResult<TokenStream> {
    let docs = PackageDocBuilder::new(package).build();
    let index_module = bind_ident(INDEX_MODULE, "module")?;
    let submodules = subpackage_modules(package)
        .iter()
        .map(|name| bind_ident(name, "subpackage"))
        .collect::<BindResult<Vec<_>>>()?;

    let imports = package
        .imports
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            line.parse::<TokenStream>()
                .map_err(|e| format!("import #{} '{}' is not valid tokens: {}", idx + 1, line, e))
        })
        .collect::<BindResult<Vec<_>>>()?;

    let enums = package
        .enums
        .iter()
        .map(generate_enum)
        .collect::<BindResult<Vec<_>>>()?;
    let messages = package
        .messages
        .iter()
        .map(|message| generate_message(message, mode))
        .collect::<BindResult<Vec<_>>>()?;
    let service_bases = package
        .services
        .iter()
        .map(generate_service_base)
        .collect::<BindResult<Vec<_>>>()?;
    let service_stubs = package
        .services
        .iter()
        .map(|service| generate_service_stub(&package.name, service))
        .collect::<BindResult<Vec<_>>>()?;

    Ok(quote! {
        #docs

        pub mod #index_module;

        #(pub mod #submodules;)*

        #(#imports)*

        #(#enums)*

        #(#messages)*

        #(#service_bases)*

        #(#service_stubs)*
    })
}

/// First path segments of the package's relative imports, sorted.
fn subpackage_modules(package: &PackageModel) -> BTreeSet<String> {
    package
        .imports
        .iter()
        .filter_map(|line| parse_relative_import(line))
        .filter_map(|import| import.subpackage.into_iter().next())
        .filter(|name| name != INDEX_MODULE)
        .collect()
}

/// Binds the package index template (`prelude.rs`).
pub fn generate_package_index(
    package: &PackageModel,
    exports: &ExportSurface,
    package_short_name: &str,
) -> BindResult<TokenStream> {
    generate_index(&package.name, exports, package_short_name)
}

/// Converts a model name into an identifier, naming the kind of entity on failure.
pub(crate) fn bind_ident(name: &str, kind: &str) -> BindResult<Ident> {
    to_ident(name).ok_or_else(|| format!("{kind} name '{name}' is not a valid identifier"))
}

/// Parses a model type expression.
pub(crate) fn bind_type(type_name: &str, context: &str) -> BindResult<syn::Type> {
    syn::parse_str::<syn::Type>(type_name)
        .map_err(|e| format!("type '{type_name}' of {context} does not parse: {e}"))
}

/// Outer doc attributes, one per line of `doc`.
pub(crate) fn doc_attrs(doc: Option<&str>) -> TokenStream {
    let lines = doc
        .into_iter()
        .flat_map(str::lines)
        .map(|line| format!(" {}", line.trim_end()));

    quote! { #(#[doc = #lines])* }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exports::build_exports;
    use crate::test_utils::make_package;

    #[test]
    fn package_source_binds_all_entities() {
        let package = make_package();
        let code = generate_package_source(&package, GenerationMode::Default).unwrap().to_string();

        assert!(code.contains("pub mod prelude"));
        assert!(code.contains("enum Status"));
        assert!(code.contains("struct CheckRequest"));
        assert!(code.contains("struct CheckReply"));
        assert!(code.contains("trait HealthBase"));
        assert!(code.contains("struct HealthStub"));
    }

    #[test]
    fn package_source_parses_as_file() {
        let tokens = generate_package_source(&make_package(), GenerationMode::Default).unwrap();
        assert!(syn::parse_file(&tokens.to_string()).is_ok());
    }

    #[test]
    fn package_source_rejects_untokenizable_import() {
        let mut package = make_package();
        package.imports.push("use \"unterminated;".to_string());

        let err = generate_package_source(&package, GenerationMode::Default).unwrap_err();
        assert!(err.contains("import #3"));
    }

    #[test]
    fn declares_subpackages_of_relative_imports() {
        let mut package = make_package();
        package.imports.push("use self::zone::Region;".to_string());
        package.imports.push("pub use self::common::Duration;".to_string());
        package.imports.push("use crate::other::Thing;".to_string());

        let code = generate_package_source(&package, GenerationMode::Default)
            .unwrap()
            .to_string();

        assert_eq!(code.matches("pub mod common ;").count(), 1);
        assert!(code.contains("pub mod zone ;"));
        assert!(!code.contains("pub mod other"));
        assert!(code.find("pub mod common").unwrap() < code.find("pub mod zone").unwrap());
    }

    #[test]
    fn no_subpackages_without_relative_imports() {
        let mut package = make_package();
        package.imports = vec!["use std::fmt;".to_string()];

        let code = generate_package_source(&package, GenerationMode::Default)
            .unwrap()
            .to_string();

        assert_eq!(code.matches("pub mod").count(), 1);
    }

    #[test]
    fn variant_mode_reaches_messages() {
        let code = generate_package_source(&make_package(), GenerationMode::Variant)
            .unwrap()
            .to_string();

        assert!(code.contains("fn with_id"));
    }

    #[test]
    fn package_index_parses_as_file() {
        let package = make_package();
        let exports = build_exports(&package);
        let tokens = generate_package_index(&package, &exports, package.short_name()).unwrap();

        assert!(syn::parse_file(&tokens.to_string()).is_ok());
    }

    #[test]
    fn doc_attrs_emit_one_attribute_per_line() {
        let tokens = doc_attrs(Some("first\nsecond")).to_string();
        assert_eq!(tokens.matches("doc").count(), 2);
        assert!(doc_attrs(None).is_empty());
    }

    #[test]
    fn bind_type_reports_context() {
        let err = bind_type("Vec<", "field 'x'").unwrap_err();
        assert!(err.contains("field 'x'"));
    }
}
