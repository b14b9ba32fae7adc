//! Template rendering.
//!
//! [`render`] binds one of the fixed templates to a read-only context and
//! returns canonical source text. Templates are the token builders in
//! [`crate::codegen`]; they substitute model values structurally and never
//! evaluate model content.

use tracing::debug;

use crate::canonical::canonicalize;
use crate::codegen::{GenerationMode, generate_package_index, generate_package_source};
use crate::errors::RenderError;
use crate::exports::ExportSurface;
use crate::model::PackageModel;

/// The closed set of templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    /// The package's primary source file (`mod.rs`).
    PackageSource,
    /// The package's index file (`prelude.rs`).
    PackageIndex,
}

impl TemplateId {
    /// Stable name used in errors and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PackageSource => "package_source",
            Self::PackageIndex => "package_index",
        }
    }
}

/// Values bound into a template.
#[derive(Debug, Clone, Copy)]
pub enum RenderContext<'a> {
    /// Context for [`TemplateId::PackageSource`].
    Source {
        package: &'a PackageModel,
        mode: GenerationMode,
    },
    /// Context for [`TemplateId::PackageIndex`].
    Index {
        package: &'a PackageModel,
        exports: &'a ExportSurface,
        package_short_name: &'a str,
    },
}

impl RenderContext<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Source { .. } => "source",
            Self::Index { .. } => "index",
        }
    }
}

/// Renders a template with the given context into canonical source text.
///
/// ## Examples
///
/// ```
/// use schemagen_gen::codegen::GenerationMode;
/// use schemagen_gen::model::PackageModel;
/// use schemagen_gen::render::{RenderContext, TemplateId, render};
///
/// let package = PackageModel::new("acme.v1");
/// let context = RenderContext::Source { package: &package, mode: GenerationMode::Default };
/// let code = render(TemplateId::PackageSource, &context).unwrap();
/// assert!(code.contains("pub mod prelude;"));
/// ```
///
/// ## Errors
///
/// Returns [`RenderError::Binding`] if the context does not fit the template
/// or a model value cannot be bound, and [`RenderError::Canonicalization`]
/// if the rendered text is not valid Rust.
pub fn render(template: TemplateId, context: &RenderContext<'_>) -> Result<String, RenderError> {
    let bound = match (template, *context) {
        (TemplateId::PackageSource, RenderContext::Source { package, mode }) => {
            generate_package_source(package, mode)
        }
        (
            TemplateId::PackageIndex,
            RenderContext::Index {
                package,
                exports,
                package_short_name,
            },
        ) => generate_package_index(package, exports, package_short_name),
        _ => Err(format!(
            "a {} context cannot be bound to this template",
            context.kind()
        )),
    };

    let tokens = bound.map_err(|reason| RenderError::Binding {
        template: template.name(),
        reason,
    })?;

    let code = canonicalize(&tokens.to_string()).map_err(|source| {
        RenderError::Canonicalization {
            template: template.name(),
            source,
        }
    })?;

    debug!(template = template.name(), bytes = code.len(), "rendered template");
    Ok(code)
}
