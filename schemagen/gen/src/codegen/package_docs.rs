//! Module documentation generation for generated packages.
//!
//! This module provides the [`PackageDocBuilder`] struct for generating the
//! module-level documentation at the top of a package's `mod.rs`: a
//! do-not-edit notice, the package's own documentation, and a contents
//! section listing the declared symbols.

use proc_macro2::TokenStream;
use quote::quote;

use crate::model::PackageModel;

/// Builds module-level documentation for a generated package.
///
/// ## Examples
///
/// ```
/// use schemagen_gen::codegen::PackageDocBuilder;
/// use schemagen_gen::model::PackageModel;
///
/// let package = PackageModel::new("acme.v1");
/// let doc_tokens = PackageDocBuilder::new(&package).build();
/// assert!(doc_tokens.to_string().contains("acme.v1"));
/// ```
pub struct PackageDocBuilder<'a> {
    package: &'a PackageModel,
}

impl<'a> PackageDocBuilder<'a> {
    /// Creates a new documentation builder for the given package.
    pub fn new(package: &'a PackageModel) -> Self {
        Self { package }
    }

    /// Builds the documentation as `#![doc = "..."]` attributes, one per line.
    pub fn build(&self) -> TokenStream {
        let mut lines = vec![self.intro_line(), String::new()];

        if let Some(doc) = &self.package.doc {
            lines.extend(doc.lines().map(str::to_string));
            lines.push(String::new());
        }

        lines.extend(self.contents_section());

        let lines = lines.into_iter().map(|line| {
            if line.is_empty() {
                line
            } else {
                format!(" {}", line.trim_end())
            }
        });

        quote! {
            #(#![doc = #lines])*
        }
    }

    fn intro_line(&self) -> String {
        format!(
            "Generated from package `{}` by schemagen. Do not edit manually.",
            self.package.name
        )
    }

    /// Lists the declared symbols grouped by kind.
    fn contents_section(&self) -> Vec<String> {
        let groups = [
            (
                "Enums",
                self.package.enums.iter().map(|e| e.name.clone()).collect::<Vec<_>>(),
            ),
            (
                "Messages",
                self.package.messages.iter().map(|m| m.name.clone()).collect(),
            ),
            (
                "Services",
                self.package
                    .services
                    .iter()
                    .map(|s| format!("{}` / `{}", s.base_name(), s.stub_name()))
                    .collect(),
            ),
        ];

        let mut lines = vec!["## Contents".to_string(), String::new()];
        let mut any = false;
        for (title, names) in groups {
            if names.is_empty() {
                continue;
            }
            any = true;
            lines.push(format!("**{title}**:"));
            lines.extend(names.iter().map(|name| format!("- `{name}`")));
            lines.push(String::new());
        }

        if !any {
            lines.push("No symbols declared.".to_string());
        }

        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        lines
    }
}
