//! Index file generation.
//!
//! The index file (`prelude.rs`) is a child module of the package. It
//! re-exports every symbol of the package's export surface, each from where
//! it is actually defined:
//!
//! ```ignore
//! //! Re-exports for the `v1` package.
//!
//! pub use super::Status;
//! pub use super::common::Timestamp;
//! ```

use proc_macro2::TokenStream;
use quote::quote;

use super::{BindResult, bind_ident};
use crate::exports::{ExportOrigin, ExportSurface};

/// Generates the index file for a package.
pub fn generate_index(
    package: &str,
    exports: &ExportSurface,
    package_short_name: &str,
) -> BindResult<TokenStream> {
    let intro = format!(" Re-exports for the `{package_short_name}` package.");
    let detail = format!(" Everything `{package}` makes public, in one import.");

    let reexports = exports
        .entries()
        .iter()
        .map(|entry| {
            let name = bind_ident(&entry.name, "exported symbol")?;
            let path = match &entry.origin {
                ExportOrigin::Package => Vec::new(),
                ExportOrigin::Subpackage(segments) => segments
                    .iter()
                    .map(|segment| bind_ident(segment, "subpackage"))
                    .collect::<BindResult<Vec<_>>>()?,
            };
            Ok(quote! {
                pub use super::#(#path::)*#name;
            })
        })
        .collect::<BindResult<Vec<_>>>()?;

    Ok(quote! {
        #![doc = #intro]
        //!
        #![doc = #detail]

        #(#reexports)*
    })
}
