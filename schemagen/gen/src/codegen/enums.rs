//! Enum generation.
//!
//! Schema enumerations become `#[repr(i32)]` Rust enums with explicit
//! discriminants and lossless conversions to and from the wire value. The
//! variant with value `0` (or the first variant) is the default.

use proc_macro2::{Literal, TokenStream};
use quote::quote;

use super::{BindResult, bind_ident, doc_attrs};
use crate::model::Enum;

/// Generates the enum declaration and its value conversions.
///
/// ## Examples
///
/// ```ignore
/// // Generated enum:
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// #[repr(i32)]
/// pub enum Status {
///     #[default]
///     Unknown = 0,
///     Known = 1,
/// }
///
/// impl Status {
///     pub fn value(self) -> i32 { self as i32 }
///     pub fn from_value(value: i32) -> Option<Self> { /* ... */ }
/// }
/// ```
pub fn generate_enum(model: &Enum) -> BindResult<TokenStream> {
    let enum_name = bind_ident(&model.name, "enum")?;
    let enum_doc = doc_attrs(model.doc.as_deref());

    if model.variants.is_empty() {
        return Err(format!("enum '{}' has no variants", model.name));
    }
    let default_index = model
        .variants
        .iter()
        .position(|variant| variant.value == 0)
        .unwrap_or(0);

    let mut variants = Vec::with_capacity(model.variants.len());
    let mut arms = Vec::with_capacity(model.variants.len());
    for (index, variant) in model.variants.iter().enumerate() {
        let variant_name = bind_ident(&variant.name, "enum variant")?;
        let value = Literal::i32_unsuffixed(variant.value);
        let doc = doc_attrs(variant.doc.as_deref());
        let default = (index == default_index).then(|| quote! { #[default] });

        variants.push(quote! {
            #doc
            #default
            #variant_name = #value,
        });
        arms.push(quote! {
            #value => Some(Self::#variant_name),
        });
    }

    Ok(quote! {
        #enum_doc
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[repr(i32)]
        pub enum #enum_name {
            #(#variants)*
        }

        impl #enum_name {
            /// Returns the wire value of this variant.
            pub fn value(self) -> i32 {
                self as i32
            }

            /// Looks up the variant with the given wire value.
            pub fn from_value(value: i32) -> Option<Self> {
                match value {
                    #(#arms)*
                    _ => None,
                }
            }
        }
    })
}
