//! Message struct generation.
//!
//! In [`GenerationMode::Default`] a message is a plain struct built with a
//! struct literal. [`GenerationMode::Variant`] marks it `#[non_exhaustive]`
//! and adds one `with_<field>` builder method per field, so callers outside
//! the generated crate start from `Default::default()`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::{BindResult, GenerationMode, bind_ident, bind_type, doc_attrs};
use crate::model::{Field, FieldLabel, Message};

/// Generates a plain data struct for a message.
///
/// Field types follow the field label: singular fields use the type as is,
/// optional fields are wrapped in `Option`, repeated fields in `Vec`.
///
/// ## Examples
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Default)]
/// pub struct CheckRequest {
///     pub id: u64,
///     pub note: Option<String>,
///     pub tags: Vec<String>,
/// }
/// ```
pub fn generate_message(model: &Message, mode: GenerationMode) -> BindResult<TokenStream> {
    let struct_name = bind_ident(&model.name, "message")?;
    let doc = doc_attrs(model.doc.as_deref());
    let fields = model
        .fields
        .iter()
        .map(|field| BoundField::bind(&model.name, field))
        .collect::<BindResult<Vec<_>>>()?;

    let declarations = fields.iter().map(BoundField::declaration);

    match mode {
        GenerationMode::Default => Ok(quote! {
            #doc
            #[derive(Debug, Clone, PartialEq, Default)]
            pub struct #struct_name {
                #(#declarations)*
            }
        }),
        GenerationMode::Variant => {
            let builders = fields.iter().map(BoundField::builder);
            Ok(quote! {
                #doc
                #[derive(Debug, Clone, PartialEq, Default)]
                #[non_exhaustive]
                pub struct #struct_name {
                    #(#declarations)*
                }

                impl #struct_name {
                    #(#builders)*
                }
            })
        }
    }
}

struct BoundField {
    name: proc_macro2::Ident,
    builder: proc_macro2::Ident,
    ty: syn::Type,
    label: FieldLabel,
    doc: TokenStream,
}

impl BoundField {
    fn bind(message: &str, field: &Field) -> BindResult<Self> {
        Ok(Self {
            name: bind_ident(&field.name, "field")?,
            builder: format_ident!("with_{}", field.name),
            ty: bind_type(&field.type_name, &format!("field '{}.{}'", message, field.name))?,
            label: field.label,
            doc: doc_attrs(field.doc.as_deref()),
        })
    }

    fn declaration(&self) -> TokenStream {
        let Self { name, ty, doc, .. } = self;
        let ty = match self.label {
            FieldLabel::Singular => quote! { #ty },
            FieldLabel::Optional => quote! { Option<#ty> },
            FieldLabel::Repeated => quote! { Vec<#ty> },
        };

        quote! {
            #doc
            pub #name: #ty,
        }
    }

    /// `with_<field>`; optional fields take the bare value.
    fn builder(&self) -> TokenStream {
        let Self {
            name, builder, ty, ..
        } = self;
        let (param, value) = match self.label {
            FieldLabel::Singular => (quote! { #ty }, quote! { value }),
            FieldLabel::Optional => (quote! { #ty }, quote! { Some(value) }),
            FieldLabel::Repeated => (quote! { Vec<#ty> }, quote! { value }),
        };

        quote! {
            #[must_use]
            pub fn #builder(mut self, value: #param) -> Self {
                self.#name = #value;
                self
            }
        }
    }
}
