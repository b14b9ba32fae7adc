//! Service generation.
//!
//! Every service produces two symbols:
//!
//! - `<Name>Base`: the trait a server implements, one async method per rpc
//! - `<Name>Stub`: a client wrapping a runtime channel, one async method per
//!   rpc that forwards the request to `/<package>.<Service>/<Method>`

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::{BindResult, RUNTIME_CRATE, bind_ident, bind_type, doc_attrs};
use crate::model::{Method, Service};
use crate::naming::to_snake_case;

struct BoundMethod {
    name: proc_macro2::Ident,
    input: syn::Type,
    output: syn::Type,
    doc: TokenStream,
    route: String,
}

fn bind_method(package: &str, service: &Service, method: &Method) -> BindResult<BoundMethod> {
    let context = format!("method '{}.{}'", service.name, method.name);
    Ok(BoundMethod {
        name: bind_ident(&to_snake_case(&method.name), "method")?,
        input: bind_type(&method.input_type, &context)?,
        output: bind_type(&method.output_type, &context)?,
        doc: doc_attrs(method.doc.as_deref()),
        route: format!("/{}.{}/{}", package, service.name, method.name),
    })
}

fn runtime_path() -> proc_macro2::Ident {
    format_ident!("{}", RUNTIME_CRATE)
}

/// Generates the `<Name>Base` handler trait.
pub fn generate_service_base(service: &Service) -> BindResult<TokenStream> {
    let trait_name = bind_ident(&service.base_name(), "service")?;
    let doc = doc_attrs(service.doc.as_deref());
    let runtime = runtime_path();

    // The route is irrelevant for the trait; bind with an empty package.
    let methods = service
        .methods
        .iter()
        .map(|method| bind_method("", service, method))
        .collect::<BindResult<Vec<_>>>()?;

    let signatures = methods.iter().map(|m| {
        let BoundMethod {
            name,
            input,
            output,
            doc,
            ..
        } = m;
        quote! {
            #doc
            async fn #name(&self, request: #input) -> Result<#output, #runtime::Status>;
        }
    });

    Ok(quote! {
        #doc
        pub trait #trait_name: Send + Sync {
            #(#signatures)*
        }
    })
}

/// Generates the `<Name>Stub` client.
pub fn generate_service_stub(package: &str, service: &Service) -> BindResult<TokenStream> {
    let stub_name = bind_ident(&service.stub_name(), "service")?;
    let stub_doc = format!(" Client for the `{}` service.", service.name);
    let runtime = runtime_path();

    let methods = service
        .methods
        .iter()
        .map(|method| bind_method(package, service, method))
        .collect::<BindResult<Vec<_>>>()?;

    let calls = methods.iter().map(|m| {
        let BoundMethod {
            name,
            input,
            output,
            doc,
            route,
        } = m;
        quote! {
            #doc
            pub async fn #name(&self, request: #input) -> Result<#output, #runtime::Status> {
                self.channel.unary(#route, request).await
            }
        }
    });

    Ok(quote! {
        #[doc = #stub_doc]
        #[derive(Debug, Clone)]
        pub struct #stub_name<C> {
            channel: C,
        }

        impl<C> #stub_name<C>
        where
            C: #runtime::Channel,
        {
            /// Creates a stub that sends requests over `channel`.
            pub fn new(channel: C) -> Self {
                Self { channel }
            }

            #(#calls)*
        }
    })
}
