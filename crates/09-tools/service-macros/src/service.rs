//! `#[derive(Service)]` 实现

use crate::markers::{parse_endpoint_attrs, parse_service_attrs};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Data, DataStruct, DeriveInput, Error, Fields, Result, Type};

const SLOT_TYPES: [&str; 3] = ["RestMethod", "SoapMethod", "DataMethod"];

/// 生成 `ServiceDeclaration` 实现
pub fn derive_service_impl(input: DeriveInput) -> Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "#[derive(Service)] 不支持泛型服务类型",
        ));
    }

    let fields = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(named),
            ..
        }) => &named.named,
        _ => {
            return Err(Error::new_spanned(
                &input.ident,
                "#[derive(Service)] 只能用于具名字段结构体",
            ))
        }
    };

    let struct_name = &input.ident;
    let attrs = parse_service_attrs(&input.attrs)?;
    let service_name = attrs
        .name
        .map(|name| name.value())
        .unwrap_or_else(|| struct_name.unraw().to_string());
    let type_markers = attrs.markers;

    let mut accessors = Vec::new();
    let mut members = Vec::new();

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let member_name = ident.unraw().to_string();
        let slot_markers = parse_endpoint_attrs(&field.attrs)?;

        if is_slot_type(&field.ty) {
            let markers = slot_markers.unwrap_or_default();
            let accessor = format_ident!("__{}_slot", ident.unraw());
            accessors.push(quote! {
                fn #accessor(service: &#struct_name) -> &dyn ::binding_abstractions::EndpointSlot {
                    &service.#ident
                }
            });
            members.push(quote! {
                .endpoint(#member_name, #accessor, [#(#markers),*])
            });
        } else {
            if slot_markers.is_some() {
                return Err(Error::new_spanned(
                    &field.ty,
                    "#[endpoint] 只能用于 RestMethod、SoapMethod 或 DataMethod 字段",
                ));
            }
            let ty = &field.ty;
            let type_name = quote!(#ty).to_string();
            members.push(quote! {
                .member(#member_name, #type_name)
            });
        }
    }

    Ok(quote! {
        impl ::binding_abstractions::ServiceDeclaration for #struct_name {
            fn declaration() -> ::binding_abstractions::ServiceDescriptor<Self> {
                #(#accessors)*

                ::binding_abstractions::ServiceDescriptor::builder(#service_name)
                    #(.type_marker(#type_markers))*
                    .constructor(<Self as ::core::default::Default>::default)
                    #(#members)*
                    .build()
            }
        }
    })
}

/// 按声明类型的最后一段判断字段是否为端点插槽
fn is_slot_type(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    path.path.segments.last().map_or(false, |segment| {
        segment.arguments.is_empty()
            && SLOT_TYPES.iter().any(|name| segment.ident == name)
    })
}
