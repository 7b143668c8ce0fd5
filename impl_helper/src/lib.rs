use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields};

#[derive(Default)]
struct Wanted {
    get: bool,
    copy: bool,
    get_mut: bool,
    set: bool,
    upd: bool,
}

fn parse_wanted(field: &Field) -> syn::Result<Wanted> {
    let mut wanted = Wanted::default();

    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("helper")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("get") {
                wanted.get = true;
            } else if meta.path.is_ident("copy") {
                wanted.copy = true;
            } else if meta.path.is_ident("get_mut") {
                wanted.get_mut = true;
            } else if meta.path.is_ident("set") {
                wanted.set = true;
            } else if meta.path.is_ident("upd") {
                wanted.upd = true;
            } else if meta.path.is_ident("all") {
                wanted.get = true;
                wanted.get_mut = true;
                wanted.set = true;
                wanted.upd = true;
            } else {
                return Err(meta.error(format!(
                    "Unexpected helper: {}. Expected one of: get, copy, get_mut, set, upd or all",
                    meta.path
                        .segments
                        .iter()
                        .map(|segment| segment.ident.to_string())
                        .collect::<Vec<_>>()
                        .join("::")
                )));
            }

            Ok(())
        })?;
    }

    if wanted.get && wanted.copy {
        return Err(syn::Error::new_spanned(
            field,
            "`get` and `copy` both generate the plain getter, pick one",
        ));
    }

    Ok(wanted)
}

fn field_methods(field: &Field) -> syn::Result<Vec<proc_macro2::TokenStream>> {
    let Some(field_name) = field.ident.as_ref() else {
        return Err(syn::Error::new_spanned(field, "ImplHelper needs named fields"));
    };
    let field_type = &field.ty;
    let wanted = parse_wanted(field)?;

    let mut methods = Vec::default();

    if wanted.get {
        methods.push(quote! {
            pub fn #field_name(&self) -> &#field_type {
                &self.#field_name
            }
        });
    }

    // For `Copy` fields: returns the value instead of a reference
    if wanted.copy {
        methods.push(quote! {
            pub fn #field_name(&self) -> #field_type {
                self.#field_name
            }
        });
    }

    if wanted.get_mut {
        let fn_name = syn::Ident::new(&format!("{}_mut", field_name), field_name.span());

        methods.push(quote! {
            pub fn #fn_name(&mut self) -> &mut #field_type {
                &mut self.#field_name
            }
        });
    }

    if wanted.set {
        let fn_name = syn::Ident::new(&format!("{}_set", field_name), field_name.span());

        methods.push(quote! {
            #[must_use = "method moves the value of self and returns the modified value"]
            pub fn #fn_name(mut self, value: #field_type) -> Self {
                self.#field_name = value;
                self
            }
        });
    }

    if wanted.upd {
        let fn_name = syn::Ident::new(&format!("{}_update", field_name), field_name.span());

        methods.push(quote! {
            pub fn #fn_name(&mut self, value: #field_type) -> &mut Self {
                self.#field_name = value;
                self
            }
        });
    }

    Ok(methods)
}

#[proc_macro_derive(ImplHelper, attributes(helper))]
pub fn impl_helper(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;
    let (impl_generics, type_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(name, "ImplHelper supports only named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "ImplHelper supports only structs")
                .to_compile_error()
                .into()
        }
    };

    let mut methods = Vec::default();

    for field in fields.iter() {
        match field_methods(field) {
            Ok(field_methods) => methods.extend(field_methods),
            Err(e) => return e.to_compile_error().into(),
        }
    }

    TokenStream::from(quote! {
        impl #impl_generics #name #type_generics #where_clause {
            #(#methods)*
        }
    })
}
