use proc_macro::TokenStream;
use quote::{quote, ToTokens};
use syn::{
    parse_macro_input, Expr,
    Member::{Named, Unnamed},
};

/// Use this instead of `anyhow::anyhow!()`
#[proc_macro]
pub fn wohyna(input: TokenStream) -> TokenStream {
    let args = proc_macro2::TokenStream::from(input);

    let output = quote! {
        {
            use anyhow::anyhow;

            let loc = std::panic::Location::caller();

            anyhow!(
                "[{}:{}:{}] {}",
                loc.file(),
                loc.line(),
                loc.column(),
                format!(#args)
            )
        }
    };

    output.into()
}

/// Use this instead of `anyhow::bail!()`
#[proc_macro]
pub fn liab(input: TokenStream) -> TokenStream {
    let args = proc_macro2::TokenStream::from(input);

    let output = quote! {
        {
            use anyhow::bail;

            let loc = std::panic::Location::caller();

            bail!(
                "[{}:{}:{}] {}",
                loc.file(),
                loc.line(),
                loc.column(),
                format!(#args)
            )
        }
    };

    output.into()
}

/// Attaches `[file:line:column] call(args…)` to the error of a `Result` or `Option`.
/// Arguments are printed with `{:?}` and clipped to `crate::utils::DEBUG_PRINT_LIMIT`.
#[proc_macro]
pub fn arg_context(input: TokenStream) -> TokenStream {
    let expr = parse_macro_input!(input as Expr);

    wrap_with_context(&expr, true).into()
}

/// Same as `arg_context!`, but arguments are never printed (`call(?)`).
/// Use it when the arguments don't implement `Debug` or are too noisy.
#[proc_macro]
pub fn raw_context(input: TokenStream) -> TokenStream {
    let expr = parse_macro_input!(input as Expr);

    wrap_with_context(&expr, false).into()
}

fn wrap_with_context(expr: &Expr, print_args: bool) -> proc_macro2::TokenStream {
    let description = describe_expr(expr, print_args);

    quote! {
        {
            use anyhow::Context;

            let loc = std::panic::Location::caller();

            #expr.with_context(|| {
                format!(
                    "[{}:{}:{}] {}",
                    loc.file(),
                    loc.line(),
                    loc.column(),
                    #description
                )
            })
        }
    }
}

fn describe_args<'a>(
    args: impl Iterator<Item = &'a Expr>,
    print_args: bool,
) -> proc_macro2::TokenStream {
    if !print_args {
        return quote!(String::from("?"));
    }

    let arg_to_string_iter = args.map(|arg| {
        quote!(crate::utils::clip_string(
            format!("{:?}", #arg),
            "…",
            *crate::utils::DEBUG_PRINT_LIMIT.get().unwrap_or(&1)
        ))
    });

    quote!(<Vec<String>>::from([#(#arg_to_string_iter),*]).join(", "))
}

fn path_to_string(tokens: impl ToTokens) -> String {
    tokens
        .to_token_stream()
        .to_string()
        .replace(" :: ", "::")
        .replace(" . ", ".")
}

fn describe_expr(expr: &Expr, print_args: bool) -> proc_macro2::TokenStream {
    match expr {
        Expr::Call(call) => {
            let func_name = describe_expr(&call.func, print_args);
            let args_list = describe_args(call.args.iter(), print_args);

            quote! {
                {
                    let args_list = #args_list;
                    format!("{}({})", #func_name, args_list)
                }
            }
        }
        Expr::MethodCall(method) => {
            let receiver_name = describe_expr(&method.receiver, print_args);
            let method_name = method.method.to_string();
            let args_list = describe_args(method.args.iter(), print_args);

            quote! {
                {
                    let args_list = #args_list;
                    format!("{}.{}({})", #receiver_name, #method_name, args_list)
                }
            }
        }
        Expr::Path(path) => {
            let path = path_to_string(path);
            quote!(format!("{}", #path))
        }
        Expr::Field(field) => {
            let base_name = describe_expr(&field.base, print_args);
            let member_name = match &field.member {
                Named(ident) => ident.to_token_stream().to_string(),
                Unnamed(index) => index.index.to_string(),
            };

            quote!(format!("{}.{}", #base_name, #member_name))
        }
        Expr::Index(index) => {
            let base_name = describe_expr(&index.expr, print_args);
            let position = path_to_string(&index.index);

            quote!(format!("{}[{}]", #base_name, #position))
        }
        Expr::Reference(reference) => {
            let inner = describe_expr(&reference.expr, print_args);

            if reference.mutability.is_some() {
                quote!(format!("&mut {}", #inner))
            } else {
                quote!(format!("&{}", #inner))
            }
        }
        Expr::Paren(paren) => {
            let inner = describe_expr(&paren.expr, print_args);

            quote!(format!("({})", #inner))
        }
        Expr::Await(aw) => {
            let base_name = describe_expr(&aw.base, print_args);

            quote!(format!("{}.await", #base_name))
        }
        Expr::Macro(ma) => {
            let path = path_to_string(&ma.mac.path);
            let tokens = ma.mac.tokens.to_token_stream().to_string();

            quote!(format!("{}!({})", #path, #tokens))
        }
        Expr::Try(tr) => describe_expr(&tr.expr, print_args),
        _ => syn::Error::new_spanned(
            expr,
            format!(
                "Unexpected expression in macro: `{}`",
                expr.to_token_stream()
            ),
        )
        .to_compile_error(),
    }
}
