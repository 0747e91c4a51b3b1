use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{DeriveInput, LitStr, parse_macro_input, parse_quote};

use crate::support::utils::RenameRule;
use crate::support::{attrs, diag, utils};

const CONTAINER_KEYS: &[&str] = &["name", "rename_all"];
const FIELD_KEYS: &[&str] = &["rules", "rename", "skip"];

pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(input) {
        Ok(ts) => ts,
        Err(e) => diag::to_compile_error(e),
    }
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let struct_name = &input.ident;

    let container = attrs::parse_attrs(&input.attrs, "validate")?;
    container.ensure_known(CONTAINER_KEYS)?;

    let type_name = container
        .get_string("name")?
        .unwrap_or_else(|| struct_name.unraw().to_string());
    let rename_all = match container.get_string("rename_all")? {
        Some(rule) => RenameRule::parse(&rule).ok_or_else(|| {
            diag::error_spanned(
                struct_name,
                format!(
                    "unsupported `rename_all = \"{rule}\"`, expected \"snake_case\", \"PascalCase\" or \"camelCase\""
                ),
            )
        })?,
        None => RenameRule::Snake,
    };

    let fields = utils::require_named_fields(&input)?;
    let mut with_fields = Vec::with_capacity(fields.named.len());

    for field in &fields.named {
        let Some(ident) = &field.ident else {
            continue;
        };

        let args = attrs::parse_attrs(&field.attrs, "validate")?;
        args.ensure_known(FIELD_KEYS)?;
        if args.has_flag("skip") {
            continue;
        }

        let name = args
            .get_string("rename")?
            .unwrap_or_else(|| rename_all.apply(&ident.unraw().to_string()));
        let rules = args.get_string("rules")?.unwrap_or_default();

        let name = LitStr::new(&name, ident.span());
        let rules = LitStr::new(&rules, ident.span());

        with_fields.push(quote! {
            .with_field(
                #name,
                #rules,
                ::tagcheck_validator::Inspect::inspect(&self.#ident),
            )
        });
    }

    let mut generics = input.generics.clone();
    generics.make_where_clause().predicates.push(parse_quote!(Self: 'static));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let type_name = LitStr::new(&type_name, struct_name.span());

    let expanded = quote! {
        impl #impl_generics ::tagcheck_validator::Inspect for #struct_name #ty_generics #where_clause {
            fn inspect(&self) -> ::tagcheck_validator::Value<'_> {
                ::tagcheck_validator::Value::Struct(
                    ::tagcheck_validator::StructValue::new(#type_name, self)
                        #(#with_fields)*
                )
            }
        }
    };

    Ok(expanded.into())
}
