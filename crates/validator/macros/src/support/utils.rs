use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields};

/// Return named fields if the input is a struct with them; otherwise error.
pub fn require_named_fields(input: &DeriveInput) -> syn::Result<&syn::FieldsNamed> {
    let fields = match &input.data {
        Data::Struct(s) => &s.fields,
        _ => {
            return Err(syn::Error::new(
                input.ident.span(),
                "Inspect can only be derived for structs",
            ));
        }
    };

    match fields {
        Fields::Named(n) => Ok(n),
        Fields::Unnamed(_) => Err(syn::Error::new(
            fields.span(),
            "Inspect requires a struct with named fields (e.g. `struct X { ... }`)",
        )),
        Fields::Unit => Err(syn::Error::new(
            fields.span(),
            "Inspect requires a non-unit struct with fields",
        )),
    }
}

/// Field naming convention applied by `rename_all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    /// Keep the Rust field name.
    Snake,
    /// `user_name` -> `UserName`
    Pascal,
    /// `user_name` -> `userName`
    Camel,
}

impl RenameRule {
    pub fn parse(rule: &str) -> Option<Self> {
        match rule {
            "snake_case" => Some(Self::Snake),
            "PascalCase" => Some(Self::Pascal),
            "camelCase" => Some(Self::Camel),
            _ => None,
        }
    }

    pub fn apply(self, field: &str) -> String {
        match self {
            Self::Snake => field.to_owned(),
            Self::Pascal => pascal(field),
            Self::Camel => {
                let pascal = pascal(field);
                let mut chars = pascal.chars();
                chars
                    .next()
                    .map(|first| first.to_lowercase().chain(chars).collect())
                    .unwrap_or_default()
            }
        }
    }
}

fn pascal(field: &str) -> String {
    field
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect()
}
