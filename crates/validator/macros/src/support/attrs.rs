use syn::{
    Attribute, Ident, Lit, Meta, Result, Token,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
};

use crate::support::diag;

/// Parsed `#[validate(...)]` arguments.
#[derive(Debug, Clone, Default)]
pub struct AttrArgs {
    pub items: Vec<AttrItem>,
}

/// A single attribute item.
#[derive(Debug, Clone)]
pub enum AttrItem {
    /// A flag like `skip`
    Flag(Ident),
    /// Key-value pair like `rules = "required"`
    KeyValue { key: Ident, value: Lit },
}

impl AttrItem {
    fn key(&self) -> &Ident {
        match self {
            Self::Flag(key) | Self::KeyValue { key, .. } => key,
        }
    }
}

impl AttrArgs {
    /// Get a string value by key.
    pub fn get_string(&self, key: &str) -> Result<Option<String>> {
        let Some(value) = self.items.iter().find_map(|item| match item {
            AttrItem::KeyValue { key: k, value } if k == key => Some(value),
            _ => None,
        }) else {
            return Ok(None);
        };

        match value {
            Lit::Str(s) => Ok(Some(s.value())),
            other => Err(diag::error_spanned(
                other,
                format!("expected a string literal for `{key}`"),
            )),
        }
    }

    /// Check if a flag is present.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, AttrItem::Flag(f) if f == flag))
    }

    /// Rejects keys outside `allowed`.
    pub fn ensure_known(&self, allowed: &[&str]) -> Result<()> {
        for item in &self.items {
            let key = item.key();
            if !allowed.iter().any(|name| key == name) {
                return Err(diag::error_spanned(
                    key,
                    format!(
                        "unknown attribute `{key}`, expected one of: {}",
                        allowed.join(", ")
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Parse attribute like `#[validate(...)]` (the whole Attribute, not only args).
pub fn parse_attr(attr: &Attribute, expected: &str) -> Result<Option<AttrArgs>> {
    if !attr.path().is_ident(expected) {
        return Ok(None);
    }

    match &attr.meta {
        Meta::Path(_) => Ok(Some(AttrArgs::default())),
        Meta::List(list) => {
            let args = syn::parse2::<AttrArgsParser>(list.tokens.clone())?;
            Ok(Some(args.0))
        }
        Meta::NameValue(nv) => Err(diag::error_spanned(
            nv,
            format!("#[{expected}] must be #[{expected}(...)] (not name-value)"),
        )),
    }
}

/// Parse all attributes of a given name and merge them.
pub fn parse_attrs(attrs: &[Attribute], name: &str) -> Result<AttrArgs> {
    let mut result = AttrArgs::default();

    for attr in attrs {
        if let Some(args) = parse_attr(attr, name)? {
            result.items.extend(args.items);
        }
    }

    Ok(result)
}

struct AttrArgsParser(AttrArgs);

impl Parse for AttrArgsParser {
    fn parse(input: ParseStream) -> Result<Self> {
        let items = Punctuated::<AttrItemParser, Token![,]>::parse_terminated(input)?
            .into_iter()
            .map(|x| x.0)
            .collect();
        Ok(Self(AttrArgs { items }))
    }
}

struct AttrItemParser(AttrItem);

impl Parse for AttrItemParser {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.parse()?;

        if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            let value: Lit = input.parse()?;
            return Ok(Self(AttrItem::KeyValue { key, value }));
        }

        Ok(Self(AttrItem::Flag(key)))
    }
}
