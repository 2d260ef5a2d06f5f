use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, Variant, parse_macro_input, spanned::Spanned};

use crate::utils;

/// Spellings accepted for one enum variant.
struct VariantSpec {
    ident: Ident,
    canonical: String,
    aliases: Vec<String>,
}

impl VariantSpec {
    fn from_variant(variant: &Variant) -> syn::Result<Self> {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new(
                variant.span(),
                "CliValue only supports enums with unit variants",
            ));
        }

        let mut parsed = Self {
            ident: variant.ident.clone(),
            canonical: utils::to_kebab_case(&variant.ident.to_string()),
            aliases: Vec::new(),
        };
        for attr in variant.attrs.iter().filter(|a| a.path().is_ident("cli")) {
            attr.parse_nested_meta(|meta| {
                let lit: LitStr = meta.value()?.parse()?;
                if meta.path.is_ident("name") {
                    parsed.canonical = lit.value();
                } else if meta.path.is_ident("alias") {
                    parsed.aliases.push(lit.value().to_ascii_lowercase());
                } else {
                    return Err(meta.error("unsupported cli attribute; expected name/alias"));
                }
                Ok(())
            })?;
        }
        Ok(parsed)
    }

    fn spellings(&self) -> impl Iterator<Item = LitStr> + '_ {
        std::iter::once(&self.canonical)
            .chain(&self.aliases)
            .map(|s| LitStr::new(s, Span::call_site()))
    }
}

/// `#[cli_value(option = "...")]`, defaulting to the kebab-cased enum name.
fn option_name(input: &DeriveInput) -> syn::Result<String> {
    let mut name = utils::to_kebab_case(&input.ident.to_string());
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("cli_value")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("option") {
                return Err(meta.error("unsupported cli_value attribute; expected option = \"...\""));
            }
            let lit: LitStr = meta.value()?.parse()?;
            name = lit.value();
            Ok(())
        })?;
    }
    Ok(name)
}

pub fn derive_cli_value_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let Data::Enum(data_enum) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "CliValue can only be derived for enums",
        ));
    };

    let option_lit = LitStr::new(&option_name(input)?, Span::call_site());
    let specs = data_enum
        .variants
        .iter()
        .map(VariantSpec::from_variant)
        .collect::<syn::Result<Vec<_>>>()?;

    let enum_ident = &input.ident;
    let idents: Vec<&Ident> = specs.iter().map(|s| &s.ident).collect();
    let canonical: Vec<LitStr> = specs
        .iter()
        .map(|s| LitStr::new(&s.canonical, Span::call_site()))
        .collect();
    let parse_patterns = specs.iter().map(|s| {
        let spellings = s.spellings();
        quote! { #(#spellings)|* }
    });
    let expected = specs
        .iter()
        .map(|s| s.canonical.as_str())
        .collect::<Vec<_>>()
        .join("|");
    let expected_lit = LitStr::new(&expected, Span::call_site());

    Ok(quote! {
        impl #enum_ident {
            /// Canonical spellings accepted on the command line.
            pub const NAMES: &'static [&'static str] = &[#(#canonical),*];

            pub fn parse(raw: &str) -> crate::Result<Self> {
                match raw.trim().to_ascii_lowercase().as_str() {
                    #(#parse_patterns => Ok(Self::#idents),)*
                    _ => Err(crate::Error::invalid_input(format!(
                        "Invalid value for --{}: {} (expected {})",
                        #option_lit,
                        raw,
                        #expected_lit
                    ))),
                }
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    #(Self::#idents => #canonical,)*
                }
            }
        }

        impl std::fmt::Display for #enum_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    })
}
