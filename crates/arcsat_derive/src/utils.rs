use quote::quote;
use syn::{AngleBracketedGenericArguments, Attribute, Expr, GenericArgument, Lit, Meta, Path,
    PathArguments, Type, TypePath};

pub fn inner_of_option(ty: &Type) -> Option<&Type> {
    let Type::Path(TypePath { path, .. }) = ty else {
        return None;
    };
    let is_option = match path.segments.len() {
        1 => path.segments[0].ident == "Option",
        3 => {
            (path.segments[0].ident == "std" || path.segments[0].ident == "core")
                && path.segments[1].ident == "option"
                && path.segments[2].ident == "Option"
        }
        _ => false,
    };
    if !is_option {
        return None;
    }

    if let Some(seg) = path.segments.last()
        && let PathArguments::AngleBracketed(AngleBracketedGenericArguments { args, .. }) =
            &seg.arguments
        && let Some(GenericArgument::Type(t)) = args.first()
    {
        return Some(t);
    }
    None
}

pub fn is_bool(ty: &Type) -> bool {
    matches!(ty, Type::Path(TypePath { path, .. }) if path.is_ident("bool"))
}

/// Placeholder shown in usage text, e.g. `<u64>` or `<path>`.
pub fn value_hint(ty: &Type) -> String {
    let ty = inner_of_option(ty).unwrap_or(ty);
    if let Type::Path(TypePath { path, .. }) = ty
        && let Some(seg) = path.segments.last()
    {
        let ident = seg.ident.to_string();
        return match ident.as_str() {
            "PathBuf" | "Path" => "path".to_string(),
            "String" => "text".to_string(),
            other => to_kebab_case(other),
        };
    }
    "value".to_string()
}

/// First line of the field's `///` docs, trimmed.
pub fn doc_summary(attrs: &[Attribute]) -> String {
    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        if let Meta::NameValue(nv) = &attr.meta
            && let Expr::Lit(expr) = &nv.value
            && let Lit::Str(lit) = &expr.lit
        {
            let line = lit.value().trim().to_string();
            if !line.is_empty() {
                return line;
            }
        }
    }
    String::new()
}

pub fn build_cli_parse_expr(ty: &Type, parse_with: Option<&Path>) -> proc_macro2::TokenStream {
    if let Some(parse_with) = parse_with {
        return match inner_of_option(ty) {
            Some(_) => quote! { Some(#parse_with(&raw)?) },
            None => quote! { #parse_with(&raw)? },
        };
    }

    let (target, wrap) = match inner_of_option(ty) {
        Some(inner) => (inner, true),
        None => (ty, false),
    };
    let parsed = quote! {
        raw.parse::<#target>()
            .map_err(|e| crate::Error::invalid_input(format!(
                "Invalid value for --{name}: {raw} ({e})"
            )))?
    };
    if wrap {
        quote! { Some(#parsed) }
    } else {
        parsed
    }
}

pub fn to_kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (idx, ch) in s.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if idx != 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else if ch == '_' {
            out.push('-');
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::{doc_summary, inner_of_option, is_bool, to_kebab_case, value_hint};

    #[test]
    fn inner_of_option_supports_short_and_std_paths() {
        let short_ty: syn::Type = parse_quote!(Option<String>);
        let std_ty: syn::Type = parse_quote!(std::option::Option<u8>);
        let non_opt: syn::Type = parse_quote!(Vec<String>);

        let short_inner = inner_of_option(&short_ty).expect("expected Option inner type");
        let std_inner = inner_of_option(&std_ty).expect("expected std Option inner type");

        assert_eq!(quote::quote!(#short_inner).to_string(), "String");
        assert_eq!(quote::quote!(#std_inner).to_string(), "u8");
        assert!(inner_of_option(&non_opt).is_none());
    }

    #[test]
    fn is_bool_only_matches_plain_bool() {
        let b: syn::Type = parse_quote!(bool);
        let ob: syn::Type = parse_quote!(Option<bool>);
        assert!(is_bool(&b));
        assert!(!is_bool(&ob));
    }

    #[test]
    fn value_hint_names_paths_and_unwraps_options() {
        let path: syn::Type = parse_quote!(Option<std::path::PathBuf>);
        let int: syn::Type = parse_quote!(u64);
        let custom: syn::Type = parse_quote!(AnalysisKind);
        assert_eq!(value_hint(&path), "path");
        assert_eq!(value_hint(&int), "u64");
        assert_eq!(value_hint(&custom), "analysis-kind");
    }

    #[test]
    fn doc_summary_reads_first_non_empty_doc_line() {
        let input: syn::DeriveInput = parse_quote! {
            struct Options {
                /// Delay between geocoding requests.
                /// Second line is ignored.
                pub delay: u64,
            }
        };
        let syn::Data::Struct(data) = input.data else {
            panic!("expected struct");
        };
        let field = data.fields.iter().next().expect("one field");
        assert_eq!(doc_summary(&field.attrs), "Delay between geocoding requests.");
    }

    #[test]
    fn to_kebab_case_handles_pascal_and_snake() {
        assert_eq!(to_kebab_case("MapFilter"), "map-filter");
        assert_eq!(to_kebab_case("mock_count"), "mock-count");
        assert_eq!(to_kebab_case("X"), "x");
    }
}
