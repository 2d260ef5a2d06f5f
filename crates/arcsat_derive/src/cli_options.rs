use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, Path, parse_macro_input, spanned::Spanned};

use crate::utils;

struct UsageLine {
    flag: String,
    help: String,
}

pub fn derive_cli_options_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let struct_ident = input.ident.clone();

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new(input.span(), "CliOptions can only be derived for structs")
            .to_compile_error()
            .into();
    };

    let Fields::Named(fields) = &data_struct.fields else {
        return syn::Error::new(input.span(), "CliOptions requires named fields")
            .to_compile_error()
            .into();
    };

    let mut arms = Vec::new();
    let mut usage = Vec::new();

    for field in &fields.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };

        let mut long_name: Option<String> = None;
        let mut parse_with: Option<Path> = None;
        let mut value_name: Option<String> = None;
        let mut is_flag = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("cli") {
                continue;
            }
            let parse_result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("long") {
                    let lit: LitStr = meta.value()?.parse()?;
                    long_name = Some(lit.value());
                    return Ok(());
                }
                if meta.path.is_ident("parse_with") {
                    let lit: LitStr = meta.value()?.parse()?;
                    parse_with = Some(syn::parse_str(&lit.value())?);
                    return Ok(());
                }
                if meta.path.is_ident("value_name") {
                    let lit: LitStr = meta.value()?.parse()?;
                    value_name = Some(lit.value());
                    return Ok(());
                }
                if meta.path.is_ident("flag") {
                    is_flag = true;
                    return Ok(());
                }
                Err(meta.error("unsupported cli attribute; expected long/parse_with/value_name/flag"))
            });
            if let Err(err) = parse_result {
                return err.to_compile_error().into();
            }
        }

        let Some(long_name) = long_name else {
            continue;
        };
        let help = utils::doc_summary(&field.attrs);
        let long_name_lit = LitStr::new(&long_name, Span::call_site());

        if is_flag {
            if !utils::is_bool(&field.ty) {
                return syn::Error::new(field.ty.span(), "#[cli(flag)] requires a bool field")
                    .to_compile_error()
                    .into();
            }
            let negated_lit = LitStr::new(&format!("no-{long_name}"), Span::call_site());
            arms.push(quote! {
                #long_name_lit => {
                    self.#field_ident = match value {
                        Some(raw) => Self::parse_cli_bool(name, &raw)?,
                        None => true,
                    };
                    Ok(true)
                }
            });
            arms.push(quote! {
                #negated_lit => {
                    if value.is_some() {
                        return Err(crate::Error::invalid_input(format!(
                            "Flag --{name} does not take a value"
                        )));
                    }
                    self.#field_ident = false;
                    Ok(true)
                }
            });
            usage.push(UsageLine {
                flag: format!("--{long_name}[=<bool>] | --no-{long_name}"),
                help,
            });
            continue;
        }

        let parse_expr = utils::build_cli_parse_expr(&field.ty, parse_with.as_ref());
        arms.push(quote! {
            #long_name_lit => {
                let raw = value.ok_or_else(|| {
                    crate::Error::invalid_input(format!("Missing value for --{name}"))
                })?;
                self.#field_ident = #parse_expr;
                Ok(true)
            }
        });
        let hint = value_name.unwrap_or_else(|| utils::value_hint(&field.ty));
        usage.push(UsageLine {
            flag: format!("--{long_name} <{hint}>"),
            help,
        });
    }

    let width = usage.iter().map(|line| line.flag.len()).max().unwrap_or(0);
    let usage_text: String = usage
        .iter()
        .map(|line| {
            if line.help.is_empty() {
                format!("  {}\n", line.flag)
            } else {
                format!("  {:<width$}  {}\n", line.flag, line.help)
            }
        })
        .collect();
    let usage_lit = LitStr::new(&usage_text, Span::call_site());

    let expanded = quote! {
        impl #struct_ident {
            fn split_arg(
                raw_name: &str,
                args: &mut std::iter::Peekable<impl Iterator<Item = String>>,
            ) -> (String, Option<String>) {
                if let Some((k, v)) = raw_name.split_once('=') {
                    return (k.to_string(), Some(v.to_string()));
                }

                let value = match args.peek() {
                    Some(next) if !next.starts_with("--") => args.next(),
                    _ => None,
                };

                (raw_name.to_string(), value)
            }

            fn parse_cli_bool(name: &str, value: &str) -> crate::Result<bool> {
                match value.to_ascii_lowercase().as_str() {
                    "1" | "true" | "yes" | "on" => Ok(true),
                    "0" | "false" | "no" | "off" => Ok(false),
                    _ => Err(crate::Error::invalid_input(format!(
                        "Invalid boolean for --{name}: {value} (expected true/false)"
                    ))),
                }
            }

            fn apply_cli_option(
                &mut self,
                name: &str,
                value: Option<String>,
            ) -> crate::Result<bool> {
                match name {
                    #(#arms,)*
                    _ => Ok(false),
                }
            }

            /// One line per option, generated from field docs.
            pub fn option_lines() -> &'static str {
                #usage_lit
            }
        }
    };

    TokenStream::from(expanded)
}
