//! 标记属性解析

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::{token, Attribute, Error, Expr, ExprLit, Ident, Lit, LitInt, LitStr, Result, Token};

const METHODS: [&str; 7] = ["get", "post", "put", "delete", "patch", "head", "options"];

/// 标记所在层级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Type,
    Slot,
}

impl Level {
    fn attr_name(self) -> &'static str {
        match self {
            Level::Type => "service",
            Level::Slot => "endpoint",
        }
    }
}

/// `#[service(...)]` 解析结果
#[derive(Default)]
pub struct ServiceAttrs {
    pub name: Option<LitStr>,
    pub markers: Vec<TokenStream>,
}

/// 解析结构体上的 `#[service(...)]`
pub fn parse_service_attrs(attrs: &[Attribute]) -> Result<ServiceAttrs> {
    let mut parsed = ServiceAttrs::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("service")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                parsed.name = Some(meta.value()?.parse()?);
                return Ok(());
            }
            parsed.markers.push(parse_marker(&meta, Level::Type)?);
            Ok(())
        })?;
    }

    Ok(parsed)
}

/// 解析字段上的 `#[endpoint(...)]`，字段没有该属性时返回 `None`
pub fn parse_endpoint_attrs(attrs: &[Attribute]) -> Result<Option<Vec<TokenStream>>> {
    let mut markers = None;

    for attr in attrs.iter().filter(|a| a.path().is_ident("endpoint")) {
        let collected = markers.get_or_insert_with(Vec::new);
        // `#[endpoint]` 不带参数时只登记插槽
        if matches!(attr.meta, syn::Meta::Path(_)) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            collected.push(parse_marker(&meta, Level::Slot)?);
            Ok(())
        })?;
    }

    Ok(markers)
}

fn parse_marker(meta: &ParseNestedMeta<'_>, level: Level) -> Result<TokenStream> {
    let marker = quote!(::binding_common::MetadataMarker);
    let name = meta
        .path
        .get_ident()
        .map(Ident::to_string)
        .unwrap_or_default();

    match (name.as_str(), level) {
        (method, Level::Slot) if METHODS.contains(&method) => {
            let path: LitStr = meta.value()?.parse()?;
            let constructor = format_ident!("{}", method);
            Ok(quote!(#marker::#constructor(#path)))
        }
        ("url", Level::Slot) => {
            let url: LitStr = meta.value()?.parse()?;
            Ok(quote!(#marker::url(#url)))
        }
        ("domain", Level::Type) => {
            let domain: LitStr = meta.value()?.parse()?;
            Ok(quote!(#marker::domain(#domain)))
        }
        ("content_type", _) => {
            let content_type: LitStr = meta.value()?.parse()?;
            Ok(quote!(#marker::content_type(#content_type)))
        }
        ("header" | "query" | "form", _) => {
            let args = Args::parse(meta)?;
            args.expect_positional(meta, 2)?;
            let key = args.str_at(0)?;
            let value = args.str_at(1)?;
            let constructor = format_ident!("{}", name);
            Ok(quote!(#marker::#constructor(#key, #value)))
        }
        ("cookie", _) => parse_cookie(meta),
        ("proxy", _) => {
            let args = Args::parse(meta)?;
            args.expect_positional(meta, 3)?;
            let scheme = args.str_at(0)?;
            let host = args.str_at(1)?;
            let port = args.int_at(2)?;
            Ok(quote! {
                #marker::Proxy(::binding_common::ProxyMarker::new(#scheme, #host, #port))
            })
        }
        ("trust_store", _) => {
            let args = Args::parse(meta)?;
            let path = args.str_at(0)?;
            let store = quote!(::binding_common::TrustStoreMarker::new(#path));
            match args.positional.len() {
                1 => Ok(quote!(#marker::TrustStore(#store))),
                2 => {
                    let password = args.str_at(1)?;
                    Ok(quote!(#marker::TrustStore(#store.with_password(#password))))
                }
                _ => Err(meta.error("trust_store 需要证书路径和可选的密码")),
            }
        }
        ("retry", _) => parse_retry(meta),
        ("ignore_retry", Level::Slot) => Ok(quote!(#marker::IgnoreRetry)),
        ("multipart", Level::Slot) => {
            let args = Args::parse(meta)?;
            args.expect_positional(meta, 4)?;
            let control_name = args.str_at(0)?;
            let file_name = args.str_at(1)?;
            let file_path = args.str_at(2)?;
            let mime_type = args.str_at(3)?;
            Ok(quote! {
                #marker::MultiPart(::binding_common::MultiPartMarker {
                    control_name: ::std::string::String::from(#control_name),
                    file_name: ::std::string::String::from(#file_name),
                    file_path: ::std::string::String::from(#file_path),
                    mime_type: ::std::string::String::from(#mime_type),
                })
            })
        }
        _ => Err(meta.error(format!(
            "#[{}] 不支持的标记: {}",
            level.attr_name(),
            if name.is_empty() { "<path>" } else { name.as_str() }
        ))),
    }
}

fn parse_cookie(meta: &ParseNestedMeta<'_>) -> Result<TokenStream> {
    let args = Args::parse(meta)?;
    let mut cookie = match args.positional.len() {
        1 | 2 => {
            let name = args.str_at(0)?;
            quote!(::binding_common::CookieMarker::new(#name))
        }
        _ => return Err(meta.error("cookie 需要名称和可选的取值")),
    };

    if args.positional.len() == 2 {
        let value = args.str_at(1)?;
        cookie = quote!(#cookie.with_value(#value));
    }

    for (key, value) in &args.named {
        if key != "additional" {
            return Err(Error::new_spanned(key, "cookie 只支持 additional = [..]"));
        }
        let Expr::Array(array) = value else {
            return Err(Error::new_spanned(value, "additional 需要字符串数组"));
        };
        let values = array
            .elems
            .iter()
            .map(|e| expect_str(e, "additional"))
            .collect::<Result<Vec<_>>>()?;
        cookie = quote! {
            #cookie.with_additional_values(
                ::std::vec::Vec::<::std::string::String>::from([
                    #(::std::string::String::from(#values)),*
                ])
            )
        };
    }

    Ok(quote!(::binding_common::MetadataMarker::Cookie(#cookie)))
}

fn parse_retry(meta: &ParseNestedMeta<'_>) -> Result<TokenStream> {
    let mut retry = quote!(::binding_common::RetryMarker::new());

    // 不带参数的 `retry` 表示全部使用默认值
    if !meta.input.peek(token::Paren) {
        return Ok(quote!(::binding_common::MetadataMarker::Retry(#retry)));
    }

    let args = Args::parse(meta)?;
    if let Some(first) = args.positional.first() {
        return Err(Error::new_spanned(first, "retry 只接受命名参数"));
    }

    for (key, value) in &args.named {
        match key.to_string().as_str() {
            "max_attempts" => {
                let attempts = expect_int(value, "max_attempts")?;
                retry = quote!(#retry.with_max_attempts(#attempts));
            }
            "delay_ms" => {
                let delay = expect_int(value, "delay_ms")?;
                retry = quote!(#retry.with_delay_ms(#delay));
            }
            "trigger" => {
                let Expr::Path(trigger) = value else {
                    return Err(Error::new_spanned(value, "trigger 需要返回 RetryTrigger 的函数路径"));
                };
                retry = quote!(#retry.with_trigger(#trigger()));
            }
            _ => {
                return Err(Error::new_spanned(
                    key,
                    "retry 支持 max_attempts、delay_ms 与 trigger",
                ))
            }
        }
    }

    Ok(quote!(::binding_common::MetadataMarker::Retry(#retry)))
}

/// 括号内的参数：位置参数与 `key = value` 命名参数
struct Args {
    positional: Vec<Expr>,
    named: Vec<(Ident, Expr)>,
}

impl Args {
    fn parse(meta: &ParseNestedMeta<'_>) -> Result<Self> {
        let content;
        syn::parenthesized!(content in meta.input);
        let exprs = Punctuated::<Expr, Token![,]>::parse_terminated(&content)?;

        let mut args = Args {
            positional: Vec::new(),
            named: Vec::new(),
        };
        for expr in exprs {
            match expr {
                Expr::Assign(assign) => {
                    let Expr::Path(left) = assign.left.as_ref() else {
                        return Err(Error::new_spanned(&assign.left, "参数名必须是标识符"));
                    };
                    let key = left
                        .path
                        .get_ident()
                        .cloned()
                        .ok_or_else(|| Error::new_spanned(&left.path, "参数名必须是标识符"))?;
                    args.named.push((key, *assign.right));
                }
                other => args.positional.push(other),
            }
        }
        Ok(args)
    }

    fn expect_positional(&self, meta: &ParseNestedMeta<'_>, count: usize) -> Result<()> {
        if self.positional.len() == count && self.named.is_empty() {
            return Ok(());
        }
        Err(meta.error(format!("需要 {count} 个位置参数")))
    }

    fn str_at(&self, index: usize) -> Result<LitStr> {
        let expr = self
            .positional
            .get(index)
            .ok_or_else(|| Error::new(proc_macro2::Span::call_site(), "缺少参数"))?;
        expect_str(expr, "参数")
    }

    fn int_at(&self, index: usize) -> Result<LitInt> {
        let expr = self
            .positional
            .get(index)
            .ok_or_else(|| Error::new(proc_macro2::Span::call_site(), "缺少参数"))?;
        expect_int(expr, "参数")
    }
}

fn expect_str(expr: &Expr, what: &str) -> Result<LitStr> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(value),
            ..
        }) => Ok(value.clone()),
        other => Err(Error::new_spanned(other, format!("{what} 需要字符串字面量"))),
    }
}

fn expect_int(expr: &Expr, what: &str) -> Result<LitInt> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(value),
            ..
        }) => Ok(value.clone()),
        other => Err(Error::new_spanned(other, format!("{what} 需要整数字面量"))),
    }
}
