//! BIP21-style payment URIs: `xazab:<address>?amount=..&label=..&message=..`.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::amount::{format_amount_plain, parse_amount};
use crate::config::UriConfig;
use crate::error::{AmountError, UriError};
use crate::query::parse_query;
use crate::types::Satoshis;

/// Decides whether an address string is acceptable for the active network.
/// Checksum and prefix rules live outside this crate.
pub trait AddressValidator {
    fn is_valid_address(&self, address: &str) -> bool;
}

impl<F> AddressValidator for F
where
    F: Fn(&str) -> bool,
{
    fn is_valid_address(&self, address: &str) -> bool {
        self(address)
    }
}

/// Fields carried by a payment URI. Only keys present in the source are
/// set; `memo` mirrors `message` for callers using the older field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentUri {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Satoshis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    /// Payment request URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl PaymentUri {
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..Self::default()
        }
    }

    /// Sets `message` and its `memo` alias together.
    pub fn set_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.memo = Some(message.clone());
        self.message = Some(message);
    }
}

pub fn parse_payment_uri<V>(text: &str, validator: &V) -> Result<PaymentUri, UriError>
where
    V: AddressValidator + ?Sized,
{
    parse_payment_uri_with(text, &UriConfig::default(), validator)
}

/// Parses `text` under `config`.
///
/// Text without a colon is taken as a bare address. Otherwise the scheme
/// must be `config.scheme` when an address is present, whether in the path
/// or as an `address` query key; a URI without an address (a bare
/// payment-request URL) also accepts the legacy schemes. Every query key
/// may appear once, and a query `address` must agree with the path.
pub fn parse_payment_uri_with<V>(
    text: &str,
    config: &UriConfig,
    validator: &V,
) -> Result<PaymentUri, UriError>
where
    V: AddressValidator + ?Sized,
{
    let Some((scheme, payload)) = text.split_once(':') else {
        let uri = PaymentUri::with_address(text);
        check_address(&uri, validator)?;
        return Ok(uri);
    };

    let (path, query) = payload.split_once('?').unwrap_or((payload, ""));
    let params = parse_query(query);
    let query_address = params
        .iter()
        .find(|(key, value)| key == "address" && !value.is_empty())
        .map(|(_, value)| value.as_str());

    // An address from either the path or the query pins the scheme.
    let scheme_ok = if path.is_empty() && query_address.is_none() {
        config.accepts_request_scheme(scheme)
    } else {
        scheme == config.scheme
    };
    if !scheme_ok {
        return Err(rejected(UriError::InvalidScheme {
            scheme: scheme.to_string(),
        }));
    }

    let mut seen = HashSet::with_capacity(params.len());
    for (key, value) in &params {
        // the query may restate the path address, never replace it
        let conflicts_with_path =
            key == "address" && !path.is_empty() && !value.is_empty() && value != path;
        if !seen.insert(key.as_str()) || conflicts_with_path {
            return Err(rejected(UriError::DuplicateParameter { key: key.clone() }));
        }
    }

    let mut uri = PaymentUri::default();
    if !path.is_empty() {
        uri.address = Some(path.to_string());
    }

    for (key, value) in params {
        if value.is_empty() {
            continue;
        }
        match key.as_str() {
            "address" => uri.address = Some(value),
            "amount" => uri.amount = Some(parse_uri_amount(value, config.decimal_point)?),
            "label" => uri.label = Some(value),
            "message" => uri.set_message(value),
            "memo" => {
                if uri.message.is_none() {
                    uri.memo = Some(value);
                }
            }
            "r" => uri.r = Some(value),
            _ => {
                uri.extra.insert(key, value);
            }
        }
    }

    check_address(&uri, validator)?;
    trace!(
        has_address = uri.address.is_some(),
        has_amount = uri.amount.is_some(),
        "parsed payment uri"
    );
    Ok(uri)
}

/// Renders `uri` back into text: address, then `amount`, `label`,
/// `message`, a `memo` that differs from `message`, `r`, and the remaining
/// keys in lexical order. Keys and values are percent-encoded.
pub fn build_payment_uri<V>(
    uri: &PaymentUri,
    config: &UriConfig,
    validator: &V,
) -> Result<String, UriError>
where
    V: AddressValidator + ?Sized,
{
    check_address(uri, validator)?;

    let mut params: Vec<(&str, String)> = Vec::new();
    if let Some(amount) = uri.amount {
        params.push(("amount", render_uri_amount(amount, config.decimal_point)?));
    }
    if let Some(label) = &uri.label {
        params.push(("label", label.clone()));
    }
    if let Some(message) = &uri.message {
        params.push(("message", message.clone()));
    }
    if let Some(memo) = &uri.memo {
        if uri.message.as_ref() != Some(memo) {
            params.push(("memo", memo.clone()));
        }
    }
    if let Some(r) = &uri.r {
        params.push(("r", r.clone()));
    }
    for (key, value) in &uri.extra {
        params.push((key.as_str(), value.clone()));
    }

    let mut rendered = format!("{}:{}", config.scheme, uri.address.as_deref().unwrap_or(""));
    for (index, (key, value)) in params.iter().enumerate() {
        rendered.push(if index == 0 { '?' } else { '&' });
        rendered.push_str(&urlencoding::encode(key));
        rendered.push('=');
        rendered.push_str(&urlencoding::encode(value));
    }
    Ok(rendered)
}

fn parse_uri_amount(value: String, decimal_point: u32) -> Result<Satoshis, UriError> {
    match parse_amount(&value, decimal_point) {
        Ok(amount) if amount.is_negative() => Err(rejected(UriError::InvalidAmount {
            value,
            source: AmountError::Negative,
        })),
        Ok(amount) => Ok(amount),
        Err(source) => Err(rejected(UriError::InvalidAmount { value, source })),
    }
}

fn render_uri_amount(amount: Satoshis, decimal_point: u32) -> Result<String, UriError> {
    if amount.is_negative() {
        return Err(UriError::InvalidAmount {
            value: amount.as_i64().to_string(),
            source: AmountError::Negative,
        });
    }
    format_amount_plain(amount, decimal_point).map_err(|_| UriError::InvalidAmount {
        value: amount.as_i64().to_string(),
        source: AmountError::Overflow,
    })
}

fn check_address<V>(uri: &PaymentUri, validator: &V) -> Result<(), UriError>
where
    V: AddressValidator + ?Sized,
{
    match &uri.address {
        Some(address) if !validator.is_valid_address(address) => {
            Err(rejected(UriError::InvalidAddress {
                address: address.clone(),
            }))
        }
        _ => Ok(()),
    }
}

fn rejected(err: UriError) -> UriError {
    debug!(code = err.code(), error = %err, "rejected payment uri");
    err
}
