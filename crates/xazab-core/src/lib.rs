//! Parsing, formatting and validation core of the Xazab wallet.
//!
//! Every function here is pure: amounts are converted between integer minor
//! units and display strings, payment URIs are decoded into typed fields,
//! and loosely typed values, hex strings and network addresses are
//! classified. Nothing performs I/O or keeps state between calls.

#![forbid(unsafe_code)]

pub mod amount;
pub mod bits;
pub mod chunks;
pub mod config;
pub mod error;
pub mod netaddr;
pub mod query;
pub mod types;
pub mod uri;
pub mod validators;

pub use amount::{format_amount, format_amount_plain, format_fee_rate, parse_amount, AmountFormat};
pub use bits::list_enabled_bits;
pub use chunks::{chunks, Chunks};
pub use config::UriConfig;
pub use error::{AmountError, CoreError, Result, UriError};
pub use netaddr::{is_ip_address, is_private_net_address};
pub use types::{InputValue, Satoshis, COIN_DECIMAL_POINT, SATOSHIS_PER_COIN};
pub use uri::{
    build_payment_uri, parse_payment_uri, parse_payment_uri_with, AddressValidator, PaymentUri,
};
pub use validators::{
    is_hash256_str, is_hex_str, is_int_or_float, is_integer, is_non_negative_int_or_float,
    is_non_negative_integer,
};
