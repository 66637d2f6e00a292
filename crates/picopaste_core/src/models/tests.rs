//! Model-level unit tests.

use super::*;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

#[test]
fn paste_id_parse_accepts_full_alphabet() {
    for value in ["abcdEFGH", "01234567", "a_b-c.d~", "~~~~~~~~"] {
        let id = PasteId::parse(value).unwrap_or_else(|| panic!("value: {}", value));
        assert_eq!(id.as_str(), value);
    }
}

#[test]
fn paste_id_parse_rejects_wrong_length_and_symbols() {
    let cases = ["", "abcdefg", "abcdefghi", "abc/efgh", "abc efgh", "abcdéfg", "%2e%2e%2f"];
    for value in cases {
        assert!(PasteId::parse(value).is_none(), "value: {:?}", value);
    }
}

#[test]
fn paste_id_bytes_match_string_form() {
    let id = PasteId::parse("Zz09_-.~").expect("valid id");
    assert_eq!(id.as_bytes(), b"Zz09_-.~");
    assert_eq!(id.to_string(), "Zz09_-.~");
}

#[test]
fn paste_id_try_from_string_reports_invalid_value() {
    let err = PasteId::try_from("nope".to_string()).expect_err("short id must fail");
    assert!(err.contains("nope"));
}

#[test]
fn client_key_folds_ipv4_mapped_addresses() {
    let v4 = ClientKey::from(IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3)));
    let mapped = ClientKey::from(IpAddr::V6(Ipv4Addr::new(10, 1, 2, 3).to_ipv6_mapped()));
    assert_eq!(v4, mapped);
    assert_eq!(v4.as_str(), "10.1.2.3");

    let v6 = ClientKey::from(IpAddr::V6(Ipv6Addr::LOCALHOST));
    assert_eq!(v6.as_str(), "::1");
}
