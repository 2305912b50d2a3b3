use crate::utils::{hex_bytes, printable_ascii};

#[test]
fn hex_bytes_pads_each_byte() {
    assert_eq!(hex_bytes(&[0x00, 0x0a, 0xff]), "00 0a ff");
}

#[test]
fn hex_bytes_single() {
    assert_eq!(hex_bytes(&[0x7f]), "7f");
}

#[test]
fn printable_ascii_keeps_space_and_tilde() {
    assert_eq!(printable_ascii(b" ~"), " ~");
}

#[test]
fn printable_ascii_drops_control_and_high_bytes() {
    assert_eq!(printable_ascii(&[0x1f, b'a', 0x7f, 0x80, b'b']), "ab");
}

#[test]
fn printable_ascii_empty() {
    assert_eq!(printable_ascii(&[]), "");
}
