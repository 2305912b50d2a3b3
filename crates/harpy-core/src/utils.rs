/// Render bytes as space-separated lowercase hex pairs.
///
/// # Examples
/// ```
/// use harpy_core::utils::hex_bytes;
/// assert_eq!(hex_bytes(b"hi"), "68 69");
/// assert_eq!(hex_bytes(&[]), "");
/// ```
pub fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keep only printable ASCII (0x20..=0x7e), dropping everything else.
///
/// Opaque tags such as a file magic are shown this way next to their hex form.
///
/// # Examples
/// ```
/// use harpy_core::utils::printable_ascii;
/// assert_eq!(printable_ascii(b"harpy"), "harpy");
/// assert_eq!(printable_ascii(&[0x00, b'o', b'k', 0xff]), "ok");
/// ```
pub fn printable_ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .filter(|b| (0x20..=0x7e).contains(*b))
        .map(|&b| b as char)
        .collect()
}
