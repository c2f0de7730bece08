fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

pub(crate) fn u8_from_hex(value: &str) -> Result<u8, std::num::ParseIntError> {
    u8::from_str_radix(strip_hex_prefix(value), 16)
}

pub(crate) fn u16_from_hex(value: &str) -> Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(strip_hex_prefix(value), 16)
}
