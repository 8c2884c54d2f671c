/// Render bytes as space-separated two-digit lowercase hex, e.g. `00 0a ff`
pub fn hexstr(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" ")
}
