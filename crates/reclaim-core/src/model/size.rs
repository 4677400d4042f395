/// Human-readable size and count formatting.
///
/// Sizes stay `u64` bytes everywhere inside the engine; floating point
/// appears only at this display boundary. Binary units (1024) with the
/// short labels users expect from a disk tool.

/// Unit table: label and display precision per 1024-step.
const UNITS: [(&str, usize); 4] = [("KB", 1), ("MB", 1), ("GB", 2), ("TB", 2)];

/// Format a byte count with an appropriate unit, e.g. `"1.5 KB"`.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    for (label, precision) in UNITS {
        if value < 1024.0 || label == "TB" {
            return format!("{value:.precision$} {label}");
        }
        value /= 1024.0;
    }
    unreachable!("unit table covers all magnitudes")
}

/// Format a count with thousand separators, e.g. `"1,234,567"`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let lead = digits.len() % 3;
    if lead > 0 {
        out.push_str(&digits[..lead]);
    }
    let mut idx = lead;
    while idx < digits.len() {
        if idx > 0 {
            out.push(',');
        }
        out.push_str(&digits[idx..idx + 3]);
        idx += 3;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_size_bytes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn format_size_kb_mb() {
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_048_576), "1.0 MB");
    }

    #[test]
    fn format_size_gb_tb_use_two_decimals() {
        assert_eq!(format_size(1_073_741_824), "1.00 GB");
        assert_eq!(format_size(1_099_511_627_776), "1.00 TB");
    }

    #[test]
    fn format_count_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(12_345), "12,345");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
