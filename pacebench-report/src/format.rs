//! Unit formatting helpers

/// Format nanoseconds with an adaptive unit.
pub fn format_duration(nanos: f64) -> String {
    if !nanos.is_finite() {
        return "-".to_string();
    }
    let abs = nanos.abs();
    if abs < 1_000.0 {
        format!("{nanos:.1} ns")
    } else if abs < 1_000_000.0 {
        format!("{:.2} µs", nanos / 1_000.0)
    } else if abs < 1_000_000_000.0 {
        format!("{:.2} ms", nanos / 1_000_000.0)
    } else {
        format!("{:.2} s", nanos / 1_000_000_000.0)
    }
}

/// Format a byte count with binary units.
pub fn format_bytes(bytes: f64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    if bytes < KIB {
        format!("{bytes:.0} B")
    } else if bytes < MIB {
        format!("{:.1} KiB", bytes / KIB)
    } else if bytes < GIB {
        format!("{:.1} MiB", bytes / MIB)
    } else {
        format!("{:.2} GiB", bytes / GIB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_units() {
        assert_eq!(format_duration(12.34), "12.3 ns");
        assert_eq!(format_duration(1_500.0), "1.50 µs");
        assert_eq!(format_duration(2_500_000.0), "2.50 ms");
        assert_eq!(format_duration(3_000_000_000.0), "3.00 s");
        assert_eq!(format_duration(f64::NAN), "-");
    }

    #[test]
    fn test_format_bytes_units() {
        assert_eq!(format_bytes(0.0), "0 B");
        assert_eq!(format_bytes(1024.0), "1.0 KiB");
        assert_eq!(format_bytes(10_485_760.0), "10.0 MiB");
    }
}
