const KILOBYTE: u64 = 1_000;
const MEGABYTE: u64 = 1_000_000;
const GIGABYTE: u64 = 1_000_000_000;

/// Human-readable size string using decimal units.
pub fn format_size(bytes: u64) -> String {
    if bytes < KILOBYTE {
        format!("{}B", bytes)
    } else if bytes < MEGABYTE {
        format!("{:.2}kB", bytes as f64 / KILOBYTE as f64)
    } else if bytes < GIGABYTE {
        format!("{:.2}MB", bytes as f64 / MEGABYTE as f64)
    } else {
        format!("{:.2}GB", bytes as f64 / GIGABYTE as f64)
    }
}

#[cfg(test)]
mod tests {
    use crate::format::format_size;

    #[test]
    fn bytes_below_a_kilobyte_have_no_fraction() {
        assert_eq!(format_size(0), "0B");
        assert_eq!(format_size(999), "999B");
    }

    #[test]
    fn larger_sizes_use_two_decimal_places() {
        assert_eq!(format_size(1_000), "1.00kB");
        assert_eq!(format_size(1_500), "1.50kB");
        assert_eq!(format_size(2_500_000), "2.50MB");
        assert_eq!(format_size(3_200_000_000), "3.20GB");
    }
}
