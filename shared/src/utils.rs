// Number formatting shared by the engine's narrative and any outer caller.

/// Formats a price with a fixed number of decimals, e.g. `1.23450`.
pub fn format_price(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}", value, decimals = decimals)
}

/// Brazilian notation: comma as decimal separator, e.g. `1,23450`.
pub fn format_price_pt(value: f64, decimals: usize) -> String {
    format_price(value, decimals).replace('.', ",")
}

/// Rounds to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(64250.456, 1), "64250.5");
        assert_eq!(format_price(1.0845, 5), "1.08450");
        assert_eq!(format_price(151.2, 3), "151.200");
    }

    #[test]
    fn test_format_price_pt() {
        assert_eq!(format_price_pt(123.45, 2), "123,45");
        assert_eq!(format_price_pt(1.0845, 4), "1,0845");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.234567, 4), 1.2346);
        assert_eq!(round_to(151.2349, 3), 151.235);
    }
}
