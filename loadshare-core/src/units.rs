/// Minutes to hours, rounded to one decimal.
pub fn min_to_h(minutes: f64) -> f64 {
    (minutes / 60.0 * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_to_h() {
        assert_eq!(min_to_h(60.0), 1.0);
        assert_eq!(min_to_h(90.0), 1.5);
        assert_eq!(min_to_h(0.0), 0.0);
        assert_eq!(min_to_h(100.0), 1.7);
    }
}
