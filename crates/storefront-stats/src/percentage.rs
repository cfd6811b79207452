/// Month-over-month change as a whole-number percentage.
///
/// When last month is zero the result is `this_month * 100`, so growth from
/// nothing still reads as a large positive number instead of dividing by zero.
pub fn calc_percentage(this_month: f64, last_month: f64) -> f64 {
    if last_month == 0.0 {
        return this_month * 100.0;
    }
    ((this_month - last_month) / last_month * 100.0).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth() {
        assert_eq!(calc_percentage(200.0, 100.0), 100.0);
        assert_eq!(calc_percentage(150.0, 100.0), 50.0);
    }

    #[test]
    fn test_decline() {
        assert_eq!(calc_percentage(50.0, 100.0), -50.0);
        assert_eq!(calc_percentage(0.0, 40.0), -100.0);
    }

    #[test]
    fn test_zero_last_month() {
        assert_eq!(calc_percentage(50.0, 0.0), 5000.0);
        assert_eq!(calc_percentage(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_rounds_to_whole_number() {
        // 1/3 growth
        assert_eq!(calc_percentage(4.0, 3.0), 33.0);
        assert_eq!(calc_percentage(5.0, 3.0), 67.0);
    }
}
