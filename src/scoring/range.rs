use anyhow::{bail, Result};

/// Expected complexity range for a difficulty label.
///
/// Formats: "<N", "<=N", ">N", ">=N", "N-M" (inclusive) or a bare "N".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeOp {
    LessThan(f64),
    LessEqual(f64),
    GreaterThan(f64),
    GreaterEqual(f64),
    Equal(f64),
    Between(f64, f64),
}

impl RangeOp {
    /// The range used for difficulty labels with no configured range.
    pub const FULL: RangeOp = RangeOp::Between(0.0, 1.0);

    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(val) = s.strip_prefix(">=") {
            Ok(RangeOp::GreaterEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix("<=") {
            Ok(RangeOp::LessEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('>') {
            Ok(RangeOp::GreaterThan(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('<') {
            Ok(RangeOp::LessThan(val.trim().parse()?))
        } else if let Some((low, high)) = s.split_once('-').filter(|_| !s.starts_with('-')) {
            let low: f64 = low.trim().parse()?;
            let high: f64 = high.trim().parse()?;
            if low > high {
                bail!("Range start {} is above range end {}", low, high);
            }
            Ok(RangeOp::Between(low, high))
        } else {
            Ok(RangeOp::Equal(s.parse()?))
        }
    }

    pub fn matches(&self, value: f64) -> bool {
        match self {
            RangeOp::LessThan(n) => value < *n,
            RangeOp::LessEqual(n) => value <= *n,
            RangeOp::GreaterThan(n) => value > *n,
            RangeOp::GreaterEqual(n) => value >= *n,
            RangeOp::Equal(n) => value == *n,
            RangeOp::Between(low, high) => value >= *low && value <= *high,
        }
    }

    /// Bounds named by the range, for checking they sit inside [0, 1].
    pub fn bounds(&self) -> Vec<f64> {
        match self {
            RangeOp::LessThan(n)
            | RangeOp::LessEqual(n)
            | RangeOp::GreaterThan(n)
            | RangeOp::GreaterEqual(n)
            | RangeOp::Equal(n) => vec![*n],
            RangeOp::Between(low, high) => vec![*low, *high],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range_between() {
        let range = RangeOp::parse("0.3-0.7").unwrap();
        assert!(!range.matches(0.29));
        assert!(range.matches(0.3));
        assert!(range.matches(0.5));
        assert!(range.matches(0.7));
        assert!(!range.matches(0.71));
    }

    #[test]
    fn test_parse_range_less_equal() {
        let range = RangeOp::parse("<=0.4").unwrap();
        assert!(range.matches(0.0));
        assert!(range.matches(0.4));
        assert!(!range.matches(0.41));
    }

    #[test]
    fn test_parse_range_less_than() {
        let range = RangeOp::parse("<0.4").unwrap();
        assert!(range.matches(0.39));
        assert!(!range.matches(0.4));
    }

    #[test]
    fn test_parse_range_greater() {
        let range = RangeOp::parse(">=0.6").unwrap();
        assert!(range.matches(0.6));
        assert!(!range.matches(0.59));

        let range = RangeOp::parse("> 0.6").unwrap();
        assert!(!range.matches(0.6));
        assert!(range.matches(0.61));
    }

    #[test]
    fn test_parse_range_equal() {
        let range = RangeOp::parse("0.5").unwrap();
        assert!(range.matches(0.5));
        assert!(!range.matches(0.51));
    }

    #[test]
    fn test_parse_range_invalid() {
        assert!(RangeOp::parse("easy").is_err());
        assert!(RangeOp::parse("0.7-0.3").is_err());
        assert!(RangeOp::parse("0.1-0.2-0.3").is_err());
    }

    #[test]
    fn test_full_range() {
        assert!(RangeOp::FULL.matches(0.0));
        assert!(RangeOp::FULL.matches(1.0));
        assert_eq!(RangeOp::FULL.bounds(), vec![0.0, 1.0]);
    }
}
