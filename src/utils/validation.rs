use crate::utils::error::{Result, RiskError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(RiskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(RiskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(RiskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RiskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(RiskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Open interval (0, 1), used for split and noise probabilities.
pub fn validate_fraction(field_name: &str, value: f64) -> Result<()> {
    if !(value > 0.0 && value < 1.0) {
        return Err(RiskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be strictly between 0 and 1".to_string(),
        });
    }
    Ok(())
}

/// Half-open `[low, high)` sampling bounds must contain at least one value.
pub fn validate_bounds(field_name: &str, low: u32, high: u32) -> Result<()> {
    if low >= high {
        return Err(RiskError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("[{}, {})", low, high),
            reason: "Lower bound must be below the upper bound".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("forest.trees", 5, 1).is_ok());
        assert!(validate_positive_number("forest.trees", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("age", 45, 18, 100).is_ok());
        assert!(validate_range("age", 17, 18, 100).is_err());
        assert!(validate_range("age", 101, 18, 100).is_err());
    }

    #[test]
    fn test_validate_fraction() {
        assert!(validate_fraction("dataset.test_fraction", 0.2).is_ok());
        assert!(validate_fraction("dataset.test_fraction", 0.0).is_err());
        assert!(validate_fraction("dataset.test_fraction", 1.0).is_err());
        assert!(validate_fraction("dataset.test_fraction", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_bounds_and_path() {
        assert!(validate_bounds("ranges.age", 25, 80).is_ok());
        assert!(validate_bounds("ranges.age", 80, 80).is_err());
        assert!(validate_path("output.path", "").is_err());
        assert!(validate_path("output.path", "./model").is_ok());
    }
}
