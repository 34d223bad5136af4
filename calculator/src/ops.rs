use thiserror::Error;

/// Domain failures of the arithmetic functions.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CalcError {
    #[error("Cannot divide by zero")]
    DivideByZero,
    #[error("Time must be positive and greater than zero")]
    NonPositiveTime,
}

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn subtract(a: f64, b: f64) -> f64 {
    a - b
}

pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

/// Returns `a / b`, or [`CalcError::DivideByZero`] when `b` is zero.
pub fn divide(a: f64, b: f64) -> Result<f64, CalcError> {
    if b == 0.0 {
        return Err(CalcError::DivideByZero);
    }
    Ok(a / b)
}

/// Velocity as distance over time.
///
/// Zero and negative times are rejected with [`CalcError::NonPositiveTime`].
pub fn calculate_velocity(distance: f64, time: f64) -> Result<f64, CalcError> {
    if time <= 0.0 {
        return Err(CalcError::NonPositiveTime);
    }
    Ok(distance / time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_add_subtract_and_multiply() {
        assert_eq!(add(2.0, 3.0), 5.0);
        assert_eq!(subtract(2.0, 3.0), -1.0);
        assert_eq!(multiply(2.5, 4.0), 10.0);
    }

    #[test]
    fn can_divide_non_zero() {
        assert_eq!(divide(9.0, 3.0), Ok(3.0));
        assert_eq!(divide(0.0, 4.0), Ok(0.0));
    }

    #[test]
    fn cannot_divide_by_zero() {
        assert_eq!(divide(4.0, 0.0), Err(CalcError::DivideByZero));
        assert_eq!(divide(4.0, -0.0), Err(CalcError::DivideByZero));
        assert_eq!(
            CalcError::DivideByZero.to_string(),
            "Cannot divide by zero"
        );
    }

    #[test]
    fn can_calculate_velocity() {
        assert_eq!(calculate_velocity(100.0, 10.0), Ok(10.0));
        assert_eq!(calculate_velocity(-50.0, 5.0), Ok(-10.0));
    }

    #[test]
    fn cannot_calculate_velocity_with_non_positive_time() {
        assert_eq!(
            calculate_velocity(10.0, 0.0),
            Err(CalcError::NonPositiveTime)
        );
        assert_eq!(
            calculate_velocity(10.0, -1.0),
            Err(CalcError::NonPositiveTime)
        );
    }
}
