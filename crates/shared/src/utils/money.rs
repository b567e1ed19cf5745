use crate::utils::AppError;

/// Largest amount a single budget line, spending entry or asset may hold
/// (one quadrillion rupiah).
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Sums amounts in `i128` and fails instead of wrapping when the result
/// does not fit an `i64`.
pub fn checked_total<I>(amounts: I) -> Result<i64, AppError>
where
    I: IntoIterator<Item = i64>,
{
    let total: i128 = amounts.into_iter().map(i128::from).sum();

    i64::try_from(total)
        .map_err(|_| AppError::BadRequest("Amounts are too large to total".to_string()))
}

pub fn checked_add(left: i64, right: i64) -> Result<i64, AppError> {
    left.checked_add(right)
        .ok_or_else(|| AppError::BadRequest("Amounts are too large to total".to_string()))
}

pub fn checked_sub(left: i64, right: i64) -> Result<i64, AppError> {
    left.checked_sub(right)
        .ok_or_else(|| AppError::BadRequest("Amounts are too large to total".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_past_i64_are_rejected() {
        assert!(matches!(
            checked_total([i64::MAX, 1]),
            Err(AppError::BadRequest(_))
        ));
        assert!(checked_add(i64::MAX, 1).is_err());
        assert!(checked_sub(i64::MIN, 1).is_err());
    }

    #[test]
    fn intermediate_overflow_does_not_matter() {
        assert_eq!(checked_total([i64::MAX, 1, -1]).unwrap(), i64::MAX);
        assert_eq!(checked_total(Vec::new()).unwrap(), 0);
    }
}
