//! Conversion between [`RestaurantDto`] and the domain types.
//!
//! Both directions are pure; nothing here touches the repository.

use rust_decimal::Decimal;

use crate::errors::ServiceError;

use super::domain::{Restaurant, RestaurantCandidate};
use super::dto::RestaurantDto;

/// Lossless projection of a restaurant; the rating keeps its scale (`4.50`).
pub fn to_dto(entity: &Restaurant) -> RestaurantDto {
    RestaurantDto {
        id: entity.id,
        name: Some(entity.name.clone()),
        city: Some(entity.city.clone()),
        estimated_cost: Some(entity.estimated_cost),
        average_rating: Some(entity.average_rating.to_string()),
        votes: Some(entity.votes),
    }
}

/// Parse the external payload. Only `averageRating` is checked here.
pub fn from_dto(dto: RestaurantDto) -> Result<RestaurantCandidate, ServiceError> {
    let average_rating = dto.average_rating.as_deref().map(parse_rating).transpose()?;
    Ok(RestaurantCandidate {
        id: dto.id,
        name: dto.name,
        city: dto.city,
        estimated_cost: dto.estimated_cost,
        average_rating,
        votes: dto.votes,
    })
}

fn invalid_rating() -> ServiceError {
    ServiceError::InvalidArgument("Parameter 'averageRating' should be Decimal number format.".into())
}

fn all_digits(part: &str) -> bool {
    part.bytes().all(|b| b.is_ascii_digit())
}

fn strip_sign(text: &str) -> &str {
    text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text)
}

/// Canonical mantissa text and exponent of
/// `[sign] digits [. digits] [(e|E) [sign] digits]`, with at least one
/// mantissa digit. No separators, no whitespace.
fn split_decimal_literal(raw: &str) -> Option<(String, Option<&str>)> {
    let (mantissa, exponent) = match raw.find(|c: char| c == 'e' || c == 'E') {
        Some(i) => (&raw[..i], Some(&raw[i + 1..])),
        None => (raw, None),
    };
    let unsigned = strip_sign(mantissa);
    let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if (int.is_empty() && frac.is_empty()) || !all_digits(int) || !all_digits(frac) {
        return None;
    }
    if let Some(exp) = exponent {
        let digits = strip_sign(exp);
        if digits.is_empty() || !all_digits(digits) {
            return None;
        }
    }
    let sign = if mantissa.starts_with('-') { "-" } else { "" };
    let int = if int.is_empty() { "0" } else { int };
    let canonical = if frac.is_empty() { format!("{sign}{int}") } else { format!("{sign}{int}.{frac}") };
    Some((canonical, exponent))
}

/// Accepts plain (`4.25`) and scientific (`4.25e0`) notation. The value must
/// be representable exactly; nothing is rounded.
pub fn parse_rating(raw: &str) -> Result<Decimal, ServiceError> {
    let (mantissa, exponent) = split_decimal_literal(raw).ok_or_else(invalid_rating)?;
    let base = Decimal::from_str_exact(&mantissa).map_err(|_| invalid_rating())?;
    let Some(exp) = exponent else { return Ok(base) };

    let exp: i64 = exp.parse().map_err(|_| invalid_rating())?;
    let scale = i64::from(base.scale()).checked_sub(exp).ok_or_else(invalid_rating)?;
    if scale >= 0 {
        let scale = u32::try_from(scale).map_err(|_| invalid_rating())?;
        return Decimal::try_from_i128_with_scale(base.mantissa(), scale).map_err(|_| invalid_rating());
    }
    let factor = u32::try_from(-scale)
        .ok()
        .and_then(|k| 10i128.checked_pow(k))
        .ok_or_else(invalid_rating)?;
    let mantissa = base.mantissa().checked_mul(factor).ok_or_else(invalid_rating)?;
    Decimal::try_from_i128_with_scale(mantissa, 0).map_err(|_| invalid_rating())
}
