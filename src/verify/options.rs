use std::time::Duration;

use jsonwebtoken::Algorithm;

/// Constraints applied while verifying a token.
///
/// Empty / `None` fields mean "no constraint", except expiration and `nbf`,
/// which are enforced unless explicitly ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyOptions {
    // Allowed signing algorithms. Empty = every algorithm of the key's family.
    pub algorithms: Vec<Algorithm>,
    // Accepted `iss` values.
    pub issuer: Vec<String>,
    // Accepted `aud` values.
    pub audience: Vec<String>,
    pub subject: Option<String>,
    // Allowed clock skew, seconds.
    pub clock_tolerance: u64,
    // Maximum accepted age of the token, measured from `iat`.
    pub max_age: Option<Duration>,
    pub ignore_expiration: bool,
    pub ignore_not_before: bool,
}

impl VerifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn algorithms(mut self, algorithms: impl IntoIterator<Item = Algorithm>) -> Self {
        self.algorithms = algorithms.into_iter().collect();
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer.push(issuer.into());
        self
    }

    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience.push(audience.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn clock_tolerance(mut self, seconds: u64) -> Self {
        self.clock_tolerance = seconds;
        self
    }

    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn ignore_expiration(mut self, ignore: bool) -> Self {
        self.ignore_expiration = ignore;
        self
    }

    pub fn ignore_not_before(mut self, ignore: bool) -> Self {
        self.ignore_not_before = ignore;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid duration: {0:?}")]
pub struct InvalidDuration(pub String);

/// Parse a human duration such as `"1h"`, `"30m"`, `"90s"`, `"2d"`, `"1w"`,
/// `"500ms"`. A bare number is seconds.
pub fn parse_duration(input: &str) -> Result<Duration, InvalidDuration> {
    let invalid = || InvalidDuration(input.to_string());

    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);
    let amount: u64 = digits.parse().map_err(|_| invalid())?;

    let seconds_per_unit = match unit.trim().to_ascii_lowercase().as_str() {
        "ms" => return Ok(Duration::from_millis(amount)),
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600,
        "d" | "day" | "days" => 86_400,
        "w" | "week" | "weeks" => 604_800,
        _ => return Err(invalid()),
    };

    amount
        .checked_mul(seconds_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(invalid)
}
