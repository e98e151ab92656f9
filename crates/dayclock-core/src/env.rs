//! Resolving the caller's timezone and locale, and reading "now".
//!
//! Nothing else in the crate touches the process environment: the resolved
//! [`Environment`] values are passed explicitly into every operation, and the
//! current instant enters only through a [`Clock`].

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::{DayclockError, Result};
use crate::locale::LocaleId;
use crate::tz::parse_tz;

/// Variables consulted for the timezone, in order of precedence.
pub const TIMEZONE_VARS: [&str; 2] = ["DAYCLOCK_TZ", "TZ"];

/// Variables consulted for the locale, in order of precedence.
pub const LOCALE_VARS: [&str; 4] = ["DAYCLOCK_LOCALE", "LC_ALL", "LC_TIME", "LANG"];

/// Locale used when the environment names none.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// A [`Clock`] backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A [`Clock`] that always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        FixedClock(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The caller's timezone and display locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub timezone: Tz,
    pub locale: LocaleId,
}

impl Environment {
    /// Resolve from the real process environment and platform timezone.
    pub fn detect() -> Result<Self> {
        Self::from_lookup(process_var, system_timezone)
    }

    /// Resolve from an arbitrary variable lookup and platform timezone probe.
    pub fn from_lookup<L, S>(lookup: L, system: S) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
        S: FnOnce() -> Option<String>,
    {
        let timezone = resolve_timezone(&lookup, system)?;
        let locale = resolve_locale(&lookup);
        Ok(Environment { timezone, locale })
    }
}

/// The platform's configured IANA timezone, if it can be determined.
pub fn system_timezone() -> Option<String> {
    iana_time_zone::get_timezone().ok()
}

/// Resolve the caller's timezone.
///
/// Checks [`TIMEZONE_VARS`] in order, then the platform probe. A variable that
/// is set but names an unknown zone is an error rather than being skipped.
///
/// # Errors
///
/// Returns [`DayclockError::InvalidTimezone`] if nothing names a valid zone.
/// There is no implicit UTC fallback; see [`resolve_timezone_or_utc`].
pub fn resolve_timezone<L, S>(lookup: L, system: S) -> Result<Tz>
where
    L: Fn(&str) -> Option<String>,
    S: FnOnce() -> Option<String>,
{
    for var in TIMEZONE_VARS {
        if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
            // POSIX allows a leading ':' before a zoneinfo path.
            let name = value.trim().trim_start_matches(':');
            debug!(var, name, "timezone from environment");
            return parse_tz(name);
        }
    }

    match system() {
        Some(name) => {
            debug!(%name, "timezone from platform");
            parse_tz(&name)
        }
        None => Err(DayclockError::InvalidTimezone(
            "no timezone configured in the environment or platform".to_string(),
        )),
    }
}

/// [`resolve_timezone`] with an explicit opt-in fallback to UTC.
pub fn resolve_timezone_or_utc<L, S>(lookup: L, system: S) -> Tz
where
    L: Fn(&str) -> Option<String>,
    S: FnOnce() -> Option<String>,
{
    resolve_timezone(lookup, system).unwrap_or_else(|err| {
        debug!(%err, "falling back to UTC");
        Tz::UTC
    })
}

/// Resolve the caller's display locale from [`LOCALE_VARS`].
///
/// The first variable that is set and non-empty wins, so `LC_ALL=C` overrides
/// `LANG`. POSIX values such as `pl_PL.UTF-8` become `pl-PL`; `C`, `POSIX` and
/// unset resolve to [`DEFAULT_LOCALE`].
pub fn resolve_locale<L>(lookup: L) -> LocaleId
where
    L: Fn(&str) -> Option<String>,
{
    let tag = LOCALE_VARS
        .iter()
        .find_map(|var| lookup(var).filter(|v| !v.trim().is_empty()))
        .and_then(|value| posix_to_bcp47(&value))
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

    LocaleId::parse(&tag)
}

/// [`resolve_locale`] against the real process environment.
///
/// Unlike [`Environment::detect`] this never fails, so callers that only
/// render text do not need a timezone to be configured.
pub fn detect_locale() -> LocaleId {
    resolve_locale(process_var)
}

fn process_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn posix_to_bcp47(value: &str) -> Option<String> {
    // Strip codeset and modifier: "de_DE.UTF-8@euro" -> "de_DE"
    let base = value
        .trim()
        .split(['.', '@'])
        .next()
        .unwrap_or_default();

    match base {
        "" | "C" | "POSIX" => None,
        _ => Some(base.replace('_', "-")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn no_system() -> Option<String> {
        None
    }

    #[test]
    fn explicit_variable_wins_over_tz_and_platform() {
        let tz = resolve_timezone(
            lookup(&[("DAYCLOCK_TZ", "Europe/Warsaw"), ("TZ", "Asia/Tokyo")]),
            || Some("America/New_York".to_string()),
        )
        .unwrap();
        assert_eq!(tz, Tz::Europe__Warsaw);
    }

    #[test]
    fn tz_variable_with_leading_colon() {
        let tz = resolve_timezone(lookup(&[("TZ", ":Asia/Tokyo")]), no_system).unwrap();
        assert_eq!(tz, Tz::Asia__Tokyo);
    }

    #[test]
    fn platform_zone_used_when_variables_absent() {
        let tz = resolve_timezone(lookup(&[]), || Some("America/New_York".to_string())).unwrap();
        assert_eq!(tz, Tz::America__New_York);
    }

    #[test]
    fn invalid_variable_is_an_error_not_a_fallback() {
        let result = resolve_timezone(lookup(&[("TZ", "Mars/Olympus")]), || {
            Some("Europe/Warsaw".to_string())
        });
        assert_eq!(
            result,
            Err(DayclockError::InvalidTimezone("Mars/Olympus".to_string()))
        );
    }

    #[test]
    fn nothing_configured_is_an_error() {
        assert!(matches!(
            resolve_timezone(lookup(&[]), no_system),
            Err(DayclockError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn utc_fallback_is_opt_in() {
        assert_eq!(resolve_timezone_or_utc(lookup(&[]), no_system), Tz::UTC);
    }

    #[test]
    fn locale_from_posix_lang() {
        let locale = resolve_locale(lookup(&[("LANG", "pl_PL.UTF-8")]));
        assert_eq!(locale.tag(), "pl-PL");
    }

    #[test]
    fn locale_precedence_and_c_locale() {
        let locale = resolve_locale(lookup(&[("LC_TIME", "de_DE@euro"), ("LANG", "en_GB.UTF-8")]));
        assert_eq!(locale.tag(), "de-DE");

        let locale = resolve_locale(lookup(&[("LANG", "POSIX")]));
        assert_eq!(locale.tag(), DEFAULT_LOCALE);
    }

    #[test]
    fn c_locale_overrides_lower_precedence_vars() {
        let locale = resolve_locale(lookup(&[("LC_ALL", "C"), ("LANG", "de_DE.UTF-8")]));
        assert_eq!(locale.tag(), DEFAULT_LOCALE);

        let locale = resolve_locale(lookup(&[("LC_TIME", "C.UTF-8"), ("LANG", "pl_PL.UTF-8")]));
        assert_eq!(locale.tag(), DEFAULT_LOCALE);
    }

    #[test]
    fn empty_locale_vars_fall_through() {
        let locale = resolve_locale(lookup(&[
            ("DAYCLOCK_LOCALE", ""),
            ("LC_ALL", "  "),
            ("LANG", "pl_PL.UTF-8"),
        ]));
        assert_eq!(locale.tag(), "pl-PL");
    }

    #[test]
    fn environment_from_lookup() {
        let env = Environment::from_lookup(
            lookup(&[("DAYCLOCK_TZ", "UTC"), ("DAYCLOCK_LOCALE", "en-GB")]),
            no_system,
        )
        .unwrap();
        assert_eq!(env.timezone, Tz::UTC);
        assert_eq!(env.locale.tag(), "en-GB");
    }

    #[test]
    fn fixed_clock_returns_its_instant() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(FixedClock::new(instant).now(), instant);
    }
}
