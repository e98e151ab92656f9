//! Locale- and timezone-correct display strings.
//!
//! Output here is for people only. Grouping and comparison use [`DayKey`],
//! which is a different type, so a display string can never be compared
//! where a key is expected.
//!
//! Patterns follow Unicode CLDR (UTS #35) and are baked for a small set of
//! locales; unknown locales fall back to their language, then to `en-US`.
//!
//! [`DayKey`]: crate::models::DayKey

use std::fmt;

use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;
use tracing::debug;

/// Formatting data for one locale.
#[derive(Debug)]
pub struct LocaleData {
    /// Numeric date, as rendered by a bare `toLocaleDateString`.
    pub numeric_date: &'static str,
    /// Medium date style.
    pub medium_date: &'static str,
    /// Short time style.
    pub short_time: &'static str,
    /// Joins date (`{1}`) and time (`{0}`).
    pub datetime_pattern: &'static str,
    pub months_abbr: [&'static str; 12],
    /// 0 = Sunday
    pub days_abbr: [&'static str; 7],
    pub am: &'static str,
    pub pm: &'static str,
}

static EN_US: LocaleData = LocaleData {
    numeric_date: "M/d/y",
    medium_date: "MMM d, y",
    short_time: "h:mm a",
    datetime_pattern: "{1}, {0}",
    months_abbr: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    days_abbr: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
    am: "AM",
    pm: "PM",
};

static EN_GB: LocaleData = LocaleData {
    numeric_date: "dd/MM/y",
    medium_date: "d MMM y",
    short_time: "HH:mm",
    datetime_pattern: "{1}, {0}",
    months_abbr: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sept", "Oct", "Nov", "Dec",
    ],
    days_abbr: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
    am: "am",
    pm: "pm",
};

static DE: LocaleData = LocaleData {
    numeric_date: "d.M.y",
    medium_date: "dd.MM.y",
    short_time: "HH:mm",
    datetime_pattern: "{1}, {0}",
    months_abbr: [
        "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sept.", "Okt.", "Nov.",
        "Dez.",
    ],
    days_abbr: ["So.", "Mo.", "Di.", "Mi.", "Do.", "Fr.", "Sa."],
    am: "AM",
    pm: "PM",
};

static PL: LocaleData = LocaleData {
    numeric_date: "d.MM.y",
    medium_date: "d MMM y",
    short_time: "HH:mm",
    datetime_pattern: "{1}, {0}",
    months_abbr: [
        "sty", "lut", "mar", "kwi", "maj", "cze", "lip", "sie", "wrz", "paź", "lis", "gru",
    ],
    days_abbr: ["niedz.", "pon.", "wt.", "śr.", "czw.", "pt.", "sob."],
    am: "AM",
    pm: "PM",
};

static FR: LocaleData = LocaleData {
    numeric_date: "dd/MM/y",
    medium_date: "d MMM y",
    short_time: "HH:mm",
    datetime_pattern: "{1}, {0}",
    months_abbr: [
        "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
        "déc.",
    ],
    days_abbr: ["dim.", "lun.", "mar.", "mer.", "jeu.", "ven.", "sam."],
    am: "AM",
    pm: "PM",
};

static ES: LocaleData = LocaleData {
    numeric_date: "d/M/y",
    medium_date: "d MMM y",
    short_time: "H:mm",
    datetime_pattern: "{1}, {0}",
    months_abbr: [
        "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
    ],
    days_abbr: ["dom", "lun", "mar", "mié", "jue", "vie", "sáb"],
    am: "a. m.",
    pm: "p. m.",
};

static JA: LocaleData = LocaleData {
    numeric_date: "y/M/d",
    medium_date: "y/MM/dd",
    short_time: "H:mm",
    datetime_pattern: "{1} {0}",
    months_abbr: [
        "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月",
    ],
    days_abbr: ["日", "月", "火", "水", "木", "金", "土"],
    am: "午前",
    pm: "午後",
};

fn lookup(tag: &str) -> Option<&'static LocaleData> {
    match tag.to_lowercase().as_str() {
        "en-us" | "en" => Some(&EN_US),
        "en-gb" | "en-au" | "en-nz" | "en-ie" => Some(&EN_GB),
        "de" | "de-de" | "de-at" | "de-ch" => Some(&DE),
        "pl" | "pl-pl" => Some(&PL),
        "fr" | "fr-fr" | "fr-be" | "fr-ch" => Some(&FR),
        "es" | "es-es" | "es-mx" | "es-ar" => Some(&ES),
        "ja" | "ja-jp" => Some(&JA),
        _ => None,
    }
}

/// A BCP-47 locale identifier together with the data used to render it.
#[derive(Clone)]
pub struct LocaleId {
    tag: String,
    data: &'static LocaleData,
    fallback: bool,
}

impl LocaleId {
    /// Normalize `tag` (`pl_pl` -> `pl-PL`) and resolve its formatting data.
    ///
    /// Never fails: unknown tags keep their name but format as their
    /// language, or as `en-US` if the language is unknown too.
    pub fn parse(tag: &str) -> Self {
        let tag = normalize_tag(tag);
        let language = tag.split('-').next().unwrap_or_default();

        match lookup(&tag).or_else(|| lookup(language)) {
            Some(data) => LocaleId {
                tag,
                data,
                fallback: false,
            },
            None => {
                debug!(%tag, "no locale data, formatting as en-US");
                LocaleId {
                    tag,
                    data: &EN_US,
                    fallback: true,
                }
            }
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Whether formatting fell back to `en-US` data.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn data(&self) -> &'static LocaleData {
        self.data
    }
}

impl Default for LocaleId {
    fn default() -> Self {
        LocaleId::parse("en-US")
    }
}

impl PartialEq for LocaleId {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
    }
}

impl Eq for LocaleId {}

impl fmt::Debug for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleId")
            .field("tag", &self.tag)
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

fn normalize_tag(tag: &str) -> String {
    let mut parts = tag.trim().split(['-', '_']).filter(|p| !p.is_empty());
    let mut out = parts.next().unwrap_or("en").to_lowercase();

    for part in parts {
        out.push('-');
        let mut chars = part.chars();
        match part.chars().count() {
            2 => out.push_str(&part.to_uppercase()),
            4 => {
                // Script subtag: title case
                out.extend(chars.next().into_iter().flat_map(char::to_uppercase));
                out.push_str(&chars.as_str().to_lowercase());
            }
            _ => out.push_str(&part.to_lowercase()),
        }
    }
    out
}

/// Render the local date of `instant` in `tz` as a numeric date.
///
/// # Examples
///
/// ```
/// use dayclock_core::locale::{format_date, LocaleId};
/// use dayclock_core::tz::parse_tz;
/// use chrono::{TimeZone, Utc};
///
/// let instant = Utc.with_ymd_and_hms(2024, 1, 15, 23, 30, 0).unwrap();
/// let tz = parse_tz("Europe/Warsaw").unwrap();
///
/// assert_eq!(format_date(instant, tz, &LocaleId::parse("en-US")), "1/16/2024");
/// assert_eq!(format_date(instant, tz, &LocaleId::parse("en-GB")), "16/01/2024");
/// ```
pub fn format_date(instant: DateTime<Utc>, tz: Tz, locale: &LocaleId) -> String {
    format_with_pattern(&instant.with_timezone(&tz), locale.data.numeric_date, locale.data)
}

/// Render `instant` in `tz` as a medium date with a short time.
pub fn format_date_time(instant: DateTime<Utc>, tz: Tz, locale: &LocaleId) -> String {
    let local = instant.with_timezone(&tz);
    let date = format_with_pattern(&local, locale.data.medium_date, locale.data);
    let time = format_with_pattern(&local, locale.data.short_time, locale.data);

    locale
        .data
        .datetime_pattern
        .replace("{1}", &date)
        .replace("{0}", &time)
}

/// Format a local datetime using a CLDR pattern.
fn format_with_pattern(dt: &DateTime<Tz>, pattern: &str, data: &LocaleData) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars().peekable();

    while let Some(ch) = chars.next() {
        let mut count = 1;
        if ch.is_ascii_alphabetic() {
            while chars.peek() == Some(&ch) {
                chars.next();
                count += 1;
            }
        }

        match ch {
            '\'' => {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    out.push('\'');
                } else {
                    for c in chars.by_ref() {
                        if c == '\'' {
                            break;
                        }
                        out.push(c);
                    }
                }
            }
            'y' if count == 2 => push_padded(&mut out, dt.year().rem_euclid(100) as u32, 2),
            'y' => out.push_str(&dt.year().to_string()),
            'M' if count >= 3 => out.push_str(data.months_abbr[dt.month0() as usize]),
            'M' => push_padded(&mut out, dt.month(), count),
            'd' => push_padded(&mut out, dt.day(), count),
            'E' => out.push_str(data.days_abbr[dt.weekday().num_days_from_sunday() as usize]),
            'H' => push_padded(&mut out, dt.hour(), count),
            'h' => push_padded(&mut out, dt.hour12().1, count),
            'm' => push_padded(&mut out, dt.minute(), count),
            's' => push_padded(&mut out, dt.second(), count),
            'a' => out.push_str(if dt.hour12().0 { data.pm } else { data.am }),
            other if other.is_ascii_alphabetic() => {
                // Unsupported field, emitted as-is
                for _ in 0..count {
                    out.push(other);
                }
            }
            other => out.push(other),
        }
    }

    out
}

fn push_padded(out: &mut String, value: u32, width: usize) {
    out.push_str(&format!("{:0width$}", value, width = width));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tz::parse_tz;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 13, 30, 0).single().unwrap()
    }

    #[test]
    fn numeric_dates() {
        let tz = parse_tz("UTC").unwrap();
        assert_eq!(format_date(instant(), tz, &LocaleId::parse("en-US")), "1/15/2024");
        assert_eq!(format_date(instant(), tz, &LocaleId::parse("en-GB")), "15/01/2024");
        assert_eq!(format_date(instant(), tz, &LocaleId::parse("de-DE")), "15.1.2024");
        assert_eq!(format_date(instant(), tz, &LocaleId::parse("pl-PL")), "15.01.2024");
        assert_eq!(format_date(instant(), tz, &LocaleId::parse("ja-JP")), "2024/1/15");
    }

    #[test]
    fn date_times() {
        let tz = parse_tz("Europe/Warsaw").unwrap();
        assert_eq!(
            format_date_time(instant(), tz, &LocaleId::parse("en-US")),
            "Jan 15, 2024, 2:30 PM"
        );
        assert_eq!(
            format_date_time(instant(), tz, &LocaleId::parse("en-GB")),
            "15 Jan 2024, 14:30"
        );
        assert_eq!(
            format_date_time(instant(), tz, &LocaleId::parse("pl")),
            "15 sty 2024, 14:30"
        );
    }

    #[test]
    fn midnight_in_twelve_hour_clock() {
        let tz = parse_tz("UTC").unwrap();
        let midnight = Utc.with_ymd_and_hms(2024, 1, 15, 0, 5, 0).unwrap();
        assert_eq!(
            format_date_time(midnight, tz, &LocaleId::parse("en-US")),
            "Jan 15, 2024, 12:05 AM"
        );
    }

    #[test]
    fn formatting_follows_the_timezone_day() {
        let late = Utc.with_ymd_and_hms(2024, 1, 15, 23, 30, 0).unwrap();
        let locale = LocaleId::parse("en-GB");
        assert_eq!(format_date(late, parse_tz("Europe/London").unwrap(), &locale), "15/01/2024");
        assert_eq!(
            format_date(late, parse_tz("Pacific/Kiritimati").unwrap(), &locale),
            "16/01/2024"
        );
    }

    #[test]
    fn tags_are_normalized() {
        assert_eq!(LocaleId::parse("pl_pl").tag(), "pl-PL");
        assert_eq!(LocaleId::parse("zh-hant-tw").tag(), "zh-Hant-TW");
        assert_eq!(LocaleId::parse(" EN-gb ").tag(), "en-GB");
    }

    #[test]
    fn non_ascii_subtags_are_cased_by_character() {
        let odd = LocaleId::parse("en-ñab");
        assert_eq!(odd.tag(), "en-ñab");
        assert!(!odd.is_fallback());

        assert_eq!(LocaleId::parse("sr-łATN").tag(), "sr-Łatn");
        assert_eq!(LocaleId::parse("xx-ÉÉ").tag(), "xx-ÉÉ");
    }

    #[test]
    fn language_and_default_fallbacks() {
        let swiss = LocaleId::parse("de-LI");
        assert!(!swiss.is_fallback());
        assert_eq!(swiss.data().numeric_date, DE.numeric_date);

        let klingon = LocaleId::parse("tlh");
        assert!(klingon.is_fallback());
        assert_eq!(klingon.tag(), "tlh");
        assert_eq!(format_date(instant(), Tz::UTC, &klingon), "1/15/2024");
    }

    #[test]
    fn quoted_literals_and_weekdays() {
        let local = instant().with_timezone(&Tz::UTC);
        assert_eq!(
            format_with_pattern(&local, "EEE, 'day' d 'of' MMM, ''yy", &EN_US),
            "Mon, day 15 of Jan, '24"
        );
    }
}
