//! `application/x-www-form-urlencoded` decoding into a [`ConfigUpdate`].

use core::str::FromStr;

use heapless::{String, Vec};

use crate::config::{ConfigUpdate, keys};

/// Longest decoded value considered; longer values count as unparseable.
pub const MAX_VALUE_LEN: usize = 32;

/// Percent-decode `raw` into `out`, mapping `+` to a space.
///
/// A `%` not followed by two hex digits is kept literally. Returns `None` if
/// the result does not fit or is not UTF-8.
pub fn url_decode<const N: usize>(raw: &str) -> Option<String<N>> {
    let bytes = raw.as_bytes();
    let mut decoded: Vec<u8, N> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let byte = match bytes[i] {
            b'+' => b' ',
            b'%' => match bytes.get(i + 1..i + 3).and_then(|h| hex_pair(h[0], h[1])) {
                Some(value) => {
                    i += 2;
                    value
                }
                None => b'%',
            },
            other => other,
        };
        decoded.push(byte).ok()?;
        i += 1;
    }

    let text = core::str::from_utf8(&decoded).ok()?;
    let mut out = String::new();
    out.push_str(text).ok()?;
    Some(out)
}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn hex_pair(
    high: u8,
    low: u8,
) -> Option<u8> {
    Some(hex_digit(high)? << 4 | hex_digit(low)?)
}

/// Decoded `(name, value)` pairs of a form body. Pairs that do not decode
/// are skipped.
pub fn form_pairs(body: &str) -> impl Iterator<Item = (String<{ keys::MAX_KEY_LEN }>, String<MAX_VALUE_LEN>)> + '_ {
    body.split('&').filter(|pair| !pair.is_empty()).filter_map(|pair| {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        Some((url_decode(name)?, url_decode(value)?))
    })
}

fn parse_number<T: FromStr>(value: &str) -> Option<T> { value.trim().parse().ok() }

/// Build a save request from a form body.
///
/// Checkboxes are true when present. Numbers that are missing, too long or
/// unparseable stay `None`. Unknown fields are ignored.
pub fn parse_form(body: &str) -> ConfigUpdate {
    let mut update = ConfigUpdate::default();

    for (name, value) in form_pairs(body) {
        let v = value.as_str();
        match name.as_str() {
            keys::SIM_DATA => update.use_simulated_data = true,
            keys::SIM_TEMP => update.use_simulated_temp = true,
            keys::SIM_HEADLIGHT => update.use_simulated_headlight = true,
            keys::SENSOR_MIN_V => update.sensor_min_voltage = parse_number(v),
            keys::SENSOR_MAX_V => update.sensor_max_voltage = parse_number(v),
            keys::SENSOR_MAX_PSI => update.sensor_max_psi = parse_number(v),
            keys::DIVIDER_R1 => update.voltage_divider_r1 = parse_number(v),
            keys::DIVIDER_R2 => update.voltage_divider_r2 = parse_number(v),
            keys::OIL_SAFE => update.oil_pressure_min_safe = parse_number(v),
            keys::OIL_WARN => update.oil_pressure_min_warn = parse_number(v),
            keys::TEMP_WARN => update.temp_warning_high = parse_number(v),
            keys::BL_DAY => update.bl_brightness_day = parse_number(v),
            keys::BL_NIGHT => update.bl_brightness_night = parse_number(v),
            keys::BL_FADE => update.bl_fade_duration = parse_number(v),
            keys::EMA_ALPHA => update.ema_alpha = parse_number(v),
            _ => {}
        }
    }

    update
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plus_and_percent() {
        assert_eq!(url_decode::<16>("a+b%20c").unwrap().as_str(), "a b c");
        assert_eq!(url_decode::<16>("%2e5").unwrap().as_str(), ".5");
    }

    #[test]
    fn test_decode_keeps_malformed_percent() {
        assert_eq!(url_decode::<16>("100%").unwrap().as_str(), "100%");
        assert_eq!(url_decode::<16>("%zz").unwrap().as_str(), "%zz");
    }

    #[test]
    fn test_decode_rejects_overflow_and_bad_utf8() {
        assert!(url_decode::<4>("12345").is_none());
        assert!(url_decode::<4>("%FF").is_none());
    }

    #[test]
    fn test_decode_multibyte() {
        assert_eq!(url_decode::<8>("%CE%A9").unwrap().as_str(), "\u{3a9}");
    }

    #[test]
    fn test_parse_full_form() {
        let body = "simData=on&sensMinV=0.6&sensMaxV=4.4&sensMaxP=150&vdR1=3900&vdR2=10000\
                    &oilSafe=7.5&oilWarn=12&tempWarn=105&blDay=200&blNight=60&blFade=800&emaAlpha=0.2";
        let update = parse_form(body);

        assert!(update.use_simulated_data);
        assert!(!update.use_simulated_temp);
        assert!(!update.use_simulated_headlight);
        assert_eq!(update.sensor_min_voltage, Some(0.6));
        assert_eq!(update.sensor_max_psi, Some(150.0));
        assert_eq!(update.oil_pressure_min_safe, Some(7.5));
        assert_eq!(update.bl_fade_duration, Some(800));
        assert_eq!(update.ema_alpha, Some(0.2));
    }

    #[test]
    fn test_unparseable_numbers_are_none() {
        let update = parse_form("sensMaxP=abc&blDay=12.5&blNight=&oilWarn=+11+");
        assert_eq!(update.sensor_max_psi, None);
        assert_eq!(update.bl_brightness_day, None);
        assert_eq!(update.bl_brightness_night, None);
        assert_eq!(update.oil_pressure_min_warn, Some(11.0));
    }

    #[test]
    fn test_unknown_and_empty_pairs_ignored() {
        let update = parse_form("&&foo=bar&simHL=on&");
        assert!(update.use_simulated_headlight);
        assert_eq!(update, ConfigUpdate { use_simulated_headlight: true, ..ConfigUpdate::default() });
    }

    #[test]
    fn test_negative_value_is_parsed() {
        let update = parse_form("vdR2=-5");
        assert_eq!(update.voltage_divider_r2, Some(-5.0));
    }
}
