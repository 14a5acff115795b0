//! Configuration page: field values and template substitution.

use core::fmt::{self, Write};

use heapless::{String, Vec};

use crate::config::{GaugeConfig, keys};

/// Page template. `{{name}}` is replaced by the value of form field `name`.
pub const PAGE_TEMPLATE: &str = include_str!("page.html");

/// Rendered value of one form field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    /// `checked` or empty for checkboxes, the formatted number otherwise.
    pub value: String<16>,
}

fn checkbox(
    name: &'static str,
    on: bool,
) -> FormField {
    let mut value = String::new();
    if on {
        value.push_str("checked").ok();
    }
    FormField { name, value }
}

fn number(
    name: &'static str,
    value: f32,
    precision: usize,
) -> FormField {
    let mut text = String::new();
    write!(text, "{value:.precision$}").ok();
    FormField { name, value: text }
}

fn integer(
    name: &'static str,
    value: i32,
) -> FormField {
    let mut text = String::new();
    write!(text, "{value}").ok();
    FormField { name, value: text }
}

/// Every form field of `config`, in page order.
pub fn form_fields(config: &GaugeConfig) -> Vec<FormField, { keys::COUNT }> {
    let fields = [
        checkbox(keys::SIM_DATA, config.use_simulated_data),
        checkbox(keys::SIM_TEMP, config.use_simulated_temp),
        checkbox(keys::SIM_HEADLIGHT, config.use_simulated_headlight),
        number(keys::SENSOR_MIN_V, config.sensor_min_voltage, 2),
        number(keys::SENSOR_MAX_V, config.sensor_max_voltage, 2),
        number(keys::SENSOR_MAX_PSI, config.sensor_max_psi, 1),
        number(keys::DIVIDER_R1, config.voltage_divider_r1, 0),
        number(keys::DIVIDER_R2, config.voltage_divider_r2, 0),
        number(keys::OIL_SAFE, config.oil_pressure_min_safe, 1),
        number(keys::OIL_WARN, config.oil_pressure_min_warn, 1),
        number(keys::TEMP_WARN, config.temp_warning_high, 1),
        integer(keys::BL_DAY, config.bl_brightness_day),
        integer(keys::BL_NIGHT, config.bl_brightness_night),
        integer(keys::BL_FADE, config.bl_fade_duration),
        number(keys::EMA_ALPHA, config.ema_alpha, 2),
    ];
    Vec::from_iter(fields)
}

/// Write `template` to `out` with every `{{name}}` replaced from `config`.
///
/// Unknown names are written through untouched.
pub fn write_page<W: Write>(
    out: &mut W,
    template: &str,
    config: &GaugeConfig,
) -> fmt::Result {
    let fields = form_fields(config);
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.write_str(&rest[..open])?;
        let after = &rest[open + 2..];

        let Some(close) = after.find("}}") else {
            out.write_str(&rest[open..])?;
            return Ok(());
        };

        let name = &after[..close];
        match fields.iter().find(|f| f.name == name) {
            Some(field) => out.write_str(&field.value)?,
            None => {
                out.write_str("{{")?;
                out.write_str(name)?;
                out.write_str("}}")?;
            }
        }
        rest = &after[close + 2..];
    }

    out.write_str(rest)
}

#[cfg(test)]
mod tests {
    use std::string::String as StdString;

    use super::*;

    #[test]
    fn test_default_field_values() {
        let fields = form_fields(&GaugeConfig::DEFAULT);
        let value = |name: &str| fields.iter().find(|f| f.name == name).unwrap().value.as_str();

        assert_eq!(fields.len(), keys::ALL.len());
        assert_eq!(value(keys::SIM_DATA), "checked");
        assert_eq!(value(keys::SENSOR_MIN_V), "0.50");
        assert_eq!(value(keys::SENSOR_MAX_PSI), "100.0");
        assert_eq!(value(keys::DIVIDER_R1), "3900");
        assert_eq!(value(keys::BL_NIGHT), "80");
        assert_eq!(value(keys::EMA_ALPHA), "0.15");
    }

    #[test]
    fn test_unchecked_box_is_empty() {
        let mut config = GaugeConfig::DEFAULT;
        config.use_simulated_temp = false;
        let fields = form_fields(&config);
        assert!(fields.iter().find(|f| f.name == keys::SIM_TEMP).unwrap().value.is_empty());
    }

    #[test]
    fn test_template_substitution() {
        let mut out = StdString::new();
        write_page(&mut out, "a {{blDay}} b {{nope}} c {{simHL}}", &GaugeConfig::DEFAULT).unwrap();
        assert_eq!(out, "a 255 b {{nope}} c checked");
    }

    #[test]
    fn test_unterminated_placeholder_kept() {
        let mut out = StdString::new();
        write_page(&mut out, "x {{blDay", &GaugeConfig::DEFAULT).unwrap();
        assert_eq!(out, "x {{blDay");
    }

    #[test]
    fn test_page_template_has_every_field() {
        for key in keys::ALL {
            let token = std::format!("{{{{{key}}}}}");
            assert!(PAGE_TEMPLATE.contains(&token), "missing {key}");
        }
        let mut out = StdString::new();
        write_page(&mut out, PAGE_TEMPLATE, &GaugeConfig::DEFAULT).unwrap();
        assert!(!out.contains("{{"));
    }
}
