use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter};
use web_sys::Element;

use scrollsy_utils::constants::{ATTRIBUTE_PREFIX, DEFAULT_DISTANCE_PX, DEFAULT_IDLE_MS, DEFAULT_THROTTLE_MS};
use scrollsy_utils::errors::ScrollsyError;

/// Options recognized on a scroll container, named after their attribute suffix
#[derive(AsRefStr, Clone, Copy, Debug, EnumIter, Eq, Hash, PartialEq)]
#[strum(serialize_all = "kebab-case")]
pub enum ScrollOption {
    Throttle,
    Idle,
    Distance,
    Flex,
}

impl ScrollOption {
    pub fn attribute_name(&self) -> String {
        format!("{ATTRIBUTE_PREFIX}-{}", self.as_ref())
    }
}

/// Raw option values as an attribute bag delivers them, before parsing
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollOptions {
    pub throttle: Option<String>,
    pub idle: Option<String>,
    pub distance: Option<String>,
    pub flex: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollTriggerConfig {
    pub throttle_ms: i32,
    pub idle_ms: i32,
    pub distance_px: i32,
    pub flex_enabled: bool,
    pub viewport_height: i32,
}

impl ScrollOptions {
    pub fn from_element(element: &Element) -> Self {
        Self {
            throttle: element.get_attribute(&ScrollOption::Throttle.attribute_name()),
            idle: element.get_attribute(&ScrollOption::Idle.attribute_name()),
            distance: element.get_attribute(&ScrollOption::Distance.attribute_name()),
            flex: element.get_attribute(&ScrollOption::Flex.attribute_name()),
        }
    }

    /// Fills in missing options from `other`, keeping the values already set on `self`
    pub fn or(self, other: ScrollOptions) -> Self {
        Self {
            throttle: self.throttle.or(other.throttle),
            idle: self.idle.or(other.idle),
            distance: self.distance.or(other.distance),
            flex: self.flex.or(other.flex),
        }
    }

    pub fn is_flex_enabled(&self) -> bool {
        self.flex.as_deref().is_some_and(|flex| !flex.is_empty())
    }

    /// Parses the options once, falling back to defaults for missing or invalid values.
    /// `viewport_height` is only used when flex is enabled.
    pub fn resolve(&self, viewport_height: i32) -> ScrollTriggerConfig {
        ScrollTriggerConfig {
            throttle_ms: parse_option_or_default(ScrollOption::Throttle, self.throttle.as_deref(), DEFAULT_THROTTLE_MS),
            idle_ms: parse_option_or_default(ScrollOption::Idle, self.idle.as_deref(), DEFAULT_IDLE_MS),
            distance_px: parse_option_or_default(ScrollOption::Distance, self.distance.as_deref(), DEFAULT_DISTANCE_PX),
            flex_enabled: self.is_flex_enabled(),
            viewport_height,
        }
    }
}

impl Default for ScrollTriggerConfig {
    fn default() -> Self {
        Self {
            throttle_ms: DEFAULT_THROTTLE_MS,
            idle_ms: DEFAULT_IDLE_MS,
            distance_px: DEFAULT_DISTANCE_PX,
            flex_enabled: false,
            viewport_height: 0,
        }
    }
}

impl ScrollTriggerConfig {
    /// Distance to the bottom under which the handler may fire.
    /// A zero viewport height leaves the distance untouched even in flex mode.
    pub fn effective_threshold(&self) -> i32 {
        if self.flex_enabled && self.viewport_height != 0 {
            self.viewport_height.saturating_sub(self.distance_px)
        } else {
            self.distance_px
        }
    }
}

/// Parses the leading base-10 integer of `value`: leading whitespace and one sign are accepted,
/// trailing garbage is ignored. Returns `None` when no digit is found or the number overflows.
pub fn parse_int(value: &str) -> Option<i32> {
    let trimmed = value.trim_start();
    let (is_negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digit_count = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digit_count == 0 {
        return None;
    }
    let magnitude = unsigned[..digit_count].parse::<i64>().ok()?;
    i32::try_from(if is_negative { -magnitude } else { magnitude }).ok()
}

fn parse_option_or_default(option: ScrollOption, value: Option<&str>, default: i32) -> i32 {
    match value.filter(|value| !value.is_empty()) {
        None => default,
        Some(value) => parse_int(value).unwrap_or_else(|| {
            log::warn!("{}, using default {default}", ScrollsyError::invalid_option(option.attribute_name(), value).error_detail());
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use crate::config::{parse_int, ScrollOption, ScrollOptions, ScrollTriggerConfig};

    #[test]
    fn test_scroll_option_attribute_name() {
        let attribute_names: Vec<String> = ScrollOption::iter().map(|option| option.attribute_name()).collect();
        assert_eq!(
            attribute_names,
            vec![
                "infinite-scrollsy-throttle",
                "infinite-scrollsy-idle",
                "infinite-scrollsy-distance",
                "infinite-scrollsy-flex",
            ]
        );
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("200"), Some(200));
        assert_eq!(parse_int("  42"), Some(42));
        assert_eq!(parse_int("200px"), Some(200));
        assert_eq!(parse_int("-15"), Some(-15));
        assert_eq!(parse_int("+7"), Some(7));
        assert_eq!(parse_int("0"), Some(0));
        assert_eq!(parse_int("12.9"), Some(12));
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int("px200"), None);
        assert_eq!(parse_int("99999999999"), None);
    }

    #[test]
    fn test_resolve_defaults() {
        assert_eq!(ScrollOptions::default().resolve(900), ScrollTriggerConfig {
            viewport_height: 900,
            ..ScrollTriggerConfig::default()
        });

        let empty_options = ScrollOptions {
            throttle: Some(String::new()),
            idle: Some(String::new()),
            distance: Some(String::new()),
            flex: Some(String::new()),
        };
        let config = empty_options.resolve(900);
        assert_eq!(config.throttle_ms, 100);
        assert_eq!(config.idle_ms, 100);
        assert_eq!(config.distance_px, 500);
        assert!(!config.flex_enabled);
    }

    #[test]
    fn test_resolve_parsed_and_invalid_values() {
        let options = ScrollOptions {
            throttle: Some(String::from("200")),
            idle: Some(String::from("not a number")),
            distance: Some(String::from("1000px")),
            flex: None,
        };
        let config = options.resolve(0);
        assert_eq!(config.throttle_ms, 200);
        assert_eq!(config.idle_ms, 100);
        assert_eq!(config.distance_px, 1000);
        assert_eq!(config.effective_threshold(), 1000);
    }

    #[test]
    fn test_effective_threshold_flex() {
        let options = ScrollOptions {
            distance: Some(String::from("300")),
            flex: Some(String::from("false")),
            ..Default::default()
        };
        let config = options.resolve(1000);
        assert!(config.flex_enabled);
        assert_eq!(config.effective_threshold(), 700);

        let config = options.resolve(0);
        assert_eq!(config.effective_threshold(), 300);

        let extreme_options = ScrollOptions {
            distance: Some(String::from("-2147483648")),
            flex: Some(String::from("1")),
            ..Default::default()
        };
        let config = extreme_options.resolve(1000);
        assert_eq!(config.distance_px, i32::MIN);
        assert_eq!(config.effective_threshold(), i32::MAX);
        let config = extreme_options.resolve(-1000);
        assert_eq!(config.effective_threshold(), i32::MAX - 999);
    }

    #[test]
    fn test_scroll_options_or() {
        let options = ScrollOptions {
            throttle: Some(String::from("50")),
            ..Default::default()
        }.or(ScrollOptions {
            throttle: Some(String::from("300")),
            distance: Some(String::from("250")),
            ..Default::default()
        });
        assert_eq!(options.throttle.as_deref(), Some("50"));
        assert_eq!(options.distance.as_deref(), Some("250"));
        assert_eq!(options.idle, None);
    }

    #[test]
    fn test_scroll_options_deserialize() {
        let options: ScrollOptions = serde_json::from_str(r#"{"throttle": "250", "flex": "true"}"#).expect("Should deserialize options.");
        assert_eq!(options.throttle.as_deref(), Some("250"));
        assert_eq!(options.idle, None);
        assert!(options.is_flex_enabled());
    }
}
