use std::fmt;
use std::fmt::Display;
use std::str::FromStr;

use leptos::wasm_bindgen::JsValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const INVALID_OPTION_MESSAGE: &str = "Invalid scroll option";
const TIMER_MESSAGE: &str = "Could not schedule timer";

#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollsyError {
    InvalidOption {
        option: String,
        value: String,
    },
    Timer(String),
}

impl ScrollsyError {
    pub fn invalid_option(option: impl ToString, value: impl ToString) -> Self {
        Self::InvalidOption {
            option: option.to_string(),
            value: value.to_string(),
        }
    }

    pub fn error_detail(&self) -> String {
        match self {
            ScrollsyError::InvalidOption { option, value } => format!("{INVALID_OPTION_MESSAGE} '{option}': {value}"),
            ScrollsyError::Timer(e) => format!("{TIMER_MESSAGE}: {e}"),
        }
    }
}

impl Display for ScrollsyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::to_string(self).unwrap_or_default())
    }
}

impl FromStr for ScrollsyError {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

impl From<JsValue> for ScrollsyError {
    fn from(value: JsValue) -> Self {
        ScrollsyError::Timer(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::errors::ScrollsyError;

    #[test]
    fn test_scrollsy_error_display_from_str() {
        let error = ScrollsyError::invalid_option("throttle", "abc");
        let error_string = error.to_string();
        assert_eq!(ScrollsyError::from_str(&error_string).ok(), Some(error));

        let timer_error = ScrollsyError::Timer(String::from("no window"));
        assert_eq!(ScrollsyError::from_str(&timer_error.to_string()).ok(), Some(timer_error));
    }

    #[test]
    fn test_scrollsy_error_detail() {
        assert_eq!(
            ScrollsyError::invalid_option("distance", "far").error_detail(),
            String::from("Invalid scroll option 'distance': far"),
        );
        assert_eq!(
            ScrollsyError::Timer(String::from("no window")).error_detail(),
            String::from("Could not schedule timer: no window"),
        );
    }
}
