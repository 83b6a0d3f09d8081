//! Signal parameters
//!
//! Immutable parameters of one collect operation, parsed once from the MGCP
//! parameter map of the requested signal. Symbols and defaults follow the
//! audio package (RFC 2897): timers arrive in units of 100 ms, the reprompt
//! defaults to the initial prompt, and the no-digits reprompt defaults to
//! the reprompt.

use crate::error::SignalError;
use regex::Regex;
use std::collections::BTreeMap;
use std::time::Duration;

/// Parameter symbols accepted by the PlayCollect signal. `sp` (speed) and
/// `vl` (volume) are accepted for compatibility but have no effect here.
const SUPPORTED_SYMBOLS: &[&str] = &[
    "ip", "rp", "nd", "fa", "sa", "ni", "sp", "vl", "cb", "mn", "mx", "dp", "fdt", "idt", "edt",
    "rsk", "rik", "rtk", "psk", "stk", "sik", "eik", "iek", "na",
];

/// Immutable signal parameters for one collect operation.
#[derive(Debug, Clone)]
pub struct CollectParams {
    pub initial_prompt: Vec<String>,
    pub reprompt: Vec<String>,
    pub no_digits_reprompt: Vec<String>,
    pub failure_announcement: Vec<String>,
    pub success_announcement: Vec<String>,
    pub non_interruptible_audio: bool,
    pub clear_digit_buffer: bool,
    pub minimum_digits: usize,
    pub maximum_digits: usize,
    /// Translated digit map, anchored for full-match evaluation. Takes
    /// precedence over minimum/maximum digit counts when present.
    pub digit_pattern: Option<Regex>,
    pub first_digit_timer: Duration,
    pub inter_digit_timer: Duration,
    pub extra_digit_timer: Option<Duration>,
    pub restart_key: Option<char>,
    pub reinput_key: Option<char>,
    pub return_key: Option<char>,
    pub position_key: Option<char>,
    pub stop_key: Option<char>,
    pub start_input_keys: String,
    /// `None` when the request disabled the end-input key ("null")
    pub end_input_key: Option<char>,
    pub include_end_input_key: bool,
    pub max_attempts: u32,
}

impl CollectParams {
    /// Parse the MGCP parameter map for a PlayCollect request.
    ///
    /// Unknown symbols and malformed values are configuration errors; the
    /// operation never starts.
    pub fn parse(parameters: &BTreeMap<String, String>) -> Result<Self, SignalError> {
        for symbol in parameters.keys() {
            if !SUPPORTED_SYMBOLS.contains(&symbol.as_str()) {
                return Err(SignalError::UnsupportedParameter(symbol.clone()));
            }
        }

        let initial_prompt = segments(parameters, "ip");
        let reprompt = match segments(parameters, "rp") {
            segs if segs.is_empty() => initial_prompt.clone(),
            segs => segs,
        };
        let no_digits_reprompt = match segments(parameters, "nd") {
            segs if segs.is_empty() => reprompt.clone(),
            segs => segs,
        };

        Ok(CollectParams {
            initial_prompt,
            reprompt,
            no_digits_reprompt,
            failure_announcement: segments(parameters, "fa"),
            success_announcement: segments(parameters, "sa"),
            non_interruptible_audio: flag(parameters, "ni"),
            clear_digit_buffer: flag(parameters, "cb"),
            minimum_digits: number(parameters, "mn", 1)?,
            maximum_digits: number(parameters, "mx", 1)?,
            digit_pattern: digit_pattern(parameters)?,
            first_digit_timer: timer(parameters, "fdt", Some(50))?
                .unwrap_or(Duration::from_millis(5000)),
            inter_digit_timer: timer(parameters, "idt", Some(30))?
                .unwrap_or(Duration::from_millis(3000)),
            extra_digit_timer: timer(parameters, "edt", None)?,
            restart_key: key(parameters, "rsk"),
            reinput_key: key(parameters, "rik"),
            return_key: key(parameters, "rtk"),
            position_key: key(parameters, "psk"),
            stop_key: key(parameters, "stk"),
            start_input_keys: parameters
                .get("sik")
                .cloned()
                .unwrap_or_else(|| "0123456789".to_string()),
            end_input_key: end_input_key(parameters),
            include_end_input_key: flag(parameters, "iek"),
            max_attempts: number(parameters, "na", 1)?,
        })
    }

    pub fn has_digit_pattern(&self) -> bool {
        self.digit_pattern.is_some()
    }
}

fn segments(parameters: &BTreeMap<String, String>, symbol: &str) -> Vec<String> {
    match parameters.get(symbol) {
        Some(value) if !value.is_empty() => value.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

fn flag(parameters: &BTreeMap<String, String>, symbol: &str) -> bool {
    parameters
        .get(symbol)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn number<T: std::str::FromStr>(
    parameters: &BTreeMap<String, String>,
    symbol: &str,
    default: T,
) -> Result<T, SignalError> {
    match parameters.get(symbol) {
        Some(value) => value.parse().map_err(|_| SignalError::InvalidParameter {
            name: symbol.to_string(),
            value: value.clone(),
        }),
        None => Ok(default),
    }
}

/// Timers are specified in units of 100 ms.
fn timer(
    parameters: &BTreeMap<String, String>,
    symbol: &str,
    default: Option<u64>,
) -> Result<Option<Duration>, SignalError> {
    let units = match parameters.get(symbol) {
        Some(value) => Some(value.parse::<u64>().map_err(|_| {
            SignalError::InvalidParameter {
                name: symbol.to_string(),
                value: value.clone(),
            }
        })?),
        None => default,
    };
    Ok(units.map(|u| Duration::from_millis(u * 100)))
}

fn key(parameters: &BTreeMap<String, String>, symbol: &str) -> Option<char> {
    parameters.get(symbol).and_then(|v| v.chars().next())
}

/// End-input key defaults to '#'; the literal string "null" disables it.
fn end_input_key(parameters: &BTreeMap<String, String>) -> Option<char> {
    match parameters.get("eik").map(String::as_str) {
        None | Some("") => Some('#'),
        Some("null") => None,
        Some(value) => value.chars().next(),
    }
}

/// Translate a MEGACO digit map into an anchored regex: `.` means "zero or
/// more of the previous element" (regex `*`) and `x` matches any digit.
fn digit_pattern(parameters: &BTreeMap<String, String>) -> Result<Option<Regex>, SignalError> {
    let raw = match parameters.get("dp") {
        Some(value) if !value.is_empty() => value,
        _ => return Ok(None),
    };
    let translated = raw.replace('.', "*").replace('x', r"\d");
    let anchored = format!("^(?:{translated})$");
    let regex = Regex::new(&anchored).map_err(|_| SignalError::InvalidParameter {
        name: "dp".to_string(),
        value: raw.clone(),
    })?;
    Ok(Some(regex))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let p = CollectParams::parse(&BTreeMap::new()).unwrap();
        assert!(p.initial_prompt.is_empty());
        assert!(p.reprompt.is_empty());
        assert!(p.no_digits_reprompt.is_empty());
        assert!(!p.non_interruptible_audio);
        assert_eq!(p.minimum_digits, 1);
        assert_eq!(p.maximum_digits, 1);
        assert!(p.digit_pattern.is_none());
        assert_eq!(p.first_digit_timer, Duration::from_millis(5000));
        assert_eq!(p.inter_digit_timer, Duration::from_millis(3000));
        assert!(p.extra_digit_timer.is_none());
        assert_eq!(p.start_input_keys, "0123456789");
        assert_eq!(p.end_input_key, Some('#'));
        assert!(!p.include_end_input_key);
        assert_eq!(p.max_attempts, 1);
    }

    #[test]
    fn test_prompt_default_chain() {
        // Reprompt falls back to the initial prompt, and the no-digits
        // reprompt falls back to the reprompt.
        let p = CollectParams::parse(&params(&[("ip", "hello.wav,enter.wav")])).unwrap();
        assert_eq!(p.initial_prompt, ["hello.wav", "enter.wav"]);
        assert_eq!(p.reprompt, p.initial_prompt);
        assert_eq!(p.no_digits_reprompt, p.reprompt);

        let p = CollectParams::parse(&params(&[("ip", "a.wav"), ("rp", "again.wav")])).unwrap();
        assert_eq!(p.reprompt, ["again.wav"]);
        assert_eq!(p.no_digits_reprompt, ["again.wav"]);
    }

    #[test]
    fn test_timer_units_are_100ms() {
        let p = CollectParams::parse(&params(&[("fdt", "20"), ("idt", "10"), ("edt", "5")]))
            .unwrap();
        assert_eq!(p.first_digit_timer, Duration::from_millis(2000));
        assert_eq!(p.inter_digit_timer, Duration::from_millis(1000));
        assert_eq!(p.extra_digit_timer, Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_end_input_key_null_disables() {
        let p = CollectParams::parse(&params(&[("eik", "null")])).unwrap();
        assert!(p.end_input_key.is_none());

        let p = CollectParams::parse(&params(&[("eik", "*")])).unwrap();
        assert_eq!(p.end_input_key, Some('*'));
    }

    #[test]
    fn test_digit_pattern_translation() {
        let p = CollectParams::parse(&params(&[("dp", "1x")])).unwrap();
        let pattern = p.digit_pattern.unwrap();
        assert!(pattern.is_match("12"));
        assert!(pattern.is_match("19"));
        assert!(!pattern.is_match("21"));
        // Full match only
        assert!(!pattern.is_match("123"));
    }

    #[test]
    fn test_digit_pattern_repetition() {
        let p = CollectParams::parse(&params(&[("dp", "1x.")])).unwrap();
        let pattern = p.digit_pattern.unwrap();
        assert!(pattern.is_match("1"));
        assert!(pattern.is_match("1234"));
        assert!(!pattern.is_match("21"));
    }

    #[test]
    fn test_malformed_number_rejected() {
        let err = CollectParams::parse(&params(&[("mn", "abc")])).unwrap_err();
        assert!(matches!(err, SignalError::InvalidParameter { name, .. } if name == "mn"));
    }

    #[test]
    fn test_out_of_range_number_rejected() {
        // Must not wrap to 1 through truncation
        let err = CollectParams::parse(&params(&[("na", "4294967297")])).unwrap_err();
        assert!(matches!(err, SignalError::InvalidParameter { name, .. } if name == "na"));

        let err = CollectParams::parse(&params(&[("mn", "-1")])).unwrap_err();
        assert!(matches!(err, SignalError::InvalidParameter { name, .. } if name == "mn"));
    }

    #[test]
    fn test_unsupported_symbol_rejected() {
        let err = CollectParams::parse(&params(&[("zz", "1")])).unwrap_err();
        assert!(matches!(err, SignalError::UnsupportedParameter(sym) if sym == "zz"));
    }

    #[test]
    fn test_speed_and_volume_accepted() {
        assert!(CollectParams::parse(&params(&[("sp", "10"), ("vl", "5")])).is_ok());
    }

    #[test]
    fn test_command_keys() {
        let p = CollectParams::parse(&params(&[("rsk", "*"), ("rik", "A"), ("na", "3")])).unwrap();
        assert_eq!(p.restart_key, Some('*'));
        assert_eq!(p.reinput_key, Some('A'));
        assert!(p.return_key.is_none());
        assert_eq!(p.max_attempts, 3);
    }
}
