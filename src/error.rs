use std::error;
use std::fmt;
use std::panic::Location;

use log::warn;

use crate::buffer::{self, FormatPolicy};
use crate::code::{Category, ErrorCode};
use crate::debug::{debug_log, Verbosity};

/// Error raised by the dynamic-graph manager and its entities.
///
/// The code and message are fixed once the value is built. Handling sites
/// inspect `error_code()` to decide what to do.
#[derive(Debug, Clone)]
pub struct Exception {
    code: ErrorCode,
    message: String,
    truncated: bool,
    location: &'static Location<'static>,
}

impl Exception {
    /// Builds an exception whose message is exactly `message`.
    #[track_caller]
    pub fn new(code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        let code = code.into();
        let message = message.into();
        debug_log(
            Verbosity::DETAIL,
            format_args!("Created with message <{}>.", message),
        );
        Self {
            code,
            message,
            truncated: false,
            location: Location::caller(),
        }
    }

    /// Builds an exception whose message is `message` followed by the
    /// rendering of `args`, cut to fit the default 256 byte buffer.
    ///
    /// For the `Feature` category the rendering replaces `message`.
    #[track_caller]
    pub fn with_format(
        code: impl Into<ErrorCode>,
        message: impl Into<String>,
        args: fmt::Arguments,
    ) -> Self {
        Self::with_policy(code, message, args, FormatPolicy::default())
    }

    #[track_caller]
    pub fn with_policy(
        code: impl Into<ErrorCode>,
        message: impl Into<String>,
        args: fmt::Arguments,
        policy: FormatPolicy,
    ) -> Self {
        let code = code.into();
        let mut message = message.into();
        let rendered = buffer::render(args, policy);

        debug_log(
            Verbosity::DETAIL,
            format_args!(
                "Created with message <{}> and buffer <{}>.",
                message, rendered.text
            ),
        );
        if rendered.truncated {
            warn!(
                target: crate::debug::LOG_TARGET,
                "{} message truncated to {} bytes",
                code,
                rendered.text.len()
            );
        }

        // Feature exceptions keep only the formatted text.
        if code.category() == Category::Feature {
            message = rendered.text;
        } else {
            message.push_str(&rendered.text);
        }
        debug_log(
            Verbosity::THROW,
            format_args!("Throw exception {}: <{}>.", code, message),
        );

        Self {
            code,
            message,
            truncated: rendered.truncated,
            location: Location::caller(),
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        self.code
    }

    pub fn code(&self) -> i32 {
        self.code.code()
    }

    pub fn category(&self) -> Category {
        self.code.category()
    }

    pub fn name(&self) -> &'static str {
        self.category().name()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the formatted part of the message was cut to fit its buffer.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}Error [#{}]:  {}", self.name(), self.code(), self.message)?;
        if f.alternate() {
            write!(f, " (at {}:{})", self.location.file(), self.location.line())?;
        }
        Ok(())
    }
}

impl error::Error for Exception {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        // Exceptions are raised at the failure site and wrap nothing.
        None
    }
}

#[cfg(test)]
use crate::code::{FactoryError, FeatureError, SignalError};
#[cfg(test)]
use crate::debug::{capture, LOG_TARGET};
#[cfg(test)]
use log::Level;

#[test]
fn test_message_identity() {
    let e = Exception::new(FactoryError::UnreferedObject, "Unknown entity <robot>.");
    assert_eq!(e.message(), "Unknown entity <robot>.");
    assert_eq!(e.code(), 401);
    assert_eq!(e.name(), "Factory");
    assert!(!e.truncated());
}

#[test]
fn test_format_only() {
    let e = Exception::with_format(FactoryError::UnreferedObject, "", format_args!("{}", 42));
    assert_eq!(e.message(), "42");
}

#[test]
fn test_base_plus_format() {
    let e = Exception::with_format(
        FactoryError::SignalConflict,
        "bad value: ",
        format_args!("{} in <{}>", 42, "sig"),
    );
    assert_eq!(e.message(), "bad value: 42 in <sig>");
    assert_eq!(e.error_code(), ErrorCode::Factory(FactoryError::SignalConflict));
}

#[test]
fn test_long_format_is_truncated() {
    let long = "v".repeat(300);
    let e = Exception::with_format(SignalError::BadCast, "base:", format_args!("{}", long));
    assert_eq!(e.message(), format!("base:{}", "v".repeat(255)));
    assert!(e.truncated());

    // the base message itself is never cut
    let base = "m".repeat(400);
    let e = Exception::with_format(SignalError::BadCast, base.clone(), format_args!("ok"));
    assert_eq!(e.message(), format!("{}ok", base));
    assert!(!e.truncated());
}

#[test]
fn test_feature_format_replaces_base() {
    let e = Exception::with_format(FeatureError::BadInit, "base: ", format_args!("{}", 7));
    assert_eq!(e.message(), "7");
    assert_eq!(e.code(), 301);

    // the plain constructor still keeps the message
    let e = Exception::new(FeatureError::BadInit, "base: ");
    assert_eq!(e.message(), "base: ");
}

#[test]
fn test_plain_construction_logs_once() {
    capture::start();
    let _e = Exception::new(FactoryError::UnreferedObject, "no <robot>");

    let entries = capture::take();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, Level::Trace);
    assert_eq!(entries[0].target, LOG_TARGET);
    assert_eq!(entries[0].text, "Created with message <no <robot>>.");
}

#[test]
fn test_formatted_construction_logs_twice() {
    capture::start();
    let _e = Exception::with_format(
        FactoryError::ObjectConflict,
        "Object conflict: ",
        format_args!("<{}>", "robot"),
    );

    let entries = capture::take();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|entry| entry.target == LOG_TARGET));
    assert_eq!(entries[0].level, Level::Trace);
    assert_eq!(
        entries[0].text,
        "Created with message <Object conflict: > and buffer <<robot>>."
    );
    assert_eq!(entries[1].level, Level::Debug);
    assert_eq!(
        entries[1].text,
        "Throw exception Factory[#407]: <Object conflict: <robot>>."
    );
}

#[test]
fn test_truncation_logs_warning() {
    capture::start();
    let long = "w".repeat(300);
    let e = Exception::with_format(FactoryError::ReadFile, "", format_args!("{}", long));
    assert!(e.truncated());

    let entries = capture::take();
    let levels: Vec<Level> = entries.iter().map(|entry| entry.level).collect();
    assert_eq!(levels, vec![Level::Trace, Level::Warn, Level::Debug]);
    assert!(entries.iter().all(|entry| entry.target == LOG_TARGET));
    assert_eq!(entries[1].text, "Factory[#409] message truncated to 255 bytes");
}

#[test]
fn test_unbounded_policy() {
    let long = "v".repeat(300);
    let e = Exception::with_policy(
        FeatureError::BadInit,
        "",
        format_args!("{}", long),
        FormatPolicy::Unbounded,
    );
    assert_eq!(e.message().len(), 300);
    assert!(!e.truncated());
}

#[test]
fn test_display() {
    let e = Exception::new(FeatureError::UncompatibleSize, "sizes 3 and 4");
    assert_eq!(e.to_string(), "FeatureError [#302]:  sizes 3 and 4");

    let alt = format!("{:#}", e);
    assert!(alt.starts_with("FeatureError [#302]:  sizes 3 and 4 (at "));
    assert!(alt.contains("error.rs:"));
}

#[test]
fn test_location_is_call_site() {
    let line = line!() + 1;
    let e = Exception::new(ErrorCode::Abstract, "here");
    assert_eq!(e.location().line(), line);
    assert!(e.location().file().ends_with("error.rs"));
}

#[test]
fn test_into_anyhow() -> anyhow::Result<()> {
    fn fail() -> anyhow::Result<()> {
        Err(Exception::new(FactoryError::ReadFile, "cannot open dgm_parameters.yaml").into())
    }

    let err = match fail() {
        Ok(()) => return Err(anyhow::anyhow!("expected an exception")),
        Err(e) => e,
    };
    match err.downcast_ref::<Exception>().map(|e| e.error_code()) {
        Some(ErrorCode::Factory(FactoryError::ReadFile)) => Ok(()),
        other => Err(anyhow::anyhow!("unexpected code {:?}", other)),
    }
}
