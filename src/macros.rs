/// Builds an [`Exception`](crate::Exception).
///
/// `exception!(code, msg)` keeps `msg` as is; any further arguments are a
/// format string and its arguments, appended to `msg`.
#[macro_export]
macro_rules! exception {
    ($code:expr, $msg:expr $(,)?) => {
        $crate::Exception::new($code, $msg)
    };
    ($code:expr, $msg:expr, $($arg:tt)+) => {
        $crate::Exception::with_format($code, $msg, format_args!($($arg)+))
    };
}

/// Returns early with an exception, converted into the function's error type.
#[macro_export]
macro_rules! bail_exception {
    ($($arg:tt)+) => {
        return Err($crate::exception!($($arg)+).into())
    };
}

#[cfg(test)]
use crate::code::{ErrorCode, FactoryError, TaskError, YamlCppError};

#[test]
fn test_exception_macro() {
    let e = exception!(FactoryError::SyntaxError, "parse failed");
    assert_eq!(e.message(), "parse failed");

    let e = exception!(FactoryError::UnreferedObject, "", "{}", 42);
    assert_eq!(e.message(), "42");

    let e = exception!(
        TaskError::MatrixSize,
        "Matrix size mismatch: ",
        "{}x{} vs {}x{}",
        3,
        4,
        4,
        3,
    );
    assert_eq!(e.message(), "Matrix size mismatch: 3x4 vs 4x3");
}

#[test]
fn test_bail_exception() {
    fn parse_flag(raw: &str) -> Result<bool, crate::Exception> {
        match raw {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => bail_exception!(YamlCppError::ParsingBool, "Cannot parse bool: ", "<{}>", raw),
        }
    }

    assert!(parse_flag("true").unwrap());
    let e = parse_flag("maybe").unwrap_err();
    assert_eq!(e.error_code(), ErrorCode::YamlCpp(YamlCppError::ParsingBool));
    assert_eq!(e.message(), "Cannot parse bool: <maybe>");
}
