//! Macro for implementing Display and FromStr for label enums
//!
//! Configuration switches are written as lowercase words in env vars and
//! config files. This macro maps each variant to one such word and parses
//! them back case-insensitively.
//!
//! # Example
//!
//! ```rust
//! use rollcall_domain::impl_domain_label_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum OutputFormat {
//!     Text,
//!     Json,
//! }
//!
//! impl_domain_label_conversions!(OutputFormat {
//!     Text => "text",
//!     Json => "json",
//! });
//!
//! assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
//! ```

/// Implements Display and FromStr traits for label enums
///
/// Display writes the label verbatim; FromStr lowercases its input before
/// matching and reports the enum name on failure.
#[macro_export]
macro_rules! impl_domain_label_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
