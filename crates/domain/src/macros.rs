//! Macro for implementing Display and FromStr for label enums
//!
//! Weekdays, drag modes and actor capabilities all travel as short lowercase
//! labels in logs, config files and the rendering layer. This macro keeps the
//! string mapping for each of them in one place.
//!
//! # Example
//!
//! ```rust
//! use cadence_domain::impl_label_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Edge {
//!     Top,
//!     Bottom,
//! }
//!
//! impl_label_conversions!(Edge {
//!     Top => "top",
//!     Bottom => "bottom",
//! });
//!
//! assert_eq!(Edge::Top.to_string(), "top");
//! assert_eq!("BOTTOM".parse::<Edge>(), Ok(Edge::Bottom));
//! ```

/// Implements Display and FromStr traits for label enums
///
/// This macro generates:
/// - Display trait: writes the variant's label
/// - FromStr trait: parses labels case-insensitively, ignoring surrounding
///   whitespace
///
/// Labels must be written in lowercase in the mapping.
#[macro_export]
macro_rules! impl_label_conversions {
    ($enum_name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($label),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($label => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
