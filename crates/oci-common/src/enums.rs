//! Macro support for wire-format string enums.
//!
//! The service emits enum values as UPPERCASE strings and accepts them
//! case-insensitively. New values appear on the wire before clients learn
//! about them, so decoding must never fail on an unrecognised value: it is
//! preserved verbatim in an `Unknown` variant and logged. Sending an
//! `Unknown` value back is rejected during request validation instead.

/// Generate a wire-format string enum.
///
/// Each variant maps to its canonical wire value. The generated type
/// serialises to the canonical value, parses case-insensitively, preserves
/// unrecognised inbound values in `Unknown`, and exposes the canonical
/// value list for validation messages.
///
/// ```
/// use oci_common::enum_string;
///
/// enum_string! {
///     /// Lifecycle states of a widget.
///     pub enum WidgetState {
///         /// Widget is usable.
///         Available => "AVAILABLE",
///         /// Widget is gone.
///         Deleted => "DELETED",
///     }
/// }
///
/// assert_eq!(WidgetState::parse("available"), WidgetState::Available);
/// assert_eq!(WidgetState::Available.as_str(), "AVAILABLE");
/// assert!(WidgetState::parse("on-fire").is_unknown());
/// ```
#[macro_export]
macro_rules! enum_string {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $value:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
            /// Value observed on the wire that this client does not know
            Unknown(String),
        }

        impl $name {
            /// Canonical wire values accepted for this enum.
            #[must_use]
            pub const fn values() -> &'static [&'static str] {
                &[$($value),+]
            }

            /// Parse a wire value, case-insensitively.
            ///
            /// Unrecognised values are preserved in [`Self::Unknown`] and
            /// logged; they are not an error on the inbound path.
            #[must_use]
            pub fn parse(value: &str) -> Self {
                $(
                    if value.eq_ignore_ascii_case($value) {
                        return Self::$variant;
                    }
                )+
                tracing::warn!(
                    value = %value,
                    concat!("unrecognised ", stringify!($name), " value")
                );
                Self::Unknown(value.to_string())
            }

            /// The wire representation of this value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $value,)+
                    Self::Unknown(raw) => raw.as_str(),
                }
            }

            /// Returns true when the value was not recognised at decode time.
            #[must_use]
            pub fn is_unknown(&self) -> bool {
                matches!(self, Self::Unknown(_))
            }

            /// Reject `Unknown` values on the outbound path.
            ///
            /// # Errors
            ///
            /// Returns a binding error naming the field and the canonical
            /// values when the value was not recognised.
            pub fn ensure_known(
                &self,
                operation: &'static str,
                field: &'static str,
            ) -> $crate::Result<()> {
                if self.is_unknown() {
                    return Err($crate::Error::binding(
                        operation,
                        format!(
                            "{field} value {:?} is not one of {:?}",
                            self.as_str(),
                            Self::values()
                        ),
                    ));
                }
                Ok(())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Ok(Self::parse(&raw))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    enum_string! {
        /// Lifecycle states used by the macro tests.
        pub enum TestState {
            /// Resource is being created.
            Provisioning => "PROVISIONING",
            /// Resource is ready.
            Available => "AVAILABLE",
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(TestState::parse("PROVISIONING"), TestState::Provisioning);
        assert_eq!(TestState::parse("provisioning"), TestState::Provisioning);
        assert_eq!(TestState::parse("Available"), TestState::Available);
    }

    #[test]
    fn unknown_values_are_preserved() {
        let state = TestState::parse("FROZEN");
        assert!(state.is_unknown());
        assert_eq!(state.as_str(), "FROZEN");
    }

    #[test]
    fn serialises_canonical_value() {
        let json = serde_json::to_string(&TestState::Available).unwrap();
        assert_eq!(json, "\"AVAILABLE\"");
    }

    #[test]
    fn deserialises_mixed_case() {
        let state: TestState = serde_json::from_str("\"available\"").unwrap();
        assert_eq!(state, TestState::Available);
    }

    #[test]
    fn deserialise_keeps_unknown_raw() {
        let state: TestState = serde_json::from_str("\"HIBERNATED\"").unwrap();
        assert_eq!(state, TestState::Unknown("HIBERNATED".to_string()));
        // Round-trips the raw value rather than inventing one
        assert_eq!(serde_json::to_string(&state).unwrap(), "\"HIBERNATED\"");
    }

    #[test]
    fn values_lists_canonical_forms() {
        assert_eq!(TestState::values(), &["PROVISIONING", "AVAILABLE"]);
    }

    #[test]
    fn unknown_values_fail_outbound_validation() {
        assert!(TestState::Available.ensure_known("ListWidgets", "state").is_ok());

        let err = TestState::parse("FROZEN")
            .ensure_known("ListWidgets", "state")
            .unwrap_err();
        assert_eq!(err.error_code(), "BINDING_ERROR");
        assert!(err.to_string().contains("FROZEN"));
        assert!(err.to_string().contains("PROVISIONING"));
    }
}
