//! Closed string-labelled enumerations.
//!
//! Every status, type and role in the model is a closed set with a stable
//! `snake_case` label used on the wire and in storage. [`define_label!`]
//! generates the enum together with its label table, `Display` and a
//! `FromStr` that reports unknown labels as a validation failure.

macro_rules! define_label {
    (
        $(#[$meta:meta])*
        $name:ident for $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every value, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stable `snake_case` label.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| value.as_str() == s)
                    .ok_or_else(|| $crate::error::ValidationError::InvalidValue {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }
    };
}
