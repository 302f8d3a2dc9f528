//! Enumerated field values.
//!
//! A choice field stores a short code (`"E"`, `"D"`, ...) and displays a
//! label. Each choice field is its own enum, declared with [`choice_enum!`],
//! so an unknown code is rejected as soon as a record is decoded.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A closed set of `(code, label)` pairs backing an enum.
pub trait Choice: Sized + Copy + 'static {
    /// Every `(code, label)` pair, in declaration order.
    const CHOICES: &'static [(&'static str, &'static str)];

    fn code(self) -> &'static str;

    fn label(self) -> &'static str;

    fn from_code(code: &str) -> Option<Self>;
}

/// Label for `code` in a choice table, if the code belongs to it.
pub fn label_for(choices: &[(&'static str, &'static str)], code: &str) -> Option<&'static str> {
    choices
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

/// Declare a choice enum stored by code.
///
/// ```ignore
/// choice_enum! {
///     pub enum Currency {
///         Dollar = ("D", "dollar"),
///         Euro = ("E", "euro"),
///     }
/// }
/// ```
#[macro_export]
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = ($code:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $crate::choice::Choice for $name {
            const CHOICES: &'static [(&'static str, &'static str)] = &[$(($code, $label)),+];

            fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str($crate::choice::Choice::label(*self))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::choice::Choice::code(*self))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let code = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                <Self as $crate::choice::Choice>::from_code(&code).ok_or_else(|| {
                    <D::Error as ::serde::de::Error>::custom(format!(
                        "`{}` is not a valid {} code",
                        code,
                        stringify!($name)
                    ))
                })
            }
        }
    };
}

/// Three-valued flag: true, false, or not known.
///
/// Stored on the wire as `true` / `false` / `null`. An absent value reads as
/// [`TriState::Unknown`], never as false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TriState {
    True,
    False,
    #[default]
    Unknown,
}

impl TriState {
    pub fn as_option(self) -> Option<bool> {
        match self {
            TriState::True => Some(true),
            TriState::False => Some(false),
            TriState::Unknown => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TriState::True => "yes",
            TriState::False => "no",
            TriState::Unknown => "unknown",
        }
    }

    pub fn is_known(self) -> bool {
        self != TriState::Unknown
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => TriState::True,
            Some(false) => TriState::False,
            None => TriState::Unknown,
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        Some(value).into()
    }
}

impl core::fmt::Display for TriState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for TriState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TriState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<bool>::deserialize(deserializer).map(TriState::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    crate::choice_enum! {
        enum Fruit {
            Apple = ("A", "apple"),
            Pear = ("P", "pear"),
        }
    }

    #[test]
    fn choice_enum_maps_codes_and_labels() {
        assert_eq!(Fruit::CHOICES, &[("A", "apple"), ("P", "pear")]);
        assert_eq!(Fruit::Pear.code(), "P");
        assert_eq!(Fruit::Pear.label(), "pear");
        assert_eq!(Fruit::from_code("A"), Some(Fruit::Apple));
        assert_eq!(Fruit::from_code("a"), None);
        assert_eq!(Fruit::Apple.to_string(), "apple");
    }

    #[test]
    fn choice_enum_serializes_as_code_and_rejects_unknown_codes() {
        assert_eq!(serde_json::to_value(Fruit::Apple).unwrap(), json!("A"));
        assert_eq!(serde_json::from_value::<Fruit>(json!("P")).unwrap(), Fruit::Pear);

        let err = serde_json::from_value::<Fruit>(json!("X")).unwrap_err();
        assert!(err.to_string().contains("not a valid Fruit code"));
    }

    #[test]
    fn label_for_looks_up_raw_tables() {
        assert_eq!(label_for(Fruit::CHOICES, "P"), Some("pear"));
        assert_eq!(label_for(Fruit::CHOICES, "Z"), None);
    }

    #[test]
    fn tri_state_null_is_unknown_not_false() {
        assert_eq!(serde_json::from_value::<TriState>(json!(null)).unwrap(), TriState::Unknown);
        assert_eq!(serde_json::from_value::<TriState>(json!(false)).unwrap(), TriState::False);
        assert_eq!(serde_json::to_value(TriState::Unknown).unwrap(), json!(null));
        assert_eq!(TriState::default(), TriState::Unknown);
    }

    #[derive(Debug, serde::Deserialize)]
    struct Flags {
        #[serde(default)]
        certified: TriState,
    }

    #[test]
    fn tri_state_absent_field_defaults_to_unknown() {
        let flags: Flags = serde_json::from_value(json!({})).unwrap();
        assert_eq!(flags.certified, TriState::Unknown);
        assert!(!flags.certified.is_known());
    }
}
