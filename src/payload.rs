//! Helpers for reading loosely typed JSON request bodies.
//!
//! Clients send amounts as numbers or numeric strings, leave out fields they
//! do not want to change, and send `null` for fields they want to clear.

use serde::{Deserialize, Deserializer};

use crate::Error;

/// A field in a partial update.
///
/// Use with `#[serde(default)]` so that a field missing from the request body
/// becomes [Patch::Unchanged] while an explicit `null` becomes [Patch::Clear].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Patch<T> {
    /// The field was not in the request, keep the stored value.
    #[default]
    Unchanged,
    /// The field was `null`, remove the stored value.
    Clear,
    /// The field was set to a new value.
    Set(T),
}

impl<T> Patch<T> {
    /// Convert a patch for a field that must always have a value.
    ///
    /// Returns `Ok(None)` when the field is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [Error::ClearedRequiredField] if the patch tries to clear the field.
    pub fn required(self, field: &'static str) -> Result<Option<T>, Error> {
        match self {
            Patch::Unchanged => Ok(None),
            Patch::Clear => Err(Error::ClearedRequiredField(field)),
            Patch::Set(value) => Ok(Some(value)),
        }
    }

    /// Apply a fallible conversion to the new value, if there is one.
    pub fn try_map<U>(self, f: impl FnOnce(T) -> Result<U, Error>) -> Result<Patch<U>, Error> {
        match self {
            Patch::Unchanged => Ok(Patch::Unchanged),
            Patch::Clear => Ok(Patch::Clear),
            Patch::Set(value) => f(value).map(Patch::Set),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        })
    }
}

/// An amount of money as sent by a client, either `150.5` or `"150.50"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// A JSON number.
    Number(f64),
    /// A JSON string that should contain a number.
    Text(String),
}

impl AmountInput {
    /// Whether the input should be treated as if the field was left out.
    pub fn is_blank(&self) -> bool {
        matches!(self, AmountInput::Text(text) if text.trim().is_empty())
    }

    /// Convert the input to a non-negative amount.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::InvalidAmount] if the text is not a finite number,
    /// - or [Error::NegativeAmount] if the amount is less than zero.
    pub fn parse(&self) -> Result<f64, Error> {
        let amount = match self {
            AmountInput::Number(number) => *number,
            AmountInput::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::InvalidAmount(text.clone()))?,
        };

        if !amount.is_finite() {
            return Err(Error::InvalidAmount(amount.to_string()));
        }

        if amount < 0.0 {
            return Err(Error::NegativeAmount);
        }

        Ok(amount)
    }
}

/// Returns the trimmed text, or `None` if it is missing or only whitespace.
pub fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}


#[cfg(test)]
mod amount_tests {
    use crate::Error;

    use super::AmountInput;

    #[test]
    fn parses_numeric_string() {
        let amount: AmountInput = serde_json::from_str(r#""150.50""#).unwrap();

        assert_eq!(amount.parse(), Ok(150.5));
    }

    #[test]
    fn parses_number() {
        let amount: AmountInput = serde_json::from_str("42.25").unwrap();

        assert_eq!(amount.parse(), Ok(42.25));
    }

    #[test]
    fn rejects_text() {
        let amount = AmountInput::Text("lots".to_owned());

        assert_eq!(amount.parse(), Err(Error::InvalidAmount("lots".to_owned())));
    }

    #[test]
    fn rejects_negative_amount() {
        assert_eq!(
            AmountInput::Text("-5".to_owned()).parse(),
            Err(Error::NegativeAmount)
        );
    }

    #[test]
    fn empty_string_is_blank() {
        assert!(AmountInput::Text("  ".to_owned()).is_blank());
        assert!(!AmountInput::Number(0.0).is_blank());
    }
}
