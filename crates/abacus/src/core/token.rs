//! Button tokens - the fixed keypad vocabulary
//!
//! Every front-end (terminal keypad, DOM buttons, CLI arguments) reduces its
//! input to a [`Token`] before it reaches the state machine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{CalcError, Operation};

/// A single button press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    /// A digit (0-9)
    Digit(u8),
    /// The decimal point
    Decimal,
    /// One of the four binary operators
    Operator(Operation),
    /// `=`
    Equals,
    /// `AC` - reset the calculator
    Clear,
    /// `DEL` - remove the last typed character
    Backspace,
    /// `+/-` - negate the displayed number
    ToggleSign,
    /// `%` - divide the displayed number by 100
    Percent,
}

impl Token {
    /// Every button on the keypad
    pub const ALL: [Self; 20] = [
        Self::Digit(0),
        Self::Digit(1),
        Self::Digit(2),
        Self::Digit(3),
        Self::Digit(4),
        Self::Digit(5),
        Self::Digit(6),
        Self::Digit(7),
        Self::Digit(8),
        Self::Digit(9),
        Self::Decimal,
        Self::Operator(Operation::Add),
        Self::Operator(Operation::Subtract),
        Self::Operator(Operation::Multiply),
        Self::Operator(Operation::Divide),
        Self::Equals,
        Self::Clear,
        Self::Backspace,
        Self::ToggleSign,
        Self::Percent,
    ];

    /// Returns the button label for this token
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Digit(d) => d.to_string(),
            Self::Decimal => ".".to_string(),
            Self::Operator(op) => op.symbol().to_string(),
            Self::Equals => "=".to_string(),
            Self::Clear => "AC".to_string(),
            Self::Backspace => "DEL".to_string(),
            Self::ToggleSign => "+/-".to_string(),
            Self::Percent => "%".to_string(),
        }
    }

    /// Returns the character a digit or decimal token types, if any
    #[must_use]
    pub fn to_char(&self) -> Option<char> {
        match self {
            Self::Digit(d) => char::from_digit(u32::from(*d), 10),
            Self::Decimal => Some('.'),
            _ => None,
        }
    }

    /// Creates a token from a typed character (digits, `.`, operators, `=`, `%`)
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => c.to_digit(10).map(|d| Self::Digit(d as u8)),
            '.' => Some(Self::Decimal),
            '=' => Some(Self::Equals),
            '%' => Some(Self::Percent),
            _ => Operation::from_symbol(c.encode_utf8(&mut [0; 4])).map(Self::Operator),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Token {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AC" => Ok(Self::Clear),
            "DEL" => Ok(Self::Backspace),
            "+/-" => Ok(Self::ToggleSign),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => {
                        Self::from_char(c).ok_or_else(|| CalcError::UnknownToken(s.to_string()))
                    }
                    _ => Err(CalcError::UnknownToken(s.to_string())),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_digits() {
        for d in 0..=9u8 {
            assert_eq!(d.to_string().parse::<Token>(), Ok(Token::Digit(d)));
        }
    }

    #[test]
    fn test_parse_named_buttons() {
        assert_eq!("AC".parse::<Token>(), Ok(Token::Clear));
        assert_eq!("DEL".parse::<Token>(), Ok(Token::Backspace));
        assert_eq!("+/-".parse::<Token>(), Ok(Token::ToggleSign));
        assert_eq!("%".parse::<Token>(), Ok(Token::Percent));
        assert_eq!("=".parse::<Token>(), Ok(Token::Equals));
        assert_eq!(".".parse::<Token>(), Ok(Token::Decimal));
    }

    #[test]
    fn test_parse_operators() {
        assert_eq!("+".parse::<Token>(), Ok(Token::Operator(Operation::Add)));
        assert_eq!("-".parse::<Token>(), Ok(Token::Operator(Operation::Subtract)));
        assert_eq!("*".parse::<Token>(), Ok(Token::Operator(Operation::Multiply)));
        assert_eq!("/".parse::<Token>(), Ok(Token::Operator(Operation::Divide)));
    }

    #[test]
    fn test_parse_unknown() {
        for label in ["", "10", "ac", "^", "(", "sqrt"] {
            assert_eq!(
                label.parse::<Token>(),
                Err(CalcError::UnknownToken(label.to_string()))
            );
        }
    }

    #[test]
    fn test_label_round_trip() {
        for token in Token::ALL {
            assert_eq!(token.label().parse::<Token>(), Ok(token));
        }
    }

    #[test]
    fn test_to_char() {
        assert_eq!(Token::Digit(7).to_char(), Some('7'));
        assert_eq!(Token::Decimal.to_char(), Some('.'));
        assert_eq!(Token::Equals.to_char(), None);
    }

    #[test]
    fn test_display_matches_label() {
        assert_eq!(Token::ToggleSign.to_string(), "+/-");
    }
}
