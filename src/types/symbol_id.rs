//! Symbol identity numbers such as `101.0` or `534.002`.

use nom::{
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt},
    sequence::{pair, preceded},
    IResult,
};
use std::fmt;
use std::str::FromStr;

/// Identity of a symbol definition: an integer symbol number plus a
/// fractional sub-number.
///
/// Up to v8 the sub-number is a single digit (`xxx.y`); v9 and later allow
/// three digits (`xxxx.yyy`). Definitions refer to each other only through
/// this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SymbolId {
    pub major: u32,
    pub minor: u16,
}

impl SymbolId {
    pub const fn new(major: u32, minor: u16) -> Self {
        SymbolId { major, minor }
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

fn number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, u32::from_str)(input)
}

fn fraction(input: &str) -> IResult<&str, u16> {
    map_res(digit1, u16::from_str)(input)
}

fn parse_symbol_id(input: &str) -> IResult<&str, SymbolId> {
    let (rest, (major, minor)) = pair(number, opt(preceded(char('.'), fraction)))(input)?;
    Ok((rest, SymbolId::new(major, minor.unwrap_or(0))))
}

impl FromStr for SymbolId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        all_consuming(parse_symbol_id)(s.trim())
            .map(|(_, id)| id)
            .map_err(|e| format!("invalid symbol id '{}': {}", s, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!("101.2".parse::<SymbolId>().unwrap(), SymbolId::new(101, 2));
        assert_eq!("534".parse::<SymbolId>().unwrap(), SymbolId::new(534, 0));
        assert_eq!("534.002".parse::<SymbolId>().unwrap(), SymbolId::new(534, 2));
        assert!("1.2.3".parse::<SymbolId>().is_err());
        assert!("-4".parse::<SymbolId>().is_err());
        assert!("x".parse::<SymbolId>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(SymbolId::new(920, 3).to_string(), "920.3");
    }
}
