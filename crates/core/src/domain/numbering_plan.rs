//! Phone-numbering-plan capability.
//!
//! National numbering plans change independently of this crate, so the
//! classification rules are consumed through [`NumberingPlan`] instead of
//! being encoded here. [`LibPhoneNumber`] is the production implementation,
//! backed by the libphonenumber metadata shipped with the `phonenumber` crate.

use phonenumber::metadata::DATABASE;
use phonenumber::{Mode, Type};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineType {
    Mobile,
    FixedLine,
    /// Ranges shared between fixed-line and mobile (e.g. all of NANP).
    FixedLineOrMobile,
    Other,
}

impl LineType {
    pub fn accepts_mobile(self) -> bool {
        matches!(self, Self::Mobile | Self::FixedLineOrMobile)
    }
}

pub trait NumberingPlan: Send + Sync {
    type Number;

    /// Parses a self-describing international number; no default region is
    /// assumed.
    fn parse(&self, raw: &str) -> Result<Self::Number, String>;

    fn is_valid(&self, number: &Self::Number) -> bool;

    fn classify(&self, number: &Self::Number) -> LineType;

    /// Canonical `+<country code><national number>` with no separators.
    fn format(&self, number: &Self::Number) -> String;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LibPhoneNumber;

impl NumberingPlan for LibPhoneNumber {
    type Number = phonenumber::PhoneNumber;

    fn parse(&self, raw: &str) -> Result<Self::Number, String> {
        phonenumber::parse(None, raw).map_err(|error| error.to_string())
    }

    fn is_valid(&self, number: &Self::Number) -> bool {
        number.is_valid()
    }

    fn classify(&self, number: &Self::Number) -> LineType {
        match number.number_type(&DATABASE) {
            Type::Mobile => LineType::Mobile,
            Type::FixedLine => LineType::FixedLine,
            Type::FixedLineOrMobile => LineType::FixedLineOrMobile,
            _ => LineType::Other,
        }
    }

    fn format(&self, number: &Self::Number) -> String {
        number.format().mode(Mode::E164).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{LibPhoneNumber, LineType, NumberingPlan};

    fn classify(raw: &str) -> LineType {
        let plan = LibPhoneNumber;
        let number = plan.parse(raw).expect("parseable number");
        plan.classify(&number)
    }

    #[test]
    fn classifies_known_ranges() {
        assert_eq!(classify("+447911123456"), LineType::Mobile);
        assert_eq!(classify("+442071234567"), LineType::FixedLine);
        assert_eq!(classify("+14155552671"), LineType::FixedLineOrMobile);
    }

    #[test]
    fn requires_a_country_code() {
        assert!(LibPhoneNumber.parse("4155552671").is_err());
    }

    #[test]
    fn only_mobile_capable_types_are_accepted() {
        assert!(LineType::Mobile.accepts_mobile());
        assert!(LineType::FixedLineOrMobile.accepts_mobile());
        assert!(!LineType::FixedLine.accepts_mobile());
        assert!(!LineType::Other.accepts_mobile());
    }
}
