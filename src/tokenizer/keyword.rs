//! Reserved words of the script language.
//!
//! Keywords are recognized after an identifier has been lexed (see
//! `parse_identifier`), so `TRUEISH` stays an identifier.

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display, strum::EnumIter, strum::AsRefStr,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Keyword {
    True,
    False,
    Null,
}
