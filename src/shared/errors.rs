//! Error message constants shared by feature actions.
//!
//! `execute_feature_action` relies on `ERR_UNSUPPORTED_ACTION` to tell
//! "not mine" apart from a real failure.

pub const ERR_UNSUPPORTED_ACTION: &str = "Unsupported action type";
pub const ERR_MISSING_TEXT_PARAM: &str = "Missing 'text' parameter";
pub const ERR_CANNOT_PARSE_UNIT: &str = "Could not parse unit from text";
pub const ERR_CANNOT_PARSE_AMOUNT: &str = "Could not parse currency amount from text";
