pub mod convert;
pub mod import;
pub mod search;
