mod fs;
pub(crate) mod io;

pub(crate) use fs::*;
