mod selection;
mod selections;

pub use selection::SelectionSet;
pub use selections::Selections;
