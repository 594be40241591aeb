pub mod category;

pub use category::{CategoryBrief, CategoryDetail, CategoryEdit};
