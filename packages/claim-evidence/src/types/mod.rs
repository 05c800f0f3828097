pub mod claim;
pub mod config;
pub mod item;
pub mod outcome;
pub mod record;
pub mod reference;
pub mod summary;
pub mod verdict;
