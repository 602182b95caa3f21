pub mod article;
pub mod contract;
pub mod verdict;
