pub mod career;
pub mod report;
pub mod roadmap;
