// Career catalog: query backend for the matcher, career detail API, and seeding.

pub mod catalog;
pub mod handlers;
pub mod seed;
