// Saved roadmaps: user-owned career plans stored as JSON documents.

pub mod handlers;
