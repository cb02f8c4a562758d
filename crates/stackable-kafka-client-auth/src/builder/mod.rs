//! Small builders for the Kubernetes objects the resolvers emit.

pub mod env;
pub mod volume;
