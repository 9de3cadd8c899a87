// Module layout (Clean Architecture style)
// - bootstrap: configuration and shared router state
// - domain: restaurants, file metadata, storage usage and quota
// - application: ports, use cases and the route guard policy
// - infrastructure: Postgres repositories and object storage adapters
// - presentation: HTTP handlers, session extraction and the guard layer

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
