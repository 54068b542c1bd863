pub mod link;
pub mod link_store;
pub mod route;
pub mod route_store;
pub mod topology;
