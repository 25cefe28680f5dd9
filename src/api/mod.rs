pub mod handlers;
pub mod models;
pub mod routes;
pub mod serializers;
