mod catalog_routes;
mod common;
