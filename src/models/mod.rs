pub mod plan;
pub mod site;
pub mod stop;
