pub mod contract_handlers;
pub mod form_handlers;
pub mod handlers;
pub mod routes;

pub use contract_handlers::*;
pub use form_handlers::*;
pub use handlers::*;
pub use routes::*;
