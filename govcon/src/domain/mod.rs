mod classify;
mod contract;
mod contract_resource;
mod dashboard;
pub mod dates;
mod filters;
mod format;
mod funding;
mod ids;
mod lcat;
mod resource;

pub use classify::*;
pub use contract::*;
pub use contract_resource::*;
pub use dashboard::*;
pub use filters::*;
pub use format::*;
pub use funding::*;
pub use ids::*;
pub use lcat::*;
pub use resource::*;
