pub mod area;
pub mod criteria;
pub mod resume;
pub mod session;
pub mod sync;
