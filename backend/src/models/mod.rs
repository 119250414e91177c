pub mod record;
pub mod shift;
pub mod summary;
pub mod time;

pub use record::*;
pub use shift::*;
pub use summary::*;
pub use time::*;
