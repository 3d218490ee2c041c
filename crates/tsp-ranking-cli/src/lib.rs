pub mod rank;
pub mod util;
