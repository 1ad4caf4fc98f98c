pub mod heikin_ashi;
pub use heikin_ashi::{heikin_ashi, WICK_EPSILON};
