#[cfg(feature = "database")]
mod db_value;

pub mod days;
pub mod membership;
pub mod role;
pub mod subgroup_ref;
pub mod visibility;
