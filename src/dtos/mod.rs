pub mod profile_dtos;

// alias so call sites read as `crate::dtos::profile`
pub use profile_dtos as profile;
