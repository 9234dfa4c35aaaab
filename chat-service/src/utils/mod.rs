pub mod arn;

pub use arn::extract_region_from_arn;
