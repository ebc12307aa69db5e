//! The site's concrete forms: schema, payload shape and post-submit redirect.

pub mod adoption;
pub mod membership;
pub mod release;
