pub mod memory_identity;
pub mod memory_profiles;
pub mod pg_profiles;

pub use memory_identity::{IdentitySettings, MemoryIdentityProvider};
pub use memory_profiles::MemoryProfileStore;
pub use pg_profiles::PgProfileStore;
