//! Identity allocation for embedded editors.

use smol_str::{SmolStr, format_smolstr};
use uuid::Uuid;

/// Hands out the identity an embedding registers its editor under.
///
/// The identity doubles as the container element id, so generated values
/// start with a letter and stay valid as a `#id` selector.
pub struct IdentityAllocator;

impl IdentityAllocator {
    pub const PREFIX: &'static str = "tinymce-";

    /// Use the host-supplied identity if there is one, otherwise a fresh one.
    pub fn allocate(requested: Option<&str>) -> SmolStr {
        match requested {
            Some(id) => SmolStr::new(id),
            None => Self::fresh(),
        }
    }

    pub fn fresh() -> SmolStr {
        format_smolstr!("{}{}", Self::PREFIX, Uuid::new_v4().simple())
    }
}
