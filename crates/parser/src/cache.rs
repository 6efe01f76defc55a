//! Cross-linking of resources and the methods that use them
//!
//! One cache per version, keyed by resource identifier. A resource seen in a
//! response body always wins over one seen in a request body, and the set of
//! methods referencing an identifier is never lost when an entry is replaced.

use apidox_common::{MethodRef, Resource, ResourceKey, ResourceList, ResourceOrigin};
use tracing::debug;

/// Link `resource` to `method` and store the canonical copy in `list`
///
/// Returns the key of the canonical entry, which may be a previously cached
/// resource rather than the one passed in.
pub fn link(
    list: &mut ResourceList,
    mut resource: Resource,
    method: &MethodRef,
    version: &str,
) -> ResourceKey {
    let key = resource.key(version);

    let Some(cached) = list.get_mut(version, &resource.id) else {
        debug!(version, id = %resource.id, origin = ?resource.origin, "Caching new resource");
        resource.methods.insert(method.id.clone(), method.clone());
        list.insert(version, resource);
        return key;
    };

    if resource.origin == ResourceOrigin::MethodResponse
        && cached.origin == ResourceOrigin::RequestBody
    {
        debug!(version, id = %resource.id, "Response resource replaces request body resource");
        resource.methods = std::mem::take(&mut cached.methods);
        resource.methods.insert(method.id.clone(), method.clone());
        *cached = resource;
    } else {
        debug!(version, id = %resource.id, "Reusing cached resource");
        cached.methods.insert(method.id.clone(), method.clone());
    }

    key
}
